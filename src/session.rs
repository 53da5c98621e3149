use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::models::Role;

// MOCK CAPABILITY CHECK. A fixed password grants the admin view and a
// username substring grants the employer view, entirely client-side. This
// gates which screens the terminal shows and nothing else; a real deployment
// replaces it with a verified credential/session mechanism, and no server
// may trust the stored flag.
const ADMIN_PASSWORDS: [&str; 2] = ["admin123", "njp123"];
const EMPLOYER_MARKER: &str = "employer";

/// Resolve a role locally. Returns None when the credentials don't hit the
/// stub, in which case the caller forwards them to `POST /api/login`.
pub fn check_credentials(username: &str, password: &str) -> Option<Role> {
    if ADMIN_PASSWORDS.contains(&password) {
        Some(Role::Admin)
    } else if username.to_lowercase().contains(EMPLOYER_MARKER) {
        Some(Role::Employer)
    } else {
        None
    }
}

/// The client-held login state, persisted across runs. The web front end kept
/// this in browser local storage; here it is a small JSON file in the user
/// data directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub role: Option<Role>,
    pub username: Option<String>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }
}

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn open() -> Result<Self> {
        Ok(Self { path: Self::default_path()? })
    }

    /// Store rooted at an explicit file, for tests.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn default_path() -> Result<PathBuf> {
        // Use XDG data directory or fallback
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "openings") {
            Ok(proj_dirs.data_dir().join("session.json"))
        } else {
            Ok(PathBuf::from("session.json"))
        }
    }

    /// A missing or unreadable session file is the logged-out state.
    pub fn load(&self) -> Session {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove session file: {}", self.path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> SessionStore {
        let dir = std::env::temp_dir()
            .join("openings-tests")
            .join(format!("{}-{}", name, std::process::id()));
        SessionStore::at(dir.join("session.json"))
    }

    #[test]
    fn test_fixed_password_grants_admin() {
        assert_eq!(check_credentials("anyone", "admin123"), Some(Role::Admin));
        assert_eq!(check_credentials("anyone", "njp123"), Some(Role::Admin));
    }

    #[test]
    fn test_employer_username_grants_employer() {
        assert_eq!(check_credentials("acme-employer", "pw"), Some(Role::Employer));
        assert_eq!(check_credentials("EMPLOYER42", "pw"), Some(Role::Employer));
    }

    #[test]
    fn test_admin_password_wins_over_employer_name() {
        // Both rules hit; the password rule is checked first
        assert_eq!(check_credentials("employer", "admin123"), Some(Role::Admin));
    }

    #[test]
    fn test_unknown_credentials_defer_to_api() {
        assert_eq!(check_credentials("alice", "hunter2"), None);
    }

    #[test]
    fn test_missing_file_is_logged_out() {
        let store = temp_store("missing");
        let session = store.load();
        assert!(session.role.is_none());
        assert!(!session.is_admin());
    }

    #[test]
    fn test_save_load_round_trip() {
        let store = temp_store("roundtrip");
        let session = Session {
            role: Some(Role::Admin),
            username: Some("boss".to_string()),
        };
        store.save(&session).unwrap();

        let loaded = store.load();
        assert!(loaded.is_admin());
        assert_eq!(loaded.username.as_deref(), Some("boss"));

        store.clear().unwrap();
        assert!(store.load().role.is_none());
    }

    #[test]
    fn test_corrupt_file_is_logged_out() {
        let store = temp_store("corrupt");
        if let Some(parent) = store.path().parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(store.path(), "not json").unwrap();
        assert!(store.load().role.is_none());
        store.clear().unwrap();
    }
}
