use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One posting as served by the portal API. Only `title` and `company` are
/// guaranteed by the server; the remaining columns are nullable and get
/// display fallbacks at render time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, alias = "type")]
    pub job_type: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub posted_at: Option<String>,
    #[serde(default)]
    pub application_count: Option<u32>,
}

/// An application row from `GET /api/candidates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub job_title: Option<String>,
    pub status: String, // "Pending", "Accepted", "Rejected"
    #[serde(default)]
    pub applied_at: Option<String>,
}

pub const APPLICATION_STATUSES: [&str; 3] = ["Pending", "Accepted", "Rejected"];

/// Payload for `POST /api/jobs`.
#[derive(Debug, Clone, Serialize)]
pub struct JobDraft {
    pub title: String,
    pub company: String,
    pub category: String,
    pub salary: String,
    pub description: String,
    pub job_type: String,
    pub location: String,
}

impl Default for JobDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            company: String::new(),
            category: String::new(),
            salary: String::new(),
            description: String::new(),
            job_type: "Full-time".to_string(),
            location: "Remote".to_string(),
        }
    }
}

/// Payload for `POST /api/jobs/{id}/apply`.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationForm {
    pub name: String,
    pub email: String,
}

/// Role granted at login. `user` is what the API calls a plain seeker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "user")]
    Seeker,
    Employer,
    Admin,
}

/// Load the job store from a static JSON file instead of the API.
pub fn load_jobs_file(path: &Path) -> Result<Vec<Job>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read jobs file: {}", path.display()))?;
    serde_json::from_str(&raw).context("Failed to parse jobs file")
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Seeker => "seeker",
            Role::Employer => "employer",
            Role::Admin => "admin",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_deserializes_with_nullable_columns() {
        let json = r#"{
            "id": 3,
            "title": "Senior Engineer",
            "company": "Acme",
            "description": null,
            "location": null,
            "salary": null,
            "posted_at": "2026-01-05T10:00:00",
            "application_count": 2
        }"#;
        let job: Job = serde_json::from_str(json).unwrap();
        assert_eq!(job.id, 3);
        assert_eq!(job.title, "Senior Engineer");
        assert!(job.category.is_none());
        assert!(job.job_type.is_none());
        assert_eq!(job.application_count, Some(2));
    }

    #[test]
    fn test_job_accepts_type_alias() {
        // Some feeds use "type" instead of "job_type"
        let json = r#"{"id": 1, "title": "Designer", "company": "Studio", "type": "Contract"}"#;
        let job: Job = serde_json::from_str(json).unwrap();
        assert_eq!(job.job_type.as_deref(), Some("Contract"));
    }

    #[test]
    fn test_role_parses_api_spellings() {
        assert_eq!(serde_json::from_str::<Role>(r#""admin""#).unwrap(), Role::Admin);
        assert_eq!(serde_json::from_str::<Role>(r#""employer""#).unwrap(), Role::Employer);
        // The API reports plain accounts as "user"
        assert_eq!(serde_json::from_str::<Role>(r#""user""#).unwrap(), Role::Seeker);
        assert_eq!(serde_json::from_str::<Role>(r#""seeker""#).unwrap(), Role::Seeker);
    }

    #[test]
    fn test_job_draft_defaults() {
        let draft = JobDraft::default();
        assert_eq!(draft.job_type, "Full-time");
        assert_eq!(draft.location, "Remote");
        assert!(draft.title.is_empty());
    }
}
