use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::models::{ApplicationForm, Candidate, Job, JobDraft, Role};
use crate::query::{FilterState, ALL};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    role: Role,
}

#[derive(Debug, Serialize)]
struct StatusUpdate<'a> {
    status: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Blocking client for the portal API. One method per endpoint; every call is
/// a single attempt with no retry, and non-2xx responses surface the API's
/// `error` message when one is provided.
#[derive(Debug, Clone)]
pub struct PortalClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl PortalClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/jobs`. With a filter, the constraints are pushed to the
    /// server as query parameters; without one, the full collection comes
    /// back for client-side filtering.
    pub fn jobs(&self, filter: Option<&FilterState>) -> Result<Vec<Job>> {
        let mut request = self.client.get(format!("{}/api/jobs", self.base_url));
        if let Some(filter) = filter {
            request = request.query(&job_query_params(filter));
        }
        let response = request.send().context("Failed to reach the jobs API")?;
        Self::parse(response)
    }

    /// `GET /api/jobs/{id}`.
    pub fn job(&self, id: i64) -> Result<Job> {
        let response = self
            .client
            .get(format!("{}/api/jobs/{}", self.base_url, id))
            .send()
            .context("Failed to reach the jobs API")?;
        Self::parse(response)
    }

    /// `POST /api/jobs`. Returns the created posting.
    pub fn post_job(&self, draft: &JobDraft) -> Result<Job> {
        let response = self
            .client
            .post(format!("{}/api/jobs", self.base_url))
            .json(draft)
            .send()
            .context("Failed to submit the job posting")?;
        Self::parse(response)
    }

    /// `DELETE /api/jobs/{id}`.
    pub fn delete_job(&self, id: i64) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/api/jobs/{}", self.base_url, id))
            .send()
            .context("Failed to reach the jobs API")?;
        Self::expect_ok(response)
    }

    /// `POST /api/jobs/{id}/apply`.
    pub fn apply(&self, job_id: i64, form: &ApplicationForm) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/api/jobs/{}/apply", self.base_url, job_id))
            .json(form)
            .send()
            .context("Failed to submit the application")?;
        Self::expect_ok(response)
    }

    /// `POST /api/login`. Only reached when the local stub declined; see
    /// `session::check_credentials`.
    pub fn login(&self, username: &str, password: &str) -> Result<Role> {
        let response = self
            .client
            .post(format!("{}/api/login", self.base_url))
            .json(&LoginRequest { username, password })
            .send()
            .context("Failed to reach the login endpoint")?;
        let body: LoginResponse = Self::parse(response)?;
        Ok(body.role)
    }

    /// `GET /api/candidates`.
    pub fn candidates(&self) -> Result<Vec<Candidate>> {
        let response = self
            .client
            .get(format!("{}/api/candidates", self.base_url))
            .send()
            .context("Failed to reach the candidates API")?;
        Self::parse(response)
    }

    /// `PUT /api/applications/{id}/status`.
    pub fn set_application_status(&self, id: i64, status: &str) -> Result<()> {
        let response = self
            .client
            .put(format!("{}/api/applications/{}/status", self.base_url, id))
            .json(&StatusUpdate { status })
            .send()
            .context("Failed to update the application status")?;
        Self::expect_ok(response)
    }

    fn parse<T: DeserializeOwned>(response: reqwest::blocking::Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::api_error(response));
        }
        response.json().context("Failed to parse API response")
    }

    fn expect_ok(response: reqwest::blocking::Response) -> Result<()> {
        if !response.status().is_success() {
            return Err(Self::api_error(response));
        }
        Ok(())
    }

    fn api_error(response: reqwest::blocking::Response) -> anyhow::Error {
        let status = response.status();
        let body = response.text().unwrap_or_default();
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(err) => anyhow!(err.error),
            Err(_) => anyhow!("API request failed with status {}", status),
        }
    }
}

/// Query parameters for server-side job filtering. Empty and wildcard fields
/// are omitted entirely.
fn job_query_params(filter: &FilterState) -> Vec<(&'static str, &str)> {
    let mut params = Vec::new();
    if !filter.search.is_empty() {
        params.push(("search", filter.search.as_str()));
    }
    if !filter.location.is_empty() {
        params.push(("location", filter.location.as_str()));
    }
    if filter.category != ALL {
        params.push(("category", filter.category.as_str()));
    }
    if filter.job_type != ALL {
        params.push(("job_type", filter.job_type.as_str()));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = PortalClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_query_params_omit_defaults() {
        let filter = FilterState::default();
        assert!(job_query_params(&filter).is_empty());
    }

    #[test]
    fn test_query_params_include_set_fields() {
        let filter = FilterState {
            search: "engineer".to_string(),
            category: "Tech".to_string(),
            job_type: ALL.to_string(),
            location: "Berlin".to_string(),
        };
        let params = job_query_params(&filter);
        assert_eq!(
            params,
            vec![
                ("search", "engineer"),
                ("location", "Berlin"),
                ("category", "Tech"),
            ]
        );
    }

    #[test]
    fn test_error_body_message_is_surfaced() {
        let body: ErrorBody = serde_json::from_str(r#"{"error": "Missing applicant info"}"#).unwrap();
        assert_eq!(body.error, "Missing applicant info");
    }

    #[test]
    fn test_login_response_parses_role() {
        let body: LoginResponse = serde_json::from_str(r#"{"role": "employer"}"#).unwrap();
        assert_eq!(body.role, Role::Employer);
    }
}
