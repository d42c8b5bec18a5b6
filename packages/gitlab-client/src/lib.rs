//! Pure GitLab REST API client.
//!
//! A minimal client for the GitLab v4 API, covering the two endpoints the
//! user audit consumes: the paginated users listing and per-user
//! memberships. Authentication is a `PRIVATE-TOKEN` header.
//!
//! # Example
//!
//! ```rust,ignore
//! use gitlab_client::GitlabClient;
//!
//! let client = GitlabClient::new("https://gitlab.example.com".into(), token);
//!
//! match client.users_page(1, 100).await? {
//!     UserPage::Users(users) => println!("{} users", users.len()),
//!     UserPage::Empty => println!("no more users"),
//!     UserPage::Failed(msg) => eprintln!("listing failed: {msg}"),
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{GitlabError, Result};
pub use types::{Membership, User, UserPage, SOURCE_TYPE_GROUP, SOURCE_TYPE_PROJECT};

use async_trait::async_trait;
use serde_json::Value;

/// The two read-only calls the audit pipeline makes.
///
/// `GitlabClient` is the real implementation; tests substitute an in-memory
/// one.
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// Fetch one page of the users listing.
    async fn users_page(&self, page: u32, per_page: u32) -> Result<UserPage>;

    /// Fetch a user's memberships. `None` means the response was invalid
    /// (empty, `null`, or not an array); the caller decides how to degrade.
    async fn memberships(&self, user_id: u64) -> Result<Option<Vec<Membership>>>;
}

pub struct GitlabClient {
    client: reqwest::Client,
    host: String,
    token: String,
}

impl GitlabClient {
    pub fn new(host: String, token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            host: host.trim_end_matches('/').to_string(),
            token,
        }
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?;
        // The body is parsed regardless of status: GitLab error objects
        // ({"message": ...}) come back on 401/403/404 and the audit degrades
        // them instead of aborting.
        Ok(resp.text().await?)
    }
}

#[async_trait]
impl UsersApi for GitlabClient {
    async fn users_page(&self, page: u32, per_page: u32) -> Result<UserPage> {
        let url = format!(
            "{}/api/v4/users?per_page={}&page={}",
            self.host, per_page, page
        );
        tracing::debug!(page, per_page, "Fetching users page");
        let body = self.get_text(&url).await?;
        Ok(parse_users_page(&body))
    }

    async fn memberships(&self, user_id: u64) -> Result<Option<Vec<Membership>>> {
        let url = format!("{}/api/v4/users/{}/memberships", self.host, user_id);
        tracing::debug!(user_id, "Fetching memberships");
        let body = self.get_text(&url).await?;
        Ok(parse_memberships(&body))
    }
}

/// Parse a users-listing response body into a tagged page outcome.
///
/// A JSON array is a page (empty array = end of data). Anything else is a
/// failed page carrying the extracted error message.
pub fn parse_users_page(body: &str) -> UserPage {
    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return UserPage::Failed(raw_message(body)),
    };
    match value {
        Value::Array(entries) if entries.is_empty() => UserPage::Empty,
        Value::Array(entries) => {
            match entries
                .into_iter()
                .map(serde_json::from_value)
                .collect::<std::result::Result<Vec<User>, _>>()
            {
                Ok(users) => UserPage::Users(users),
                Err(e) => UserPage::Failed(format!("unparseable user entry: {e}")),
            }
        }
        other => UserPage::Failed(extract_error_message(&other, body)),
    }
}

/// Parse a memberships response body.
///
/// `None` for an empty body, the literal `null`, or any non-array JSON.
/// Malformed entries inside a valid array are skipped rather than failing
/// the whole response.
pub fn parse_memberships(body: &str) -> Option<Vec<Membership>> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value {
        Value::Array(entries) => Some(
            entries
                .into_iter()
                .filter_map(|entry| match serde_json::from_value(entry) {
                    Ok(m) => Some(m),
                    Err(e) => {
                        tracing::warn!(error = %e, "Skipping malformed membership entry");
                        None
                    }
                })
                .collect(),
        ),
        _ => None,
    }
}

/// Pull a human-readable message out of an API error object: the `message`
/// field, else the `error` field, else the raw body.
fn extract_error_message(value: &Value, body: &str) -> String {
    value
        .get("message")
        .or_else(|| value.get("error"))
        .map(|m| match m {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| raw_message(body))
}

fn raw_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "empty response".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_users_page_array() {
        let body = r#"[
            {"id": 1, "username": "root", "name": "Administrator",
             "email": "admin@example.com", "state": "active"},
            {"id": 7, "username": "bot", "name": "CI Bot", "state": "blocked"}
        ]"#;
        match parse_users_page(body) {
            UserPage::Users(users) => {
                assert_eq!(users.len(), 2);
                assert_eq!(users[0].username, "root");
                assert!(users[0].is_active_state());
                assert_eq!(users[1].email, None);
                assert!(!users[1].is_active_state());
            }
            other => panic!("expected users, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_users_page_empty_array() {
        assert!(matches!(parse_users_page("[]"), UserPage::Empty));
    }

    #[test]
    fn test_parse_users_page_error_object_message_field() {
        let page = parse_users_page(r#"{"message": "401 Unauthorized"}"#);
        match page {
            UserPage::Failed(msg) => assert_eq!(msg, "401 Unauthorized"),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_users_page_error_object_error_field() {
        let page = parse_users_page(r#"{"error": "invalid_token"}"#);
        match page {
            UserPage::Failed(msg) => assert_eq!(msg, "invalid_token"),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_users_page_non_json_falls_back_to_raw() {
        let page = parse_users_page("502 Bad Gateway");
        match page {
            UserPage::Failed(msg) => assert_eq!(msg, "502 Bad Gateway"),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_users_page_empty_body() {
        match parse_users_page("") {
            UserPage::Failed(msg) => assert_eq!(msg, "empty response"),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_memberships_array() {
        let body = r#"[
            {"source_id": 3, "source_name": "infra", "source_type": "Namespace", "access_level": 30},
            {"source_id": 9, "source_name": "deploy-tool", "source_type": "Project", "access_level": 40}
        ]"#;
        let memberships = parse_memberships(body).unwrap();
        assert_eq!(memberships.len(), 2);
        assert_eq!(memberships[0].source_type, SOURCE_TYPE_GROUP);
        assert_eq!(memberships[1].source_type, SOURCE_TYPE_PROJECT);
    }

    #[test]
    fn test_parse_memberships_null_is_invalid() {
        assert!(parse_memberships("null").is_none());
    }

    #[test]
    fn test_parse_memberships_empty_body_is_invalid() {
        assert!(parse_memberships("").is_none());
    }

    #[test]
    fn test_parse_memberships_error_object_is_invalid() {
        assert!(parse_memberships(r#"{"message": "404 User Not Found"}"#).is_none());
    }

    #[test]
    fn test_parse_memberships_skips_malformed_entries() {
        let body = r#"[{"source_type": "Project"}, {"source_id": "not-a-number"}]"#;
        let memberships = parse_memberships(body).unwrap();
        assert_eq!(memberships.len(), 1);
        assert_eq!(memberships[0].source_type, SOURCE_TYPE_PROJECT);
    }
}
