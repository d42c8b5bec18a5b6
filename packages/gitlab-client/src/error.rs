//! Error types for the GitLab client.

use thiserror::Error;

/// Result type for GitLab client operations.
pub type Result<T> = std::result::Result<T, GitlabError>;

/// GitLab client errors.
///
/// API-level failures (an error object where an array was expected) are not
/// errors at this level; they surface as [`crate::UserPage::Failed`] or an
/// invalid membership response, because the audit degrades them rather than
/// aborting.
#[derive(Debug, Error)]
pub enum GitlabError {
    /// Network error (connection failed, timeout, unreadable body)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
