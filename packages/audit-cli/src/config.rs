//! Runtime configuration.
//!
//! Resolved once at startup from the environment (a `.env` file is honored)
//! and CLI flags, then passed explicitly into the client and pipeline.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "https://gitlab.example.com";
/// Stand-in token used when `TOKEN` is unset. Requests sent with it will
/// fail authentication; the run degrades to an all-empty report.
pub const PLACEHOLDER_TOKEN: &str = "glpat-REPLACE-ME";

pub const DEFAULT_PER_PAGE: u32 = 100;
pub const DEFAULT_ACTIVE_OUT: &str = "active_users.csv";
pub const DEFAULT_INACTIVE_OUT: &str = "inactive_users.csv";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the GitLab instance.
    pub host: String,
    /// Private token, sent as a `PRIVATE-TOKEN` header.
    pub token: String,
    /// Users-listing page size.
    pub per_page: u32,
    /// Output path for the active-members report.
    pub active_out: PathBuf,
    /// Output path for the inactive-members report.
    pub inactive_out: PathBuf,
}

impl Config {
    /// Build a config from environment variables, falling back to the
    /// documented defaults. CLI flags are layered on top by the caller.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            token: env::var("TOKEN").unwrap_or_else(|_| PLACEHOLDER_TOKEN.to_string()),
            per_page: DEFAULT_PER_PAGE,
            active_out: PathBuf::from(DEFAULT_ACTIVE_OUT),
            inactive_out: PathBuf::from(DEFAULT_INACTIVE_OUT),
        }
    }

    /// Whether the token is still the unset placeholder.
    pub fn token_is_placeholder(&self) -> bool {
        self.token == PLACEHOLDER_TOKEN
    }
}
