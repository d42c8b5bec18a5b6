use serde::Deserialize;

/// A user account as returned by `GET /api/v4/users`.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub name: String,
    /// Only visible to administrators; may be absent or null.
    #[serde(default)]
    pub email: Option<String>,
    /// Account state: "active", "blocked", "deactivated", ...
    pub state: String,
}

impl User {
    /// Whether the account itself is in "active" state. Distinct from being
    /// an active *member* (holding group/project memberships).
    pub fn is_active_state(&self) -> bool {
        self.state == "active"
    }
}

/// A membership record from `GET /api/v4/users/{id}/memberships`.
///
/// Only `source_type` drives classification; the other fields are carried
/// through as the endpoint returns them.
#[derive(Debug, Clone, Deserialize)]
pub struct Membership {
    pub source_type: String,
    #[serde(default)]
    pub source_id: Option<u64>,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub access_level: Option<u32>,
}

/// `source_type` value for group memberships.
pub const SOURCE_TYPE_GROUP: &str = "Namespace";
/// `source_type` value for project memberships.
pub const SOURCE_TYPE_PROJECT: &str = "Project";

/// Outcome of fetching one page of the users listing.
///
/// The users endpoint answers with either a JSON array or an error object.
/// Both an empty array and an error object terminate pagination (so a
/// mid-run API error truncates the listing), but they are tagged separately
/// so the log can tell truncation from exhaustion.
#[derive(Debug, Clone)]
pub enum UserPage {
    /// Non-empty page of users.
    Users(Vec<User>),
    /// Empty array: end of data.
    Empty,
    /// Non-array response; carries the extracted error message.
    Failed(String),
}
