//! GitLab user activity audit.
//!
//! One-shot batch job: walk the paginated users listing, classify every
//! active-state account by its group/project memberships, write the two CSV
//! reports, then run post-hoc integrity checks on them.

pub mod classify;
pub mod config;
pub mod pipeline;
pub mod report;
pub mod verify;
