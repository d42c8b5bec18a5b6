//! The sequential audit run.
//!
//! One page at a time, one user's memberships at a time. Termination keeps
//! the original tool's semantics: an empty page, an API error page, and a
//! transport error all stop pagination, so an error on page N drops all
//! users on pages ≥ N. The three cases are logged at distinct levels so the
//! operator can tell truncation from exhaustion.

use anyhow::Result;
use gitlab_client::{User, UserPage, UsersApi};

use crate::classify;
use crate::report::CsvReport;

/// Counters for the final summary.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunStats {
    /// Listing calls issued, including the terminating one.
    pub pages_fetched: u32,
    /// Users returned by the listing, in any state.
    pub users_listed: usize,
    /// Users skipped because their state was not "active".
    pub skipped_state: usize,
    /// Users whose membership response was invalid (degraded to inactive).
    pub membership_failures: usize,
    pub active_members: usize,
    pub inactive_members: usize,
}

/// Run the full audit: paginate, filter, classify, write.
pub async fn run<A: UsersApi>(
    api: &A,
    per_page: u32,
    active: &mut CsvReport,
    inactive: &mut CsvReport,
) -> Result<RunStats> {
    let mut stats = RunStats::default();
    let mut page = 1u32;

    loop {
        let outcome = api.users_page(page, per_page).await;
        stats.pages_fetched += 1;

        let users = match outcome {
            Ok(UserPage::Users(users)) => users,
            Ok(UserPage::Empty) => {
                tracing::info!(page, "Reached end of user listing");
                break;
            }
            Ok(UserPage::Failed(message)) => {
                tracing::warn!(page, %message, "User listing returned an error, stopping");
                break;
            }
            Err(e) => {
                tracing::warn!(page, error = %e, "User listing fetch failed, stopping");
                break;
            }
        };

        tracing::info!(page, count = users.len(), "Processing users page");
        for user in &users {
            stats.users_listed += 1;
            audit_user(api, user, active, inactive, &mut stats).await?;
        }
        page += 1;
    }

    Ok(stats)
}

async fn audit_user<A: UsersApi>(
    api: &A,
    user: &User,
    active: &mut CsvReport,
    inactive: &mut CsvReport,
    stats: &mut RunStats,
) -> Result<()> {
    if !user.is_active_state() {
        tracing::info!(
            user_id = user.id,
            username = %user.username,
            state = %user.state,
            "Skipping user in non-active state"
        );
        stats.skipped_state += 1;
        return Ok(());
    }

    let memberships = match api.memberships(user.id).await {
        Ok(Some(list)) => Some(list),
        Ok(None) => {
            tracing::warn!(
                user_id = user.id,
                username = %user.username,
                "Invalid membership response, defaulting to zero memberships"
            );
            stats.membership_failures += 1;
            None
        }
        Err(e) => {
            tracing::warn!(
                user_id = user.id,
                username = %user.username,
                error = %e,
                "Membership fetch failed, defaulting to zero memberships"
            );
            stats.membership_failures += 1;
            None
        }
    };

    let counts = classify::count_memberships(memberships.as_deref());
    tracing::info!(
        user_id = user.id,
        username = %user.username,
        groups = counts.groups,
        projects = counts.projects,
        active_member = counts.is_active_member(),
        "Classified user"
    );

    if counts.is_active_member() {
        active.append(user)?;
        stats.active_members += 1;
    } else {
        inactive.append(user)?;
        stats.inactive_members += 1;
    }
    Ok(())
}
