//! Membership classification.

use gitlab_client::{Membership, SOURCE_TYPE_GROUP, SOURCE_TYPE_PROJECT};

/// Group and project membership counts for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MembershipCounts {
    pub groups: usize,
    pub projects: usize,
}

impl MembershipCounts {
    /// A user is an active member iff it holds at least one group or
    /// project membership.
    pub fn is_active_member(&self) -> bool {
        self.groups + self.projects > 0
    }
}

/// Count memberships whose `source_type` equals `source_type` exactly.
pub fn count_by_source(memberships: &[Membership], source_type: &str) -> usize {
    memberships
        .iter()
        .filter(|m| m.source_type == source_type)
        .count()
}

/// Derive counts from a membership response. An invalid response (`None`)
/// counts as zero of each, classifying the user inactive.
pub fn count_memberships(memberships: Option<&[Membership]>) -> MembershipCounts {
    match memberships {
        Some(list) => MembershipCounts {
            groups: count_by_source(list, SOURCE_TYPE_GROUP),
            projects: count_by_source(list, SOURCE_TYPE_PROJECT),
        },
        None => MembershipCounts {
            groups: 0,
            projects: 0,
        },
    }
}
