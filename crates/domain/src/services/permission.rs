//! Permission evaluation against the club role hierarchy.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::MembershipError;
use crate::models::{MemberRole, Membership};

/// Decide whether a (possibly absent) membership satisfies `minimum`.
///
/// Absent or non-ACTIVE memberships never satisfy any role.
pub fn evaluate_permission(membership: Option<&Membership>, minimum: MemberRole) -> bool {
    match membership {
        Some(m) if m.is_active() => m.role.satisfies(minimum),
        _ => false,
    }
}

/// Store-backed permission check.
///
/// The room/messaging subsystem depends on this seam to decide moderation
/// capabilities without touching membership state.
#[async_trait]
pub trait PermissionEvaluator: Send + Sync {
    async fn has_permission(
        &self,
        club_id: Uuid,
        user_id: Uuid,
        minimum: MemberRole,
    ) -> Result<bool, MembershipError>;
}
