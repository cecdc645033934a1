//! Store-backed permission evaluation.

use async_trait::async_trait;
use domain::models::{Club, MemberRole, Membership};
use domain::services::{evaluate_permission, PermissionEvaluator};
use domain::MembershipError;
use persistence::repositories::{ClubRepository, MembershipRepository};
use sqlx::PgPool;
use uuid::Uuid;

/// Answers role checks from the membership table.
#[derive(Clone)]
pub struct StorePermissionEvaluator {
    memberships: MembershipRepository,
}

impl StorePermissionEvaluator {
    pub fn new(pool: PgPool) -> Self {
        Self {
            memberships: MembershipRepository::new(pool),
        }
    }

    /// Fail with `INSUFFICIENT_PERMISSIONS` unless `user_id` holds at least `minimum`.
    pub async fn require(
        &self,
        club_id: Uuid,
        user_id: Uuid,
        minimum: MemberRole,
    ) -> Result<Membership, MembershipError> {
        let membership: Option<Membership> = self
            .memberships
            .find(club_id, user_id)
            .await?
            .map(Into::into);

        match membership {
            Some(m) if evaluate_permission(Some(&m), minimum) => Ok(m),
            _ => Err(MembershipError::InsufficientPermissions),
        }
    }
}

#[async_trait]
impl PermissionEvaluator for StorePermissionEvaluator {
    async fn has_permission(
        &self,
        club_id: Uuid,
        user_id: Uuid,
        minimum: MemberRole,
    ) -> Result<bool, MembershipError> {
        let membership: Option<Membership> = self
            .memberships
            .find(club_id, user_id)
            .await?
            .map(Into::into);
        Ok(evaluate_permission(membership.as_ref(), minimum))
    }
}

/// Load a club or fail with `CLUB_NOT_FOUND`.
pub async fn load_club(clubs: &ClubRepository, club_id: Uuid) -> Result<Club, MembershipError> {
    clubs
        .find_by_id(club_id)
        .await?
        .map(Into::into)
        .ok_or(MembershipError::ClubNotFound)
}
