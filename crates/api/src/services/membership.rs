//! Direct joins, leaving, and member/role management.

use domain::models::{
    ClubVisibility, ListMembersQuery, ListMembersResponse, MemberRole, Membership,
    MembershipStatus, Pagination, PermissionQuery, PermissionResponse, UpdateRoleResponse,
};
use domain::services::PermissionEvaluator;
use domain::MembershipError;
use persistence::repositories::{
    ClubRepository, JoinOutcome, LeaveOutcome, MembershipRepository, TargetOutcome,
};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::services::permission::{load_club, StorePermissionEvaluator};

pub struct MembershipService {
    clubs: ClubRepository,
    memberships: MembershipRepository,
    permissions: StorePermissionEvaluator,
}

impl MembershipService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            clubs: ClubRepository::new(pool.clone()),
            memberships: MembershipRepository::new(pool.clone()),
            permissions: StorePermissionEvaluator::new(pool),
        }
    }

    async fn membership_of(
        &self,
        club_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Membership>, MembershipError> {
        Ok(self
            .memberships
            .find(club_id, user_id)
            .await?
            .map(Into::into))
    }

    /// Join a PUBLIC club directly.
    pub async fn join_club(
        &self,
        club_id: Uuid,
        user_id: Uuid,
    ) -> Result<Membership, MembershipError> {
        let club = load_club(&self.clubs, club_id).await?;

        match self.membership_of(club_id, user_id).await?.map(|m| m.status) {
            Some(MembershipStatus::Active) => return Err(MembershipError::AlreadyMember),
            Some(MembershipStatus::Banned) => return Err(MembershipError::BannedFromClub),
            _ => {}
        }

        if club.visibility != ClubVisibility::Public {
            return Err(MembershipError::RequiresApproval);
        }

        match self.memberships.join(club_id, user_id).await? {
            JoinOutcome::Joined(membership) => {
                info!(club_id = %club_id, user_id = %user_id, "Member joined club");
                Ok(membership.into())
            }
            JoinOutcome::AlreadyMember => Err(MembershipError::AlreadyMember),
            JoinOutcome::Banned => Err(MembershipError::BannedFromClub),
            JoinOutcome::ClubNotFound => Err(MembershipError::ClubNotFound),
            JoinOutcome::ClubRetired => Err(MembershipError::ClubRetired),
        }
    }

    /// Leave a club. The owner may only leave as the last active member.
    pub async fn leave_club(&self, club_id: Uuid, user_id: Uuid) -> Result<(), MembershipError> {
        load_club(&self.clubs, club_id).await?;

        match self.memberships.leave(club_id, user_id).await? {
            LeaveOutcome::Left => {
                info!(club_id = %club_id, user_id = %user_id, "Member left club");
                Ok(())
            }
            LeaveOutcome::NotAMember => Err(MembershipError::NotAMember),
            LeaveOutcome::OwnerMustTransfer => Err(MembershipError::OwnerMustTransferOwnership),
        }
    }

    /// Soft-remove another member. Requires ADMIN.
    pub async fn remove_member(
        &self,
        club_id: Uuid,
        target_user_id: Uuid,
        remover_id: Uuid,
    ) -> Result<(), MembershipError> {
        load_club(&self.clubs, club_id).await?;
        self.permissions
            .require(club_id, remover_id, MemberRole::Admin)
            .await?;

        match self.memberships.remove(club_id, target_user_id).await? {
            TargetOutcome::Updated(_) => {
                info!(
                    club_id = %club_id,
                    user_id = %target_user_id,
                    removed_by = %remover_id,
                    "Member removed"
                );
                Ok(())
            }
            TargetOutcome::NotAMember => Err(MembershipError::NotAMember),
            TargetOutcome::TargetIsOwner => Err(MembershipError::CannotRemoveOwner),
        }
    }

    /// Reassign a member's role. Only the owner may do this, and OWNER is
    /// never granted or taken away here.
    pub async fn update_member_role(
        &self,
        club_id: Uuid,
        target_user_id: Uuid,
        new_role: MemberRole,
        caller_id: Uuid,
    ) -> Result<UpdateRoleResponse, MembershipError> {
        load_club(&self.clubs, club_id).await?;
        self.permissions
            .require(club_id, caller_id, MemberRole::Owner)
            .await?;

        if new_role == MemberRole::Owner {
            return Err(MembershipError::CannotChangeOwnerRole);
        }

        match self
            .memberships
            .update_role(club_id, target_user_id, new_role)
            .await?
        {
            TargetOutcome::Updated(entity) => {
                let membership: Membership = entity.into();
                info!(
                    club_id = %club_id,
                    user_id = %target_user_id,
                    role = %membership.role,
                    changed_by = %caller_id,
                    "Member role changed"
                );
                Ok(UpdateRoleResponse {
                    club_id,
                    user_id: target_user_id,
                    role: membership.role,
                    updated_at: membership.updated_at,
                })
            }
            TargetOutcome::NotAMember => Err(MembershipError::NotAMember),
            TargetOutcome::TargetIsOwner => Err(MembershipError::CannotChangeOwnerRole),
        }
    }

    /// Ban a user, whether or not they are currently a member. Requires ADMIN.
    pub async fn ban_member(
        &self,
        club_id: Uuid,
        target_user_id: Uuid,
        caller_id: Uuid,
    ) -> Result<(), MembershipError> {
        load_club(&self.clubs, club_id).await?;
        self.permissions
            .require(club_id, caller_id, MemberRole::Admin)
            .await?;

        match self
            .memberships
            .ban(club_id, target_user_id, caller_id)
            .await?
        {
            TargetOutcome::Updated(_) => {
                info!(
                    club_id = %club_id,
                    user_id = %target_user_id,
                    banned_by = %caller_id,
                    "Member banned"
                );
                Ok(())
            }
            TargetOutcome::TargetIsOwner => Err(MembershipError::CannotRemoveOwner),
            TargetOutcome::NotAMember => Err(MembershipError::NotAMember),
        }
    }

    /// Lift a ban. The user ends up LEFT and may rejoin through the normal paths.
    pub async fn unban_member(
        &self,
        club_id: Uuid,
        target_user_id: Uuid,
        caller_id: Uuid,
    ) -> Result<(), MembershipError> {
        load_club(&self.clubs, club_id).await?;
        self.permissions
            .require(club_id, caller_id, MemberRole::Admin)
            .await?;

        if !self.memberships.unban(club_id, target_user_id).await? {
            return Err(MembershipError::NotBanned);
        }

        info!(
            club_id = %club_id,
            user_id = %target_user_id,
            unbanned_by = %caller_id,
            "Member unbanned"
        );
        Ok(())
    }

    /// Active members, oldest first. Non-PUBLIC clubs only show their roster to members.
    pub async fn list_members(
        &self,
        club_id: Uuid,
        caller_id: Uuid,
        query: ListMembersQuery,
    ) -> Result<ListMembersResponse, MembershipError> {
        let club = load_club(&self.clubs, club_id).await?;

        if club.visibility != ClubVisibility::Public {
            let caller_active = self
                .membership_of(club_id, caller_id)
                .await?
                .is_some_and(|m| m.is_active());
            if !caller_active {
                return Err(MembershipError::AccessDenied);
            }
        }

        let (page, per_page) = Pagination::normalize(query.page, query.per_page);
        let total = self.memberships.count_active(club_id, query.role).await?;
        let pagination = Pagination::new(page, per_page, total);
        let members = self
            .memberships
            .list_active(club_id, query.role, per_page, pagination.offset())
            .await?;

        Ok(ListMembersResponse {
            data: members.into_iter().map(Into::into).collect(),
            pagination,
        })
    }

    /// Role check for collaborators such as the room subsystem.
    pub async fn check_permission(
        &self,
        club_id: Uuid,
        caller_id: Uuid,
        query: PermissionQuery,
    ) -> Result<PermissionResponse, MembershipError> {
        load_club(&self.clubs, club_id).await?;
        let user_id = query.user_id.unwrap_or(caller_id);
        let allowed = self
            .permissions
            .has_permission(club_id, user_id, query.minimum_role)
            .await?;

        Ok(PermissionResponse {
            club_id,
            user_id,
            minimum_role: query.minimum_role,
            allowed,
        })
    }
}
