//! Invite issuing, preview, redemption and deletion.

use chrono::{Duration, Utc};
use domain::models::invite::{invite_url, is_well_formed_code};
use domain::models::{
    CreateInviteRequest, Invite, InviteResponse, ListInvitesResponse, MemberRole,
    MembershipStatus, PublicInviteInfo, RedeemInviteResponse,
};
use domain::MembershipError;
use persistence::repositories::{
    ClubRepository, InviteRepository, MembershipRepository, RedeemOutcome,
};
use shared::invite_code::generate_invite_code;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::config::InviteConfig;
use crate::middleware::metrics::record_invite_redemption;
use crate::services::permission::{load_club, StorePermissionEvaluator};

pub struct InviteService {
    clubs: ClubRepository,
    memberships: MembershipRepository,
    invites: InviteRepository,
    permissions: StorePermissionEvaluator,
    config: InviteConfig,
}

impl InviteService {
    pub fn new(pool: PgPool, config: &InviteConfig) -> Self {
        Self {
            clubs: ClubRepository::new(pool.clone()),
            memberships: MembershipRepository::new(pool.clone()),
            invites: InviteRepository::new(pool.clone()),
            permissions: StorePermissionEvaluator::new(pool),
            config: config.clone(),
        }
    }

    fn to_response(&self, invite: Invite) -> InviteResponse {
        InviteResponse {
            invite_url: invite_url(&self.config.base_url, &invite.code),
            invite,
        }
    }

    /// Mint an invite. Any ACTIVE member may do this.
    pub async fn create_invite(
        &self,
        club_id: Uuid,
        caller_id: Uuid,
        request: CreateInviteRequest,
    ) -> Result<InviteResponse, MembershipError> {
        request.validate()?;
        load_club(&self.clubs, club_id).await?;
        self.permissions
            .require(club_id, caller_id, MemberRole::Member)
            .await?;

        let length = self.config.code_length;
        let code = self
            .invites
            .generate_unique_code(
                || generate_invite_code(length),
                self.config.max_generation_attempts,
            )
            .await?;
        let expires_at = request
            .expires_in_days
            .map(|days| Utc::now() + Duration::days(i64::from(days)));

        let invite: Invite = self
            .invites
            .create_invite(club_id, &code, caller_id, request.max_uses, expires_at)
            .await?
            .into();

        info!(
            club_id = %club_id,
            invite_id = %invite.id,
            created_by = %caller_id,
            max_uses = ?invite.max_uses,
            "Invite created"
        );
        Ok(self.to_response(invite))
    }

    /// All invites of a club with their counters. Requires ADMIN.
    pub async fn list_invites(
        &self,
        club_id: Uuid,
        caller_id: Uuid,
    ) -> Result<ListInvitesResponse, MembershipError> {
        load_club(&self.clubs, club_id).await?;
        self.permissions
            .require(club_id, caller_id, MemberRole::Admin)
            .await?;

        let data = self
            .invites
            .list_for_club(club_id)
            .await?
            .into_iter()
            .map(|entity| self.to_response(entity.into()))
            .collect();
        Ok(ListInvitesResponse { data })
    }

    /// Unauthenticated lookup shown before a user decides to redeem.
    pub async fn preview_invite(&self, code: &str) -> Result<PublicInviteInfo, MembershipError> {
        if !is_well_formed_code(code) {
            return Err(MembershipError::InvalidInvite);
        }

        let (invite, club) = self
            .invites
            .find_by_code_with_club(code)
            .await?
            .ok_or(MembershipError::InvalidInvite)?
            .into_parts();

        Ok(PublicInviteInfo {
            club,
            expires_at: invite.expires_at,
            is_valid: invite.is_redeemable_at(Utc::now()),
        })
    }

    /// Redeem a code for `user_id`, joining them as a MEMBER.
    pub async fn redeem_invite(
        &self,
        code: &str,
        user_id: Uuid,
    ) -> Result<RedeemInviteResponse, MembershipError> {
        let result = self.try_redeem(code, user_id).await;
        match &result {
            Ok(response) => {
                record_invite_redemption("redeemed");
                info!(
                    club_id = %response.club_id,
                    user_id = %user_id,
                    "Invite redeemed"
                );
            }
            Err(err) => {
                record_invite_redemption(err.code());
                debug!(user_id = %user_id, code = err.code(), "Invite redemption refused");
            }
        }
        result
    }

    async fn try_redeem(
        &self,
        code: &str,
        user_id: Uuid,
    ) -> Result<RedeemInviteResponse, MembershipError> {
        if !is_well_formed_code(code) {
            return Err(MembershipError::InvalidInvite);
        }

        let invite: Invite = self
            .invites
            .find_by_code(code)
            .await?
            .ok_or(MembershipError::InvalidInvite)?
            .into();

        if invite.is_expired_at(Utc::now()) {
            return Err(MembershipError::InviteExpired);
        }
        if invite.is_exhausted() {
            return Err(MembershipError::InviteMaxUsesReached);
        }

        let existing = self.memberships.find(invite.club_id, user_id).await?;
        match existing.map(|m| MembershipStatus::from(m.status)) {
            Some(MembershipStatus::Active) => return Err(MembershipError::AlreadyMember),
            Some(MembershipStatus::Banned) => return Err(MembershipError::BannedFromClub),
            _ => {}
        }

        // The checks above are advisory; the repository re-checks them atomically.
        match self.invites.redeem(invite.id, user_id).await? {
            RedeemOutcome::Redeemed { invite, membership } => Ok(RedeemInviteResponse {
                club_id: invite.club_id,
                membership: membership.into(),
            }),
            RedeemOutcome::Invalid => Err(MembershipError::InvalidInvite),
            RedeemOutcome::Expired => Err(MembershipError::InviteExpired),
            RedeemOutcome::Exhausted => Err(MembershipError::InviteMaxUsesReached),
            RedeemOutcome::AlreadyMember => Err(MembershipError::AlreadyMember),
            RedeemOutcome::Banned => Err(MembershipError::BannedFromClub),
            RedeemOutcome::ClubRetired => Err(MembershipError::ClubRetired),
        }
    }

    /// Delete an invite. Allowed for the club's creator and the invite's creator.
    pub async fn delete_invite(
        &self,
        invite_id: Uuid,
        caller_id: Uuid,
    ) -> Result<(), MembershipError> {
        let invite: Invite = self
            .invites
            .find_by_id(invite_id)
            .await?
            .ok_or(MembershipError::InviteNotFound)?
            .into();
        let club = load_club(&self.clubs, invite.club_id).await?;

        if caller_id != club.creator_id && caller_id != invite.created_by {
            return Err(MembershipError::InsufficientPermissions);
        }

        if self.invites.delete_invite(invite_id).await? == 0 {
            return Err(MembershipError::InviteNotFound);
        }

        info!(
            club_id = %invite.club_id,
            invite_id = %invite_id,
            deleted_by = %caller_id,
            "Invite deleted"
        );
        Ok(())
    }
}
