//! Join requests for approval-gated clubs.

use domain::models::{
    ClubVisibility, CreateJoinRequest, ListRequestsResponse, MemberRole, MembershipRequest,
    MembershipStatus, ReviewRequestResponse,
};
use domain::MembershipError;
use persistence::repositories::{
    ApproveOutcome, ClubRepository, MembershipRepository, MembershipRequestRepository,
    RejectOutcome,
};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::services::permission::{load_club, StorePermissionEvaluator};

pub struct JoinRequestService {
    clubs: ClubRepository,
    memberships: MembershipRepository,
    requests: MembershipRequestRepository,
    permissions: StorePermissionEvaluator,
}

impl JoinRequestService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            clubs: ClubRepository::new(pool.clone()),
            memberships: MembershipRepository::new(pool.clone()),
            requests: MembershipRequestRepository::new(pool.clone()),
            permissions: StorePermissionEvaluator::new(pool),
        }
    }

    /// Ask to join a PRIVATE club. A reviewed request is overwritten by the new one.
    pub async fn request_to_join(
        &self,
        club_id: Uuid,
        user_id: Uuid,
        request: CreateJoinRequest,
    ) -> Result<MembershipRequest, MembershipError> {
        request.validate()?;
        let club = load_club(&self.clubs, club_id).await?;

        match club.visibility {
            ClubVisibility::Public => return Err(MembershipError::PublicClubNoRequestNeeded),
            ClubVisibility::InviteOnly => return Err(MembershipError::InviteOnlyClub),
            ClubVisibility::Private => {}
        }

        let existing = self.memberships.find(club_id, user_id).await?;
        match existing.map(|m| MembershipStatus::from(m.status)) {
            Some(MembershipStatus::Active) => return Err(MembershipError::AlreadyMember),
            Some(MembershipStatus::Banned) => return Err(MembershipError::BannedFromClub),
            _ => {}
        }

        // Nobody could ever review it
        if self
            .memberships
            .count_active(club_id, Some(MemberRole::Owner))
            .await?
            == 0
        {
            return Err(MembershipError::ClubRetired);
        }

        let message = request
            .message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty());

        let created = self
            .requests
            .submit(club_id, user_id, message)
            .await?
            .ok_or(MembershipError::RequestAlreadyPending)?;

        info!(
            club_id = %club_id,
            user_id = %user_id,
            request_id = %created.id,
            "Join request created"
        );
        Ok(created.into())
    }

    /// Approve a pending request, activating the requester's membership. Requires ADMIN.
    pub async fn approve_request(
        &self,
        club_id: Uuid,
        request_id: Uuid,
        approver_id: Uuid,
    ) -> Result<ReviewRequestResponse, MembershipError> {
        self.authorize_review(club_id, request_id, approver_id)
            .await?;

        match self
            .requests
            .approve(club_id, request_id, approver_id)
            .await?
        {
            ApproveOutcome::Approved {
                request,
                membership,
            } => {
                info!(
                    club_id = %club_id,
                    request_id = %request_id,
                    user_id = %request.user_id,
                    approved_by = %approver_id,
                    "Join request approved"
                );
                Ok(ReviewRequestResponse {
                    request: request.into(),
                    membership: Some(membership.into()),
                })
            }
            ApproveOutcome::NotFound => Err(MembershipError::RequestNotFound),
            ApproveOutcome::AlreadyReviewed => Err(MembershipError::RequestAlreadyReviewed),
            ApproveOutcome::Banned => Err(MembershipError::BannedFromClub),
            ApproveOutcome::ClubRetired => Err(MembershipError::ClubRetired),
        }
    }

    /// Reject a pending request. Requires ADMIN.
    pub async fn reject_request(
        &self,
        club_id: Uuid,
        request_id: Uuid,
        reviewer_id: Uuid,
    ) -> Result<ReviewRequestResponse, MembershipError> {
        self.authorize_review(club_id, request_id, reviewer_id)
            .await?;

        match self
            .requests
            .reject(club_id, request_id, reviewer_id)
            .await?
        {
            RejectOutcome::Rejected(request) => {
                info!(
                    club_id = %club_id,
                    request_id = %request_id,
                    user_id = %request.user_id,
                    rejected_by = %reviewer_id,
                    "Join request rejected"
                );
                Ok(ReviewRequestResponse {
                    request: request.into(),
                    membership: None,
                })
            }
            RejectOutcome::NotFound => Err(MembershipError::RequestNotFound),
            RejectOutcome::AlreadyReviewed => Err(MembershipError::RequestAlreadyReviewed),
        }
    }

    /// Pending requests, oldest first. Requires ADMIN.
    pub async fn list_pending_requests(
        &self,
        club_id: Uuid,
        caller_id: Uuid,
    ) -> Result<ListRequestsResponse, MembershipError> {
        load_club(&self.clubs, club_id).await?;
        self.permissions
            .require(club_id, caller_id, MemberRole::Admin)
            .await?;

        let data: Vec<MembershipRequest> = self
            .requests
            .list_pending(club_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        let count = data.len();
        Ok(ListRequestsResponse { data, count })
    }

    /// Shared preconditions of approve and reject: club exists, reviewer is
    /// ADMIN, and the request belongs to this club and is still pending.
    async fn authorize_review(
        &self,
        club_id: Uuid,
        request_id: Uuid,
        reviewer_id: Uuid,
    ) -> Result<(), MembershipError> {
        load_club(&self.clubs, club_id).await?;
        self.permissions
            .require(club_id, reviewer_id, MemberRole::Admin)
            .await?;

        let request: MembershipRequest = self
            .requests
            .find_by_id(request_id)
            .await?
            .filter(|r| r.club_id == club_id)
            .map(Into::into)
            .ok_or(MembershipError::RequestNotFound)?;

        if !request.is_pending() {
            return Err(MembershipError::RequestAlreadyReviewed);
        }
        Ok(())
    }
}
