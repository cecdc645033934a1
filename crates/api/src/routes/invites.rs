//! Invite routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    CreateInviteRequest, InviteResponse, ListInvitesResponse, PublicInviteInfo,
    RedeemInviteResponse,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::services::InviteService;

fn invite_service(state: &AppState) -> InviteService {
    InviteService::new(state.pool.clone(), &state.config.invites)
}

/// Create an invite for a club. Both limits are optional.
///
/// POST /api/v1/clubs/:club_id/invites
///
/// Any active member may create invites.
pub async fn create_invite(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(club_id): Path<Uuid>,
    body: Option<Json<CreateInviteRequest>>,
) -> Result<(StatusCode, Json<InviteResponse>), ApiError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let response = invite_service(&state)
        .create_invite(club_id, user_auth.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// List a club's invites with usage counters.
///
/// GET /api/v1/clubs/:club_id/invites
///
/// Requires ADMIN or above.
pub async fn list_invites(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(club_id): Path<Uuid>,
) -> Result<Json<ListInvitesResponse>, ApiError> {
    let response = invite_service(&state)
        .list_invites(club_id, user_auth.user_id)
        .await?;
    Ok(Json(response))
}

/// Preview the club behind an invite code.
///
/// GET /api/v1/invites/:code
///
/// No authentication required.
pub async fn preview_invite(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<PublicInviteInfo>, ApiError> {
    let response = invite_service(&state).preview_invite(&code).await?;
    Ok(Json(response))
}

/// Redeem an invite code and join its club.
///
/// POST /api/v1/invites/:code/redeem
pub async fn redeem_invite(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(code): Path<String>,
) -> Result<Json<RedeemInviteResponse>, ApiError> {
    let response = invite_service(&state)
        .redeem_invite(&code, user_auth.user_id)
        .await?;
    Ok(Json(response))
}

/// Delete an invite.
///
/// DELETE /api/v1/invites/:invite_id
///
/// Allowed for the club creator and the invite's creator.
pub async fn delete_invite(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(invite_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    invite_service(&state)
        .delete_invite(invite_id, user_auth.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
