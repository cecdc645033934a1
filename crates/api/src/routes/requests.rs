//! Join request routes for PRIVATE clubs.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    CreateJoinRequest, ListRequestsResponse, MembershipRequest, ReviewRequestResponse,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::services::JoinRequestService;

/// Ask to join a PRIVATE club. The body is optional.
///
/// POST /api/v1/clubs/:club_id/requests
pub async fn request_to_join(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(club_id): Path<Uuid>,
    body: Option<Json<CreateJoinRequest>>,
) -> Result<(StatusCode, Json<MembershipRequest>), ApiError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let created = JoinRequestService::new(state.pool.clone())
        .request_to_join(club_id, user_auth.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Pending requests for a club.
///
/// GET /api/v1/clubs/:club_id/requests
///
/// Requires ADMIN or above.
pub async fn list_pending_requests(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(club_id): Path<Uuid>,
) -> Result<Json<ListRequestsResponse>, ApiError> {
    let response = JoinRequestService::new(state.pool.clone())
        .list_pending_requests(club_id, user_auth.user_id)
        .await?;
    Ok(Json(response))
}

/// Approve a request, making the requester a member.
///
/// POST /api/v1/clubs/:club_id/requests/:request_id/approve
///
/// Requires ADMIN or above.
pub async fn approve_request(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((club_id, request_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ReviewRequestResponse>, ApiError> {
    let response = JoinRequestService::new(state.pool.clone())
        .approve_request(club_id, request_id, user_auth.user_id)
        .await?;
    Ok(Json(response))
}

/// Reject a request.
///
/// POST /api/v1/clubs/:club_id/requests/:request_id/reject
///
/// Requires ADMIN or above.
pub async fn reject_request(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((club_id, request_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ReviewRequestResponse>, ApiError> {
    let response = JoinRequestService::new(state.pool.clone())
        .reject_request(club_id, request_id, user_auth.user_id)
        .await?;
    Ok(Json(response))
}
