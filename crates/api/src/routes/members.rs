//! Joining, leaving and member management routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    ListMembersQuery, ListMembersResponse, Membership, PermissionQuery, PermissionResponse,
    UpdateRoleRequest, UpdateRoleResponse,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::services::MembershipService;

/// Join a PUBLIC club.
///
/// POST /api/v1/clubs/:club_id/join
pub async fn join_club(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(club_id): Path<Uuid>,
) -> Result<Json<Membership>, ApiError> {
    let membership = MembershipService::new(state.pool.clone())
        .join_club(club_id, user_auth.user_id)
        .await?;
    Ok(Json(membership))
}

/// Leave a club.
///
/// POST /api/v1/clubs/:club_id/leave
pub async fn leave_club(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(club_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    MembershipService::new(state.pool.clone())
        .leave_club(club_id, user_auth.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List active members.
///
/// GET /api/v1/clubs/:club_id/members?page=&per_page=&role=
pub async fn list_members(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(club_id): Path<Uuid>,
    Query(query): Query<ListMembersQuery>,
) -> Result<Json<ListMembersResponse>, ApiError> {
    let response = MembershipService::new(state.pool.clone())
        .list_members(club_id, user_auth.user_id, query)
        .await?;
    Ok(Json(response))
}

/// Remove a member.
///
/// DELETE /api/v1/clubs/:club_id/members/:user_id
///
/// Requires ADMIN or above.
pub async fn remove_member(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((club_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    MembershipService::new(state.pool.clone())
        .remove_member(club_id, user_id, user_auth.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Change a member's role.
///
/// PUT /api/v1/clubs/:club_id/members/:user_id/role
///
/// Requires OWNER.
pub async fn update_member_role(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((club_id, user_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<UpdateRoleResponse>, ApiError> {
    let response = MembershipService::new(state.pool.clone())
        .update_member_role(club_id, user_id, request.role, user_auth.user_id)
        .await?;
    Ok(Json(response))
}

/// Ban a user from a club.
///
/// POST /api/v1/clubs/:club_id/members/:user_id/ban
///
/// Requires ADMIN or above.
pub async fn ban_member(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((club_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    MembershipService::new(state.pool.clone())
        .ban_member(club_id, user_id, user_auth.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lift a ban.
///
/// DELETE /api/v1/clubs/:club_id/members/:user_id/ban
///
/// Requires ADMIN or above.
pub async fn unban_member(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((club_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    MembershipService::new(state.pool.clone())
        .unban_member(club_id, user_id, user_auth.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Check whether a user holds at least a given role.
///
/// GET /api/v1/clubs/:club_id/permissions?user_id=&minimum_role=
pub async fn check_permission(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(club_id): Path<Uuid>,
    Query(query): Query<PermissionQuery>,
) -> Result<Json<PermissionResponse>, ApiError> {
    let response = MembershipService::new(state.pool.clone())
        .check_permission(club_id, user_auth.user_id, query)
        .await?;
    Ok(Json(response))
}
