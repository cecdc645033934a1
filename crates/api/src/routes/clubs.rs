//! Club lifecycle and discovery routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    ClubDetail, CreateClubRequest, CreateClubResponse, ListClubsQuery, ListClubsResponse,
    UpdateClubRequest,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::services::ClubService;

fn club_service(state: &AppState) -> ClubService {
    ClubService::new(
        state.pool.clone(),
        &state.config.invites,
        &state.config.clubs,
    )
}

/// Create a club owned by the caller.
///
/// POST /api/v1/clubs
///
/// Requires JWT authentication.
pub async fn create_club(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<CreateClubRequest>,
) -> Result<(StatusCode, Json<CreateClubResponse>), ApiError> {
    let response = club_service(&state)
        .create_club(user_auth.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Discover PUBLIC clubs.
///
/// GET /api/v1/clubs?category=&page=&per_page=
pub async fn list_public_clubs(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Query(query): Query<ListClubsQuery>,
) -> Result<Json<ListClubsResponse>, ApiError> {
    let response = club_service(&state)
        .list_public_clubs(user_auth.user_id, query)
        .await?;
    Ok(Json(response))
}

/// Clubs the caller belongs to.
///
/// GET /api/v1/clubs/mine
pub async fn list_my_clubs(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<ListClubsResponse>, ApiError> {
    let response = club_service(&state).list_my_clubs(user_auth.user_id).await?;
    Ok(Json(response))
}

/// Club details.
///
/// GET /api/v1/clubs/:club_id
pub async fn get_club(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(club_id): Path<Uuid>,
) -> Result<Json<ClubDetail>, ApiError> {
    let response = club_service(&state)
        .get_club(club_id, user_auth.user_id)
        .await?;
    Ok(Json(response))
}

/// Update club settings.
///
/// PATCH /api/v1/clubs/:club_id
///
/// Requires ADMIN or above.
pub async fn update_club(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(club_id): Path<Uuid>,
    Json(request): Json<UpdateClubRequest>,
) -> Result<Json<ClubDetail>, ApiError> {
    let response = club_service(&state)
        .update_club(club_id, user_auth.user_id, request)
        .await?;
    Ok(Json(response))
}

/// Delete a club with all its memberships, requests and invites.
///
/// DELETE /api/v1/clubs/:club_id
///
/// Requires OWNER.
pub async fn delete_club(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(club_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    club_service(&state)
        .delete_club(club_id, user_auth.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
