use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use shared::jwt::{normalize_pem_key, JwtError, TokenVerifier};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{clubs, health, invites, members, requests};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    /// Build state, loading the identity provider's public key from config.
    pub fn new(config: Config, pool: PgPool) -> Result<Self, JwtError> {
        let public_key = normalize_pem_key(&config.jwt.public_key);
        let verifier = TokenVerifier::from_rsa_pem(&public_key, config.jwt.leeway_secs)?;
        Ok(Self {
            pool,
            config: Arc::new(config),
            verifier: Arc::new(verifier),
        })
    }
}

pub fn create_app(config: Config, pool: PgPool) -> Result<Router, JwtError> {
    Ok(create_router(AppState::new(config, pool)?))
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Authenticated through the UserAuth extractor in each handler
    let club_routes = Router::new()
        .route(
            "/api/v1/clubs",
            post(clubs::create_club).get(clubs::list_public_clubs),
        )
        .route("/api/v1/clubs/mine", get(clubs::list_my_clubs))
        .route(
            "/api/v1/clubs/:club_id",
            get(clubs::get_club)
                .patch(clubs::update_club)
                .delete(clubs::delete_club),
        )
        .route("/api/v1/clubs/:club_id/join", post(members::join_club))
        .route("/api/v1/clubs/:club_id/leave", post(members::leave_club))
        .route("/api/v1/clubs/:club_id/members", get(members::list_members))
        .route(
            "/api/v1/clubs/:club_id/members/:user_id",
            delete(members::remove_member),
        )
        .route(
            "/api/v1/clubs/:club_id/members/:user_id/role",
            put(members::update_member_role),
        )
        .route(
            "/api/v1/clubs/:club_id/members/:user_id/ban",
            post(members::ban_member).delete(members::unban_member),
        )
        .route(
            "/api/v1/clubs/:club_id/permissions",
            get(members::check_permission),
        )
        .route(
            "/api/v1/clubs/:club_id/requests",
            post(requests::request_to_join).get(requests::list_pending_requests),
        )
        .route(
            "/api/v1/clubs/:club_id/requests/:request_id/approve",
            post(requests::approve_request),
        )
        .route(
            "/api/v1/clubs/:club_id/requests/:request_id/reject",
            post(requests::reject_request),
        )
        .route(
            "/api/v1/clubs/:club_id/invites",
            post(invites::create_invite).get(invites::list_invites),
        );

    // One path parameter serves both the code (preview) and the id (delete)
    let invite_routes = Router::new()
        .route(
            "/api/v1/invites/:code",
            get(invites::preview_invite).delete(invites::delete_invite),
        )
        .route("/api/v1/invites/:code/redeem", post(invites::redeem_invite));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    Router::new()
        .merge(public_routes)
        .merge(club_routes)
        .merge(invite_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
