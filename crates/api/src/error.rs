use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::{ErrorClass, MembershipError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Membership(#[from] MembershipError),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

/// HTTP status for a membership outcome.
pub fn status_for(err: &MembershipError) -> StatusCode {
    match err.class() {
        ErrorClass::NotFound => StatusCode::NOT_FOUND,
        ErrorClass::Authorization => StatusCode::FORBIDDEN,
        ErrorClass::Conflict if err.is_duplicate_state() => StatusCode::CONFLICT,
        ErrorClass::Conflict | ErrorClass::PolicyMismatch | ErrorClass::Validation => {
            StatusCode::BAD_REQUEST
        }
        ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone())
            }
            ApiError::Membership(MembershipError::Internal(msg)) | ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".into(),
                )
            }
            ApiError::Membership(err) => {
                let status = status_for(err);
                if status == StatusCode::FORBIDDEN {
                    tracing::warn!(code = err.code(), "Membership operation refused");
                } else {
                    tracing::debug!(code = err.code(), "Membership operation rejected");
                }
                (status, err.code(), err.to_string())
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Internal(format!("Database error: {}", err))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Membership(errors.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_api_error_unauthorized() {
        let error = ApiError::Unauthorized("test message".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_not_found_class() {
        assert_eq!(status_for(&MembershipError::ClubNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&MembershipError::InvalidInvite), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_authorization_class() {
        assert_eq!(
            status_for(&MembershipError::InsufficientPermissions),
            StatusCode::FORBIDDEN
        );
        assert_eq!(status_for(&MembershipError::BannedFromClub), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_conflict_split() {
        assert_eq!(status_for(&MembershipError::AlreadyMember), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&MembershipError::RequestAlreadyPending),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&MembershipError::InviteMaxUsesReached),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&MembershipError::OwnerMustTransferOwnership),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_for(&MembershipError::ClubRetired), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_policy_mismatch_class() {
        assert_eq!(
            status_for(&MembershipError::RequiresApproval),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&MembershipError::InviteOnlyClub),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_membership_error_body_carries_code() {
        let response = ApiError::from(MembershipError::InviteExpired).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "INVITE_EXPIRED");
        assert_eq!(json["message"], "Invite has expired");
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response =
            ApiError::from(MembershipError::Internal("connection reset".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "INTERNAL_ERROR");
        assert!(!json["message"].as_str().unwrap().contains("connection reset"));
    }

    #[test]
    fn test_from_sqlx_error() {
        let error: ApiError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(error, ApiError::Internal(_)));
    }
}
