//! Join-request domain models for approval-gated clubs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::membership::Membership;

/// Status of a join request. PENDING resolves exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Approved => write!(f, "approved"),
            RequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A request to join a club. At most one per (club, user).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MembershipRequest {
    pub id: Uuid,
    pub club_id: Uuid,
    pub user_id: Uuid,
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl MembershipRequest {
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

/// Request body for asking to join a club.
#[derive(Debug, Clone, Deserialize, Validate, Default)]
#[serde(rename_all = "snake_case")]
pub struct CreateJoinRequest {
    #[validate(length(max = 500, message = "Message must be at most 500 characters"))]
    pub message: Option<String>,
}

/// Response after an approval or rejection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ReviewRequestResponse {
    pub request: MembershipRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership: Option<Membership>,
}

/// Response for listing pending requests.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListRequestsResponse {
    pub data: Vec<MembershipRequest>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_status_display() {
        assert_eq!(RequestStatus::Pending.to_string(), "pending");
        assert_eq!(RequestStatus::Approved.to_string(), "approved");
        assert_eq!(RequestStatus::Rejected.to_string(), "rejected");
    }

    #[test]
    fn test_message_length_validation() {
        let ok = CreateJoinRequest {
            message: Some("I have read every book on your list".to_string()),
        };
        assert!(ok.validate().is_ok());

        let too_long = CreateJoinRequest {
            message: Some("m".repeat(501)),
        };
        assert!(too_long.validate().is_err());

        assert!(CreateJoinRequest::default().validate().is_ok());
    }

    #[test]
    fn test_review_response_omits_missing_membership() {
        let response = ReviewRequestResponse {
            request: MembershipRequest {
                id: Uuid::new_v4(),
                club_id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                status: RequestStatus::Rejected,
                message: None,
                created_at: Utc::now(),
                reviewed_by: Some(Uuid::new_v4()),
                reviewed_at: Some(Utc::now()),
            },
            membership: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["request"]["status"], "rejected");
        assert!(json.get("membership").is_none());
        assert!(json["request"].get("message").is_none());
    }
}
