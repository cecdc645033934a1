//! Membership request entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::RequestStatus;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for request_status that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
pub enum RequestStatusDb {
    Pending,
    Approved,
    Rejected,
}

impl From<RequestStatusDb> for RequestStatus {
    fn from(db: RequestStatusDb) -> Self {
        match db {
            RequestStatusDb::Pending => RequestStatus::Pending,
            RequestStatusDb::Approved => RequestStatus::Approved,
            RequestStatusDb::Rejected => RequestStatus::Rejected,
        }
    }
}

/// Database row mapping for the membership_requests table.
#[derive(Debug, Clone, FromRow)]
pub struct MembershipRequestEntity {
    pub id: Uuid,
    pub club_id: Uuid,
    pub user_id: Uuid,
    pub status: RequestStatusDb,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl From<MembershipRequestEntity> for domain::models::MembershipRequest {
    fn from(entity: MembershipRequestEntity) -> Self {
        Self {
            id: entity.id,
            club_id: entity.club_id,
            user_id: entity.user_id,
            status: entity.status.into(),
            message: entity.message,
            created_at: entity.created_at,
            reviewed_by: entity.reviewed_by,
            reviewed_at: entity.reviewed_at,
        }
    }
}
