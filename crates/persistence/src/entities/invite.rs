//! Invite entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::club::ClubVisibilityDb;

/// Database row mapping for the club_invites table.
#[derive(Debug, Clone, FromRow)]
pub struct InviteEntity {
    pub id: Uuid,
    pub club_id: Uuid,
    pub code: String,
    pub created_by: Uuid,
    pub max_uses: Option<i32>,
    pub current_uses: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<InviteEntity> for domain::models::Invite {
    fn from(entity: InviteEntity) -> Self {
        Self {
            id: entity.id,
            club_id: entity.club_id,
            code: entity.code,
            created_by: entity.created_by,
            max_uses: entity.max_uses,
            current_uses: entity.current_uses,
            expires_at: entity.expires_at,
            created_at: entity.created_at,
        }
    }
}

/// Invite entity with club info for public lookup.
#[derive(Debug, Clone, FromRow)]
pub struct InviteWithClubEntity {
    pub id: Uuid,
    pub club_id: Uuid,
    pub code: String,
    pub created_by: Uuid,
    pub max_uses: Option<i32>,
    pub current_uses: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    // Club info
    pub club_name: String,
    pub club_visibility: ClubVisibilityDb,
    pub club_image_url: Option<String>,
    pub member_count: i64,
}

impl InviteWithClubEntity {
    /// Split into the bare invite and the public club card.
    pub fn into_parts(self) -> (domain::models::Invite, domain::models::PublicClubInfo) {
        let club = domain::models::PublicClubInfo {
            id: self.club_id,
            name: self.club_name,
            visibility: self.club_visibility.into(),
            image_url: self.club_image_url,
            member_count: self.member_count,
        };
        let invite = domain::models::Invite {
            id: self.id,
            club_id: self.club_id,
            code: self.code,
            created_by: self.created_by,
            max_uses: self.max_uses,
            current_uses: self.current_uses,
            expires_at: self.expires_at,
            created_at: self.created_at,
        };
        (invite, club)
    }
}
