//! Club entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::ClubVisibility;
use sqlx::FromRow;
use uuid::Uuid;

use super::membership::MemberRoleDb;

/// Database enum for club_visibility that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "club_visibility", rename_all = "snake_case")]
pub enum ClubVisibilityDb {
    Public,
    Private,
    InviteOnly,
}

impl From<ClubVisibilityDb> for ClubVisibility {
    fn from(db: ClubVisibilityDb) -> Self {
        match db {
            ClubVisibilityDb::Public => ClubVisibility::Public,
            ClubVisibilityDb::Private => ClubVisibility::Private,
            ClubVisibilityDb::InviteOnly => ClubVisibility::InviteOnly,
        }
    }
}

impl From<ClubVisibility> for ClubVisibilityDb {
    fn from(visibility: ClubVisibility) -> Self {
        match visibility {
            ClubVisibility::Public => ClubVisibilityDb::Public,
            ClubVisibility::Private => ClubVisibilityDb::Private,
            ClubVisibility::InviteOnly => ClubVisibilityDb::InviteOnly,
        }
    }
}

/// Database row mapping for the clubs table.
#[derive(Debug, Clone, FromRow)]
pub struct ClubEntity {
    pub id: Uuid,
    pub name: String,
    pub visibility: ClubVisibilityDb,
    pub creator_id: Uuid,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub last_active_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ClubEntity> for domain::models::Club {
    fn from(entity: ClubEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            visibility: entity.visibility.into(),
            creator_id: entity.creator_id,
            description: entity.description,
            image_url: entity.image_url,
            category: entity.category,
            last_active_at: entity.last_active_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Club row with its active member count and the caller's role, for listings.
#[derive(Debug, Clone, FromRow)]
pub struct ClubWithCountEntity {
    pub id: Uuid,
    pub name: String,
    pub visibility: ClubVisibilityDb,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub last_active_at: DateTime<Utc>,
    // Aggregates
    pub member_count: i64,
    pub your_role: Option<MemberRoleDb>,
}

impl From<ClubWithCountEntity> for domain::models::ClubSummary {
    fn from(entity: ClubWithCountEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            visibility: entity.visibility.into(),
            category: entity.category,
            image_url: entity.image_url,
            member_count: entity.member_count,
            last_active_at: entity.last_active_at,
            your_role: entity.your_role.map(Into::into),
        }
    }
}

/// Database row mapping for the club_rooms table.
#[derive(Debug, Clone, FromRow)]
pub struct RoomEntity {
    pub id: Uuid,
    pub club_id: Uuid,
    pub name: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl From<RoomEntity> for domain::models::Room {
    fn from(entity: RoomEntity) -> Self {
        Self {
            id: entity.id,
            club_id: entity.club_id,
            name: entity.name,
            is_default: entity.is_default,
            created_at: entity.created_at,
        }
    }
}
