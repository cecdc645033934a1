//! Membership entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{MemberRole, MembershipStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for member_role that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
pub enum MemberRoleDb {
    Owner,
    Admin,
    Moderator,
    Member,
}

impl From<MemberRoleDb> for MemberRole {
    fn from(db_role: MemberRoleDb) -> Self {
        match db_role {
            MemberRoleDb::Owner => MemberRole::Owner,
            MemberRoleDb::Admin => MemberRole::Admin,
            MemberRoleDb::Moderator => MemberRole::Moderator,
            MemberRoleDb::Member => MemberRole::Member,
        }
    }
}

impl From<MemberRole> for MemberRoleDb {
    fn from(role: MemberRole) -> Self {
        match role {
            MemberRole::Owner => MemberRoleDb::Owner,
            MemberRole::Admin => MemberRoleDb::Admin,
            MemberRole::Moderator => MemberRoleDb::Moderator,
            MemberRole::Member => MemberRoleDb::Member,
        }
    }
}

/// Database enum for membership_status that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "membership_status", rename_all = "lowercase")]
pub enum MembershipStatusDb {
    Active,
    Left,
    Banned,
}

impl From<MembershipStatusDb> for MembershipStatus {
    fn from(db: MembershipStatusDb) -> Self {
        match db {
            MembershipStatusDb::Active => MembershipStatus::Active,
            MembershipStatusDb::Left => MembershipStatus::Left,
            MembershipStatusDb::Banned => MembershipStatus::Banned,
        }
    }
}

impl From<MembershipStatus> for MembershipStatusDb {
    fn from(status: MembershipStatus) -> Self {
        match status {
            MembershipStatus::Active => MembershipStatusDb::Active,
            MembershipStatus::Left => MembershipStatusDb::Left,
            MembershipStatus::Banned => MembershipStatusDb::Banned,
        }
    }
}

/// Database row mapping for the club_memberships table.
#[derive(Debug, Clone, FromRow)]
pub struct MembershipEntity {
    pub club_id: Uuid,
    pub user_id: Uuid,
    pub role: MemberRoleDb,
    pub status: MembershipStatusDb,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MembershipEntity> for domain::models::Membership {
    fn from(entity: MembershipEntity) -> Self {
        Self {
            club_id: entity.club_id,
            user_id: entity.user_id,
            role: entity.role.into(),
            status: entity.status.into(),
            joined_at: entity.joined_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<MembershipEntity> for domain::models::MemberResponse {
    fn from(entity: MembershipEntity) -> Self {
        Self {
            user_id: entity.user_id,
            role: entity.role.into(),
            joined_at: entity.joined_at,
        }
    }
}
