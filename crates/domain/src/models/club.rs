//! Club domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

use super::invite::InviteResponse;
use super::membership::{MemberRole, Pagination};

/// Who may join a club, and how.
///
/// - `Public`: anyone joins directly.
/// - `Private`: users request to join and an admin approves.
/// - `InviteOnly`: only invite redemption admits members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClubVisibility {
    #[default]
    Public,
    Private,
    InviteOnly,
}

impl ClubVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClubVisibility::Public => "public",
            ClubVisibility::Private => "private",
            ClubVisibility::InviteOnly => "invite_only",
        }
    }
}

impl fmt::Display for ClubVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A club.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Club {
    pub id: Uuid,
    pub name: String,
    pub visibility: ClubVisibility,
    pub creator_id: Uuid,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub last_active_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A communication room belonging to a club.
///
/// Rooms are owned by the messaging subsystem; this crate only seeds the
/// default room when a club is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Room {
    pub id: Uuid,
    pub club_id: Uuid,
    pub name: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating a club.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateClubRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: String,

    #[serde(default)]
    pub visibility: ClubVisibility,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,

    #[validate(length(max = 50, message = "Category must be at most 50 characters"))]
    pub category: Option<String>,
}

/// Request payload for updating a club. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize, Validate, Default)]
#[serde(rename_all = "snake_case")]
pub struct UpdateClubRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: Option<String>,

    pub visibility: Option<ClubVisibility>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,

    #[validate(length(max = 50, message = "Category must be at most 50 characters"))]
    pub category: Option<String>,
}

/// Full club view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ClubDetail {
    #[serde(flatten)]
    pub club: Club,
    pub member_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub your_role: Option<MemberRole>,
}

/// Response for creating a club.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateClubResponse {
    #[serde(flatten)]
    pub club: ClubDetail,
    pub default_room: Room,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_invite: Option<InviteResponse>,
}

/// Club entry in a listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ClubSummary {
    pub id: Uuid,
    pub name: String,
    pub visibility: ClubVisibility,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub member_count: i64,
    pub last_active_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub your_role: Option<MemberRole>,
}

/// Query parameters for discovering public clubs.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct ListClubsQuery {
    pub category: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Response for listing clubs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListClubsResponse {
    pub data: Vec<ClubSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}
