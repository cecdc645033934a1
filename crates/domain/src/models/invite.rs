//! Invite domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::club::ClubVisibility;
use super::membership::Membership;

/// An invite code that admits its redeemer into a club as a MEMBER.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Invite {
    pub id: Uuid,
    pub club_id: Uuid,
    pub code: String,
    pub created_by: Uuid,
    pub max_uses: Option<i32>,
    pub current_uses: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Invite {
    /// Check if the invite had expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    /// Check if the invite has reached its usage cap.
    pub fn is_exhausted(&self) -> bool {
        self.max_uses
            .is_some_and(|max_uses| self.current_uses >= max_uses)
    }

    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired_at(now) && !self.is_exhausted()
    }
}

/// Request to create a new invite. Both limits are optional.
#[derive(Debug, Clone, Deserialize, Validate, Default)]
#[serde(rename_all = "snake_case")]
pub struct CreateInviteRequest {
    #[validate(range(min = 1, max = 10000, message = "max_uses must be between 1 and 10000"))]
    pub max_uses: Option<i32>,

    #[validate(range(
        min = 1,
        max = 365,
        message = "expires_in_days must be between 1 and 365"
    ))]
    pub expires_in_days: Option<i32>,
}

/// Invite as returned to members.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InviteResponse {
    #[serde(flatten)]
    pub invite: Invite,
    pub invite_url: String,
}

/// Response for listing invites.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListInvitesResponse {
    pub data: Vec<InviteResponse>,
}

/// Public invite info (for GET /invites/:code without auth).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PublicInviteInfo {
    pub club: PublicClubInfo,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_valid: bool,
}

/// Public club info for invite preview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PublicClubInfo {
    pub id: Uuid,
    pub name: String,
    pub visibility: ClubVisibility,
    pub image_url: Option<String>,
    pub member_count: i64,
}

/// Response after redeeming an invite.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RedeemInviteResponse {
    pub club_id: Uuid,
    pub membership: Membership,
}

lazy_static::lazy_static! {
    static ref INVITE_CODE_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Za-z0-9]{6,32}$").unwrap();
}

/// Returns true if `code` has the shape of an issued invite code.
pub fn is_well_formed_code(code: &str) -> bool {
    INVITE_CODE_REGEX.is_match(code)
}

/// Shareable join link for a code.
pub fn invite_url(base_url: &str, code: &str) -> String {
    format!("{}/join/{}", base_url.trim_end_matches('/'), code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn invite(max_uses: Option<i32>, current_uses: i32, expires_at: Option<DateTime<Utc>>) -> Invite {
        Invite {
            id: Uuid::new_v4(),
            club_id: Uuid::new_v4(),
            code: "aB3dE6gH".to_string(),
            created_by: Uuid::new_v4(),
            max_uses,
            current_uses,
            expires_at,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_unlimited_invite_is_redeemable() {
        let now = Utc::now();
        let i = invite(None, 5000, None);
        assert!(!i.is_exhausted());
        assert!(!i.is_expired_at(now));
        assert!(i.is_redeemable_at(now));
    }

    #[test]
    fn test_exhausted_at_cap() {
        assert!(!invite(Some(2), 1, None).is_exhausted());
        assert!(invite(Some(2), 2, None).is_exhausted());
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        assert!(invite(None, 0, Some(now)).is_expired_at(now));
        assert!(invite(None, 0, Some(now - Duration::seconds(1))).is_expired_at(now));
        assert!(!invite(None, 0, Some(now + Duration::days(1))).is_expired_at(now));
    }

    #[test]
    fn test_create_invite_request_validation() {
        assert!(CreateInviteRequest::default().validate().is_ok());

        let valid = CreateInviteRequest {
            max_uses: Some(5),
            expires_in_days: Some(7),
        };
        assert!(valid.validate().is_ok());

        let zero_uses = CreateInviteRequest {
            max_uses: Some(0),
            expires_in_days: None,
        };
        assert!(zero_uses.validate().is_err());

        let too_long_expiry = CreateInviteRequest {
            max_uses: None,
            expires_in_days: Some(1000),
        };
        assert!(too_long_expiry.validate().is_err());
    }

    #[test]
    fn test_code_shape() {
        assert!(is_well_formed_code("aB3dE6gH"));
        assert!(is_well_formed_code(&shared::invite_code::generate_invite_code(8)));
        assert!(!is_well_formed_code("short"));
        assert!(!is_well_formed_code("has-dash1"));
        assert!(!is_well_formed_code("../../etc"));
    }

    #[test]
    fn test_invite_url() {
        assert_eq!(
            invite_url("https://clubhouse.app/", "aB3dE6gH"),
            "https://clubhouse.app/join/aB3dE6gH"
        );
    }
}
