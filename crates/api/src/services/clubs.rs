//! Club lifecycle: creation, settings, deletion and discovery.

use domain::models::invite::invite_url;
use domain::models::{
    Club, ClubDetail, ClubVisibility, CreateClubRequest, CreateClubResponse, InviteResponse,
    ListClubsQuery, ListClubsResponse, MemberRole, Membership, Pagination, UpdateClubRequest,
};
use domain::MembershipError;
use persistence::repositories::{
    ClubChanges, ClubRepository, InviteRepository, MembershipRepository, NewClub, SeedInvite,
};
use shared::invite_code::generate_invite_code;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::config::{ClubConfig, InviteConfig};
use crate::services::permission::{load_club, StorePermissionEvaluator};

/// Blank-after-trim names are rejected even though they pass the length rule.
fn normalized_name(name: &str) -> Result<&str, MembershipError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(MembershipError::Validation(
            "Name must not be blank".to_string(),
        ));
    }
    Ok(trimmed)
}

pub struct ClubService {
    clubs: ClubRepository,
    memberships: MembershipRepository,
    invites: InviteRepository,
    permissions: StorePermissionEvaluator,
    invite_config: InviteConfig,
    club_config: ClubConfig,
}

impl ClubService {
    pub fn new(pool: PgPool, invite_config: &InviteConfig, club_config: &ClubConfig) -> Self {
        Self {
            clubs: ClubRepository::new(pool.clone()),
            memberships: MembershipRepository::new(pool.clone()),
            invites: InviteRepository::new(pool.clone()),
            permissions: StorePermissionEvaluator::new(pool),
            invite_config: invite_config.clone(),
            club_config: club_config.clone(),
        }
    }

    /// Create a club owned by `creator_id`, with its default room and,
    /// when configured, an unlimited first invite.
    pub async fn create_club(
        &self,
        creator_id: Uuid,
        request: CreateClubRequest,
    ) -> Result<CreateClubResponse, MembershipError> {
        request.validate()?;
        let name = normalized_name(&request.name)?;

        let seed_code = if self.invite_config.create_on_club_creation {
            let length = self.invite_config.code_length;
            Some(
                self.invites
                    .generate_unique_code(
                        || generate_invite_code(length),
                        self.invite_config.max_generation_attempts,
                    )
                    .await?,
            )
        } else {
            None
        };

        let created = self
            .clubs
            .create_club(
                NewClub {
                    name,
                    visibility: request.visibility,
                    creator_id,
                    description: request.description.as_deref(),
                    image_url: request.image_url.as_deref(),
                    category: request.category.as_deref(),
                },
                &self.club_config.default_room_name,
                seed_code.as_deref().map(|code| SeedInvite { code }),
            )
            .await?;

        let club: Club = created.club.into();
        let owner: Membership = created.owner.into();
        info!(
            club_id = %club.id,
            creator_id = %creator_id,
            visibility = %club.visibility,
            "Club created"
        );

        let initial_invite = created.initial_invite.map(|entity| {
            let invite: domain::models::Invite = entity.into();
            InviteResponse {
                invite_url: invite_url(&self.invite_config.base_url, &invite.code),
                invite,
            }
        });

        Ok(CreateClubResponse {
            club: ClubDetail {
                club,
                member_count: 1,
                your_role: Some(owner.role),
            },
            default_room: created.default_room.into(),
            initial_invite,
        })
    }

    /// Club details. INVITE_ONLY clubs are hidden from non-members.
    pub async fn get_club(
        &self,
        club_id: Uuid,
        caller_id: Uuid,
    ) -> Result<ClubDetail, MembershipError> {
        let club = load_club(&self.clubs, club_id).await?;
        let membership: Option<Membership> = self
            .memberships
            .find(club_id, caller_id)
            .await?
            .map(Into::into)
            .filter(Membership::is_active);

        if club.visibility == ClubVisibility::InviteOnly && membership.is_none() {
            return Err(MembershipError::AccessDenied);
        }

        self.detail(club, membership.map(|m| m.role)).await
    }

    /// Update mutable settings. Requires ADMIN.
    pub async fn update_club(
        &self,
        club_id: Uuid,
        caller_id: Uuid,
        request: UpdateClubRequest,
    ) -> Result<ClubDetail, MembershipError> {
        request.validate()?;
        load_club(&self.clubs, club_id).await?;
        let caller = self
            .permissions
            .require(club_id, caller_id, MemberRole::Admin)
            .await?;

        let name = request.name.as_deref().map(normalized_name).transpose()?;
        let updated = self
            .clubs
            .update_club(
                club_id,
                ClubChanges {
                    name,
                    visibility: request.visibility,
                    description: request.description.as_deref(),
                    image_url: request.image_url.as_deref(),
                    category: request.category.as_deref(),
                },
            )
            .await?
            .ok_or(MembershipError::ClubNotFound)?;

        info!(club_id = %club_id, updated_by = %caller_id, "Club updated");
        self.detail(updated.into(), Some(caller.role)).await
    }

    /// Delete a club and everything hanging off it. Requires OWNER.
    pub async fn delete_club(&self, club_id: Uuid, caller_id: Uuid) -> Result<(), MembershipError> {
        load_club(&self.clubs, club_id).await?;
        self.permissions
            .require(club_id, caller_id, MemberRole::Owner)
            .await?;

        if self.clubs.delete_club(club_id).await? == 0 {
            return Err(MembershipError::ClubNotFound);
        }

        info!(club_id = %club_id, deleted_by = %caller_id, "Club deleted");
        Ok(())
    }

    /// Discovery listing of PUBLIC clubs, most recently active first.
    pub async fn list_public_clubs(
        &self,
        caller_id: Uuid,
        query: ListClubsQuery,
    ) -> Result<ListClubsResponse, MembershipError> {
        let (page, per_page) = Pagination::normalize(query.page, query.per_page);
        let category = query
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        let total = self.clubs.count_public(category).await?;
        let pagination = Pagination::new(page, per_page, total);
        let clubs = self
            .clubs
            .list_public(category, caller_id, per_page, pagination.offset())
            .await?;

        Ok(ListClubsResponse {
            data: clubs.into_iter().map(Into::into).collect(),
            pagination: Some(pagination),
        })
    }

    /// Clubs where the caller is an ACTIVE member.
    pub async fn list_my_clubs(&self, caller_id: Uuid) -> Result<ListClubsResponse, MembershipError> {
        let clubs = self.clubs.list_for_member(caller_id).await?;
        Ok(ListClubsResponse {
            data: clubs.into_iter().map(Into::into).collect(),
            pagination: None,
        })
    }

    async fn detail(
        &self,
        club: Club,
        your_role: Option<MemberRole>,
    ) -> Result<ClubDetail, MembershipError> {
        let member_count = self.memberships.count_active(club.id, None).await?;
        Ok(ClubDetail {
            club,
            member_count,
            your_role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_name_trims() {
        assert_eq!(normalized_name("  Night Owls ").unwrap(), "Night Owls");
    }

    #[test]
    fn test_blank_name_rejected() {
        let err = normalized_name("   ").unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }
}
