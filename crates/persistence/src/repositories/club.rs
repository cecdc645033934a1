//! Club repository for database operations.

use domain::models::ClubVisibility;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entities::{
    ClubEntity, ClubVisibilityDb, ClubWithCountEntity, InviteEntity, MembershipEntity, RoomEntity,
};
use crate::metrics::QueryTimer;

/// Column values for a new club.
#[derive(Debug, Clone)]
pub struct NewClub<'a> {
    pub name: &'a str,
    pub visibility: ClubVisibility,
    pub creator_id: Uuid,
    pub description: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub category: Option<&'a str>,
}

/// Partial update of a club's mutable settings. `None` leaves a column unchanged.
#[derive(Debug, Clone, Default)]
pub struct ClubChanges<'a> {
    pub name: Option<&'a str>,
    pub visibility: Option<ClubVisibility>,
    pub description: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub category: Option<&'a str>,
}

/// Unlimited first invite minted alongside a club.
#[derive(Debug, Clone)]
pub struct SeedInvite<'a> {
    pub code: &'a str,
}

/// Everything written by [`ClubRepository::create_club`].
#[derive(Debug)]
pub struct CreatedClub {
    pub club: ClubEntity,
    pub owner: MembershipEntity,
    pub default_room: RoomEntity,
    pub initial_invite: Option<InviteEntity>,
}

/// State of a club row locked by [`lock_club`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClubLock {
    /// The club has an ACTIVE owner and accepts new members.
    Open,
    /// The owner left as the last member; nobody may be activated.
    Retired,
    Missing,
}

/// Lock a club row until the end of the transaction.
///
/// Every membership activation and the owner's leave take this lock before
/// touching `club_memberships`, so the owner-alone check and new activations
/// serialize per club. The owner lookup runs after the lock is granted and
/// therefore sees every transaction that held it before.
pub(crate) async fn lock_club(
    conn: &mut PgConnection,
    club_id: Uuid,
) -> Result<ClubLock, sqlx::Error> {
    let locked: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM clubs WHERE id = $1 FOR UPDATE")
            .bind(club_id)
            .fetch_optional(&mut *conn)
            .await?;
    if locked.is_none() {
        return Ok(ClubLock::Missing);
    }

    let has_owner: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM club_memberships
            WHERE club_id = $1 AND role = 'owner' AND status = 'active'
        )
        "#,
    )
    .bind(club_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(if has_owner {
        ClubLock::Open
    } else {
        ClubLock::Retired
    })
}

/// Bump a club's `last_active_at` inside an open transaction.
pub(crate) async fn touch_club_activity(
    conn: &mut PgConnection,
    club_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE clubs SET last_active_at = NOW() WHERE id = $1")
        .bind(club_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Repository for club-related database operations.
#[derive(Clone)]
pub struct ClubRepository {
    pool: PgPool,
}

impl ClubRepository {
    /// Creates a new ClubRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create a club with its owner membership, default room and optional first invite.
    pub async fn create_club(
        &self,
        new_club: NewClub<'_>,
        default_room_name: &str,
        seed_invite: Option<SeedInvite<'_>>,
    ) -> Result<CreatedClub, sqlx::Error> {
        let timer = QueryTimer::new("create_club");

        // Club, owner, room and invite become visible together or not at all
        let mut tx = self.pool.begin().await?;

        let club = sqlx::query_as::<_, ClubEntity>(
            r#"
            INSERT INTO clubs (name, visibility, creator_id, description, image_url, category)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, visibility, creator_id, description, image_url, category,
                      last_active_at, created_at, updated_at
            "#,
        )
        .bind(new_club.name)
        .bind(ClubVisibilityDb::from(new_club.visibility))
        .bind(new_club.creator_id)
        .bind(new_club.description)
        .bind(new_club.image_url)
        .bind(new_club.category)
        .fetch_one(&mut *tx)
        .await?;

        let owner = sqlx::query_as::<_, MembershipEntity>(
            r#"
            INSERT INTO club_memberships (club_id, user_id, role, status)
            VALUES ($1, $2, 'owner', 'active')
            RETURNING club_id, user_id, role, status, joined_at, updated_at
            "#,
        )
        .bind(club.id)
        .bind(new_club.creator_id)
        .fetch_one(&mut *tx)
        .await?;

        let default_room = sqlx::query_as::<_, RoomEntity>(
            r#"
            INSERT INTO club_rooms (club_id, name, is_default)
            VALUES ($1, $2, true)
            RETURNING id, club_id, name, is_default, created_at
            "#,
        )
        .bind(club.id)
        .bind(default_room_name)
        .fetch_one(&mut *tx)
        .await?;

        let initial_invite = match seed_invite {
            Some(seed) => Some(
                sqlx::query_as::<_, InviteEntity>(
                    r#"
                    INSERT INTO club_invites (club_id, code, created_by)
                    VALUES ($1, $2, $3)
                    RETURNING id, club_id, code, created_by, max_uses, current_uses,
                              expires_at, created_at
                    "#,
                )
                .bind(club.id)
                .bind(seed.code)
                .bind(new_club.creator_id)
                .fetch_one(&mut *tx)
                .await?,
            ),
            None => None,
        };

        tx.commit().await?;
        timer.record();
        Ok(CreatedClub {
            club,
            owner,
            default_room,
            initial_invite,
        })
    }

    /// Find a club by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ClubEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_club_by_id");
        let result = sqlx::query_as::<_, ClubEntity>(
            r#"
            SELECT id, name, visibility, creator_id, description, image_url, category,
                   last_active_at, created_at, updated_at
            FROM clubs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Apply a partial update. Returns `None` if the club does not exist.
    pub async fn update_club(
        &self,
        id: Uuid,
        changes: ClubChanges<'_>,
    ) -> Result<Option<ClubEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_club");
        let result = sqlx::query_as::<_, ClubEntity>(
            r#"
            UPDATE clubs
            SET name = COALESCE($2, name),
                visibility = COALESCE($3, visibility),
                description = COALESCE($4, description),
                image_url = COALESCE($5, image_url),
                category = COALESCE($6, category),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, visibility, creator_id, description, image_url, category,
                      last_active_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.visibility.map(ClubVisibilityDb::from))
        .bind(changes.description)
        .bind(changes.image_url)
        .bind(changes.category)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Hard-delete a club. Memberships, requests, invites and rooms cascade.
    pub async fn delete_club(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_club");
        let result = sqlx::query("DELETE FROM clubs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// List PUBLIC clubs by recent activity, annotated with the viewer's role.
    pub async fn list_public(
        &self,
        category: Option<&str>,
        viewer_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ClubWithCountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_public_clubs");
        let result = sqlx::query_as::<_, ClubWithCountEntity>(
            r#"
            SELECT c.id, c.name, c.visibility, c.category, c.image_url, c.last_active_at,
                   (SELECT COUNT(*) FROM club_memberships m
                    WHERE m.club_id = c.id AND m.status = 'active') AS member_count,
                   v.role AS your_role
            FROM clubs c
            LEFT JOIN club_memberships v
                   ON v.club_id = c.id AND v.user_id = $2 AND v.status = 'active'
            WHERE c.visibility = 'public'
              AND ($1::text IS NULL OR c.category = $1)
            ORDER BY c.last_active_at DESC, c.id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(category)
        .bind(viewer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count PUBLIC clubs, optionally within one category.
    pub async fn count_public(&self, category: Option<&str>) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_public_clubs");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM clubs
            WHERE visibility = 'public' AND ($1::text IS NULL OR category = $1)
            "#,
        )
        .bind(category)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List clubs where the user is an ACTIVE member.
    pub async fn list_for_member(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ClubWithCountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_clubs_for_member");
        let result = sqlx::query_as::<_, ClubWithCountEntity>(
            r#"
            SELECT c.id, c.name, c.visibility, c.category, c.image_url, c.last_active_at,
                   (SELECT COUNT(*) FROM club_memberships m
                    WHERE m.club_id = c.id AND m.status = 'active') AS member_count,
                   v.role AS your_role
            FROM clubs c
            JOIN club_memberships v ON v.club_id = c.id
            WHERE v.user_id = $1 AND v.status = 'active'
            ORDER BY c.last_active_at DESC, c.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
