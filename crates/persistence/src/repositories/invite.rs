//! Invite repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{InviteEntity, InviteWithClubEntity, MembershipEntity, MembershipStatusDb};
use crate::metrics::{record_transaction_rollback, QueryTimer};
use crate::repositories::club::{lock_club, touch_club_activity, ClubLock};
use crate::repositories::membership::{activate_membership, find_membership};

/// Result of redeeming an invite.
#[derive(Debug)]
pub enum RedeemOutcome {
    Redeemed {
        invite: InviteEntity,
        membership: MembershipEntity,
    },
    Invalid,
    Expired,
    Exhausted,
    AlreadyMember,
    Banned,
    ClubRetired,
}

/// Repository for invite-related database operations.
#[derive(Clone)]
pub struct InviteRepository {
    pool: PgPool,
}

impl InviteRepository {
    /// Creates a new InviteRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create a new invite.
    pub async fn create_invite(
        &self,
        club_id: Uuid,
        code: &str,
        created_by: Uuid,
        max_uses: Option<i32>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<InviteEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_invite");
        let result = sqlx::query_as::<_, InviteEntity>(
            r#"
            INSERT INTO club_invites (club_id, code, created_by, max_uses, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, club_id, code, created_by, max_uses, current_uses, expires_at, created_at
            "#,
        )
        .bind(club_id)
        .bind(code)
        .bind(created_by)
        .bind(max_uses)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find invite by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<InviteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invite_by_id");
        let result = sqlx::query_as::<_, InviteEntity>(
            r#"
            SELECT id, club_id, code, created_by, max_uses, current_uses, expires_at, created_at
            FROM club_invites
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find invite by code.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<InviteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invite_by_code");
        let result = sqlx::query_as::<_, InviteEntity>(
            r#"
            SELECT id, club_id, code, created_by, max_uses, current_uses, expires_at, created_at
            FROM club_invites
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find invite by code with club info (for public preview).
    pub async fn find_by_code_with_club(
        &self,
        code: &str,
    ) -> Result<Option<InviteWithClubEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invite_by_code_with_club");
        let result = sqlx::query_as::<_, InviteWithClubEntity>(
            r#"
            SELECT
                i.id, i.club_id, i.code, i.created_by, i.max_uses, i.current_uses,
                i.expires_at, i.created_at,
                c.name AS club_name,
                c.visibility AS club_visibility,
                c.image_url AS club_image_url,
                (SELECT COUNT(*) FROM club_memberships m
                 WHERE m.club_id = c.id AND m.status = 'active') AS member_count
            FROM club_invites i
            JOIN clubs c ON i.club_id = c.id
            WHERE i.code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all invites for a club, newest first.
    pub async fn list_for_club(&self, club_id: Uuid) -> Result<Vec<InviteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_club_invites");
        let result = sqlx::query_as::<_, InviteEntity>(
            r#"
            SELECT id, club_id, code, created_by, max_uses, current_uses, expires_at, created_at
            FROM club_invites
            WHERE club_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(club_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete an invite.
    pub async fn delete_invite(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_invite");
        let result = sqlx::query("DELETE FROM club_invites WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Check if code exists.
    pub async fn code_exists(&self, code: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("check_invite_code_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM club_invites WHERE code = $1)
            "#,
        )
        .bind(code)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Generate a code not yet used by any invite, giving up after `max_attempts`.
    pub async fn generate_unique_code<F>(
        &self,
        generator: F,
        max_attempts: u32,
    ) -> Result<String, sqlx::Error>
    where
        F: Fn() -> String,
    {
        for _ in 0..max_attempts.max(1) {
            let code = generator();
            if !self.code_exists(&code).await? {
                return Ok(code);
            }
        }
        Err(sqlx::Error::Protocol(
            "Could not generate unique invite code".to_string(),
        ))
    }

    /// Redeem an invite for `user_id`.
    ///
    /// The use counter is bumped by a conditional update that re-checks expiry
    /// and the cap under the row lock, so concurrent redeemers of the last use
    /// serialize on it and exactly one wins. The membership upsert runs in the
    /// same transaction; if it cannot activate the user the counter bump is
    /// rolled back with it. The club row is locked before anything else, in
    /// the same order as joins and the owner's leave.
    pub async fn redeem(&self, invite_id: Uuid, user_id: Uuid) -> Result<RedeemOutcome, sqlx::Error> {
        let timer = QueryTimer::new("redeem_invite");
        let mut tx = self.pool.begin().await?;

        let club_id: Option<Uuid> =
            sqlx::query_scalar("SELECT club_id FROM club_invites WHERE id = $1")
                .bind(invite_id)
                .fetch_optional(&mut *tx)
                .await?;
        let refused = match club_id {
            None => Some(RedeemOutcome::Invalid),
            Some(club_id) => match lock_club(&mut tx, club_id).await? {
                ClubLock::Open => None,
                ClubLock::Retired => Some(RedeemOutcome::ClubRetired),
                ClubLock::Missing => Some(RedeemOutcome::Invalid),
            },
        };
        if let Some(outcome) = refused {
            tx.rollback().await?;
            record_transaction_rollback("redeem_invite");
            timer.record();
            return Ok(outcome);
        }

        let invite = sqlx::query_as::<_, InviteEntity>(
            r#"
            UPDATE club_invites
            SET current_uses = current_uses + 1
            WHERE id = $1
              AND (max_uses IS NULL OR current_uses < max_uses)
              AND (expires_at IS NULL OR expires_at > NOW())
            RETURNING id, club_id, code, created_by, max_uses, current_uses, expires_at, created_at
            "#,
        )
        .bind(invite_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(invite) = invite else {
            tx.rollback().await?;
            record_transaction_rollback("redeem_invite");
            timer.record();
            return Ok(self.classify_unusable(invite_id).await?);
        };

        let Some(membership) = activate_membership(&mut tx, invite.club_id, user_id).await? else {
            let existing = find_membership(&mut tx, invite.club_id, user_id).await?;
            tx.rollback().await?;
            record_transaction_rollback("redeem_invite");
            timer.record();
            return Ok(match existing.map(|m| m.status) {
                Some(MembershipStatusDb::Banned) => RedeemOutcome::Banned,
                _ => RedeemOutcome::AlreadyMember,
            });
        };

        touch_club_activity(&mut tx, invite.club_id).await?;
        tx.commit().await?;
        timer.record();
        Ok(RedeemOutcome::Redeemed { invite, membership })
    }

    /// Work out why the guarded increment matched no row.
    async fn classify_unusable(&self, invite_id: Uuid) -> Result<RedeemOutcome, sqlx::Error> {
        let Some(invite) = self.find_by_id(invite_id).await? else {
            return Ok(RedeemOutcome::Invalid);
        };
        let invite = domain::models::Invite::from(invite);
        Ok(if invite.is_expired_at(Utc::now()) {
            RedeemOutcome::Expired
        } else {
            RedeemOutcome::Exhausted
        })
    }
}
