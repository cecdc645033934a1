//! Membership repository for database operations.
//!
//! One row per (club, user). Leaving, removal and unbanning flip the status
//! instead of deleting, and rejoining reactivates the same row through an
//! upsert keyed on the composite identity.

use domain::models::MemberRole;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entities::{MemberRoleDb, MembershipEntity, MembershipStatusDb};
use crate::metrics::{record_transaction_rollback, QueryTimer};
use crate::repositories::club::{lock_club, touch_club_activity, ClubLock};

/// Result of a direct join attempt.
#[derive(Debug)]
pub enum JoinOutcome {
    Joined(MembershipEntity),
    AlreadyMember,
    Banned,
    ClubNotFound,
    ClubRetired,
}

/// Result of a leave attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    Left,
    NotAMember,
    OwnerMustTransfer,
}

/// Result of removing, re-roling or banning another member.
#[derive(Debug)]
pub enum TargetOutcome {
    Updated(MembershipEntity),
    NotAMember,
    TargetIsOwner,
}

/// Insert or reactivate a MEMBER-role ACTIVE membership.
///
/// Only a missing row or a LEFT row is (re)activated. Returns `None` when the
/// existing row is ACTIVE or BANNED; the caller decides which.
pub(crate) async fn activate_membership(
    conn: &mut PgConnection,
    club_id: Uuid,
    user_id: Uuid,
) -> Result<Option<MembershipEntity>, sqlx::Error> {
    sqlx::query_as::<_, MembershipEntity>(
        r#"
        INSERT INTO club_memberships (club_id, user_id, role, status, joined_at)
        VALUES ($1, $2, 'member', 'active', NOW())
        ON CONFLICT (club_id, user_id) DO UPDATE
        SET role = 'member', status = 'active', joined_at = NOW(), updated_at = NOW()
        WHERE club_memberships.status = 'left'
        RETURNING club_id, user_id, role, status, joined_at, updated_at
        "#,
    )
    .bind(club_id)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await
}

/// Load a membership inside an open transaction.
pub(crate) async fn find_membership(
    conn: &mut PgConnection,
    club_id: Uuid,
    user_id: Uuid,
) -> Result<Option<MembershipEntity>, sqlx::Error> {
    sqlx::query_as::<_, MembershipEntity>(
        r#"
        SELECT club_id, user_id, role, status, joined_at, updated_at
        FROM club_memberships
        WHERE club_id = $1 AND user_id = $2
        "#,
    )
    .bind(club_id)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await
}

/// Repository for membership-related database operations.
#[derive(Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    /// Creates a new MembershipRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Find the membership row for (club, user) regardless of status.
    pub async fn find(
        &self,
        club_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<MembershipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_membership");
        let mut conn = self.pool.acquire().await?;
        let result = find_membership(&mut conn, club_id, user_id).await;
        timer.record();
        result
    }

    /// Join a club directly and touch its activity timestamp.
    pub async fn join(&self, club_id: Uuid, user_id: Uuid) -> Result<JoinOutcome, sqlx::Error> {
        let timer = QueryTimer::new("join_club");
        let mut tx = self.pool.begin().await?;

        let refused = match lock_club(&mut tx, club_id).await? {
            ClubLock::Open => None,
            ClubLock::Retired => Some(JoinOutcome::ClubRetired),
            ClubLock::Missing => Some(JoinOutcome::ClubNotFound),
        };
        if let Some(outcome) = refused {
            tx.rollback().await?;
            record_transaction_rollback("join_club");
            timer.record();
            return Ok(outcome);
        }

        let Some(membership) = activate_membership(&mut tx, club_id, user_id).await? else {
            let existing = find_membership(&mut tx, club_id, user_id).await?;
            tx.rollback().await?;
            record_transaction_rollback("join_club");
            timer.record();
            return Ok(match existing.map(|m| m.status) {
                Some(MembershipStatusDb::Banned) => JoinOutcome::Banned,
                _ => JoinOutcome::AlreadyMember,
            });
        };

        touch_club_activity(&mut tx, club_id).await?;
        tx.commit().await?;
        timer.record();
        Ok(JoinOutcome::Joined(membership))
    }

    /// Leave a club.
    ///
    /// The owner may leave only while no other ACTIVE member exists. The club
    /// row is locked first, so a join racing this call either commits before
    /// the guard runs or is refused afterwards because the club is retired.
    pub async fn leave(&self, club_id: Uuid, user_id: Uuid) -> Result<LeaveOutcome, sqlx::Error> {
        let timer = QueryTimer::new("leave_club");
        let mut tx = self.pool.begin().await?;

        if lock_club(&mut tx, club_id).await? == ClubLock::Missing {
            tx.rollback().await?;
            timer.record();
            return Ok(LeaveOutcome::NotAMember);
        }

        let result = sqlx::query(
            r#"
            UPDATE club_memberships m
            SET status = 'left', updated_at = NOW()
            WHERE m.club_id = $1 AND m.user_id = $2 AND m.status = 'active'
              AND (
                m.role <> 'owner'
                OR NOT EXISTS (
                    SELECT 1 FROM club_memberships o
                    WHERE o.club_id = $1 AND o.user_id <> $2 AND o.status = 'active'
                )
              )
            "#,
        )
        .bind(club_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() > 0 {
            tx.commit().await?;
            timer.record();
            return Ok(LeaveOutcome::Left);
        }

        let existing = find_membership(&mut tx, club_id, user_id).await?;
        tx.rollback().await?;
        record_transaction_rollback("leave_club");
        timer.record();
        Ok(match existing {
            Some(m) if m.status == MembershipStatusDb::Active => LeaveOutcome::OwnerMustTransfer,
            _ => LeaveOutcome::NotAMember,
        })
    }

    /// Soft-remove an ACTIVE non-owner member.
    pub async fn remove(
        &self,
        club_id: Uuid,
        user_id: Uuid,
    ) -> Result<TargetOutcome, sqlx::Error> {
        let timer = QueryTimer::new("remove_member");
        let result = sqlx::query_as::<_, MembershipEntity>(
            r#"
            UPDATE club_memberships
            SET status = 'left', updated_at = NOW()
            WHERE club_id = $1 AND user_id = $2 AND status = 'active' AND role <> 'owner'
            RETURNING club_id, user_id, role, status, joined_at, updated_at
            "#,
        )
        .bind(club_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        match result {
            Some(membership) => Ok(TargetOutcome::Updated(membership)),
            None => self.classify_target(club_id, user_id).await,
        }
    }

    /// Change the role of an ACTIVE non-owner member.
    pub async fn update_role(
        &self,
        club_id: Uuid,
        user_id: Uuid,
        role: MemberRole,
    ) -> Result<TargetOutcome, sqlx::Error> {
        let timer = QueryTimer::new("update_member_role");
        let result = sqlx::query_as::<_, MembershipEntity>(
            r#"
            UPDATE club_memberships
            SET role = $3, updated_at = NOW()
            WHERE club_id = $1 AND user_id = $2 AND status = 'active' AND role <> 'owner'
            RETURNING club_id, user_id, role, status, joined_at, updated_at
            "#,
        )
        .bind(club_id)
        .bind(user_id)
        .bind(MemberRoleDb::from(role))
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        match result {
            Some(membership) => Ok(TargetOutcome::Updated(membership)),
            None => self.classify_target(club_id, user_id).await,
        }
    }

    /// Ban a user and reject their pending join request in one unit.
    ///
    /// Users without a membership row get a BANNED row so the ban holds if
    /// they try to join later.
    pub async fn ban(
        &self,
        club_id: Uuid,
        user_id: Uuid,
        banned_by: Uuid,
    ) -> Result<TargetOutcome, sqlx::Error> {
        let timer = QueryTimer::new("ban_member");
        let mut tx = self.pool.begin().await?;

        let banned = sqlx::query_as::<_, MembershipEntity>(
            r#"
            INSERT INTO club_memberships (club_id, user_id, role, status)
            VALUES ($1, $2, 'member', 'banned')
            ON CONFLICT (club_id, user_id) DO UPDATE
            SET status = 'banned', updated_at = NOW()
            WHERE club_memberships.role <> 'owner'
            RETURNING club_id, user_id, role, status, joined_at, updated_at
            "#,
        )
        .bind(club_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(banned) = banned else {
            tx.rollback().await?;
            record_transaction_rollback("ban_member");
            timer.record();
            return Ok(TargetOutcome::TargetIsOwner);
        };

        sqlx::query(
            r#"
            UPDATE membership_requests
            SET status = 'rejected', reviewed_by = $3, reviewed_at = NOW(), updated_at = NOW()
            WHERE club_id = $1 AND user_id = $2 AND status = 'pending'
            "#,
        )
        .bind(club_id)
        .bind(user_id)
        .bind(banned_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(TargetOutcome::Updated(banned))
    }

    /// Lift a ban, leaving the row as LEFT. Returns false if the user was not banned.
    pub async fn unban(&self, club_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("unban_member");
        let result = sqlx::query(
            r#"
            UPDATE club_memberships
            SET status = 'left', updated_at = NOW()
            WHERE club_id = $1 AND user_id = $2 AND status = 'banned'
            "#,
        )
        .bind(club_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// List ACTIVE members, oldest first.
    pub async fn list_active(
        &self,
        club_id: Uuid,
        role: Option<MemberRole>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MembershipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_active_members");
        let result = sqlx::query_as::<_, MembershipEntity>(
            r#"
            SELECT club_id, user_id, role, status, joined_at, updated_at
            FROM club_memberships
            WHERE club_id = $1 AND status = 'active'
              AND ($2::member_role IS NULL OR role = $2)
            ORDER BY joined_at ASC, user_id ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(club_id)
        .bind(role.map(MemberRoleDb::from))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count ACTIVE members, optionally restricted to one role.
    pub async fn count_active(
        &self,
        club_id: Uuid,
        role: Option<MemberRole>,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_active_members");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM club_memberships
            WHERE club_id = $1 AND status = 'active'
              AND ($2::member_role IS NULL OR role = $2)
            "#,
        )
        .bind(club_id)
        .bind(role.map(MemberRoleDb::from))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    async fn classify_target(
        &self,
        club_id: Uuid,
        user_id: Uuid,
    ) -> Result<TargetOutcome, sqlx::Error> {
        Ok(match self.find(club_id, user_id).await? {
            Some(m) if m.status == MembershipStatusDb::Active && m.role == MemberRoleDb::Owner => {
                TargetOutcome::TargetIsOwner
            }
            _ => TargetOutcome::NotAMember,
        })
    }
}
