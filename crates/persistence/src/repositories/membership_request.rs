//! Membership request repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{MembershipEntity, MembershipRequestEntity, MembershipStatusDb};
use crate::metrics::{record_transaction_rollback, QueryTimer};
use crate::repositories::club::{lock_club, touch_club_activity, ClubLock};
use crate::repositories::membership::{activate_membership, find_membership};

/// Result of approving a join request.
#[derive(Debug)]
pub enum ApproveOutcome {
    Approved {
        request: MembershipRequestEntity,
        membership: MembershipEntity,
    },
    NotFound,
    AlreadyReviewed,
    Banned,
    ClubRetired,
}

/// Result of rejecting a join request.
#[derive(Debug)]
pub enum RejectOutcome {
    Rejected(MembershipRequestEntity),
    NotFound,
    AlreadyReviewed,
}

/// Repository for join request database operations.
#[derive(Clone)]
pub struct MembershipRequestRepository {
    pool: PgPool,
}

impl MembershipRequestRepository {
    /// Creates a new MembershipRequestRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Find a request by ID.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<MembershipRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_membership_request_by_id");
        let result = sqlx::query_as::<_, MembershipRequestEntity>(
            r#"
            SELECT id, club_id, user_id, status, message, created_at, reviewed_by, reviewed_at
            FROM membership_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a PENDING request, overwriting a previously reviewed one.
    ///
    /// Returns `None` when a PENDING request already exists for (club, user).
    pub async fn submit(
        &self,
        club_id: Uuid,
        user_id: Uuid,
        message: Option<&str>,
    ) -> Result<Option<MembershipRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("submit_membership_request");
        let result = sqlx::query_as::<_, MembershipRequestEntity>(
            r#"
            INSERT INTO membership_requests (club_id, user_id, status, message)
            VALUES ($1, $2, 'pending', $3)
            ON CONFLICT (club_id, user_id) DO UPDATE
            SET status = 'pending',
                message = EXCLUDED.message,
                reviewed_by = NULL,
                reviewed_at = NULL,
                created_at = NOW(),
                updated_at = NOW()
            WHERE membership_requests.status <> 'pending'
            RETURNING id, club_id, user_id, status, message, created_at, reviewed_by, reviewed_at
            "#,
        )
        .bind(club_id)
        .bind(user_id)
        .bind(message)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Approve a PENDING request and activate the requester's membership in one unit.
    pub async fn approve(
        &self,
        club_id: Uuid,
        request_id: Uuid,
        reviewer_id: Uuid,
    ) -> Result<ApproveOutcome, sqlx::Error> {
        let timer = QueryTimer::new("approve_membership_request");
        let mut tx = self.pool.begin().await?;

        let refused = match lock_club(&mut tx, club_id).await? {
            ClubLock::Open => None,
            ClubLock::Retired => Some(ApproveOutcome::ClubRetired),
            ClubLock::Missing => Some(ApproveOutcome::NotFound),
        };
        if let Some(outcome) = refused {
            tx.rollback().await?;
            record_transaction_rollback("approve_request");
            timer.record();
            return Ok(outcome);
        }

        let request = sqlx::query_as::<_, MembershipRequestEntity>(
            r#"
            UPDATE membership_requests
            SET status = 'approved', reviewed_by = $3, reviewed_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND club_id = $2 AND status = 'pending'
            RETURNING id, club_id, user_id, status, message, created_at, reviewed_by, reviewed_at
            "#,
        )
        .bind(request_id)
        .bind(club_id)
        .bind(reviewer_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(request) = request else {
            tx.rollback().await?;
            record_transaction_rollback("approve_request");
            timer.record();
            return Ok(match self.find_by_id(request_id).await? {
                Some(existing) if existing.club_id == club_id => ApproveOutcome::AlreadyReviewed,
                _ => ApproveOutcome::NotFound,
            });
        };

        let membership = match activate_membership(&mut tx, club_id, request.user_id).await? {
            Some(membership) => membership,
            None => match find_membership(&mut tx, club_id, request.user_id).await? {
                // Joined through another path meanwhile; keep their current role
                Some(existing) if existing.status == MembershipStatusDb::Active => existing,
                _ => {
                    tx.rollback().await?;
                    record_transaction_rollback("approve_request");
                    timer.record();
                    return Ok(ApproveOutcome::Banned);
                }
            },
        };

        touch_club_activity(&mut tx, club_id).await?;
        tx.commit().await?;
        timer.record();
        Ok(ApproveOutcome::Approved {
            request,
            membership,
        })
    }

    /// Reject a PENDING request. No membership side effect.
    pub async fn reject(
        &self,
        club_id: Uuid,
        request_id: Uuid,
        reviewer_id: Uuid,
    ) -> Result<RejectOutcome, sqlx::Error> {
        let timer = QueryTimer::new("reject_membership_request");
        let result = sqlx::query_as::<_, MembershipRequestEntity>(
            r#"
            UPDATE membership_requests
            SET status = 'rejected', reviewed_by = $3, reviewed_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND club_id = $2 AND status = 'pending'
            RETURNING id, club_id, user_id, status, message, created_at, reviewed_by, reviewed_at
            "#,
        )
        .bind(request_id)
        .bind(club_id)
        .bind(reviewer_id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        if let Some(request) = result {
            return Ok(RejectOutcome::Rejected(request));
        }
        Ok(match self.find_by_id(request_id).await? {
            Some(existing) if existing.club_id == club_id => RejectOutcome::AlreadyReviewed,
            _ => RejectOutcome::NotFound,
        })
    }

    /// List PENDING requests for a club, oldest first.
    pub async fn list_pending(
        &self,
        club_id: Uuid,
    ) -> Result<Vec<MembershipRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_pending_membership_requests");
        let result = sqlx::query_as::<_, MembershipRequestEntity>(
            r#"
            SELECT id, club_id, user_id, status, message, created_at, reviewed_by, reviewed_at
            FROM membership_requests
            WHERE club_id = $1 AND status = 'pending'
            ORDER BY created_at ASC
            "#,
        )
        .bind(club_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
