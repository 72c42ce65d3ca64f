//! Invitation code repository for database operations.

use domain::models::InvitationCode;
use domain::store::{InvitationCodeStore, StoreError};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::InvitationCodeEntity;
use crate::error::store_error;
use crate::metrics::QueryTimer;

/// Repository for issued invitation codes.
#[derive(Clone)]
pub struct InvitationCodeRepository {
    pool: PgPool,
}

impl InvitationCodeRepository {
    /// Creates a new InvitationCodeRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl InvitationCodeStore for InvitationCodeRepository {
    async fn insert(
        &self,
        code: &str,
        party_id: Uuid,
        inviter_rsvp_id: Uuid,
    ) -> Result<InvitationCode, StoreError> {
        let timer = QueryTimer::new("create_invitation_code");
        let result = sqlx::query_as::<_, InvitationCodeEntity>(
            r#"
            INSERT INTO invitation_codes (code, party_id, inviter_rsvp_id)
            VALUES ($1, $2, $3)
            RETURNING code, party_id, inviter_rsvp_id, redeemed_by_rsvp_id, redeemed_at, created_at
            "#,
        )
        .bind(code)
        .bind(party_id)
        .bind(inviter_rsvp_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result.map(Into::into).map_err(store_error)
    }

    async fn get_or_insert_live(
        &self,
        candidate: &str,
        party_id: Uuid,
        inviter_rsvp_id: Uuid,
    ) -> Result<InvitationCode, StoreError> {
        let timer = QueryTimer::new("get_or_insert_live_invitation_code");
        let result = async {
            let mut tx = self.pool.begin().await?;

            // Serializes issuers of one inviter. NO KEY UPDATE leaves the
            // KEY SHARE locks taken by child inserts unblocked.
            sqlx::query("SELECT id FROM rsvps WHERE id = $1 FOR NO KEY UPDATE")
                .bind(inviter_rsvp_id)
                .fetch_one(&mut *tx)
                .await?;

            let live = sqlx::query_as::<_, InvitationCodeEntity>(
                r#"
                SELECT code, party_id, inviter_rsvp_id, redeemed_by_rsvp_id, redeemed_at, created_at
                FROM invitation_codes
                WHERE inviter_rsvp_id = $1 AND redeemed_at IS NULL
                ORDER BY seq DESC
                LIMIT 1
                "#,
            )
            .bind(inviter_rsvp_id)
            .fetch_optional(&mut *tx)
            .await?;

            let entity = match live {
                Some(entity) => entity,
                None => {
                    sqlx::query_as::<_, InvitationCodeEntity>(
                        r#"
                        INSERT INTO invitation_codes (code, party_id, inviter_rsvp_id)
                        VALUES ($1, $2, $3)
                        RETURNING code, party_id, inviter_rsvp_id, redeemed_by_rsvp_id, redeemed_at, created_at
                        "#,
                    )
                    .bind(candidate)
                    .bind(party_id)
                    .bind(inviter_rsvp_id)
                    .fetch_one(&mut *tx)
                    .await?
                }
            };

            tx.commit().await?;
            Ok::<_, sqlx::Error>(entity)
        }
        .await;
        timer.record();
        result.map(Into::into).map_err(store_error)
    }

    async fn find(&self, code: &str) -> Result<Option<InvitationCode>, StoreError> {
        let timer = QueryTimer::new("find_invitation_code");
        let result = sqlx::query_as::<_, InvitationCodeEntity>(
            r#"
            SELECT code, party_id, inviter_rsvp_id, redeemed_by_rsvp_id, redeemed_at, created_at
            FROM invitation_codes
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|e| e.map(Into::into)).map_err(store_error)
    }

    async fn find_live_for_inviter(
        &self,
        inviter_rsvp_id: Uuid,
    ) -> Result<Option<InvitationCode>, StoreError> {
        let timer = QueryTimer::new("find_live_invitation_code");
        let result = sqlx::query_as::<_, InvitationCodeEntity>(
            r#"
            SELECT code, party_id, inviter_rsvp_id, redeemed_by_rsvp_id, redeemed_at, created_at
            FROM invitation_codes
            WHERE inviter_rsvp_id = $1 AND redeemed_at IS NULL
            ORDER BY seq DESC
            LIMIT 1
            "#,
        )
        .bind(inviter_rsvp_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|e| e.map(Into::into)).map_err(store_error)
    }

    async fn claim(&self, code: &str) -> Result<bool, StoreError> {
        let timer = QueryTimer::new("claim_invitation_code");
        let result = sqlx::query(
            r#"
            UPDATE invitation_codes
            SET redeemed_at = NOW()
            WHERE code = $1 AND redeemed_at IS NULL
            "#,
        )
        .bind(code)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result.map_err(store_error)?.rows_affected() == 1)
    }

    async fn release(&self, code: &str) -> Result<(), StoreError> {
        let timer = QueryTimer::new("release_invitation_code");
        let result = sqlx::query(
            r#"
            UPDATE invitation_codes
            SET redeemed_at = NULL
            WHERE code = $1 AND redeemed_by_rsvp_id IS NULL
            "#,
        )
        .bind(code)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|_| ()).map_err(store_error)
    }

    async fn bind_redeemer(&self, code: &str, invitee_rsvp_id: Uuid) -> Result<(), StoreError> {
        let timer = QueryTimer::new("bind_invitation_code_redeemer");
        let result = sqlx::query(
            r#"
            UPDATE invitation_codes
            SET redeemed_by_rsvp_id = $2
            WHERE code = $1
            "#,
        )
        .bind(code)
        .bind(invitee_rsvp_id)
        .execute(&self.pool)
        .await;
        timer.record();

        if result.map_err(store_error)?.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn count_redeemed_for_inviter(&self, inviter_rsvp_id: Uuid) -> Result<u64, StoreError> {
        let timer = QueryTimer::new("count_redeemed_invitation_codes");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM invitation_codes
            WHERE inviter_rsvp_id = $1 AND redeemed_at IS NOT NULL
            "#,
        )
        .bind(inviter_rsvp_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(result.map_err(store_error)?.max(0) as u64)
    }
}
