//! Party repository for database operations.
//!
//! Parties are created and started by the host-facing side; this repository
//! only reads them, apart from helpers used to seed test data.

use chrono::{DateTime, Utc};
use domain::models::{canonicalize_party_code, Party};
use domain::store::{PartyDirectory, StoreError};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::PartyEntity;
use crate::error::store_error;
use crate::metrics::QueryTimer;

/// Repository for party lookups.
#[derive(Clone)]
pub struct PartyRepository {
    pool: PgPool,
}

impl PartyRepository {
    /// Creates a new PartyRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert a party row. The invite code is stored in canonical form.
    pub async fn create_party(
        &self,
        host_id: Uuid,
        name: &str,
        invite_code: &str,
        starts_at: DateTime<Utc>,
    ) -> Result<Party, StoreError> {
        let timer = QueryTimer::new("create_party");
        let result = sqlx::query_as::<_, PartyEntity>(
            r#"
            INSERT INTO parties (host_id, name, invite_code, starts_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, host_id, name, invite_code, starts_at, started, created_at
            "#,
        )
        .bind(host_id)
        .bind(name)
        .bind(canonicalize_party_code(invite_code))
        .bind(starts_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result.map(Into::into).map_err(store_error)
    }

    /// Close the party to new RSVPs.
    pub async fn mark_started(&self, party_id: Uuid) -> Result<(), StoreError> {
        let timer = QueryTimer::new("mark_party_started");
        let result = sqlx::query("UPDATE parties SET started = true WHERE id = $1")
            .bind(party_id)
            .execute(&self.pool)
            .await;
        timer.record();

        if result.map_err(store_error)?.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl PartyDirectory for PartyRepository {
    async fn find_party(&self, party_id: Uuid) -> Result<Option<Party>, StoreError> {
        let timer = QueryTimer::new("find_party_by_id");
        let result = sqlx::query_as::<_, PartyEntity>(
            r#"
            SELECT id, host_id, name, invite_code, starts_at, started, created_at
            FROM parties
            WHERE id = $1
            "#,
        )
        .bind(party_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|e| e.map(Into::into)).map_err(store_error)
    }

    async fn find_party_by_invite_code(
        &self,
        invite_code: &str,
    ) -> Result<Option<Party>, StoreError> {
        let timer = QueryTimer::new("find_party_by_invite_code");
        let result = sqlx::query_as::<_, PartyEntity>(
            r#"
            SELECT id, host_id, name, invite_code, starts_at, started, created_at
            FROM parties
            WHERE invite_code = $1
            "#,
        )
        .bind(invite_code)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|e| e.map(Into::into)).map_err(store_error)
    }
}
