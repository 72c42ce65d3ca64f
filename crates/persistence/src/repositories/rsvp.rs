//! RSVP repository for database operations.

use domain::models::{NewRsvp, Rsvp};
use domain::store::{RsvpStore, StoreError};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::RsvpEntity;
use crate::error::store_error;
use crate::metrics::QueryTimer;

/// Repository for RSVP records.
#[derive(Clone)]
pub struct RsvpRepository {
    pool: PgPool,
}

impl RsvpRepository {
    /// Creates a new RsvpRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn exists(&self, id: Uuid) -> Result<bool, StoreError> {
        let timer = QueryTimer::new("rsvp_exists");
        let result = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM rsvps WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result.map_err(store_error)
    }
}

fn into_domain(entities: Vec<RsvpEntity>) -> Result<Vec<Rsvp>, StoreError> {
    entities.into_iter().map(Rsvp::try_from).collect()
}

#[async_trait::async_trait]
impl RsvpStore for RsvpRepository {
    async fn create(&self, rsvp: NewRsvp) -> Result<Rsvp, StoreError> {
        let is_confirmed = rsvp.initially_confirmed();
        let timer = QueryTimer::new("create_rsvp");
        let result = sqlx::query_as::<_, RsvpEntity>(
            r#"
            INSERT INTO rsvps (party_id, guest_name, guest_contact, is_attending, degree, invited_by_rsvp_id, is_confirmed)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, party_id, guest_name, guest_contact, is_attending, degree, invited_by_rsvp_id,
                      invitation_code, is_confirmed, confirmed_by_rsvp_id, confirmed_at, created_at
            "#,
        )
        .bind(rsvp.party_id)
        .bind(&rsvp.guest_name)
        .bind(&rsvp.guest_contact)
        .bind(rsvp.is_attending)
        .bind(i16::from(rsvp.degree))
        .bind(rsvp.invited_by_rsvp_id)
        .bind(is_confirmed)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result.map_err(store_error)?.try_into()
    }

    async fn get(&self, id: Uuid) -> Result<Rsvp, StoreError> {
        let timer = QueryTimer::new("find_rsvp_by_id");
        let result = sqlx::query_as::<_, RsvpEntity>(
            r#"
            SELECT id, party_id, guest_name, guest_contact, is_attending, degree, invited_by_rsvp_id,
                   invitation_code, is_confirmed, confirmed_by_rsvp_id, confirmed_at, created_at
            FROM rsvps
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
            .map_err(store_error)?
            .ok_or(StoreError::NotFound)?
            .try_into()
    }

    async fn list_by_party(&self, party_id: Uuid) -> Result<Vec<Rsvp>, StoreError> {
        let timer = QueryTimer::new("list_rsvps_by_party");
        let result = sqlx::query_as::<_, RsvpEntity>(
            r#"
            SELECT id, party_id, guest_name, guest_contact, is_attending, degree, invited_by_rsvp_id,
                   invitation_code, is_confirmed, confirmed_by_rsvp_id, confirmed_at, created_at
            FROM rsvps
            WHERE party_id = $1
            ORDER BY seq
            "#,
        )
        .bind(party_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        into_domain(result.map_err(store_error)?)
    }

    async fn list_children(&self, parent_id: Uuid) -> Result<Vec<Rsvp>, StoreError> {
        let timer = QueryTimer::new("list_rsvp_children");
        let result = sqlx::query_as::<_, RsvpEntity>(
            r#"
            SELECT id, party_id, guest_name, guest_contact, is_attending, degree, invited_by_rsvp_id,
                   invitation_code, is_confirmed, confirmed_by_rsvp_id, confirmed_at, created_at
            FROM rsvps
            WHERE invited_by_rsvp_id = $1
            ORDER BY seq
            "#,
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        into_domain(result.map_err(store_error)?)
    }

    async fn compare_and_swap_confirmation(
        &self,
        id: Uuid,
        confirmed_by: Uuid,
    ) -> Result<bool, StoreError> {
        let timer = QueryTimer::new("confirm_rsvp");
        let result = sqlx::query(
            r#"
            UPDATE rsvps
            SET is_confirmed = true, confirmed_by_rsvp_id = $2, confirmed_at = NOW()
            WHERE id = $1 AND is_confirmed = false
            "#,
        )
        .bind(id)
        .bind(confirmed_by)
        .execute(&self.pool)
        .await;
        timer.record();

        if result.map_err(store_error)?.rows_affected() == 1 {
            return Ok(true);
        }
        if !self.exists(id).await? {
            return Err(StoreError::NotFound);
        }
        Ok(false)
    }

    async fn set_invitation_code(&self, id: Uuid, code: Option<&str>) -> Result<(), StoreError> {
        let timer = QueryTimer::new("set_rsvp_invitation_code");
        let result = sqlx::query("UPDATE rsvps SET invitation_code = $2 WHERE id = $1")
            .bind(id)
            .bind(code)
            .execute(&self.pool)
            .await;
        timer.record();

        if result.map_err(store_error)?.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
