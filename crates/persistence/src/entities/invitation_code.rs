//! Invitation code entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the invitation_codes table.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationCodeEntity {
    pub code: String,
    pub party_id: Uuid,
    pub inviter_rsvp_id: Uuid,
    pub redeemed_by_rsvp_id: Option<Uuid>,
    pub redeemed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<InvitationCodeEntity> for domain::models::InvitationCode {
    fn from(entity: InvitationCodeEntity) -> Self {
        Self {
            code: entity.code,
            party_id: entity.party_id,
            inviter_rsvp_id: entity.inviter_rsvp_id,
            redeemed_by_rsvp_id: entity.redeemed_by_rsvp_id,
            redeemed_at: entity.redeemed_at,
            created_at: entity.created_at,
        }
    }
}
