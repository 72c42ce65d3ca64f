//! Party entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the parties table.
#[derive(Debug, Clone, FromRow)]
pub struct PartyEntity {
    pub id: Uuid,
    pub host_id: Uuid,
    pub name: String,
    pub invite_code: String,
    pub starts_at: DateTime<Utc>,
    pub started: bool,
    pub created_at: DateTime<Utc>,
}

impl From<PartyEntity> for domain::models::Party {
    fn from(entity: PartyEntity) -> Self {
        Self {
            id: entity.id,
            host_id: entity.host_id,
            name: entity.name,
            invite_code: entity.invite_code,
            starts_at: entity.starts_at,
            started: entity.started,
            created_at: entity.created_at,
        }
    }
}
