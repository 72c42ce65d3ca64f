//! RSVP entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Degree, Rsvp};
use domain::store::StoreError;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the rsvps table.
#[derive(Debug, Clone, FromRow)]
pub struct RsvpEntity {
    pub id: Uuid,
    pub party_id: Uuid,
    pub guest_name: String,
    pub guest_contact: String,
    pub is_attending: bool,
    pub degree: i16,
    pub invited_by_rsvp_id: Option<Uuid>,
    pub invitation_code: Option<String>,
    pub is_confirmed: bool,
    pub confirmed_by_rsvp_id: Option<Uuid>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<RsvpEntity> for Rsvp {
    type Error = StoreError;

    fn try_from(entity: RsvpEntity) -> Result<Self, Self::Error> {
        let degree = Degree::try_from(entity.degree).map_err(StoreError::Backend)?;
        Ok(Self {
            id: entity.id,
            party_id: entity.party_id,
            guest_name: entity.guest_name,
            guest_contact: entity.guest_contact,
            is_attending: entity.is_attending,
            degree,
            invited_by_rsvp_id: entity.invited_by_rsvp_id,
            invitation_code: entity.invitation_code,
            is_confirmed: entity.is_confirmed,
            confirmed_by_rsvp_id: entity.confirmed_by_rsvp_id,
            confirmed_at: entity.confirmed_at,
            created_at: entity.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(degree: i16) -> RsvpEntity {
        RsvpEntity {
            id: Uuid::new_v4(),
            party_id: Uuid::new_v4(),
            guest_name: "Ada".to_string(),
            guest_contact: "+15551234567".to_string(),
            is_attending: true,
            degree,
            invited_by_rsvp_id: None,
            invitation_code: Some("ABCD-EFGH-JKMN".to_string()),
            is_confirmed: false,
            confirmed_by_rsvp_id: None,
            confirmed_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_entity_to_domain() {
        let rsvp = Rsvp::try_from(entity(2)).unwrap();
        assert_eq!(rsvp.degree.get(), 2);
        assert_eq!(rsvp.invitation_code.as_deref(), Some("ABCD-EFGH-JKMN"));
    }

    #[test]
    fn test_entity_with_corrupt_degree() {
        assert!(matches!(
            Rsvp::try_from(entity(9)),
            Err(StoreError::Backend(_))
        ));
    }
}
