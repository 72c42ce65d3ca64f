//! Party domain model.
//!
//! Parties are owned by the host-facing side of the system; the engine only
//! reads them to check existence and whether RSVPs are still accepted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An event that guests respond to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Party {
    pub id: Uuid,
    pub host_id: Uuid,
    pub name: String,
    /// Public, reusable code identifying the party in shared links.
    pub invite_code: String,
    pub starts_at: DateTime<Utc>,
    /// Set by the host to close RSVPs before `starts_at`.
    pub started: bool,
    pub created_at: DateTime<Utc>,
}

impl Party {
    /// Returns true once the party no longer accepts RSVPs.
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.started || now >= self.starts_at
    }
}

/// Canonical form of a party's public invite code: trimmed and upper-cased.
///
/// Party codes are stored in this form and looked up by exact match.
pub fn canonicalize_party_code(raw: &str) -> String {
    shared::codes::canonicalize_code(raw)
}

/// Minimal party info embedded in guest-facing projections.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PartyInfo {
    pub id: Uuid,
    pub name: String,
    pub invite_code: String,
    pub starts_at: DateTime<Utc>,
}

impl From<&Party> for PartyInfo {
    fn from(party: &Party) -> Self {
        Self {
            id: party.id,
            name: party.name.clone(),
            invite_code: party.invite_code.clone(),
            starts_at: party.starts_at,
        }
    }
}
