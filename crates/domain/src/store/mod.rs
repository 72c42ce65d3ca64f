//! Storage ports used by the engine services.
//!
//! The engine never talks to a database directly. It is handed explicit store
//! instances implementing these traits: PostgreSQL repositories in production,
//! [`InMemoryStore`] for development and tests.

use thiserror::Error;
use uuid::Uuid;

use crate::models::{InvitationCode, NewRsvp, Party, Rsvp};

pub mod memory;

pub use memory::InMemoryStore;

/// Failures reported by a storage backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    /// A uniqueness constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Durable keyed storage for RSVP records.
#[async_trait::async_trait]
pub trait RsvpStore: Send + Sync {
    /// Insert a new RSVP. Fails with `Conflict` if the party already has an
    /// RSVP for the same contact.
    async fn create(&self, rsvp: NewRsvp) -> Result<Rsvp, StoreError>;

    /// Fetch an RSVP by id. Fails with `NotFound` for unknown ids.
    async fn get(&self, id: Uuid) -> Result<Rsvp, StoreError>;

    /// All RSVPs of a party in creation order.
    async fn list_by_party(&self, party_id: Uuid) -> Result<Vec<Rsvp>, StoreError>;

    /// Direct invitees of an RSVP in creation order.
    async fn list_children(&self, parent_id: Uuid) -> Result<Vec<Rsvp>, StoreError>;

    /// Atomically set `is_confirmed = true` and `confirmed_by_rsvp_id` if and
    /// only if the RSVP is currently unconfirmed. Returns whether this call
    /// performed the swap. Linearizable per RSVP id.
    async fn compare_and_swap_confirmation(
        &self,
        id: Uuid,
        confirmed_by: Uuid,
    ) -> Result<bool, StoreError>;

    /// Record the code currently shown to the guest.
    async fn set_invitation_code(&self, id: Uuid, code: Option<&str>) -> Result<(), StoreError>;
}

/// Index of issued invitation codes.
#[async_trait::async_trait]
pub trait InvitationCodeStore: Send + Sync {
    /// Store a freshly generated code. Fails with `Conflict` if the code
    /// already exists.
    async fn insert(
        &self,
        code: &str,
        party_id: Uuid,
        inviter_rsvp_id: Uuid,
    ) -> Result<InvitationCode, StoreError>;

    /// Atomically return the inviter's most recent unredeemed code, or store
    /// `candidate` as a new code if the inviter has none. Concurrent calls for
    /// the same inviter observe a single live code. Fails with `Conflict` if
    /// `candidate` collides with an existing code.
    async fn get_or_insert_live(
        &self,
        candidate: &str,
        party_id: Uuid,
        inviter_rsvp_id: Uuid,
    ) -> Result<InvitationCode, StoreError>;

    async fn find(&self, code: &str) -> Result<Option<InvitationCode>, StoreError>;

    /// Most recently issued unredeemed code of an inviter.
    async fn find_live_for_inviter(
        &self,
        inviter_rsvp_id: Uuid,
    ) -> Result<Option<InvitationCode>, StoreError>;

    /// Atomically mark an unredeemed code as redeemed. Returns false if the
    /// code was already redeemed (or does not exist). Only one concurrent
    /// caller can win for a given code.
    async fn claim(&self, code: &str) -> Result<bool, StoreError>;

    /// Undo a claim whose invitee RSVP could not be created.
    async fn release(&self, code: &str) -> Result<(), StoreError>;

    /// Bind a claimed code to the invitee RSVP created from it.
    async fn bind_redeemer(&self, code: &str, invitee_rsvp_id: Uuid) -> Result<(), StoreError>;

    /// Number of an inviter's codes that have been redeemed.
    async fn count_redeemed_for_inviter(&self, inviter_rsvp_id: Uuid) -> Result<u64, StoreError>;
}

/// Read access to parties, which are managed outside the engine.
#[async_trait::async_trait]
pub trait PartyDirectory: Send + Sync {
    async fn find_party(&self, party_id: Uuid) -> Result<Option<Party>, StoreError>;

    /// Resolve a party's public invite code by exact match. Callers pass
    /// the canonical (upper-case) form.
    async fn find_party_by_invite_code(&self, invite_code: &str)
        -> Result<Option<Party>, StoreError>;
}
