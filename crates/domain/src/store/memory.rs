//! In-memory store for development and testing.
//!
//! All state lives behind one lock, so every operation is trivially
//! linearizable. Instances are constructed explicitly and shared via `Arc`.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{InvitationCodeStore, PartyDirectory, RsvpStore, StoreError};
use crate::models::{InvitationCode, NewRsvp, Party, Rsvp};

#[derive(Debug, Default)]
struct State {
    parties: HashMap<Uuid, Party>,
    rsvps: HashMap<Uuid, Rsvp>,
    /// RSVP ids in insertion order.
    order: Vec<Uuid>,
    /// (party_id, normalized contact) pairs already used.
    contacts: HashSet<(Uuid, String)>,
    codes: HashMap<String, InvitationCode>,
    /// Code strings in insertion order.
    code_order: Vec<String>,
}

impl State {
    fn live_code(&self, inviter_rsvp_id: Uuid) -> Option<&InvitationCode> {
        self.code_order
            .iter()
            .rev()
            .filter_map(|code| self.codes.get(code))
            .find(|c| c.inviter_rsvp_id == inviter_rsvp_id && !c.is_redeemed())
    }

    fn insert_code(
        &mut self,
        code: &str,
        party_id: Uuid,
        inviter_rsvp_id: Uuid,
    ) -> Result<InvitationCode, StoreError> {
        if self.codes.contains_key(code) {
            return Err(StoreError::Conflict("Invitation code already exists".into()));
        }
        let record = InvitationCode {
            code: code.to_string(),
            party_id,
            inviter_rsvp_id,
            redeemed_by_rsvp_id: None,
            redeemed_at: None,
            created_at: Utc::now(),
        };
        self.code_order.push(record.code.clone());
        self.codes.insert(record.code.clone(), record.clone());
        Ok(record)
    }
}

/// Store backed by in-process hash maps.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a party (parties are created outside the engine).
    pub async fn insert_party(&self, party: Party) {
        let mut state = self.state.write().await;
        state.parties.insert(party.id, party);
    }

    /// Flag a party as started.
    pub async fn mark_party_started(&self, party_id: Uuid) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let party = state.parties.get_mut(&party_id).ok_or(StoreError::NotFound)?;
        party.started = true;
        Ok(())
    }
}

#[async_trait::async_trait]
impl RsvpStore for InMemoryStore {
    async fn create(&self, rsvp: NewRsvp) -> Result<Rsvp, StoreError> {
        let mut state = self.state.write().await;

        let key = (rsvp.party_id, rsvp.guest_contact.clone());
        if state.contacts.contains(&key) {
            return Err(StoreError::Conflict(
                "Guest has already responded to this party".into(),
            ));
        }

        let is_confirmed = rsvp.initially_confirmed();
        let record = Rsvp {
            id: Uuid::new_v4(),
            party_id: rsvp.party_id,
            guest_name: rsvp.guest_name,
            guest_contact: rsvp.guest_contact,
            is_attending: rsvp.is_attending,
            degree: rsvp.degree,
            invited_by_rsvp_id: rsvp.invited_by_rsvp_id,
            invitation_code: None,
            is_confirmed,
            confirmed_by_rsvp_id: None,
            confirmed_at: None,
            created_at: Utc::now(),
        };

        state.contacts.insert(key);
        state.order.push(record.id);
        state.rsvps.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Rsvp, StoreError> {
        let state = self.state.read().await;
        state.rsvps.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn list_by_party(&self, party_id: Uuid) -> Result<Vec<Rsvp>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.rsvps.get(id))
            .filter(|r| r.party_id == party_id)
            .cloned()
            .collect())
    }

    async fn list_children(&self, parent_id: Uuid) -> Result<Vec<Rsvp>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.rsvps.get(id))
            .filter(|r| r.invited_by_rsvp_id == Some(parent_id))
            .cloned()
            .collect())
    }

    async fn compare_and_swap_confirmation(
        &self,
        id: Uuid,
        confirmed_by: Uuid,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        let rsvp = state.rsvps.get_mut(&id).ok_or(StoreError::NotFound)?;
        if rsvp.is_confirmed {
            return Ok(false);
        }
        rsvp.is_confirmed = true;
        rsvp.confirmed_by_rsvp_id = Some(confirmed_by);
        rsvp.confirmed_at = Some(Utc::now());
        Ok(true)
    }

    async fn set_invitation_code(&self, id: Uuid, code: Option<&str>) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let rsvp = state.rsvps.get_mut(&id).ok_or(StoreError::NotFound)?;
        rsvp.invitation_code = code.map(str::to_string);
        Ok(())
    }
}

#[async_trait::async_trait]
impl InvitationCodeStore for InMemoryStore {
    async fn insert(
        &self,
        code: &str,
        party_id: Uuid,
        inviter_rsvp_id: Uuid,
    ) -> Result<InvitationCode, StoreError> {
        let mut state = self.state.write().await;
        state.insert_code(code, party_id, inviter_rsvp_id)
    }

    async fn get_or_insert_live(
        &self,
        candidate: &str,
        party_id: Uuid,
        inviter_rsvp_id: Uuid,
    ) -> Result<InvitationCode, StoreError> {
        let mut state = self.state.write().await;
        if let Some(live) = state.live_code(inviter_rsvp_id) {
            return Ok(live.clone());
        }
        state.insert_code(candidate, party_id, inviter_rsvp_id)
    }

    async fn find(&self, code: &str) -> Result<Option<InvitationCode>, StoreError> {
        let state = self.state.read().await;
        Ok(state.codes.get(code).cloned())
    }

    async fn find_live_for_inviter(
        &self,
        inviter_rsvp_id: Uuid,
    ) -> Result<Option<InvitationCode>, StoreError> {
        let state = self.state.read().await;
        Ok(state.live_code(inviter_rsvp_id).cloned())
    }

    async fn claim(&self, code: &str) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        match state.codes.get_mut(code) {
            Some(record) if !record.is_redeemed() => {
                record.redeemed_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release(&self, code: &str) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if let Some(record) = state.codes.get_mut(code) {
            if record.redeemed_by_rsvp_id.is_none() {
                record.redeemed_at = None;
            }
        }
        Ok(())
    }

    async fn bind_redeemer(&self, code: &str, invitee_rsvp_id: Uuid) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let record = state.codes.get_mut(code).ok_or(StoreError::NotFound)?;
        record.redeemed_by_rsvp_id = Some(invitee_rsvp_id);
        Ok(())
    }

    async fn count_redeemed_for_inviter(&self, inviter_rsvp_id: Uuid) -> Result<u64, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .codes
            .values()
            .filter(|c| c.inviter_rsvp_id == inviter_rsvp_id && c.is_redeemed())
            .count() as u64)
    }
}

#[async_trait::async_trait]
impl PartyDirectory for InMemoryStore {
    async fn find_party(&self, party_id: Uuid) -> Result<Option<Party>, StoreError> {
        let state = self.state.read().await;
        Ok(state.parties.get(&party_id).cloned())
    }

    async fn find_party_by_invite_code(
        &self,
        invite_code: &str,
    ) -> Result<Option<Party>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .parties
            .values()
            .find(|p| p.invite_code == invite_code)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Degree;
    use std::sync::Arc;

    fn new_rsvp(party_id: Uuid, contact: &str, degree: Degree, parent: Option<Uuid>) -> NewRsvp {
        NewRsvp {
            party_id,
            guest_name: "Guest".to_string(),
            guest_contact: contact.to_string(),
            is_attending: true,
            degree,
            invited_by_rsvp_id: parent,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_contact() {
        let store = InMemoryStore::new();
        let party_id = Uuid::new_v4();
        store
            .create(new_rsvp(party_id, "+15551234567", Degree::ROOT, None))
            .await
            .unwrap();
        let err = store
            .create(new_rsvp(party_id, "+15551234567", Degree::ROOT, None))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // Same contact at another party is fine.
        assert!(store
            .create(new_rsvp(Uuid::new_v4(), "+15551234567", Degree::ROOT, None))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let store = InMemoryStore::new();
        assert_eq!(
            store.get(Uuid::new_v4()).await.unwrap_err(),
            StoreError::NotFound
        );
    }

    #[tokio::test]
    async fn test_list_preserves_creation_order() {
        let store = InMemoryStore::new();
        let party_id = Uuid::new_v4();
        let mut ids = Vec::new();
        for i in 0..5 {
            let r = store
                .create(new_rsvp(party_id, &format!("+1555000000{}", i), Degree::ROOT, None))
                .await
                .unwrap();
            ids.push(r.id);
        }
        let listed: Vec<Uuid> = store
            .list_by_party(party_id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn test_cas_only_succeeds_once() {
        let store = InMemoryStore::new();
        let parent = store
            .create(new_rsvp(Uuid::new_v4(), "+15551234567", Degree::ROOT, None))
            .await
            .unwrap();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        assert!(store.compare_and_swap_confirmation(parent.id, first).await.unwrap());
        assert!(!store.compare_and_swap_confirmation(parent.id, second).await.unwrap());

        let parent = store.get(parent.id).await.unwrap();
        assert!(parent.is_confirmed);
        assert_eq!(parent.confirmed_by_rsvp_id, Some(first));
        assert!(parent.confirmed_at.is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_claims_have_single_winner() {
        let store = Arc::new(InMemoryStore::new());
        store
            .insert("ABCD-EFGH-JKMN", Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.claim("ABCD-EFGH-JKMN").await.unwrap() })
            })
            .collect();

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
    }

    #[tokio::test]
    async fn test_release_only_undoes_unbound_claims() {
        let store = InMemoryStore::new();
        let inviter = Uuid::new_v4();
        store.insert("AAAA-BBBB-CCCC", Uuid::new_v4(), inviter).await.unwrap();
        store.insert("DDDD-EEEE-FFFF", Uuid::new_v4(), inviter).await.unwrap();

        assert!(store.claim("AAAA-BBBB-CCCC").await.unwrap());
        store.release("AAAA-BBBB-CCCC").await.unwrap();
        assert!(!store.find("AAAA-BBBB-CCCC").await.unwrap().unwrap().is_redeemed());

        assert!(store.claim("DDDD-EEEE-FFFF").await.unwrap());
        store.bind_redeemer("DDDD-EEEE-FFFF", Uuid::new_v4()).await.unwrap();
        store.release("DDDD-EEEE-FFFF").await.unwrap();
        assert!(store.find("DDDD-EEEE-FFFF").await.unwrap().unwrap().is_redeemed());
        assert_eq!(store.count_redeemed_for_inviter(inviter).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_live_for_inviter_returns_latest_unredeemed() {
        let store = InMemoryStore::new();
        let inviter = Uuid::new_v4();
        let party = Uuid::new_v4();
        store.insert("AAAA-BBBB-CCCC", party, inviter).await.unwrap();
        store.insert("DDDD-EEEE-FFFF", party, inviter).await.unwrap();

        let live = store.find_live_for_inviter(inviter).await.unwrap().unwrap();
        assert_eq!(live.code, "DDDD-EEEE-FFFF");

        store.claim("DDDD-EEEE-FFFF").await.unwrap();
        let live = store.find_live_for_inviter(inviter).await.unwrap().unwrap();
        assert_eq!(live.code, "AAAA-BBBB-CCCC");

        store.claim("AAAA-BBBB-CCCC").await.unwrap();
        assert!(store.find_live_for_inviter(inviter).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_or_insert_live_keeps_existing_code() {
        let store = InMemoryStore::new();
        let inviter = Uuid::new_v4();
        let party = Uuid::new_v4();

        let first = store.get_or_insert_live("AAAA-BBBB-CCCC", party, inviter).await.unwrap();
        assert_eq!(first.code, "AAAA-BBBB-CCCC");
        let again = store.get_or_insert_live("DDDD-EEEE-FFFF", party, inviter).await.unwrap();
        assert_eq!(again.code, "AAAA-BBBB-CCCC");
        assert!(store.find("DDDD-EEEE-FFFF").await.unwrap().is_none());

        store.claim("AAAA-BBBB-CCCC").await.unwrap();
        let fresh = store.get_or_insert_live("DDDD-EEEE-FFFF", party, inviter).await.unwrap();
        assert_eq!(fresh.code, "DDDD-EEEE-FFFF");

        // A candidate taken by another inviter is a collision.
        let err = store
            .get_or_insert_live("DDDD-EEEE-FFFF", party, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_insert_duplicate_code_conflicts() {
        let store = InMemoryStore::new();
        store.insert("AAAA-BBBB-CCCC", Uuid::new_v4(), Uuid::new_v4()).await.unwrap();
        let err = store
            .insert("AAAA-BBBB-CCCC", Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }
}
