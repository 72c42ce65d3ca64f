//! Shared fixtures for engine behaviour tests.
//!
//! Every test runs against a fresh in-memory store.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{Duration, Utc};
use domain::models::{InvitationCode, Party, SubmitRsvpRequest};
use domain::services::{EngineOptions, RsvpEngine};
use domain::store::{InMemoryStore, InvitationCodeStore, StoreError};
use fake::faker::name::en::Name;
use fake::Fake;
use uuid::Uuid;

pub struct TestEngine {
    pub store: Arc<InMemoryStore>,
    pub engine: RsvpEngine,
    pub party: Party,
}

pub async fn setup() -> TestEngine {
    setup_with_options(EngineOptions::default()).await
}

pub async fn setup_with_options(options: EngineOptions) -> TestEngine {
    let store = Arc::new(InMemoryStore::new());
    let party = test_party("SUMMER24");
    store.insert_party(party.clone()).await;
    let engine = RsvpEngine::in_memory(store.clone(), options);
    TestEngine {
        store,
        engine,
        party,
    }
}

/// Engine whose code index refuses new codes while `fail_inserts` is set.
pub struct FlakyEngine {
    pub store: Arc<InMemoryStore>,
    pub codes: Arc<FlakyCodeStore>,
    pub engine: RsvpEngine,
    pub party: Party,
}

pub async fn setup_flaky() -> FlakyEngine {
    let store = Arc::new(InMemoryStore::new());
    let party = test_party("SUMMER24");
    store.insert_party(party.clone()).await;
    let codes = Arc::new(FlakyCodeStore {
        inner: store.clone(),
        fail_inserts: AtomicBool::new(false),
    });
    let engine = RsvpEngine::new(
        store.clone(),
        codes.clone(),
        store.clone(),
        EngineOptions::default(),
    );
    FlakyEngine {
        store,
        codes,
        engine,
        party,
    }
}

pub struct FlakyCodeStore {
    inner: Arc<InMemoryStore>,
    fail_inserts: AtomicBool,
}

impl FlakyCodeStore {
    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl InvitationCodeStore for FlakyCodeStore {
    async fn insert(
        &self,
        code: &str,
        party_id: Uuid,
        inviter_rsvp_id: Uuid,
    ) -> Result<InvitationCode, StoreError> {
        self.check()?;
        self.inner.insert(code, party_id, inviter_rsvp_id).await
    }

    async fn get_or_insert_live(
        &self,
        candidate: &str,
        party_id: Uuid,
        inviter_rsvp_id: Uuid,
    ) -> Result<InvitationCode, StoreError> {
        self.check()?;
        self.inner
            .get_or_insert_live(candidate, party_id, inviter_rsvp_id)
            .await
    }

    async fn find(&self, code: &str) -> Result<Option<InvitationCode>, StoreError> {
        self.inner.find(code).await
    }

    async fn find_live_for_inviter(
        &self,
        inviter_rsvp_id: Uuid,
    ) -> Result<Option<InvitationCode>, StoreError> {
        self.inner.find_live_for_inviter(inviter_rsvp_id).await
    }

    async fn claim(&self, code: &str) -> Result<bool, StoreError> {
        self.inner.claim(code).await
    }

    async fn release(&self, code: &str) -> Result<(), StoreError> {
        self.inner.release(code).await
    }

    async fn bind_redeemer(&self, code: &str, invitee_rsvp_id: Uuid) -> Result<(), StoreError> {
        self.inner.bind_redeemer(code, invitee_rsvp_id).await
    }

    async fn count_redeemed_for_inviter(&self, inviter_rsvp_id: Uuid) -> Result<u64, StoreError> {
        self.inner.count_redeemed_for_inviter(inviter_rsvp_id).await
    }
}

pub fn test_party(invite_code: &str) -> Party {
    Party {
        id: Uuid::new_v4(),
        host_id: Uuid::new_v4(),
        name: "Summer Rooftop".to_string(),
        invite_code: invite_code.to_string(),
        starts_at: Utc::now() + Duration::days(14),
        started: false,
        created_at: Utc::now(),
    }
}

/// Attending guest with a generated name and the given 4-digit phone suffix.
pub fn attending(suffix: u16) -> SubmitRsvpRequest {
    guest(suffix, true)
}

pub fn declining(suffix: u16) -> SubmitRsvpRequest {
    guest(suffix, false)
}

fn guest(suffix: u16, is_attending: bool) -> SubmitRsvpRequest {
    let name: String = Name().fake();
    SubmitRsvpRequest::new(name, format!("(415) 555-{:04}", suffix), is_attending)
}
