//! RSVP engine facade.
//!
//! Entry point for the transport layer: submits root and chained RSVPs and
//! serves the read-only projections. All state lives in the injected stores.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::error::RsvpError;
use crate::models::{
    canonicalize_party_code, GuestView, NewRsvp, Party, PartySummary, Rsvp, SubmitRsvpRequest,
};
use crate::services::degree::assign_root_degree;
use crate::services::issuer::{InvitationIssuer, DEFAULT_CODE_GENERATION_ATTEMPTS};
use crate::services::propagation::ConfirmationPropagator;
use crate::services::query::QueryFacade;
use crate::store::{InMemoryStore, InvitationCodeStore, PartyDirectory, RsvpStore};

/// Tunables for the engine.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub max_guest_name_length: usize,
    pub code_generation_attempts: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_guest_name_length: shared::validation::DEFAULT_MAX_GUEST_NAME_LENGTH,
            code_generation_attempts: DEFAULT_CODE_GENERATION_ATTEMPTS,
        }
    }
}

/// Validated, normalized guest input.
struct GuestInput {
    name: String,
    contact: String,
    is_attending: bool,
}

#[derive(Clone)]
pub struct RsvpEngine {
    rsvps: Arc<dyn RsvpStore>,
    parties: Arc<dyn PartyDirectory>,
    issuer: InvitationIssuer,
    propagator: ConfirmationPropagator,
    query: QueryFacade,
    options: EngineOptions,
}

impl RsvpEngine {
    pub fn new(
        rsvps: Arc<dyn RsvpStore>,
        codes: Arc<dyn InvitationCodeStore>,
        parties: Arc<dyn PartyDirectory>,
        options: EngineOptions,
    ) -> Self {
        let issuer = InvitationIssuer::new(rsvps.clone(), codes.clone())
            .with_max_attempts(options.code_generation_attempts);
        let propagator = ConfirmationPropagator::new(rsvps.clone());
        let query = QueryFacade::new(rsvps.clone(), codes, parties.clone());

        Self {
            rsvps,
            parties,
            issuer,
            propagator,
            query,
            options,
        }
    }

    /// Engine backed entirely by one in-memory store.
    pub fn in_memory(store: Arc<InMemoryStore>, options: EngineOptions) -> Self {
        Self::new(store.clone(), store.clone(), store, options)
    }

    pub fn issuer(&self) -> &InvitationIssuer {
        &self.issuer
    }

    pub fn query(&self) -> &QueryFacade {
        &self.query
    }

    /// Direct or root-link submission at degree 1.
    pub async fn submit_root_rsvp(
        &self,
        party_id: Uuid,
        request: SubmitRsvpRequest,
    ) -> Result<Rsvp, RsvpError> {
        let input = self.prepare(&request)?;
        let party = self.open_party(party_id).await?;
        self.create_root(&party, input).await
    }

    /// Root submission addressed by the party's public invite code.
    pub async fn submit_root_rsvp_by_party_code(
        &self,
        party_invite_code: &str,
        request: SubmitRsvpRequest,
    ) -> Result<Rsvp, RsvpError> {
        let input = self.prepare(&request)?;
        let party = self
            .parties
            .find_party_by_invite_code(&canonicalize_party_code(party_invite_code))
            .await?
            .ok_or_else(|| RsvpError::NotFound("Party".into()))?;
        ensure_open(&party)?;
        self.create_root(&party, input).await
    }

    /// Submission through a guest's invitation code, one degree deeper than
    /// the inviter. An attending submission may confirm the inviter.
    pub async fn submit_chained_rsvp(
        &self,
        invitation_code: &str,
        request: SubmitRsvpRequest,
    ) -> Result<Rsvp, RsvpError> {
        let input = self.prepare(&request)?;

        let record = self.issuer.inspect(invitation_code).await?;
        self.open_party(record.party_id).await?;

        let redemption = self.issuer.redeem(invitation_code).await?;
        let inviter = &redemption.inviter;

        let new = NewRsvp {
            party_id: inviter.party_id,
            guest_name: input.name,
            guest_contact: input.contact,
            is_attending: input.is_attending,
            degree: redemption.invitee_degree,
            invited_by_rsvp_id: Some(inviter.id),
        };

        let rsvp = match self.rsvps.create(new).await {
            Ok(rsvp) => rsvp,
            Err(err) => {
                if let Err(release_err) = self.issuer.release(&redemption).await {
                    tracing::error!(
                        inviter_rsvp_id = %inviter.id,
                        error = %release_err,
                        "Failed to release invitation code"
                    );
                }
                return Err(err.into());
            }
        };

        tracing::info!(
            rsvp_id = %rsvp.id,
            party_id = %rsvp.party_id,
            inviter_rsvp_id = %inviter.id,
            degree = %rsvp.degree,
            is_attending = rsvp.is_attending,
            "Created chained RSVP"
        );

        // The RSVP exists from here on; later steps never fail the submission
        // except confirming the inviter.
        if rsvp.is_attending {
            self.propagator.propagate(&rsvp).await?;
        }

        if let Err(err) = self.issuer.complete(&redemption, &rsvp).await {
            tracing::warn!(
                rsvp_id = %rsvp.id,
                inviter_rsvp_id = %inviter.id,
                error = %err,
                "Failed to rotate inviter's invitation code"
            );
        }

        Ok(self.finish(rsvp).await)
    }

    pub async fn get_rsvp(&self, id: Uuid) -> Result<Rsvp, RsvpError> {
        self.query.get_rsvp(id).await
    }

    pub async fn list_party_rsvps(&self, party_id: Uuid) -> Result<Vec<Rsvp>, RsvpError> {
        self.query.list_party_rsvps(party_id).await
    }

    pub async fn get_guest_view(&self, id: Uuid) -> Result<GuestView, RsvpError> {
        self.query.guest_view(id).await
    }

    pub async fn get_party_summary(&self, party_id: Uuid) -> Result<PartySummary, RsvpError> {
        self.query.party_summary(party_id).await
    }

    /// Current invitation code of an RSVP. Idempotent.
    pub async fn issue_invitation(&self, rsvp_id: Uuid) -> Result<String, RsvpError> {
        self.issuer.issue(rsvp_id).await
    }

    async fn create_root(&self, party: &Party, input: GuestInput) -> Result<Rsvp, RsvpError> {
        let rsvp = self
            .rsvps
            .create(NewRsvp {
                party_id: party.id,
                guest_name: input.name,
                guest_contact: input.contact,
                is_attending: input.is_attending,
                degree: assign_root_degree(),
                invited_by_rsvp_id: None,
            })
            .await?;

        tracing::info!(
            rsvp_id = %rsvp.id,
            party_id = %rsvp.party_id,
            is_attending = rsvp.is_attending,
            "Created root RSVP"
        );

        Ok(self.finish(rsvp).await)
    }

    /// Hand eligible new RSVPs their invitation code. A failed issue leaves
    /// the code unset; `issue_invitation` can be retried later.
    async fn finish(&self, mut rsvp: Rsvp) -> Rsvp {
        if rsvp.can_invite() {
            match self.issuer.issue_for(&rsvp).await {
                Ok(code) => rsvp.invitation_code = Some(code),
                Err(err) => tracing::warn!(
                    rsvp_id = %rsvp.id,
                    error = %err,
                    "Failed to issue invitation code"
                ),
            }
        }
        rsvp
    }

    async fn open_party(&self, party_id: Uuid) -> Result<Party, RsvpError> {
        let party = self
            .parties
            .find_party(party_id)
            .await?
            .ok_or_else(|| RsvpError::NotFound("Party".into()))?;
        ensure_open(&party)?;
        Ok(party)
    }

    fn prepare(&self, request: &SubmitRsvpRequest) -> Result<GuestInput, RsvpError> {
        request.validate()?;

        let name = request.guest_name.trim();
        shared::validation::validate_guest_name_with_limit(name, self.options.max_guest_name_length)
            .map_err(validation_message)?;
        let contact = shared::contact::normalize_contact(&request.guest_contact)
            .map_err(validation_message)?;

        Ok(GuestInput {
            name: name.to_string(),
            contact,
            is_attending: request.is_attending,
        })
    }
}

fn ensure_open(party: &Party) -> Result<(), RsvpError> {
    if party.has_started(Utc::now()) {
        return Err(RsvpError::PartyStarted);
    }
    Ok(())
}

fn validation_message(err: validator::ValidationError) -> RsvpError {
    RsvpError::Validation(
        err.message
            .map(|m| m.to_string())
            .unwrap_or_else(|| err.code.to_string()),
    )
}
