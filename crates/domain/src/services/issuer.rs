//! Invitation code issuance and redemption.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::RsvpError;
use crate::models::invitation::{generate_invitation_code, parse_invitation_code};
use crate::models::{InvitationCode, Redemption, Rsvp};
use crate::services::degree::assign_invitee_degree;
use crate::store::{InvitationCodeStore, RsvpStore, StoreError};

/// Default number of attempts to find an unused code.
pub const DEFAULT_CODE_GENERATION_ATTEMPTS: u32 = 10;

/// Issues single-use invitation codes and redeems them.
#[derive(Clone)]
pub struct InvitationIssuer {
    rsvps: Arc<dyn RsvpStore>,
    codes: Arc<dyn InvitationCodeStore>,
    max_attempts: u32,
}

impl InvitationIssuer {
    pub fn new(rsvps: Arc<dyn RsvpStore>, codes: Arc<dyn InvitationCodeStore>) -> Self {
        Self {
            rsvps,
            codes,
            max_attempts: DEFAULT_CODE_GENERATION_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Return the RSVP's current unredeemed code, generating one if it has none.
    ///
    /// Idempotent while the current code is unredeemed, including across
    /// concurrent callers: the store hands every caller the same live code.
    pub async fn issue(&self, rsvp_id: Uuid) -> Result<String, RsvpError> {
        let rsvp = self.rsvps.get(rsvp_id).await?;
        self.issue_for(&rsvp).await
    }

    /// Same as [`issue`](Self::issue) for an already loaded RSVP.
    pub async fn issue_for(&self, rsvp: &Rsvp) -> Result<String, RsvpError> {
        ensure_eligible(rsvp)?;

        if let Some(live) = self.codes.find_live_for_inviter(rsvp.id).await? {
            return self.show(rsvp, live.code).await;
        }

        for attempt in 1..=self.max_attempts {
            let candidate = generate_invitation_code();
            match self
                .codes
                .get_or_insert_live(&candidate, rsvp.party_id, rsvp.id)
                .await
            {
                Ok(record) => {
                    if record.code == candidate {
                        tracing::info!(
                            rsvp_id = %rsvp.id,
                            party_id = %rsvp.party_id,
                            degree = %rsvp.degree,
                            "Issued invitation code"
                        );
                    }
                    return self.show(rsvp, record.code).await;
                }
                Err(StoreError::Conflict(_)) => {
                    tracing::debug!(attempt, "Invitation code collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(exhausted())
    }

    /// Issue an additional code. Previously issued unredeemed codes stay valid.
    pub async fn rotate(&self, rsvp_id: Uuid) -> Result<String, RsvpError> {
        let rsvp = self.rsvps.get(rsvp_id).await?;
        ensure_eligible(&rsvp)?;
        self.mint(&rsvp).await
    }

    /// Look up a presented code without consuming it.
    pub async fn inspect(&self, raw_code: &str) -> Result<InvitationCode, RsvpError> {
        let code = parse_invitation_code(raw_code).ok_or(RsvpError::InvalidCode)?;
        let record = self
            .codes
            .find(&code)
            .await?
            .ok_or(RsvpError::InvalidCode)?;
        if record.is_redeemed() {
            return Err(RsvpError::AlreadyRedeemed);
        }
        Ok(record)
    }

    /// Validate and claim a presented code.
    ///
    /// Concurrent redemptions of the same code have exactly one winner; the
    /// others fail with `AlreadyRedeemed`. The winner must follow up with
    /// [`complete`](Self::complete) or [`release`](Self::release).
    pub async fn redeem(&self, raw_code: &str) -> Result<Redemption, RsvpError> {
        let record = self.inspect(raw_code).await?;

        let inviter = match self.rsvps.get(record.inviter_rsvp_id).await {
            Ok(inviter) => inviter,
            Err(StoreError::NotFound) => {
                tracing::warn!(
                    inviter_rsvp_id = %record.inviter_rsvp_id,
                    "Invitation code references a missing RSVP"
                );
                return Err(RsvpError::InvalidCode);
            }
            Err(e) => return Err(e.into()),
        };
        let invitee_degree = assign_invitee_degree(&inviter)?;

        if !self.codes.claim(&record.code).await? {
            tracing::debug!(inviter_rsvp_id = %inviter.id, "Lost invitation code redemption race");
            return Err(RsvpError::AlreadyRedeemed);
        }

        Ok(Redemption {
            code: record.code,
            inviter,
            invitee_degree,
        })
    }

    /// Give a claimed code back after the invitee's RSVP could not be created.
    pub async fn release(&self, redemption: &Redemption) -> Result<(), RsvpError> {
        self.codes.release(&redemption.code).await?;
        tracing::debug!(inviter_rsvp_id = %redemption.inviter.id, "Released invitation code");
        Ok(())
    }

    /// Bind a claimed code to its invitee and hand the inviter a fresh code.
    pub async fn complete(&self, redemption: &Redemption, invitee: &Rsvp) -> Result<(), RsvpError> {
        self.codes.bind_redeemer(&redemption.code, invitee.id).await?;
        self.issue_for(&redemption.inviter).await?;
        Ok(())
    }

    /// Whether any of this RSVP's codes has been redeemed.
    pub async fn has_redeemed_codes(&self, rsvp_id: Uuid) -> Result<bool, RsvpError> {
        Ok(self.codes.count_redeemed_for_inviter(rsvp_id).await? > 0)
    }

    /// Record `code` as the one displayed to the guest.
    async fn show(&self, rsvp: &Rsvp, code: String) -> Result<String, RsvpError> {
        if rsvp.invitation_code.as_deref() != Some(code.as_str()) {
            self.rsvps.set_invitation_code(rsvp.id, Some(&code)).await?;
        }
        Ok(code)
    }

    async fn mint(&self, rsvp: &Rsvp) -> Result<String, RsvpError> {
        for attempt in 1..=self.max_attempts {
            let code = generate_invitation_code();
            match self.codes.insert(&code, rsvp.party_id, rsvp.id).await {
                Ok(_) => {
                    self.rsvps.set_invitation_code(rsvp.id, Some(&code)).await?;
                    tracing::info!(
                        rsvp_id = %rsvp.id,
                        party_id = %rsvp.party_id,
                        degree = %rsvp.degree,
                        "Issued invitation code"
                    );
                    return Ok(code);
                }
                Err(StoreError::Conflict(_)) => {
                    tracing::debug!(attempt, "Invitation code collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(exhausted())
    }
}

fn exhausted() -> RsvpError {
    RsvpError::Conflict("Could not generate unique invitation code".into())
}

fn ensure_eligible(rsvp: &Rsvp) -> Result<(), RsvpError> {
    if !rsvp.is_attending {
        return Err(RsvpError::InviterNotAttending);
    }
    if !rsvp.degree.can_invite() {
        return Err(RsvpError::DegreeExceeded);
    }
    Ok(())
}
