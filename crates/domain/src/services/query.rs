//! Read-only projections over current store state.
//!
//! Nothing here mutates state or caches results.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::RsvpError;
use crate::models::invitation::invitation_url_fragment;
use crate::models::{
    ConfirmerInfo, Degree, DegreeCount, GuestListEntry, GuestView, InvitationEdge, InvitationLink,
    Party, PartyInfo, PartySummary, Rsvp, RsvpStatus,
};
use crate::store::{InvitationCodeStore, PartyDirectory, RsvpStore, StoreError};

#[derive(Clone)]
pub struct QueryFacade {
    rsvps: Arc<dyn RsvpStore>,
    codes: Arc<dyn InvitationCodeStore>,
    parties: Arc<dyn PartyDirectory>,
}

impl QueryFacade {
    pub fn new(
        rsvps: Arc<dyn RsvpStore>,
        codes: Arc<dyn InvitationCodeStore>,
        parties: Arc<dyn PartyDirectory>,
    ) -> Self {
        Self {
            rsvps,
            codes,
            parties,
        }
    }

    pub async fn get_rsvp(&self, id: Uuid) -> Result<Rsvp, RsvpError> {
        self.rsvps.get(id).await.map_err(|e| not_found(e, "RSVP"))
    }

    pub async fn list_party_rsvps(&self, party_id: Uuid) -> Result<Vec<Rsvp>, RsvpError> {
        self.party(party_id).await?;
        Ok(self.rsvps.list_by_party(party_id).await?)
    }

    /// Direct invitees of an RSVP, computed from back-references.
    pub async fn list_invitees(&self, rsvp_id: Uuid) -> Result<Vec<Rsvp>, RsvpError> {
        Ok(self.rsvps.list_children(rsvp_id).await?)
    }

    pub async fn guest_view(&self, id: Uuid) -> Result<GuestView, RsvpError> {
        let rsvp = self.get_rsvp(id).await?;
        let party = self.party(rsvp.party_id).await?;

        let invitation = match (&rsvp.invitation_code, rsvp.status()) {
            (Some(code), RsvpStatus::Pending) => rsvp.degree.next().map(|invitee_degree| {
                InvitationLink {
                    code: code.clone(),
                    url_fragment: invitation_url_fragment(&party.invite_code, code),
                    invitee_degree,
                    instructions: invitation_instructions(invitee_degree),
                }
            }),
            _ => None,
        };

        let confirmed_by = match rsvp.confirmed_by_rsvp_id {
            Some(confirmer_id) => match self.rsvps.get(confirmer_id).await {
                Ok(confirmer) => Some(ConfirmerInfo {
                    rsvp_id: confirmer.id,
                    name: confirmer.guest_name,
                    contact: confirmer.guest_contact,
                }),
                Err(StoreError::NotFound) => None,
                Err(e) => return Err(e.into()),
            },
            None => None,
        };

        let has_sent_invitation = self.codes.count_redeemed_for_inviter(rsvp.id).await? > 0;

        Ok(GuestView {
            status: rsvp.status(),
            party: PartyInfo::from(&party),
            invitation,
            confirmed_by,
            has_sent_invitation,
            rsvp,
        })
    }

    pub async fn party_summary(&self, party_id: Uuid) -> Result<PartySummary, RsvpError> {
        let party = self.party(party_id).await?;
        let rsvps = self.rsvps.list_by_party(party_id).await?;
        Ok(summarize(&party, &rsvps))
    }

    async fn party(&self, party_id: Uuid) -> Result<Party, RsvpError> {
        self.parties
            .find_party(party_id)
            .await?
            .ok_or_else(|| RsvpError::NotFound("Party".into()))
    }
}

/// Guest-facing copy explaining how to get confirmed.
pub fn invitation_instructions(invitee_degree: Degree) -> String {
    format!(
        "Share this link to invite someone as a {} degree guest. \
         Once they RSVP yes, your attendance will be confirmed.",
        invitee_degree.ordinal()
    )
}

fn not_found(err: StoreError, what: &str) -> RsvpError {
    match err {
        StoreError::NotFound => RsvpError::NotFound(what.to_string()),
        other => other.into(),
    }
}

fn summarize(party: &Party, rsvps: &[Rsvp]) -> PartySummary {
    let names: HashMap<Uuid, &str> = rsvps.iter().map(|r| (r.id, r.guest_name.as_str())).collect();

    let mut by_degree: BTreeMap<Degree, DegreeCount> = BTreeMap::new();
    let mut guests = Vec::with_capacity(rsvps.len());
    let mut edges = Vec::new();
    let (mut attending, mut declined, mut confirmed, mut pending) = (0, 0, 0, 0);

    for rsvp in rsvps {
        let status = rsvp.status();
        match status {
            RsvpStatus::Declined => declined += 1,
            RsvpStatus::Pending => pending += 1,
            RsvpStatus::Confirmed => confirmed += 1,
        }

        if rsvp.is_attending {
            attending += 1;
            let entry = by_degree.entry(rsvp.degree).or_insert(DegreeCount {
                degree: rsvp.degree,
                attending: 0,
                confirmed: 0,
            });
            entry.attending += 1;
            if rsvp.is_confirmed {
                entry.confirmed += 1;
            }
        }

        if let Some(inviter_id) = rsvp.invited_by_rsvp_id {
            edges.push(InvitationEdge {
                inviter_rsvp_id: inviter_id,
                invitee_rsvp_id: rsvp.id,
            });
        }

        guests.push(GuestListEntry {
            rsvp_id: rsvp.id,
            guest_name: rsvp.guest_name.clone(),
            guest_contact: rsvp.guest_contact.clone(),
            is_attending: rsvp.is_attending,
            degree: rsvp.degree,
            status,
            invited_by_rsvp_id: rsvp.invited_by_rsvp_id,
            invited_by_name: rsvp
                .invited_by_rsvp_id
                .and_then(|id| names.get(&id))
                .map(|name| name.to_string()),
            confirmed_by_name: rsvp
                .confirmed_by_rsvp_id
                .and_then(|id| names.get(&id))
                .map(|name| name.to_string()),
            created_at: rsvp.created_at,
        });
    }

    PartySummary {
        party: PartyInfo::from(party),
        total_responses: rsvps.len(),
        attending_count: attending,
        declined_count: declined,
        confirmed_count: confirmed,
        pending_count: pending,
        by_degree: by_degree.into_values().collect(),
        guests,
        edges,
        generated_at: Utc::now(),
    }
}
