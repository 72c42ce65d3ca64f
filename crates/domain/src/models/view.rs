//! Read-only projections served to the guest- and host-facing layers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::party::PartyInfo;
use super::rsvp::{Degree, Rsvp, RsvpStatus};

/// What a guest sees about their own RSVP.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GuestView {
    pub rsvp: Rsvp,
    pub status: RsvpStatus,
    pub party: PartyInfo,
    /// Present while the guest is attending, unconfirmed and holds a live code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitation: Option<InvitationLink>,
    /// The direct invitee whose acceptance confirmed this guest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_by: Option<ConfirmerInfo>,
    /// True once any code this guest handed out was redeemed.
    pub has_sent_invitation: bool,
}

/// A guest's shareable invitation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InvitationLink {
    pub code: String,
    pub url_fragment: String,
    pub invitee_degree: Degree,
    pub instructions: String,
}

/// First downstream acceptance.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ConfirmerInfo {
    pub rsvp_id: Uuid,
    pub name: String,
    pub contact: String,
}

/// Host-facing roll-up of a party's responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PartySummary {
    pub party: PartyInfo,
    pub total_responses: usize,
    pub attending_count: usize,
    pub declined_count: usize,
    pub confirmed_count: usize,
    pub pending_count: usize,
    pub by_degree: Vec<DegreeCount>,
    /// Guests in creation order.
    pub guests: Vec<GuestListEntry>,
    pub edges: Vec<InvitationEdge>,
    pub generated_at: DateTime<Utc>,
}

/// Response counts for one degree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DegreeCount {
    pub degree: Degree,
    pub attending: usize,
    pub confirmed: usize,
}

/// One row of the host's guest list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GuestListEntry {
    pub rsvp_id: Uuid,
    pub guest_name: String,
    pub guest_contact: String,
    pub is_attending: bool,
    pub degree: Degree,
    pub status: RsvpStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invited_by_rsvp_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invited_by_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Inviter to invitee link in the invitation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InvitationEdge {
    pub inviter_rsvp_id: Uuid,
    pub invitee_rsvp_id: Uuid,
}
