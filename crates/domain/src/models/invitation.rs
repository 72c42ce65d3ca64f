//! Invitation code domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::rsvp::{Degree, Rsvp};

/// Number of segments in an invitation code.
pub const CODE_SEGMENTS: usize = 3;
/// Characters per segment.
pub const CODE_SEGMENT_LEN: usize = 4;

/// A single-use code binding an inviter RSVP to a future invitee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InvitationCode {
    pub code: String,
    pub party_id: Uuid,
    pub inviter_rsvp_id: Uuid,
    /// Set once the invitee's RSVP exists.
    pub redeemed_by_rsvp_id: Option<Uuid>,
    /// Set when the code is claimed, before the invitee's RSVP is written.
    pub redeemed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl InvitationCode {
    pub fn is_redeemed(&self) -> bool {
        self.redeemed_at.is_some()
    }
}

/// A successfully claimed code, ready to create the invitee's RSVP.
#[derive(Debug, Clone)]
pub struct Redemption {
    pub code: String,
    pub inviter: Rsvp,
    /// Degree the invitee will be created with.
    pub invitee_degree: Degree,
}

/// Generate a random invitation code in XXXX-XXXX-XXXX format.
pub fn generate_invitation_code() -> String {
    shared::codes::generate_segmented_code(CODE_SEGMENTS, CODE_SEGMENT_LEN)
}

/// Canonicalizes a presented code, returning `None` if it is malformed.
pub fn parse_invitation_code(raw: &str) -> Option<String> {
    let code = shared::codes::canonicalize_code(raw);
    shared::codes::is_segmented_code(&code, CODE_SEGMENTS, CODE_SEGMENT_LEN).then_some(code)
}

/// Relative link a guest shares with their invitee.
pub fn invitation_url_fragment(party_invite_code: &str, code: &str) -> String {
    format!("/party/{}/rsvp?invited_by={}", party_invite_code, code)
}
