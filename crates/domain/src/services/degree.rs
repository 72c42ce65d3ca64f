//! Degree assignment for new RSVPs.

use crate::error::RsvpError;
use crate::models::{Degree, Rsvp};

/// Degree of a direct or root-link submission.
pub fn assign_root_degree() -> Degree {
    Degree::ROOT
}

/// Degree of a guest invited by `inviter`.
///
/// Codes are never issued to non-attending or degree-3 guests, so both
/// failures here mean a code escaped its issuance rules.
pub fn assign_invitee_degree(inviter: &Rsvp) -> Result<Degree, RsvpError> {
    if !inviter.is_attending {
        tracing::warn!(
            inviter_rsvp_id = %inviter.id,
            party_id = %inviter.party_id,
            "Unexpected invitation from a non-attending guest"
        );
        return Err(RsvpError::InviterNotAttending);
    }

    inviter.degree.next().ok_or_else(|| {
        tracing::warn!(
            inviter_rsvp_id = %inviter.id,
            party_id = %inviter.party_id,
            degree = %inviter.degree,
            "Unexpected invitation beyond maximum degree"
        );
        RsvpError::DegreeExceeded
    })
}
