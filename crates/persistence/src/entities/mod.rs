//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod invitation_code;
pub mod party;
pub mod rsvp;

pub use invitation_code::InvitationCodeEntity;
pub use party::PartyEntity;
pub use rsvp::RsvpEntity;
