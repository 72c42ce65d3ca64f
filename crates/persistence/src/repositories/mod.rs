//! Repository implementations for database operations.

pub mod invitation_code;
pub mod party;
pub mod rsvp;

pub use invitation_code::InvitationCodeRepository;
pub use party::PartyRepository;
pub use rsvp::RsvpRepository;
