//! Domain models for the RSVP chain engine.

pub mod invitation;
pub mod party;
pub mod rsvp;
pub mod view;

pub use invitation::{InvitationCode, Redemption};
pub use party::{canonicalize_party_code, Party, PartyInfo};
pub use rsvp::{Degree, NewRsvp, Rsvp, RsvpStatus, SubmitRsvpRequest};
pub use view::{
    ConfirmerInfo, DegreeCount, GuestListEntry, GuestView, InvitationEdge, InvitationLink,
    PartySummary,
};
