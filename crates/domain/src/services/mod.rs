//! Engine services.
//!
//! Services contain the business logic of the invitation chain and operate on
//! domain models through the storage ports.

pub mod degree;
pub mod engine;
pub mod issuer;
pub mod propagation;
pub mod query;

pub use degree::{assign_invitee_degree, assign_root_degree};
pub use engine::{EngineOptions, RsvpEngine};
pub use issuer::{InvitationIssuer, DEFAULT_CODE_GENERATION_ATTEMPTS};
pub use propagation::{ConfirmationPropagator, PropagationOutcome};
pub use query::{invitation_instructions, QueryFacade};
