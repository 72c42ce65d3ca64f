//! Domain layer for the RSVP chain engine.
//!
//! This crate contains:
//! - Domain models (Party, Rsvp, Degree, InvitationCode, projections)
//! - Storage ports and an in-memory implementation
//! - Engine services (issuance, degree assignment, confirmation, queries)
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use error::RsvpError;
