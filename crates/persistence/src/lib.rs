//! Persistence layer for the RSVP engine.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - PostgreSQL implementations of the domain storage ports

pub mod db;
pub mod entities;
pub mod error;
pub mod metrics;
pub mod repositories;

pub use db::{create_pool, DatabaseConfig};
pub use repositories::{InvitationCodeRepository, PartyRepository, RsvpRepository};
