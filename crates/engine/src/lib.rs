//! Embedding process for the RSVP engine.
//!
//! Loads configuration, initializes logging and builds an explicit
//! [`context::EngineContext`] around the PostgreSQL stores.

pub mod config;
pub mod context;
pub mod logging;
