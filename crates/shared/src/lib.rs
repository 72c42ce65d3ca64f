//! Shared utilities for the RSVP chain engine.
//!
//! This crate provides functionality used across the other crates:
//! - Guest contact normalization
//! - Common field validation
//! - Random code generation

pub mod codes;
pub mod contact;
pub mod validation;
