//! Error taxonomy for RSVP submission and queries.
//!
//! Every error is a per-request failure. None of them is fatal to the process.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RsvpError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid invitation code")]
    InvalidCode,

    #[error("Invitation code has already been redeemed")]
    AlreadyRedeemed,

    #[error("Inviter is not attending")]
    InviterNotAttending,

    #[error("Maximum invitation degree exceeded")]
    DegreeExceeded,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Party has already started")]
    PartyStarted,

    #[error("Storage error: {0}")]
    Store(String),
}

impl RsvpError {
    /// Stable machine-readable code for callers.
    pub fn error_code(&self) -> &'static str {
        match self {
            RsvpError::NotFound(_) => "not_found",
            RsvpError::InvalidCode => "invalid_code",
            RsvpError::AlreadyRedeemed => "already_redeemed",
            RsvpError::InviterNotAttending => "inviter_not_attending",
            RsvpError::DegreeExceeded => "degree_exceeded",
            RsvpError::Conflict(_) => "conflict",
            RsvpError::Validation(_) => "validation_error",
            RsvpError::PartyStarted => "party_started",
            RsvpError::Store(_) => "storage_error",
        }
    }

    /// Only uniqueness collisions are safe to retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RsvpError::Conflict(_))
    }
}

impl From<StoreError> for RsvpError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => RsvpError::NotFound("Resource not found".into()),
            StoreError::Conflict(msg) => RsvpError::Conflict(msg),
            StoreError::Backend(msg) => RsvpError::Store(msg),
        }
    }
}

impl From<validator::ValidationErrors> for RsvpError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {}", field))
                })
            })
            .collect();

        let message = if messages.len() == 1 {
            messages[0].clone()
        } else {
            format!("{} validation errors: {}", messages.len(), messages.join(", "))
        };

        RsvpError::Validation(message)
    }
}
