//! Mapping from database errors to storage port errors.

use domain::store::StoreError;

/// PostgreSQL SQLSTATE for unique_violation.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for foreign_key_violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Translate a sqlx error into the storage port's error type.
pub fn store_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => StoreError::Conflict(
                db_err
                    .constraint()
                    .map(conflict_message)
                    .unwrap_or("Resource already exists")
                    .to_string(),
            ),
            Some(FOREIGN_KEY_VIOLATION) => StoreError::NotFound,
            _ => {
                tracing::error!(error = %db_err, "Database error");
                StoreError::Backend(format!("Database error: {}", db_err))
            }
        },
        other => {
            tracing::error!(error = %other, "Database error");
            StoreError::Backend(format!("Database error: {}", other))
        }
    }
}

fn conflict_message(constraint: &str) -> &'static str {
    match constraint {
        "rsvps_party_contact_unique" => "Guest has already responded to this party",
        "invitation_codes_pkey" => "Invitation code already exists",
        _ => "Resource already exists",
    }
}
