//! Guest contact (phone number) normalization.
//!
//! Contacts are stored in E.164 form so the same guest is recognized no
//! matter how the number was typed.

use phonenumber::country;
use phonenumber::Mode;
use validator::ValidationError;

/// Region assumed for numbers typed without a country calling code.
const DEFAULT_REGION: country::Id = country::Id::US;

/// Normalizes a phone-number-like contact to E.164 (e.g. `+14155550123`).
///
/// Numbers without a leading `+` are read as US numbers. International
/// numbers are accepted when written with their country calling code.
pub fn normalize_contact(raw: &str) -> Result<String, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        let mut err = ValidationError::new("contact_required");
        err.message = Some("Contact phone number is required".into());
        return Err(err);
    }

    let number = phonenumber::parse(Some(DEFAULT_REGION), raw).map_err(|_| invalid_contact())?;
    if !phonenumber::is_valid(&number) {
        return Err(invalid_contact());
    }

    Ok(number.format().mode(Mode::E164).to_string())
}

fn invalid_contact() -> ValidationError {
    let mut err = ValidationError::new("contact_invalid");
    err.message = Some("Contact must be a valid phone number".into());
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plain_ten_digits() {
        assert_eq!(normalize_contact("4155550123").unwrap(), "+14155550123");
    }

    #[test]
    fn test_normalize_formatted_numbers() {
        assert_eq!(normalize_contact("(415) 555-0123").unwrap(), "+14155550123");
        assert_eq!(normalize_contact("+1 415 555 0123").unwrap(), "+14155550123");
        assert_eq!(normalize_contact("1-415-555-0123").unwrap(), "+14155550123");
        assert_eq!(normalize_contact(" 415.555.0123 ").unwrap(), "+14155550123");
    }

    #[test]
    fn test_normalize_international_number() {
        assert_eq!(normalize_contact("+44 20 7946 0958").unwrap(), "+442079460958");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_contact("415-555-0123").unwrap();
        assert_eq!(normalize_contact(&once).unwrap(), once);
    }

    #[test]
    fn test_normalize_rejects_empty() {
        let err = normalize_contact("  ").unwrap_err();
        assert_eq!(err.code, "contact_required");
    }

    #[test]
    fn test_normalize_rejects_invalid_numbers() {
        assert_eq!(normalize_contact("12345").unwrap_err().code, "contact_invalid");
        assert!(normalize_contact("not a phone").is_err());
        // Area codes never start with 0 or 1.
        assert!(normalize_contact("0551234567").is_err());
    }
}
