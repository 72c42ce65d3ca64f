//! Common validation utilities.

use validator::ValidationError;

use crate::contact::normalize_contact;

/// Default maximum length of a guest name, in characters.
pub const DEFAULT_MAX_GUEST_NAME_LENGTH: usize = 100;

/// Validates that a guest name is non-blank and at most `max_len` characters
/// once trimmed.
pub fn validate_guest_name_with_limit(name: &str, max_len: usize) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("guest_name_required");
        err.message = Some("Guest name is required".into());
        return Err(err);
    }
    if trimmed.chars().count() > max_len {
        let mut err = ValidationError::new("guest_name_length");
        err.message = Some(format!("Guest name must be at most {} characters", max_len).into());
        return Err(err);
    }
    Ok(())
}

/// Validates a guest name against the default length limit.
pub fn validate_guest_name(name: &str) -> Result<(), ValidationError> {
    validate_guest_name_with_limit(name, DEFAULT_MAX_GUEST_NAME_LENGTH)
}

/// Validates that a contact can be normalized to E.164.
pub fn validate_contact(contact: &str) -> Result<(), ValidationError> {
    normalize_contact(contact).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::name::en::Name;
    use fake::Fake;

    #[test]
    fn test_validate_guest_name() {
        assert!(validate_guest_name("Ada Lovelace").is_ok());
        assert!(validate_guest_name("  Ada  ").is_ok());
        assert!(validate_guest_name("").is_err());
        assert!(validate_guest_name("   ").is_err());
    }

    #[test]
    fn test_validate_guest_name_generated() {
        for _ in 0..20 {
            let name: String = Name().fake();
            assert!(validate_guest_name(&name).is_ok(), "rejected {}", name);
        }
    }

    #[test]
    fn test_validate_guest_name_limit() {
        let long = "a".repeat(DEFAULT_MAX_GUEST_NAME_LENGTH + 1);
        let err = validate_guest_name(&long).unwrap_err();
        assert_eq!(err.code, "guest_name_length");
        assert!(validate_guest_name_with_limit("abcd", 3).is_err());
        assert!(validate_guest_name_with_limit("abc", 3).is_ok());
    }

    #[test]
    fn test_validate_guest_name_counts_chars_not_bytes() {
        assert!(validate_guest_name_with_limit("你好世界", 4).is_ok());
    }

    #[test]
    fn test_validate_contact() {
        assert!(validate_contact("415-555-0123").is_ok());
        assert!(validate_contact("not a phone").is_err());
    }
}
