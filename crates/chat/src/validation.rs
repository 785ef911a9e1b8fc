//! Inbound message limits, shared by every entry point.

use verse_core::{AppError, AppResult};

pub const MIN_MESSAGE_CHARS: usize = 3;
pub const MAX_MESSAGE_CHARS: usize = 500;

/// Check a raw message against the length bounds.
///
/// Length is counted in characters, untrimmed.
pub fn validate_message(message: &str) -> AppResult<()> {
    let length = message.chars().count();
    if !(MIN_MESSAGE_CHARS..=MAX_MESSAGE_CHARS).contains(&length) {
        return Err(AppError::Validation(format!(
            "message must be between {} and {} characters, got {}",
            MIN_MESSAGE_CHARS, MAX_MESSAGE_CHARS, length
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_bounds() {
        assert!(validate_message("ab").is_err());
        assert!(validate_message("abc").is_ok());
        assert!(validate_message(&"a".repeat(500)).is_ok());
        assert!(validate_message(&"a".repeat(501)).is_err());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // Three Devanagari characters, nine bytes
        assert!(validate_message("सतय").is_ok());
        assert!(validate_message(&"स".repeat(500)).is_ok());
    }

    #[test]
    fn test_whitespace_counts() {
        assert!(validate_message("   ").is_ok());
        assert!(matches!(validate_message(" a"), Err(AppError::Validation(_))));
    }
}
