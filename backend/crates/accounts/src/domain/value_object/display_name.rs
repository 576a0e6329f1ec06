//! Display Name Value Object
//!
//! The name shown on profiles, quiz results, and the leaderboard. Not a
//! login handle, so spaces and non-ASCII letters are allowed.
//!
//! ## Invariants
//! - 2 to 50 characters after NFKC normalization and trimming
//! - No control characters

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Minimum length for display name (in characters)
pub const DISPLAY_NAME_MIN_LENGTH: usize = 2;

/// Maximum length for display name (in characters)
pub const DISPLAY_NAME_MAX_LENGTH: usize = 50;

/// Display name value object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new display name with validation
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        let raw: String = raw.into();
        let normalized: String = raw.nfkc().collect();
        let trimmed = normalized.trim();

        if trimmed.is_empty() {
            return Err(AppError::bad_request("Display name cannot be empty"));
        }

        let char_count = trimmed.chars().count();

        if char_count < DISPLAY_NAME_MIN_LENGTH {
            return Err(AppError::bad_request(format!(
                "Display name must be at least {} characters",
                DISPLAY_NAME_MIN_LENGTH
            )));
        }

        if char_count > DISPLAY_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Display name must be at most {} characters",
                DISPLAY_NAME_MAX_LENGTH
            )));
        }

        if trimmed.chars().any(|c| c.is_control()) {
            return Err(AppError::bad_request(
                "Display name contains invalid characters",
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the display name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_valid() {
        assert!(DisplayName::new("Jane Doe").is_ok());
        assert!(DisplayName::new("Jo").is_ok());
        assert!(DisplayName::new("みどり").is_ok());
    }

    #[test]
    fn test_display_name_trimmed() {
        let name = DisplayName::new("  Jane Doe  ").unwrap();
        assert_eq!(name.as_str(), "Jane Doe");
    }

    #[test]
    fn test_display_name_too_short() {
        assert!(DisplayName::new("J").is_err());
        assert!(DisplayName::new("").is_err());
        assert!(DisplayName::new("   ").is_err());
    }

    #[test]
    fn test_display_name_too_long() {
        let long = "a".repeat(DISPLAY_NAME_MAX_LENGTH + 1);
        assert!(DisplayName::new(long).is_err());

        let max = "a".repeat(DISPLAY_NAME_MAX_LENGTH);
        assert!(DisplayName::new(max).is_ok());
    }

    #[test]
    fn test_display_name_control_characters() {
        assert!(DisplayName::new("Jane\u{0000}Doe").is_err());
    }
}
