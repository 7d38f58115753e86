use std::fmt;
use thiserror::Error;

/// Input rejected locally, before anything is sent to a store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Please enter a username")]
    EmptyUsername,
}

/// Email address captured on the menu screen.
///
/// Accepts `local@domain.tld`: no whitespace, a single `@`, and a dot inside
/// the domain with text on both sides.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidEmail` if the shape check fails.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let raw = value.as_ref().trim();
        if raw.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidEmail);
        }

        let mut parts = raw.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ValidationError::InvalidEmail);
        };
        if local.is_empty() || !domain_has_dotted_parts(domain) {
            return Err(ValidationError::InvalidEmail);
        }

        Ok(Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn domain_has_dotted_parts(domain: &str) -> bool {
    domain
        .char_indices()
        .filter(|(_, c)| *c == '.')
        .any(|(i, _)| i > 0 && i + 1 < domain.len())
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name shown on the leaderboard (trimmed, non-empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyUsername` if the name is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyUsername);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
