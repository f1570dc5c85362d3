//! Email address value object.
//!
//! Compared by value; `Email::parse` is the only constructor, so a held
//! `Email` is always normalized (trimmed, lowercased) and well-formed.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A validated, normalized email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parse and normalize an email address.
    ///
    /// Accepts `local@domain` where both parts are non-empty and the domain
    /// contains at least one dot. This is intentionally a shallow check —
    /// deliverability is not a domain concern.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = raw.trim().to_lowercase();

        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(DomainError::validation("email must contain '@'"));
        };

        if local.is_empty() || domain.is_empty() {
            return Err(DomainError::validation(
                "email local and domain parts must be non-empty",
            ));
        }
        if domain.contains('@') {
            return Err(DomainError::validation("email must contain exactly one '@'"));
        }
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(DomainError::validation("email domain must contain a dot"));
        }
        if normalized.chars().any(char::is_whitespace) {
            return Err(DomainError::validation("email must not contain whitespace"));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Email {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let email = Email::parse("  Farmer@EcoCrop.AI ").unwrap();
        assert_eq!(email.as_str(), "farmer@ecocrop.ai");
    }

    #[test]
    fn parse_rejects_missing_at() {
        assert!(Email::parse("farmer.ecocrop.ai").is_err());
    }

    #[test]
    fn parse_rejects_empty_parts() {
        assert!(Email::parse("@ecocrop.ai").is_err());
        assert!(Email::parse("farmer@").is_err());
    }

    #[test]
    fn parse_rejects_double_at() {
        assert!(Email::parse("farmer@eco@crop.ai").is_err());
    }

    #[test]
    fn parse_rejects_dotless_domain() {
        assert!(Email::parse("farmer@localhost").is_err());
    }

    #[test]
    fn parse_rejects_inner_whitespace() {
        assert!(Email::parse("far mer@ecocrop.ai").is_err());
    }
}
