//! Tenant identifiers
//!
//! A tenant identifier doubles as subdomain and schema name, so the rules
//! are strict: 2 to 24 lowercase ASCII letters or digits. Input is
//! normalized (trimmed, lowercased) before validation so that lookups are
//! case-insensitive.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimum identifier length after normalization.
pub const MIN_IDENTIFIER_LEN: usize = 2;

/// Maximum identifier length after normalization.
pub const MAX_IDENTIFIER_LEN: usize = 24;

/// Validated, normalized tenant identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    /// Normalize and validate a raw identifier.
    pub fn parse(raw: &str) -> Result<Self, InvalidTenantId> {
        let normalized = raw.trim().to_ascii_lowercase();

        if normalized.len() < MIN_IDENTIFIER_LEN || normalized.len() > MAX_IDENTIFIER_LEN {
            return Err(InvalidTenantId::Length(normalized));
        }
        if !normalized
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        {
            return Err(InvalidTenantId::Charset(normalized));
        }

        Ok(Self(normalized))
    }

    /// Identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for TenantId {
    type Err = InvalidTenantId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TenantId {
    type Error = InvalidTenantId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TenantId> for String {
    fn from(id: TenantId) -> Self {
        id.0
    }
}

/// Identifier validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTenantId {
    /// Outside the 2..=24 character bounds.
    #[error("identifier must be {MIN_IDENTIFIER_LEN} to {MAX_IDENTIFIER_LEN} characters: {0:?}")]
    Length(String),

    /// Contains characters other than lowercase letters and digits.
    #[error("identifier may only contain lowercase letters and digits: {0:?}")]
    Charset(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes() {
        let id = TenantId::parse("  Acme42 ").unwrap();
        assert_eq!(id.as_str(), "acme42");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            TenantId::parse("a"),
            Err(InvalidTenantId::Length(_))
        ));
        assert!(matches!(
            TenantId::parse("a".repeat(25).as_str()),
            Err(InvalidTenantId::Length(_))
        ));
        assert!(matches!(
            TenantId::parse("acme-corp"),
            Err(InvalidTenantId::Charset(_))
        ));
        assert!(matches!(
            TenantId::parse("acme corp"),
            Err(InvalidTenantId::Charset(_))
        ));
    }

    #[test]
    fn test_serde_validates_on_deserialize() {
        let ok: TenantId = serde_json::from_str("\"acme\"").unwrap();
        assert_eq!(ok.as_str(), "acme");

        let err = serde_json::from_str::<TenantId>("\"not valid!\"");
        assert!(err.is_err());
    }
}
