//! Participant address type.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque participant identity (for example a Stacks principal).
///
/// Ordering is lexicographic on the raw string, which gives composite store
/// keys a defined order. The empty address sorts first and is used as the
/// lower bound of range scans.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Longest accepted address, in bytes.
    pub const MAX_LEN: usize = 128;

    /// Create an address from a raw string. No validation is performed;
    /// see [`Address::is_valid`].
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The smallest address in key order.
    pub fn min() -> Self {
        Self(String::new())
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this address is well-formed: non-empty, at most
    /// [`Address::MAX_LEN`] bytes, ASCII alphanumerics plus `.`, `-` and `_`
    /// (contract principals look like `SP...ABC.contract-name`).
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
            && self.0.len() <= Self::MAX_LEN
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_'))
    }

    /// Like [`Address::is_valid`], but reports the offending address.
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(TypesError::InvalidAddress(self.0.clone()))
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacks_principals_are_valid() {
        assert!(Address::new("SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7").is_valid());
        assert!(Address::new("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM.dao-token").is_valid());
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        assert!(!Address::new("").is_valid());
        assert!(!Address::new("SP 123").is_valid());
        assert!(!Address::new("SP/../etc").is_valid());
        assert!(!Address::new("S".repeat(Address::MAX_LEN + 1)).is_valid());
    }

    #[test]
    fn min_sorts_before_everything() {
        assert!(Address::min() < Address::new("0"));
        assert!(Address::min() < Address::new("SP1"));
    }
}
