//! Wallet and contract addresses.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of hex digits in a 20-byte address.
const ADDRESS_HEX_LEN: usize = 40;

/// An account or contract address.
///
/// Addresses are not case-sensitive identifiers: two addresses that differ
/// only in hex-digit case (e.g. checksummed vs. lowercase) compare equal and
/// hash identically.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

/// Returned when a string is not a `0x`-prefixed 40-digit hex address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid address {0:?}: expected 0x followed by 40 hex digits")]
pub struct InvalidAddress(pub String);

impl Address {
    /// Wraps an address reported by a collaborator without validating it.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parses and validates a user-supplied address.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidAddress`] unless the input is `0x` followed by
    /// exactly 40 hex digits.
    pub fn parse(raw: &str) -> Result<Self, InvalidAddress> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| InvalidAddress(raw.to_string()))?;

        if digits.len() != ADDRESS_HEX_LEN || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(InvalidAddress(raw.to_string()));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns the address as it was reported or typed.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns whether the address contains `needle`, ignoring case.
    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        self.0.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Abbreviated form for narrow columns, e.g. `0x1234…cdef`.
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 12 {
            return self.0.clone();
        }
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}…{tail}")
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = InvalidAddress;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn equality_ignores_case() {
        let upper = Address::new(CHECKSUMMED);
        let lower = Address::new(CHECKSUMMED.to_lowercase());
        assert_eq!(upper, lower);

        let mut set = HashSet::new();
        set.insert(upper);
        assert!(set.contains(&lower));
    }

    #[test]
    fn parse_accepts_well_formed_addresses() {
        let addr = Address::parse(CHECKSUMMED).unwrap();
        assert_eq!(addr.as_str(), CHECKSUMMED);
        assert!(" 0x0000000000000000000000000000000000000001 ".parse::<Address>().is_ok());
    }

    #[test]
    fn parse_rejects_malformed_addresses() {
        assert!(Address::parse("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_err());
        assert!(Address::parse("0x1234").is_err());
        assert!(Address::parse("0xZZAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_err());
    }

    #[test]
    fn short_form_keeps_head_and_tail() {
        assert_eq!(Address::new(CHECKSUMMED).short(), "0x5aAe…eAed");
        assert_eq!(Address::new("0xabc").short(), "0xabc");
    }
}
