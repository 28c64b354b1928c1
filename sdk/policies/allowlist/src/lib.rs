use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Length of a 20-byte account address rendered as hex, without the `0x` prefix.
pub const ADDRESS_HEX_LEN: usize = 40;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllowlistError {
    #[error("Address is empty")]
    Empty,

    #[error("Address {0} is missing the 0x prefix")]
    MissingPrefix(String),

    #[error("Address {0} must have 40 hex digits")]
    InvalidLength(String),

    #[error("Address {0} is not valid hex")]
    InvalidHex(String),
}

/// Source of approved wallet addresses.
///
/// The gate consults this synchronously on every approval check, so
/// implementations should answer from memory.
pub trait AllowlistSource: Send + Sync {
    fn list_approved_addresses(&self) -> HashSet<String>;
}

/// Approval check against any source, using the same rules as
/// [`Allowlist::is_approved`].
pub fn is_approved_by(source: &dyn AllowlistSource, address: &str) -> bool {
    let address = normalize(address);
    if address.is_empty() {
        return false;
    }
    let approved = source.list_approved_addresses();
    approved.is_empty() || approved.iter().any(|entry| normalize(entry) == address)
}

/// Canonical form used for comparisons: ASCII-lowercased, nothing else.
/// Surrounding whitespace is kept and therefore never matches an entry.
pub fn normalize(address: &str) -> String {
    address.to_ascii_lowercase()
}

/// Checks that `address` looks like `0x` followed by 40 hex digits.
pub fn validate_address(address: &str) -> Result<(), AllowlistError> {
    if address.is_empty() {
        return Err(AllowlistError::Empty);
    }
    let digits = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| AllowlistError::MissingPrefix(address.to_string()))?;
    if digits.len() != ADDRESS_HEX_LEN {
        return Err(AllowlistError::InvalidLength(address.to_string()));
    }
    hex::decode(digits).map_err(|_| AllowlistError::InvalidHex(address.to_string()))?;
    Ok(())
}

/// Fixed set of approved addresses, matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Allowlist {
    addresses: HashSet<String>,
}

impl Allowlist {
    /// An empty list; every non-empty address is approved.
    pub fn open() -> Self {
        Self::default()
    }

    pub fn builder() -> AllowlistBuilder {
        AllowlistBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// True iff the list is empty or `address` matches an entry ignoring case.
    /// An empty address is never approved.
    pub fn is_approved(&self, address: &str) -> bool {
        let address = normalize(address);
        if address.is_empty() {
            return false;
        }
        self.addresses.is_empty() || self.addresses.contains(&address)
    }
}

impl AllowlistSource for Allowlist {
    fn list_approved_addresses(&self) -> HashSet<String> {
        self.addresses.clone()
    }
}

impl From<Vec<String>> for Allowlist {
    fn from(addresses: Vec<String>) -> Self {
        AllowlistBuilder::new().add_addresses(&addresses).build()
    }
}

impl From<Allowlist> for Vec<String> {
    fn from(list: Allowlist) -> Self {
        let mut addresses: Vec<String> = list.addresses.into_iter().collect();
        addresses.sort();
        addresses
    }
}

/// Fluent builder for an [`Allowlist`].
#[derive(Debug, Default)]
pub struct AllowlistBuilder {
    addresses: Vec<String>,
}

impl AllowlistBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_address(mut self, address: impl AsRef<str>) -> Self {
        let address = normalize(address.as_ref());
        if !address.is_empty() {
            self.addresses.push(address);
        }
        self
    }

    pub fn add_addresses<S: AsRef<str>>(mut self, addresses: &[S]) -> Self {
        for addr in addresses {
            self = self.add_address(addr);
        }
        self
    }

    /// Like [`AllowlistBuilder::add_address`] but rejects malformed addresses.
    pub fn try_add_address(self, address: impl AsRef<str>) -> Result<Self, AllowlistError> {
        validate_address(address.as_ref())?;
        Ok(self.add_address(address))
    }

    pub fn build(self) -> Allowlist {
        Allowlist {
            addresses: self.addresses.into_iter().collect(),
        }
    }
}
