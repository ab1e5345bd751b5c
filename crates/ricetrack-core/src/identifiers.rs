//! Identifier types used across the ricetrack client
//!
//! Identities on the ledger are hex-encoded public keys; records are keyed by
//! the serial number assigned at creation. Both are carried as opaque strings
//! and compared by exact string equality.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier of a tracked record (the batch serial number)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Create a record ID from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier carries no characters
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Hex-encoded public key identifying an agent on the ledger
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKey(String);

impl PublicKey {
    /// Create a public key from its hex string form
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw hex string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when no key material is present
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PublicKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for PublicKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
