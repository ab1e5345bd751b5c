//! Record roles
//!
//! OWNER and CUSTODIAN are single-holder roles transferred by proposal.
//! REPORTER is multi-holder and scoped to named properties; it is granted by
//! proposal but revoked directly by the owner.

use crate::errors::TrackError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A role that can be held on a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Holds transfer, reporter-grant, and finalize rights
    Owner,
    /// Holds physical possession, transferable independently of ownership
    Custodian,
    /// Authorized to update specific named properties
    Reporter,
}

impl Role {
    /// Lowercase name, as some ledger responses spell roles
    pub fn as_lower(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Custodian => "custodian",
            Role::Reporter => "reporter",
        }
    }

    /// SCREAMING_SNAKE name, as payloads spell roles
    pub fn as_upper(&self) -> &'static str {
        match self {
            Role::Owner => "OWNER",
            Role::Custodian => "CUSTODIAN",
            Role::Reporter => "REPORTER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_upper())
    }
}

impl FromStr for Role {
    type Err = TrackError;

    /// Case-insensitive: responses carry both `OWNER` and `owner` in the wild
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "owner" => Ok(Role::Owner),
            "custodian" => Ok(Role::Custodian),
            "reporter" => Ok(Role::Reporter),
            other => Err(TrackError::invalid_request(format!(
                "unknown role: {other}"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
