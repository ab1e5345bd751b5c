//! Record snapshots and their update history
//!
//! A record has exactly one owner and one custodian at any time, a one-way
//! `final` flag, an ordered property collection, pending proposals, and an
//! append-only per-role / per-property change log.

use crate::domain::{Property, PropertyValue, Proposal};
use crate::identifiers::{PublicKey, RecordId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One historic value of a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyUpdate {
    /// Millisecond timestamp of the update
    pub timestamp: u64,
    /// Value reported at that time
    pub value: PropertyValue,
}

/// One historic holder change of a single-holder role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleUpdate {
    /// Millisecond timestamp of the change
    pub timestamp: u64,
    /// Key of the agent who took the role
    pub agent_key: PublicKey,
}

/// Append-only change log attached to a record snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUpdates {
    /// Ownership changes, oldest first
    #[serde(default)]
    pub owners: Vec<RoleUpdate>,
    /// Custodianship changes, oldest first
    #[serde(default)]
    pub custodians: Vec<RoleUpdate>,
    /// Per-property value history, oldest first
    #[serde(default)]
    pub properties: BTreeMap<String, Vec<PropertyUpdate>>,
}

/// A flattened entry of the property update log
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyUpdateEntry {
    /// Name of the property that changed
    pub property_name: String,
    /// When it changed
    pub timestamp: u64,
    /// The reported value
    pub value: PropertyValue,
}

/// A tracked record, as fetched from the read API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Unique record identifier
    pub record_id: RecordId,
    /// Current owner
    pub owner: PublicKey,
    /// Current custodian
    pub custodian: PublicKey,
    /// One-way immutability flag
    #[serde(rename = "final", default)]
    pub is_final: bool,
    /// Ordered property collection
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Outstanding role-transfer proposals
    #[serde(default)]
    pub proposals: Vec<Proposal>,
    /// Append-only change history
    #[serde(default)]
    pub updates: RecordUpdates,
}

impl Record {
    /// Look up a property by name
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|prop| prop.name == name)
    }

    /// Current value of a named property, if reported
    pub fn property_value(&self, name: &str) -> Option<&PropertyValue> {
        self.property(name).and_then(|prop| prop.value.as_ref())
    }

    /// True when `key` is authorized to report on the named property
    pub fn is_reporter(&self, name: &str, key: &PublicKey) -> bool {
        self.property(name)
            .map(|prop| prop.has_reporter(key))
            .unwrap_or(false)
    }

    /// Timestamp of the most recent property update, if any
    pub fn latest_property_update(&self) -> Option<u64> {
        self.all_update_timestamps().max()
    }

    /// Timestamp of the very first property update, if any
    pub fn oldest_property_update(&self) -> Option<u64> {
        self.all_update_timestamps().min()
    }

    /// Number of distinct update timestamps across all properties.
    ///
    /// Updates bundled in one submission share a timestamp and count once.
    pub fn count_property_updates(&self) -> usize {
        self.all_update_timestamps().collect::<BTreeSet<_>>().len()
    }

    /// The property update history flattened into per-entry form
    pub fn property_update_log(&self) -> Vec<PropertyUpdateEntry> {
        self.updates
            .properties
            .iter()
            .flat_map(|(name, updates)| {
                updates.iter().map(move |update| PropertyUpdateEntry {
                    property_name: name.clone(),
                    timestamp: update.timestamp,
                    value: update.value.clone(),
                })
            })
            .collect()
    }

    fn all_update_timestamps(&self) -> impl Iterator<Item = u64> + '_ {
        self.updates
            .properties
            .values()
            .flatten()
            .map(|update| update.timestamp)
    }
}
