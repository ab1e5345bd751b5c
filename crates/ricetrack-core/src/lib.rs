//! Ricetrack Core
//!
//! Domain model for the rice-provenance ledger's read projection: records,
//! their typed properties, pending role-transfer proposals, agents, and the
//! append-only update history. Everything here is a read-only snapshot of
//! server state; mutation happens only through the request payloads built by
//! `ricetrack-protocol` and submitted over a channel.
//!
//! # Architecture
//!
//! - `identifiers` - newtype keys (`RecordId`, `PublicKey`)
//! - `domain` - record/property/proposal/agent snapshot types and accessors
//! - `errors` - the unified `TrackError` taxonomy
//! - `format` - display helpers for timestamps, locations, and prices

#![forbid(unsafe_code)]

pub mod domain;
pub mod errors;
pub mod format;
pub mod identifiers;

pub use domain::{
    agent_by_key, Agent, Location, Property, PropertyDataType, PropertyUpdate,
    PropertyUpdateEntry, PropertyValue, Proposal, Record, RecordUpdates, Role, RoleUpdate,
};
pub use errors::{Result, TrackError};
pub use identifiers::{PublicKey, RecordId};
