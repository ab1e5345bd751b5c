//! Snapshot types for the ledger's read projection
//!
//! These structs mirror the JSON the record/agent read API returns. They are
//! never mutated locally: a stale snapshot is replaced wholesale by a fresh
//! fetch, not patched in place.

mod agent;
mod property;
mod proposal;
mod record;
mod role;

pub use agent::{agent_by_key, Agent};
pub use property::{Location, Property, PropertyDataType, PropertyValue};
pub use proposal::Proposal;
pub use record::{PropertyUpdate, PropertyUpdateEntry, Record, RecordUpdates, RoleUpdate};
pub use role::Role;
