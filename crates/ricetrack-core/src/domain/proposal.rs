//! Pending role-transfer proposals
//!
//! At most one proposal should exist per `(recordId, receivingAgent, role)`
//! tuple. The server enforces the invariant; the client relies on it.

use crate::domain::Role;
use crate::identifiers::{PublicKey, RecordId};
use serde::{Deserialize, Serialize};

/// A pending request to change a role on a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    /// Record the proposal targets
    pub record_id: RecordId,
    /// Identity that created the proposal (current role holder, or the
    /// owner for reporter grants)
    pub issuing_agent: PublicKey,
    /// Identity proposed to receive the role
    pub receiving_agent: PublicKey,
    /// Role being transferred or granted
    pub role: Role,
    /// Property names covered by a REPORTER grant; empty otherwise
    #[serde(default)]
    pub properties: Vec<String>,
}

impl Proposal {
    /// True when this proposal matches the `(receiver, role)` pair
    pub fn matches(&self, receiving_agent: &PublicKey, role: Role) -> bool {
        self.role == role && &self.receiving_agent == receiving_agent
    }
}
