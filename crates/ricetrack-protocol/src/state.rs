//! Explicit role state, computed once per snapshot
//!
//! The transfer lifecycle per single-holder role:
//!
//! ```text
//! Unassigned -> Held(X) -> Proposed(X -> Y) -> Held(Y)   on ACCEPT
//!                                           -> Held(X)   on REJECT / CANCEL
//! ```
//!
//! OWNER and CUSTODIAN states are independent of each other but both gated
//! by the record's `final` flag: once final, no proposal of any role may be
//! initiated. REPORTER is multi-holder; each `(identity, property)` pair has
//! its own grant/revoke lifecycle, summarized by [`ReporterState`].

use crate::evaluator::current_reporters;
use ricetrack_core::{PublicKey, Record, Role};

/// State of a single-holder role (OWNER or CUSTODIAN) on one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleState {
    /// No holder recorded (fresh or partially-synced snapshot)
    Unassigned,
    /// Held with no outstanding transfer proposal
    Held {
        /// Current holder
        holder: PublicKey,
    },
    /// Held, with transfer proposed to one or more candidates
    Proposed {
        /// Current holder, who keeps the role until an ACCEPT
        holder: PublicKey,
        /// Outstanding receiving agents, in proposal order
        receiving: Vec<PublicKey>,
    },
}

impl RoleState {
    /// Compute the state of a single-holder role from a snapshot.
    ///
    /// Returns `None` for `Role::Reporter`, which is not single-holder; use
    /// [`ReporterState::of`] instead.
    pub fn of(record: &Record, role: Role) -> Option<Self> {
        let holder = match role {
            Role::Owner => record.owner.clone(),
            Role::Custodian => record.custodian.clone(),
            Role::Reporter => return None,
        };
        if holder.is_empty() {
            return Some(RoleState::Unassigned);
        }
        let receiving: Vec<PublicKey> = record
            .proposals
            .iter()
            .filter(|proposal| proposal.role == role)
            .map(|proposal| proposal.receiving_agent.clone())
            .collect();
        if receiving.is_empty() {
            Some(RoleState::Held { holder })
        } else {
            Some(RoleState::Proposed { holder, receiving })
        }
    }

    /// The current holder, if any
    pub fn holder(&self) -> Option<&PublicKey> {
        match self {
            RoleState::Unassigned => None,
            RoleState::Held { holder } | RoleState::Proposed { holder, .. } => Some(holder),
        }
    }

    /// True when a transfer is outstanding
    pub fn is_proposed(&self) -> bool {
        matches!(self, RoleState::Proposed { .. })
    }
}

/// Per-identity reporter involvement on one record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReporterState {
    /// Properties the identity is currently authorized for
    pub granted: Vec<String>,
    /// Properties named by a pending REPORTER proposal to this identity
    pub pending: Vec<String>,
}

impl ReporterState {
    /// Compute reporter involvement for `key` from a snapshot
    pub fn of(record: &Record, key: &PublicKey) -> Self {
        let granted = current_reporters(record).remove(key).unwrap_or_default();
        let pending = record
            .proposals
            .iter()
            .filter(|proposal| proposal.role == Role::Reporter && &proposal.receiving_agent == key)
            .flat_map(|proposal| proposal.properties.iter().cloned())
            .collect();
        Self { granted, pending }
    }

    /// True when the identity neither holds nor is offered any authorization
    pub fn is_uninvolved(&self) -> bool {
        self.granted.is_empty() && self.pending.is_empty()
    }
}
