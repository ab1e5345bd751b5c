//! Agent reference data
//!
//! Agents are fetched as a read-only collection; the ledger owns signup and
//! key management.

use crate::identifiers::PublicKey;
use serde::{Deserialize, Serialize};

/// An actor on the ledger, identified by public key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// The agent's public key
    pub key: PublicKey,
    /// Display name
    pub name: String,
}

/// Look up an agent by key in a fetched collection
pub fn agent_by_key<'a>(agents: &'a [Agent], key: &PublicKey) -> Option<&'a Agent> {
    agents.iter().find(|agent| &agent.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_lookup_by_key() {
        let agents = vec![
            Agent {
                key: PublicKey::new("02aa"),
                name: "Pak Budi".to_string(),
            },
            Agent {
                key: PublicKey::new("02bb"),
                name: "Bu Sari".to_string(),
            },
        ];
        assert_eq!(
            agent_by_key(&agents, &PublicKey::new("02bb")).map(|a| a.name.as_str()),
            Some("Bu Sari")
        );
        assert!(agent_by_key(&agents, &PublicKey::new("02cc")).is_none());
    }
}
