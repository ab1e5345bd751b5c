//! Property-based checks of the evaluator's filter algebra

use proptest::prelude::*;
use ricetrack_core::{
    Agent, Property, PropertyDataType, Proposal, PublicKey, Record, RecordId, RecordUpdates, Role,
};
use ricetrack_protocol::{
    can_initiate_transfer, current_reporters, potential_reporters, ProposalResponse,
};

const POOL: usize = 8;

fn key(i: usize) -> PublicKey {
    PublicKey::new(format!("02{:064x}", i + 1))
}

fn agents() -> Vec<Agent> {
    (0..POOL)
        .map(|i| Agent {
            key: key(i),
            name: format!("agent-{i}"),
        })
        .collect()
}

/// An arbitrary record over the fixed agent pool
fn arb_record() -> impl Strategy<Value = Record> {
    (
        0..POOL,                                  // owner
        0..POOL,                                  // custodian
        proptest::collection::vec(0..POOL, 0..4), // reporters on lokasi
        proptest::collection::vec(0..POOL, 0..4), // reporters on harga
        proptest::collection::vec(0..POOL, 0..3), // pending reporter proposals
        any::<bool>(),                            // final flag
    )
        .prop_map(|(owner, custodian, lokasi, harga, pending, is_final)| {
            let property = |name: &str, reporters: &[usize]| Property {
                name: name.to_string(),
                data_type: PropertyDataType::Int,
                value: None,
                reporters: reporters.iter().map(|i| key(*i)).collect(),
            };
            let record_id = RecordId::new("RICE-prop");
            let proposals = pending
                .into_iter()
                .map(|i| Proposal {
                    record_id: record_id.clone(),
                    issuing_agent: key(owner),
                    receiving_agent: key(i),
                    role: Role::Reporter,
                    properties: vec!["lokasi".to_string()],
                })
                .collect();
            Record {
                record_id,
                owner: key(owner),
                custodian: key(custodian),
                is_final,
                properties: vec![property("lokasi", &lokasi), property("harga", &harga)],
                proposals,
                updates: RecordUpdates::default(),
            }
        })
}

proptest! {
    /// Potential reporters never include the owner, the custodian, a current
    /// reporter, or a pending REPORTER proposal receiver.
    #[test]
    fn potential_reporters_exclusions(record in arb_record()) {
        let agents = agents();
        let reporters = current_reporters(&record);
        for candidate in potential_reporters(&agents, &record) {
            prop_assert_ne!(&candidate.key, &record.owner);
            prop_assert_ne!(&candidate.key, &record.custodian);
            prop_assert!(!reporters.contains_key(&candidate.key));
            prop_assert!(record
                .proposals
                .iter()
                .all(|p| p.receiving_agent != candidate.key));
        }
    }

    /// Every agent is either excluded for a reason or listed as potential.
    #[test]
    fn potential_reporters_complement(record in arb_record()) {
        let agents = agents();
        let reporters = current_reporters(&record);
        let potential = potential_reporters(&agents, &record);
        for agent in &agents {
            let excluded = agent.key == record.owner
                || agent.key == record.custodian
                || reporters.contains_key(&agent.key)
                || record.proposals.iter().any(|p| p.receiving_agent == agent.key);
            let listed = potential.iter().any(|a| a.key == agent.key);
            prop_assert_eq!(excluded, !listed);
        }
    }

    /// Transfer initiation holds exactly for the current holder of a
    /// non-final record.
    #[test]
    fn transfer_initiation_is_holder_gated(record in arb_record(), actor in 0..POOL) {
        let acting = key(actor);
        let owner_may = can_initiate_transfer(&record, &acting, Role::Owner);
        let custodian_may = can_initiate_transfer(&record, &acting, Role::Custodian);
        prop_assert_eq!(owner_may, !record.is_final && acting == record.owner);
        prop_assert_eq!(custodian_may, !record.is_final && acting == record.custodian);
    }

    /// Cancel legality is issuer-bound regardless of the rest of the record.
    #[test]
    fn cancel_is_issuer_bound(record in arb_record(), actor in 0..POOL) {
        let acting = key(actor);
        for proposal in &record.proposals {
            let answer = ricetrack_protocol::answer_proposal(
                &record,
                &acting,
                &proposal.receiving_agent,
                proposal.role,
                ProposalResponse::Cancel,
            );
            prop_assert_eq!(answer.is_ok(), acting == proposal.issuing_agent);
        }
    }
}
