//! In-memory ledger with server-side protocol semantics
//!
//! Batches are atomic: payloads are applied to a scratch copy of the state
//! and committed only when every payload succeeds. All payloads in one batch
//! share a timestamp, the way a single ledger transaction would.

use async_trait::async_trait;
use parking_lot::RwLock;
use ricetrack_core::{
    Agent, Property, PropertyUpdate, Proposal, PublicKey, Record, RecordId, RecordUpdates, Result,
    Role, RoleUpdate, TrackError,
};
use ricetrack_client::{RecordReadApi, SubmissionChannel, TrackClient};
use ricetrack_protocol::{Payload, ProposalResponse};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Deterministic test agent; `seed` disambiguates keys
pub fn test_agent(name: &str, seed: u32) -> Agent {
    Agent {
        key: PublicKey::new(format!("02{seed:064x}")),
        name: name.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
struct LedgerState {
    records: BTreeMap<RecordId, Record>,
    agents: Vec<Agent>,
    now_ms: u64,
}

/// The in-memory ledger service double
#[derive(Debug)]
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
}

impl InMemoryLedger {
    /// Create an empty ledger starting at an arbitrary wall-clock epoch
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: RwLock::new(LedgerState {
                now_ms: 1_700_000_000_000,
                ..LedgerState::default()
            }),
        })
    }

    /// Register an agent in the reference collection
    pub fn register_agent(&self, agent: Agent) {
        self.state.write().agents.push(agent);
    }

    /// Pin the ledger clock to `now_ms`
    pub fn set_now(&self, now_ms: u64) {
        self.state.write().now_ms = now_ms;
    }

    /// Seed a prebuilt record snapshot, bypassing the payload path
    pub fn insert_record(&self, record: Record) {
        self.state
            .write()
            .records
            .insert(record.record_id.clone(), record);
    }

    /// A submission channel signing as `signer`
    pub fn channel(self: &Arc<Self>, signer: PublicKey) -> LedgerChannel {
        LedgerChannel {
            ledger: Arc::clone(self),
            signer,
        }
    }

    /// A full client acting as `agent`
    pub fn client(self: &Arc<Self>, agent: &Agent) -> TrackClient<LedgerChannel, Arc<Self>> {
        TrackClient::new(
            agent.key.clone(),
            self.channel(agent.key.clone()),
            Arc::clone(self),
        )
    }

    fn submit_as(&self, signer: &PublicKey, payloads: &[Payload]) -> Result<()> {
        if payloads.is_empty() {
            return Err(TrackError::invalid_request("empty batch"));
        }
        let mut state = self.state.write();
        // Scratch copy keeps the batch atomic
        let mut scratch = state.clone();
        scratch.now_ms += 1_000;
        for payload in payloads {
            apply(&mut scratch, signer, payload)?;
        }
        debug!(count = payloads.len(), signer = %signer, "batch committed");
        *state = scratch;
        Ok(())
    }
}

/// A submission channel bound to one signing identity
#[derive(Clone)]
pub struct LedgerChannel {
    ledger: Arc<InMemoryLedger>,
    signer: PublicKey,
}

#[async_trait]
impl SubmissionChannel for LedgerChannel {
    async fn submit(&self, payloads: &[Payload]) -> Result<()> {
        self.ledger.submit_as(&self.signer, payloads)
    }
}

#[async_trait]
impl RecordReadApi for InMemoryLedger {
    async fn fetch_record(&self, record_id: &RecordId) -> Result<Record> {
        self.state
            .read()
            .records
            .get(record_id)
            .cloned()
            .ok_or_else(|| TrackError::not_found(format!("record {record_id}")))
    }

    async fn fetch_agents(&self) -> Result<Vec<Agent>> {
        Ok(self.state.read().agents.clone())
    }
}

fn apply(state: &mut LedgerState, signer: &PublicKey, payload: &Payload) -> Result<()> {
    match payload {
        Payload::CreateRecord(create) => {
            if create.record_id.is_empty() {
                return Err(TrackError::invalid_request("record id is empty"));
            }
            if state.records.contains_key(&create.record_id) {
                return Err(TrackError::conflict(format!(
                    "record {} already exists",
                    create.record_id
                )));
            }
            let mut updates = RecordUpdates::default();
            let stamp = RoleUpdate {
                timestamp: state.now_ms,
                agent_key: signer.clone(),
            };
            updates.owners.push(stamp.clone());
            updates.custodians.push(stamp);

            let mut properties = Vec::with_capacity(create.properties.len());
            for input in &create.properties {
                if properties.iter().any(|p: &Property| p.name == input.name) {
                    return Err(TrackError::invalid_request(format!(
                        "duplicate property name {}",
                        input.name
                    )));
                }
                properties.push(Property {
                    name: input.name.clone(),
                    data_type: input.data_type,
                    value: Some(input.value.clone()),
                    reporters: vec![signer.clone()],
                });
                updates.properties.insert(
                    input.name.clone(),
                    vec![PropertyUpdate {
                        timestamp: state.now_ms,
                        value: input.value.clone(),
                    }],
                );
            }
            state.records.insert(
                create.record_id.clone(),
                Record {
                    record_id: create.record_id.clone(),
                    owner: signer.clone(),
                    custodian: signer.clone(),
                    is_final: false,
                    properties,
                    proposals: vec![],
                    updates,
                },
            );
            Ok(())
        }

        Payload::FinalizeRecord(finalize) => {
            let record = record_mut(state, &finalize.record_id)?;
            if &record.owner != signer {
                return Err(TrackError::unauthorized(
                    "only the record owner may finalize",
                ));
            }
            if record.is_final {
                return Err(TrackError::conflict(format!(
                    "record {} is already final",
                    finalize.record_id
                )));
            }
            record.is_final = true;
            Ok(())
        }

        Payload::CreateProposal(create) => {
            let record = record_mut(state, &create.record_id)?;
            if record.is_final {
                return Err(TrackError::conflict(format!(
                    "record {} is final",
                    create.record_id
                )));
            }
            if create.receiving_agent.is_empty() {
                return Err(TrackError::invalid_request("receiving agent key is empty"));
            }
            if record
                .proposals
                .iter()
                .any(|p| p.matches(&create.receiving_agent, create.role))
            {
                return Err(TrackError::conflict(format!(
                    "a {} proposal to {} is already pending",
                    create.role.as_lower(),
                    create.receiving_agent
                )));
            }
            match create.role {
                Role::Owner => {
                    if &record.owner != signer {
                        return Err(TrackError::unauthorized(
                            "only the owner may propose an ownership transfer",
                        ));
                    }
                }
                Role::Custodian => {
                    if &record.custodian != signer {
                        return Err(TrackError::unauthorized(
                            "only the custodian may propose a custodianship transfer",
                        ));
                    }
                }
                Role::Reporter => {
                    if &record.owner != signer {
                        return Err(TrackError::unauthorized(
                            "only the owner may propose reporter authorization",
                        ));
                    }
                    if create.properties.is_empty() {
                        return Err(TrackError::invalid_request(
                            "a REPORTER proposal must name at least one property",
                        ));
                    }
                    for name in &create.properties {
                        if record.property(name).is_none() {
                            return Err(TrackError::invalid_request(format!(
                                "no property named {name}"
                            )));
                        }
                    }
                }
            }
            record.proposals.push(Proposal {
                record_id: create.record_id.clone(),
                issuing_agent: signer.clone(),
                receiving_agent: create.receiving_agent.clone(),
                role: create.role,
                properties: create.properties.clone(),
            });
            Ok(())
        }

        Payload::AnswerProposal(answer) => {
            let now_ms = state.now_ms;
            let record = record_mut(state, &answer.record_id)?;
            let index = record
                .proposals
                .iter()
                .position(|p| p.matches(&answer.receiving_agent, answer.role))
                .ok_or_else(|| {
                    TrackError::no_such_proposal(format!(
                        "no {} proposal to {} on record {}",
                        answer.role.as_lower(),
                        answer.receiving_agent,
                        answer.record_id
                    ))
                })?;
            let proposal = record.proposals[index].clone();
            match answer.response {
                ProposalResponse::Accept => {
                    if &proposal.receiving_agent != signer {
                        return Err(TrackError::unauthorized(
                            "only the receiving agent may accept",
                        ));
                    }
                    if record.is_final {
                        return Err(TrackError::conflict(format!(
                            "record {} is final",
                            answer.record_id
                        )));
                    }
                    let stamp = RoleUpdate {
                        timestamp: now_ms,
                        agent_key: proposal.receiving_agent.clone(),
                    };
                    match proposal.role {
                        Role::Owner => {
                            record.owner = proposal.receiving_agent.clone();
                            record.updates.owners.push(stamp);
                        }
                        Role::Custodian => {
                            record.custodian = proposal.receiving_agent.clone();
                            record.updates.custodians.push(stamp);
                        }
                        Role::Reporter => {
                            for name in &proposal.properties {
                                if let Some(property) =
                                    record.properties.iter_mut().find(|p| &p.name == name)
                                {
                                    if !property.has_reporter(&proposal.receiving_agent) {
                                        property
                                            .reporters
                                            .push(proposal.receiving_agent.clone());
                                    }
                                }
                            }
                        }
                    }
                }
                ProposalResponse::Reject => {
                    if &proposal.receiving_agent != signer {
                        return Err(TrackError::unauthorized(
                            "only the receiving agent may reject",
                        ));
                    }
                }
                ProposalResponse::Cancel => {
                    if &proposal.issuing_agent != signer {
                        return Err(TrackError::unauthorized(
                            "only the issuing agent may cancel",
                        ));
                    }
                }
            }
            record.proposals.remove(index);
            Ok(())
        }

        Payload::RevokeReporter(revoke) => {
            let record = record_mut(state, &revoke.record_id)?;
            if &record.owner != signer {
                return Err(TrackError::unauthorized(
                    "only the record owner may revoke reporters",
                ));
            }
            if record.is_final {
                return Err(TrackError::conflict(format!(
                    "record {} is final",
                    revoke.record_id
                )));
            }
            if revoke.properties.is_empty() {
                return Err(TrackError::invalid_request(
                    "a reporter revocation must name at least one property",
                ));
            }
            for name in &revoke.properties {
                let property = record
                    .properties
                    .iter_mut()
                    .find(|p| &p.name == name)
                    .ok_or_else(|| {
                        TrackError::invalid_request(format!("no property named {name}"))
                    })?;
                property.reporters.retain(|key| key != &revoke.reporter_id);
            }
            Ok(())
        }

        Payload::UpdateProperties(update) => {
            let now_ms = state.now_ms;
            let record = record_mut(state, &update.record_id)?;
            if record.is_final {
                return Err(TrackError::conflict(format!(
                    "record {} is final",
                    update.record_id
                )));
            }
            if update.properties.is_empty() {
                return Err(TrackError::invalid_request("no property updates given"));
            }
            for input in &update.properties {
                let property = record
                    .properties
                    .iter_mut()
                    .find(|p| p.name == input.name)
                    .ok_or_else(|| {
                        TrackError::invalid_request(format!("no property named {}", input.name))
                    })?;
                if property.data_type != input.data_type {
                    return Err(TrackError::invalid_request(format!(
                        "property {} is {:?}, got {:?}",
                        input.name, property.data_type, input.data_type
                    )));
                }
                if !property.has_reporter(signer) {
                    return Err(TrackError::unauthorized(format!(
                        "not a reporter for property {}",
                        input.name
                    )));
                }
                property.value = Some(input.value.clone());
                record
                    .updates
                    .properties
                    .entry(input.name.clone())
                    .or_default()
                    .push(PropertyUpdate {
                        timestamp: now_ms,
                        value: input.value.clone(),
                    });
            }
            Ok(())
        }
    }
}

fn record_mut<'a>(state: &'a mut LedgerState, record_id: &RecordId) -> Result<&'a mut Record> {
    state
        .records
        .get_mut(record_id)
        .ok_or_else(|| TrackError::not_found(format!("record {record_id}")))
}
