//! Pure protocol evaluation over a record snapshot
//!
//! Given a record and the acting identity's public key, these functions
//! decide which actions are currently legal and construct the exact request
//! payloads for the chosen action. No function here performs I/O or mutates
//! the snapshot.
//!
//! Local checks cover `InvalidRequest` and `Unauthorized`; `NoSuchProposal`
//! and `Conflict` remain authoritative server-side and can still come back
//! from the channel even when the local checks pass.

use crate::payloads::{AnswerProposal, CreateProposal, ProposalResponse, RevokeReporter};
use ricetrack_core::{
    Agent, Proposal, PublicKey, Record, RecordId, Result, Role, TrackError,
};
use std::collections::BTreeMap;
use tracing::warn;

/// Find the outstanding proposal matching `(receiving_agent, role)`.
///
/// At most one match is expected; if the server ever holds duplicates the
/// first is returned and the anomaly is logged rather than crashing.
pub fn proposal_for<'a>(
    record: &'a Record,
    receiving_agent: &PublicKey,
    role: Role,
) -> Option<&'a Proposal> {
    let mut matches = record
        .proposals
        .iter()
        .filter(|proposal| proposal.matches(receiving_agent, role));
    let first = matches.next();
    if first.is_some() && matches.next().is_some() {
        warn!(
            record_id = %record.record_id,
            receiving_agent = %receiving_agent,
            role = %role,
            "duplicate proposals for one (record, receiver, role) tuple; \
             taking the first"
        );
    }
    first
}

/// True when an outstanding proposal matches `(receiving_agent, role)`
pub fn has_proposal(record: &Record, receiving_agent: &PublicKey, role: Role) -> bool {
    proposal_for(record, receiving_agent, role).is_some()
}

/// Check that `acting_key` may initiate an OWNER or CUSTODIAN transfer.
///
/// Transfer is only ever initiated by the current holder proposing a new
/// holder, never by the receiver requesting the role.
pub fn ensure_can_initiate_transfer(
    record: &Record,
    acting_key: &PublicKey,
    role: Role,
) -> Result<()> {
    let holder = match role {
        Role::Owner => &record.owner,
        Role::Custodian => &record.custodian,
        Role::Reporter => {
            return Err(TrackError::invalid_request(
                "REPORTER is not a single-holder role; grant it via a reporter proposal",
            ))
        }
    };
    if record.is_final {
        return Err(TrackError::conflict(format!(
            "record {} is final",
            record.record_id
        )));
    }
    if holder != acting_key {
        return Err(TrackError::unauthorized(format!(
            "only the current {} may transfer the {} role",
            role.as_lower(),
            role.as_lower()
        )));
    }
    Ok(())
}

/// Boolean form of [`ensure_can_initiate_transfer`]
pub fn can_initiate_transfer(record: &Record, acting_key: &PublicKey, role: Role) -> bool {
    ensure_can_initiate_transfer(record, acting_key, role).is_ok()
}

/// Check that `acting_key` may grant or revoke reporter authorization.
///
/// Only the owner manages reporters, and only while the record is mutable.
pub fn ensure_can_initiate_reporter_grant(record: &Record, acting_key: &PublicKey) -> Result<()> {
    if record.is_final {
        return Err(TrackError::conflict(format!(
            "record {} is final",
            record.record_id
        )));
    }
    if &record.owner != acting_key {
        return Err(TrackError::unauthorized(
            "only the record owner may manage reporter authorization",
        ));
    }
    Ok(())
}

/// Boolean form of [`ensure_can_initiate_reporter_grant`]
pub fn can_initiate_reporter_grant(record: &Record, acting_key: &PublicKey) -> bool {
    ensure_can_initiate_reporter_grant(record, acting_key).is_ok()
}

/// Construct a creation request for a role-transfer proposal.
///
/// REPORTER proposals must name at least one property. OWNER/CUSTODIAN
/// proposals carry no property names; auxiliary property updates travel as
/// a separate `UpdateProperties` payload in the same atomic batch.
pub fn build_transfer_proposal(
    record_id: &RecordId,
    receiving_agent: &PublicKey,
    role: Role,
    properties: Vec<String>,
) -> Result<CreateProposal> {
    if receiving_agent.is_empty() {
        return Err(TrackError::invalid_request("receiving agent key is empty"));
    }
    if role == Role::Reporter && properties.is_empty() {
        return Err(TrackError::invalid_request(
            "a REPORTER proposal must name at least one property",
        ));
    }
    Ok(CreateProposal {
        record_id: record_id.clone(),
        receiving_agent: receiving_agent.clone(),
        role,
        properties,
    })
}

/// Construct an answer for an outstanding proposal.
///
/// Fails with `NoSuchProposal` when no matching proposal exists. CANCEL is
/// only permitted for the proposal's issuing agent; this is a client-side
/// guard, the server enforces the same rule authoritatively.
pub fn answer_proposal(
    record: &Record,
    acting_key: &PublicKey,
    receiving_agent: &PublicKey,
    role: Role,
    response: ProposalResponse,
) -> Result<AnswerProposal> {
    let proposal = proposal_for(record, receiving_agent, role).ok_or_else(|| {
        TrackError::no_such_proposal(format!(
            "no {} proposal to {} on record {}",
            role.as_lower(),
            receiving_agent,
            record.record_id
        ))
    })?;

    if response == ProposalResponse::Cancel && &proposal.issuing_agent != acting_key {
        return Err(TrackError::unauthorized(
            "only the issuing agent may cancel a proposal",
        ));
    }

    Ok(AnswerProposal {
        record_id: record.record_id.clone(),
        receiving_agent: receiving_agent.clone(),
        role,
        response,
    })
}

/// Construct a direct reporter revocation; no proposal round trip.
pub fn revoke_reporter(
    record: &Record,
    acting_key: &PublicKey,
    reporter: &PublicKey,
    properties: Vec<String>,
) -> Result<RevokeReporter> {
    ensure_can_initiate_reporter_grant(record, acting_key)?;
    if properties.is_empty() {
        return Err(TrackError::invalid_request(
            "a reporter revocation must name at least one property",
        ));
    }
    Ok(RevokeReporter {
        record_id: record.record_id.clone(),
        reporter_id: reporter.clone(),
        properties,
    })
}

/// Map every current reporter to the properties they are authorized for.
///
/// One identity may be authorized for several properties via separate
/// grants; the aggregation runs across all properties.
pub fn current_reporters(record: &Record) -> BTreeMap<PublicKey, Vec<String>> {
    let mut reporters: BTreeMap<PublicKey, Vec<String>> = BTreeMap::new();
    for property in &record.properties {
        for key in &property.reporters {
            reporters
                .entry(key.clone())
                .or_default()
                .push(property.name.clone());
        }
    }
    reporters
}

/// Agents who could be offered reporter authorization.
///
/// Excludes the owner, the custodian, anyone already reporting on some
/// property, and anyone with a pending REPORTER proposal (preventing
/// duplicate proposals to the same candidate).
pub fn potential_reporters<'a>(agents: &'a [Agent], record: &Record) -> Vec<&'a Agent> {
    let reporters = current_reporters(record);
    agents
        .iter()
        .filter(|agent| {
            agent.key != record.owner
                && agent.key != record.custodian
                && !reporters.contains_key(&agent.key)
                && !has_proposal(record, &agent.key, Role::Reporter)
        })
        .collect()
}

/// Agents a role transfer could be proposed to.
///
/// An OWNER transfer excludes the current owner; a CUSTODIAN transfer
/// excludes both owner and custodian. For REPORTER this is the
/// [`potential_reporters`] filter.
pub fn transfer_candidates<'a>(
    agents: &'a [Agent],
    record: &Record,
    role: Role,
) -> Vec<&'a Agent> {
    match role {
        Role::Owner => agents
            .iter()
            .filter(|agent| agent.key != record.owner)
            .collect(),
        Role::Custodian => agents
            .iter()
            .filter(|agent| agent.key != record.owner && agent.key != record.custodian)
            .collect(),
        Role::Reporter => potential_reporters(agents, record),
    }
}
