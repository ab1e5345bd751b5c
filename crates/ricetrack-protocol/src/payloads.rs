//! Request payloads accepted by the submission channel
//!
//! Field names match the ledger's JSON contract (`recordId`,
//! `receivingAgent`, ...). A batch is an ordered list of `Payload` values
//! submitted atomically; mixing payload kinds in one batch is how auxiliary
//! property updates ride along with a transfer proposal.

use ricetrack_core::{PropertyDataType, PropertyValue, PublicKey, RecordId, Role};
use serde::{Deserialize, Serialize};

/// A property name/type/value triple carried by create and update payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInput {
    /// Property name, unique within the record
    pub name: String,
    /// Declared data type
    pub data_type: PropertyDataType,
    /// The reported value, flattened into its wire field name
    #[serde(flatten)]
    pub value: PropertyValue,
}

impl PropertyInput {
    /// Build an input whose data type is derived from the value
    pub fn new(name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        let value = value.into();
        Self {
            name: name.into(),
            data_type: value.data_type(),
            value,
        }
    }
}

/// Create a new tracked record with its initial properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecord {
    /// The new record's identifier
    pub record_id: RecordId,
    /// Initial properties, reported by the creator
    pub properties: Vec<PropertyInput>,
}

/// Mark a record immutable; one-way
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeRecord {
    /// Record to finalize
    pub record_id: RecordId,
}

/// Propose a role change on a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProposal {
    /// Record the proposal targets
    pub record_id: RecordId,
    /// Identity proposed to receive the role
    pub receiving_agent: PublicKey,
    /// Role being transferred or granted
    pub role: Role,
    /// Property names a REPORTER grant covers; omitted for OWNER/CUSTODIAN
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<String>,
}

/// Resolution of an outstanding proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalResponse {
    /// Role transfers to the receiving agent
    Accept,
    /// Proposal discarded by the receiver, no state change
    Reject,
    /// Proposal withdrawn by its issuer
    Cancel,
}

/// Answer an outstanding proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerProposal {
    /// Record the proposal targets
    pub record_id: RecordId,
    /// Receiving agent of the proposal being answered
    pub receiving_agent: PublicKey,
    /// Role of the proposal being answered
    pub role: Role,
    /// Accept, reject, or cancel
    pub response: ProposalResponse,
}

/// Directly remove reporter authorization; no proposal round trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeReporter {
    /// Record the revocation targets
    pub record_id: RecordId,
    /// Reporter losing authorization
    pub reporter_id: PublicKey,
    /// Properties the revocation covers
    pub properties: Vec<String>,
}

/// Report new values for one or more properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProperties {
    /// Record being updated
    pub record_id: RecordId,
    /// Property values to report
    pub properties: Vec<PropertyInput>,
}

/// Any request the submission channel accepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Payload {
    /// Create a new record
    CreateRecord(CreateRecord),
    /// Finalize a record
    FinalizeRecord(FinalizeRecord),
    /// Propose a role change
    CreateProposal(CreateProposal),
    /// Answer an outstanding proposal
    AnswerProposal(AnswerProposal),
    /// Revoke reporter authorization
    RevokeReporter(RevokeReporter),
    /// Report property values
    UpdateProperties(UpdateProperties),
}

impl Payload {
    /// The record this payload targets
    pub fn record_id(&self) -> &RecordId {
        match self {
            Payload::CreateRecord(p) => &p.record_id,
            Payload::FinalizeRecord(p) => &p.record_id,
            Payload::CreateProposal(p) => &p.record_id,
            Payload::AnswerProposal(p) => &p.record_id,
            Payload::RevokeReporter(p) => &p.record_id,
            Payload::UpdateProperties(p) => &p.record_id,
        }
    }
}
