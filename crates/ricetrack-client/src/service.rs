//! Client service for state-changing ledger operations
//!
//! Each operation fetches a fresh record snapshot, runs the evaluator's
//! local legality checks, builds the payload(s), and submits them through
//! the channel as one atomic batch. After a successful submission callers
//! re-fetch before presenting new choices; `Conflict` and `NoSuchProposal`
//! coming back from the channel mean the snapshot raced a concurrent change
//! and the correct response is refresh-and-redecide, not retry.

use crate::channel::{RecordReadApi, SubmissionChannel};
use ricetrack_core::{PublicKey, Record, RecordId, Result, Role, TrackError};
use ricetrack_protocol::{
    evaluator, AnswerProposal, CreateProposal, CreateRecord, FinalizeRecord, Payload,
    PropertyInput, ProposalResponse, RevokeReporter, UpdateProperties,
};
use tracing::info;

/// Client bound to one acting identity, a submission channel, and a read API
pub struct TrackClient<C, R> {
    acting_key: PublicKey,
    channel: C,
    read_api: R,
}

impl<C, R> TrackClient<C, R>
where
    C: SubmissionChannel,
    R: RecordReadApi,
{
    /// Bind an acting identity to its channel and read API
    pub fn new(acting_key: PublicKey, channel: C, read_api: R) -> Self {
        Self {
            acting_key,
            channel,
            read_api,
        }
    }

    /// The identity this client acts as
    pub fn acting_key(&self) -> &PublicKey {
        &self.acting_key
    }

    /// Fetch a fresh record snapshot
    pub async fn fetch_record(&self, record_id: &RecordId) -> Result<Record> {
        self.read_api.fetch_record(record_id).await
    }

    /// Fetch the agent reference collection
    pub async fn fetch_agents(&self) -> Result<Vec<ricetrack_core::Agent>> {
        self.read_api.fetch_agents().await
    }

    /// Create a new record with its initial properties
    pub async fn create_record(
        &self,
        record_id: RecordId,
        properties: Vec<PropertyInput>,
    ) -> Result<()> {
        if record_id.is_empty() {
            return Err(TrackError::invalid_request("record id is empty"));
        }
        let payload = Payload::CreateRecord(CreateRecord {
            record_id: record_id.clone(),
            properties,
        });
        self.submit_batch(&[payload]).await?;
        info!(record_id = %record_id, "record created");
        Ok(())
    }

    /// Propose an OWNER or CUSTODIAN transfer, optionally bundling property
    /// updates (e.g. a sale price or a transaction timestamp) into the same
    /// atomic batch.
    pub async fn propose_transfer(
        &self,
        record_id: &RecordId,
        receiving_agent: &PublicKey,
        role: Role,
        bundled_updates: Vec<PropertyInput>,
    ) -> Result<()> {
        let record = self.read_api.fetch_record(record_id).await?;
        evaluator::ensure_can_initiate_transfer(&record, &self.acting_key, role)?;
        if evaluator::has_proposal(&record, receiving_agent, role) {
            return Err(TrackError::conflict(format!(
                "a {} proposal to {} is already pending",
                role.as_lower(),
                receiving_agent
            )));
        }
        let proposal: CreateProposal =
            evaluator::build_transfer_proposal(record_id, receiving_agent, role, vec![])?;

        let mut batch = Vec::with_capacity(2);
        if !bundled_updates.is_empty() {
            batch.push(Payload::UpdateProperties(UpdateProperties {
                record_id: record_id.clone(),
                properties: bundled_updates,
            }));
        }
        batch.push(Payload::CreateProposal(proposal));
        self.submit_batch(&batch).await?;
        info!(
            record_id = %record_id,
            receiving_agent = %receiving_agent,
            role = %role,
            "transfer proposed"
        );
        Ok(())
    }

    /// Propose REPORTER authorization for the named properties
    pub async fn authorize_reporter(
        &self,
        record_id: &RecordId,
        reporter: &PublicKey,
        properties: Vec<String>,
    ) -> Result<()> {
        let record = self.read_api.fetch_record(record_id).await?;
        evaluator::ensure_can_initiate_reporter_grant(&record, &self.acting_key)?;
        if evaluator::has_proposal(&record, reporter, Role::Reporter) {
            return Err(TrackError::conflict(format!(
                "a reporter proposal to {reporter} is already pending"
            )));
        }
        let proposal =
            evaluator::build_transfer_proposal(record_id, reporter, Role::Reporter, properties)?;
        self.submit_batch(&[Payload::CreateProposal(proposal)]).await?;
        info!(record_id = %record_id, reporter = %reporter, "reporter authorization proposed");
        Ok(())
    }

    /// Accept, reject, or cancel an outstanding proposal
    pub async fn answer_proposal(
        &self,
        record_id: &RecordId,
        receiving_agent: &PublicKey,
        role: Role,
        response: ProposalResponse,
    ) -> Result<()> {
        let record = self.read_api.fetch_record(record_id).await?;
        let answer: AnswerProposal = evaluator::answer_proposal(
            &record,
            &self.acting_key,
            receiving_agent,
            role,
            response,
        )?;
        self.submit_batch(&[Payload::AnswerProposal(answer)]).await?;
        info!(
            record_id = %record_id,
            receiving_agent = %receiving_agent,
            role = %role,
            ?response,
            "proposal answered"
        );
        Ok(())
    }

    /// Directly revoke a reporter's authorization for the named properties
    pub async fn revoke_reporter(
        &self,
        record_id: &RecordId,
        reporter: &PublicKey,
        properties: Vec<String>,
    ) -> Result<()> {
        let record = self.read_api.fetch_record(record_id).await?;
        let revoke: RevokeReporter =
            evaluator::revoke_reporter(&record, &self.acting_key, reporter, properties)?;
        self.submit_batch(&[Payload::RevokeReporter(revoke)]).await?;
        info!(record_id = %record_id, reporter = %reporter, "reporter authorization revoked");
        Ok(())
    }

    /// Report new values for properties the acting identity reports on
    pub async fn update_properties(
        &self,
        record_id: &RecordId,
        properties: Vec<PropertyInput>,
    ) -> Result<()> {
        if properties.is_empty() {
            return Err(TrackError::invalid_request("no property updates given"));
        }
        let record = self.read_api.fetch_record(record_id).await?;
        if record.is_final {
            return Err(TrackError::conflict(format!("record {record_id} is final")));
        }
        for input in &properties {
            if !record.is_reporter(&input.name, &self.acting_key) {
                return Err(TrackError::unauthorized(format!(
                    "not a reporter for property {}",
                    input.name
                )));
            }
        }
        let update = Payload::UpdateProperties(UpdateProperties {
            record_id: record_id.clone(),
            properties,
        });
        self.submit_batch(&[update]).await?;
        info!(record_id = %record_id, "properties updated");
        Ok(())
    }

    /// Mark a record immutable; owner-only, one-way
    pub async fn finalize_record(&self, record_id: &RecordId) -> Result<()> {
        let record = self.read_api.fetch_record(record_id).await?;
        if record.is_final {
            return Err(TrackError::conflict(format!(
                "record {record_id} is already final"
            )));
        }
        if record.owner != self.acting_key {
            return Err(TrackError::unauthorized(
                "only the record owner may finalize",
            ));
        }
        let payload = Payload::FinalizeRecord(FinalizeRecord {
            record_id: record_id.clone(),
        });
        self.submit_batch(&[payload]).await?;
        info!(record_id = %record_id, "record finalized");
        Ok(())
    }

    async fn submit_batch(&self, payloads: &[Payload]) -> Result<()> {
        self.channel.submit(payloads).await
    }
}
