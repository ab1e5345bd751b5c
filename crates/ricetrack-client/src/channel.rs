//! External collaborator traits
//!
//! The evaluator never talks to storage directly; every state-changing
//! operation funnels through a `SubmissionChannel`, and every snapshot comes
//! from a `RecordReadApi`. The read path is eventually consistent with the
//! channel: a just-submitted change may not be visible on the very next read.

use async_trait::async_trait;
use ricetrack_core::{Agent, Record, RecordId, Result};
use ricetrack_protocol::Payload;
use std::sync::Arc;

/// Accepts an ordered list of request payloads as a single atomic batch.
///
/// Resolves on acceptance; rejects with a channel error (the ledger's
/// `{"error": ...}` payload, surfaced via `TrackError`) on failure. Request
/// signing and transport timeouts are this collaborator's concern; they
/// reach the caller only as failures.
#[async_trait]
pub trait SubmissionChannel: Send + Sync {
    /// Submit one atomic batch
    async fn submit(&self, payloads: &[Payload]) -> Result<()>;
}

/// Read-only access to records and the agent reference collection
#[async_trait]
pub trait RecordReadApi: Send + Sync {
    /// Fetch a record snapshot by ID
    async fn fetch_record(&self, record_id: &RecordId) -> Result<Record>;

    /// Fetch the full agent collection
    async fn fetch_agents(&self) -> Result<Vec<Agent>>;
}

#[async_trait]
impl<T: SubmissionChannel + ?Sized> SubmissionChannel for Arc<T> {
    async fn submit(&self, payloads: &[Payload]) -> Result<()> {
        (**self).submit(payloads).await
    }
}

#[async_trait]
impl<T: RecordReadApi + ?Sized> RecordReadApi for Arc<T> {
    async fn fetch_record(&self, record_id: &RecordId) -> Result<Record> {
        (**self).fetch_record(record_id).await
    }

    async fn fetch_agents(&self) -> Result<Vec<Agent>> {
        (**self).fetch_agents().await
    }
}
