//! Ricetrack Client
//!
//! Async seams between the pure protocol evaluator and the external ledger
//! service, plus the client service that ties them together.
//!
//! # Architecture
//!
//! - `channel` - traits for the request submission channel and the
//!   record/agent read API; the only shipped implementation lives in
//!   `ricetrack-testkit`
//! - `service` - `TrackClient`, which fetches a fresh snapshot, runs the
//!   evaluator's local checks, and submits one atomic payload batch
//! - `poll` - fixed-interval snapshot polling over a watch channel
//!
//! Callers serialize state-changing requests per `(record, role)`: no
//! locking is provided here, and a stale snapshot must never be resubmitted.

#![forbid(unsafe_code)]

pub mod channel;
pub mod poll;
pub mod service;

pub use channel::{RecordReadApi, SubmissionChannel};
pub use poll::RecordPoller;
pub use service::TrackClient;
