//! Ricetrack Proposal-Transfer Protocol
//!
//! The logical state machine governing how a record's mutable roles (owner,
//! custodian, reporter-per-property) change hands. The ledger service
//! enforces these rules authoritatively; this crate models them client-side
//! so illegal requests are rejected before any network round trip and legal
//! ones are built with the exact wire shapes.
//!
//! # Architecture
//!
//! Evaluation is pure and synchronous over an immutable `Record` snapshot:
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │ Record snapshot │ --> │ Evaluator       │ --> │ Payload(s)      │
//! │ (fetched async) │     │ (pure, sync)    │     │ (submitted via  │
//! └─────────────────┘     └─────────────────┘     │  channel, async)│
//!                                                 └─────────────────┘
//! ```
//!
//! Callers re-fetch the record after any state-changing submission; stale
//! snapshots are never mutated in place and resubmitted.

#![forbid(unsafe_code)]

pub mod evaluator;
pub mod payloads;
pub mod state;

pub use evaluator::{
    answer_proposal, build_transfer_proposal, can_initiate_reporter_grant,
    can_initiate_transfer, current_reporters, ensure_can_initiate_reporter_grant,
    ensure_can_initiate_transfer, has_proposal, potential_reporters, proposal_for,
    revoke_reporter, transfer_candidates,
};
pub use payloads::{
    AnswerProposal, CreateProposal, CreateRecord, FinalizeRecord, Payload, PropertyInput,
    ProposalResponse, RevokeReporter, UpdateProperties,
};
pub use state::{ReporterState, RoleState};
