//! Ricetrack Testkit
//!
//! An in-memory ledger implementing the server-side semantics the real
//! ledger service enforces: proposal uniqueness per `(record, receiver,
//! role)` tuple, role transfer on ACCEPT, direct reporter revocation, the
//! one-way `final` flag, and atomic payload batches. Integration tests run
//! the client against it to verify the protocol properties end to end.

#![forbid(unsafe_code)]

pub mod builders;
pub mod ledger;

pub use builders::RecordBuilder;
pub use ledger::{test_agent, InMemoryLedger, LedgerChannel};

/// Install a fmt subscriber honoring `RUST_LOG`; idempotent across tests
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
