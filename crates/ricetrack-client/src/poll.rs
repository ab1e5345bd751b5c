//! Fixed-interval record polling
//!
//! External changes (a counterpart accepting or rejecting a proposal) become
//! visible only by re-fetching. The poller replaces the entire snapshot
//! atomically on each tick over a `watch` channel; partial updates are never
//! merged. Dropping the poller stops the background task.

use crate::channel::RecordReadApi;
use ricetrack_core::{Record, RecordId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default refresh interval, matching the tracking UI's 2s cadence
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Handle to a background record-polling task
pub struct RecordPoller {
    receiver: watch::Receiver<Option<Record>>,
    handle: JoinHandle<()>,
}

impl RecordPoller {
    /// Spawn a poller for `record_id` with the default interval
    pub fn spawn<R>(read_api: Arc<R>, record_id: RecordId) -> Self
    where
        R: RecordReadApi + 'static,
    {
        Self::spawn_with_interval(read_api, record_id, DEFAULT_POLL_INTERVAL)
    }

    /// Spawn a poller with an explicit interval
    pub fn spawn_with_interval<R>(
        read_api: Arc<R>,
        record_id: RecordId,
        interval: Duration,
    ) -> Self
    where
        R: RecordReadApi + 'static,
    {
        let (sender, receiver) = watch::channel(None);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if sender.is_closed() {
                    break;
                }
                match read_api.fetch_record(&record_id).await {
                    Ok(record) => {
                        debug!(record_id = %record_id, "snapshot refreshed");
                        // Whole-snapshot replacement, never a merge
                        let _ = sender.send(Some(record));
                    }
                    Err(err) => {
                        // Transient read failures keep the last snapshot
                        warn!(record_id = %record_id, %err, "snapshot refresh failed");
                    }
                }
            }
        });
        Self { receiver, handle }
    }

    /// Subscribe to snapshot updates; `None` until the first fetch lands
    pub fn subscribe(&self) -> watch::Receiver<Option<Record>> {
        self.receiver.clone()
    }

    /// Wait until a snapshot is available and return it
    pub async fn latest(&mut self) -> Option<Record> {
        if self.receiver.borrow().is_some() {
            return self.receiver.borrow().clone();
        }
        while self.receiver.changed().await.is_ok() {
            if self.receiver.borrow().is_some() {
                return self.receiver.borrow().clone();
            }
        }
        None
    }
}

impl Drop for RecordPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
