//! Event recorder: writes immutable per-log records

use std::sync::Arc;
use tracing::debug;

use crate::core::{IndexerResult, StoragePort};
use crate::domain::models::EventRecord;

pub struct EventRecorder<S: StoragePort> {
    storage: Arc<S>,
}

impl<S: StoragePort> EventRecorder<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Persist `record` under its own key. No existence check: a second
    /// record with the same key replaces the first.
    pub async fn record<R: EventRecord>(&self, record: &R) -> IndexerResult<()> {
        self.storage.save(record).await?;
        debug!("Recorded {} {}", R::KIND, record.id());
        Ok(())
    }
}
