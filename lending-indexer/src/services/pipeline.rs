//! Sequential event pipeline
//!
//! Events arrive over a bounded channel and are applied one at a time, so
//! read-modify-write cycles on the same key never interleave.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::core::{IndexerResult, LendingEvent, StoragePort};
use crate::domain::{EventOutcome, ProcessorRegistry};

/// Counters reported when the pipeline drains
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub applied: u64,
    pub ignored: u64,
    pub registrations: u64,
}

impl PipelineStats {
    fn record(&mut self, outcome: &EventOutcome) {
        match outcome {
            EventOutcome::Applied(_) => self.applied += 1,
            EventOutcome::Ignored(_) => self.ignored += 1,
            EventOutcome::Registered { .. } => self.registrations += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.applied + self.ignored + self.registrations
    }
}

pub struct EventPipeline<S: StoragePort> {
    registry: Arc<ProcessorRegistry<S>>,
}

impl<S: StoragePort + 'static> EventPipeline<S> {
    pub fn new(registry: Arc<ProcessorRegistry<S>>) -> Self {
        Self { registry }
    }

    /// Bounded channel feeding [`EventPipeline::run`]
    pub fn channel(capacity: usize) -> (mpsc::Sender<LendingEvent>, mpsc::Receiver<LendingEvent>) {
        mpsc::channel(capacity)
    }

    /// Apply a single event
    pub async fn apply(&self, event: &LendingEvent) -> IndexerResult<EventOutcome> {
        self.registry.process_event(event).await
    }

    /// Drain `events` until every sender is dropped.
    ///
    /// The first failing event stops the loop; the collaborator retries it
    /// as a whole.
    pub async fn run(&self, mut events: mpsc::Receiver<LendingEvent>) -> IndexerResult<PipelineStats> {
        let mut stats = PipelineStats::default();

        while let Some(event) = events.recv().await {
            match self.apply(&event).await {
                Ok(outcome) => stats.record(&outcome),
                Err(e) => {
                    error!(
                        "Failed to process {} at {}#{}: {}",
                        event.kind(),
                        event.meta.tx_hash,
                        event.meta.log_index,
                        e
                    );
                    return Err(e);
                }
            }
        }

        info!(
            "Event stream drained: {} applied, {} ignored, {} registrations",
            stats.applied, stats.ignored, stats.registrations
        );
        Ok(stats)
    }
}
