//! Replay of newline-delimited JSON event streams
//!
//! A reader task parses lines into the pipeline channel while the pipeline
//! applies them. Shutdown stops the reader, which closes the channel; the
//! pipeline then finishes what it holds and is awaited before returning.

use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tracing::{info, warn};

use super::pipeline::{EventPipeline, PipelineStats};
use crate::core::{IndexerError, IndexerResult, LendingEvent, StoragePort};

/// Outcome of one replay run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Event lines handed to the pipeline
    pub lines: u64,
    pub stats: PipelineStats,
    /// True when shutdown fired before the input was exhausted
    pub interrupted: bool,
}

/// Parse each non-empty line and forward it to the pipeline.
/// Returns the number of events sent.
pub async fn feed_json_lines<R>(reader: R, tx: mpsc::Sender<LendingEvent>) -> IndexerResult<u64>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut count = 0u64;
    let mut line_no = 0u64;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        let event = LendingEvent::from_json_line(&line).map_err(|e| match e {
            IndexerError::Deserialization(reason) => {
                IndexerError::Deserialization(format!("line {}: {}", line_no, reason))
            }
            other => other,
        })?;
        if tx.send(event).await.is_err() {
            warn!("Pipeline closed before input was exhausted");
            break;
        }
        count += 1;
    }

    Ok(count)
}

fn task_error(e: JoinError) -> IndexerError {
    IndexerError::Other(anyhow::Error::new(e).context("replay task failed"))
}

/// Stream `reader` through `pipeline` until the input ends or `shutdown`
/// resolves.
///
/// A reader error (I/O or a malformed line) is returned after the pipeline
/// has drained the events parsed before it. A pipeline error is returned
/// as is.
pub async fn replay_stream<S, R, F>(
    pipeline: EventPipeline<S>,
    reader: R,
    capacity: usize,
    shutdown: F,
) -> IndexerResult<ReplaySummary>
where
    S: StoragePort + 'static,
    R: AsyncBufRead + Unpin + Send + 'static,
    F: Future<Output = ()>,
{
    let (tx, rx) = EventPipeline::<S>::channel(capacity);
    let pipeline_handle = tokio::spawn(async move { pipeline.run(rx).await });
    let mut reader_handle = tokio::spawn(feed_json_lines(reader, tx));
    tokio::pin!(shutdown);

    let finished = tokio::select! {
        result = &mut reader_handle => Some(result),
        _ = &mut shutdown => None,
    };

    let interrupted = finished.is_none();
    let reader_result = match finished {
        Some(result) => result,
        None => {
            info!("Shutdown requested, closing event input");
            reader_handle.abort();
            reader_handle.await
        }
    };

    // Sender is gone either way, so the pipeline drains and exits
    let pipeline_result = pipeline_handle.await.map_err(task_error)?;

    let lines = match reader_result {
        Ok(result) => result?,
        Err(e) if e.is_cancelled() => 0,
        Err(e) => return Err(task_error(e)),
    };
    let stats = pipeline_result?;

    // An aborted reader loses its count; every event it sent was drained
    let lines = if interrupted { stats.total() } else { lines };

    Ok(ReplaySummary {
        lines,
        stats,
        interrupted,
    })
}
