//! Long-running services driving the domain layer

pub mod pipeline;
pub mod replay;

pub use pipeline::{EventPipeline, PipelineStats};
pub use replay::{feed_json_lines, replay_stream, ReplaySummary};
