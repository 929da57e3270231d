//! Parallel hash pipeline.
//!
//! Configuration, the per-cell job, the immutable result and the
//! Idle/Computed state machine that ties them together.

pub mod config;
pub mod job;
pub mod field;
pub mod state;

pub use config::{ConfigError, HashConfig, SampleMode};
pub use field::{FieldSummary, HashField};
pub use job::{CellSource, HashJob};
pub use state::{HashPipeline, PipelineError, PipelineState};
