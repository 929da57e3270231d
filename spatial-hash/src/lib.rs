//! # Spatial Hash
//!
//! Deterministic pseudorandom values over a 2D sample lattice: one
//! well-distributed 32-bit hash per grid cell, computed independently and
//! in parallel.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       SPATIAL HASH                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/             - Deterministic primitives                │
//! │  ├── hash.rs       - SmallXxHash accumulator                 │
//! │  ├── vec3.rs       - f32 3D vector                           │
//! │  ├── affine.rs     - 3x4 affine matrix, domain TRS           │
//! │  └── fingerprint.rs- SHA-256 digest of a result              │
//! │                                                              │
//! │  grid/             - Sample coordinates                      │
//! │  ├── sampler.rs    - Index to lattice / plane coordinates    │
//! │  └── shapes.rs     - Surface position generators             │
//! │                                                              │
//! │  pipeline/         - Parallel hashing                        │
//! │  ├── config.rs     - Configuration and validation            │
//! │  ├── job.rs        - Per-cell kernel, row batches            │
//! │  ├── field.rs      - Immutable result                        │
//! │  └── state.rs      - Idle / Computed state machine           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! A field is a pure function of seed, resolution, domain transform, object
//! transform and sample mode. Cells never read each other, so the batch
//! schedule has no effect on the output.
//!
//! ## Example
//!
//! ```
//! use spatial_hash::{HashConfig, HashPipeline, SampleMode, SmallXxHash};
//!
//! let config = HashConfig {
//!     seed: 0,
//!     resolution: 4,
//!     mode: SampleMode::IndexCentered,
//!     ..HashConfig::default()
//! };
//! let mut pipeline = HashPipeline::new(config)?;
//! let field = pipeline.compute()?;
//!
//! assert_eq!(field.len(), 16);
//! assert_eq!(field.hashes()[0], SmallXxHash::seed(0).eat(-2).eat(-2).as_u32());
//! # Ok::<(), spatial_hash::PipelineError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod grid;
pub mod pipeline;

// Re-export commonly used types
pub use crate::core::affine::{Affine3x4, SpaceTrs};
pub use crate::core::hash::SmallXxHash;
pub use crate::core::vec3::Vec3;
pub use crate::grid::shapes::{PositionSource, SampleSet, Shape};
pub use crate::pipeline::{HashConfig, HashField, HashPipeline, PipelineError, PipelineState, SampleMode};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Smallest accepted grid resolution
pub const MIN_RESOLUTION: i32 = 1;

/// Largest accepted grid resolution
pub const MAX_RESOLUTION: i32 = 512;

/// Resolution used when none is configured
pub const DEFAULT_RESOLUTION: i32 = 16;

/// Uniform domain scale used when none is configured
pub const DEFAULT_DOMAIN_SCALE: f32 = 8.0;
