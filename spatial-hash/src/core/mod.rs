//! Core deterministic primitives.
//!
//! The hash accumulator, vector and matrix math shared by the sampler and
//! the pipeline. Nothing in here allocates or touches global state.

pub mod hash;
pub mod vec3;
pub mod affine;
pub mod fingerprint;

// Re-export core types
pub use hash::SmallXxHash;
pub use vec3::Vec3;
pub use affine::{Affine3x4, SpaceTrs};
pub use fingerprint::{fingerprint_field, Fingerprint};
