//! Sample coordinates.
//!
//! Index-derived lattice coordinates and surface position generators.

pub mod sampler;
pub mod shapes;

pub use sampler::{index_to_cell, index_to_plane_uv, index_to_unit_uv};
pub use shapes::{PositionSource, SampleSet, Shape};
