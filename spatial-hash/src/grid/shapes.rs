//! Position Generators
//!
//! Surface samplers that feed the position-derived hashing mode. Each one
//! produces `R²` positions and normals, index-aligned with the hash grid,
//! already mapped through the instance's object transform.

use std::f32::consts::{PI, TAU};
use rayon::prelude::*;
use serde::{Serialize, Deserialize};

use crate::core::affine::Affine3x4;
use crate::core::vec3::Vec3;
use super::sampler::{index_to_plane_uv, index_to_unit_uv};

/// Positions and normals for one grid, index-aligned.
///
/// `normals` is either empty or the same length as `positions`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleSet {
    /// World-space sample positions.
    pub positions: Vec<Vec3>,
    /// World-space unit normals.
    pub normals: Vec<Vec3>,
}

impl SampleSet {
    /// Positions with matching normals.
    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>) -> Self {
        Self { positions, normals }
    }

    /// Positions only.
    pub fn from_positions(positions: Vec<Vec3>) -> Self {
        Self { positions, normals: Vec::new() }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when there are no samples.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Produces one sample per grid cell.
///
/// Implementations must return exactly `resolution²` positions. The
/// pipeline checks this before hashing.
pub trait PositionSource: Send + Sync {
    /// Generate samples for an `R × R` grid placed by `object_transform`.
    fn generate(&self, resolution: u32, object_transform: &Affine3x4) -> SampleSet;
}

/// Built-in surfaces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Unit square in the XZ plane, centered on the origin, facing +Y.
    #[default]
    Plane,
    /// Sphere of radius 0.5; rows run pole to pole, columns around the
    /// vertical axis.
    UvSphere,
}

impl Shape {
    /// Local-space position and normal for one cell.
    pub fn sample(&self, index: u32, resolution: u32) -> (Vec3, Vec3) {
        match self {
            Shape::Plane => {
                let (u, v) = index_to_plane_uv(index, resolution);
                (Vec3::new(u, 0.0, v), Vec3::Y)
            }
            Shape::UvSphere => {
                let (u, v) = index_to_unit_uv(index, resolution);
                let radius = 0.5;
                let ring = radius * (PI * v).sin();
                let position = Vec3::new(
                    ring * (TAU * u).sin(),
                    -radius * (PI * v).cos(),
                    -ring * (TAU * u).cos(),
                );
                (position, position.normalize())
            }
        }
    }
}

impl PositionSource for Shape {
    fn generate(&self, resolution: u32, object_transform: &Affine3x4) -> SampleSet {
        generate_rows(resolution, object_transform, |index| self.sample(index, resolution))
    }
}

/// Fill an `R × R` sample set one grid row per parallel batch.
///
/// `sample` returns the local-space position and normal of a cell; the
/// object transform is applied here.
pub fn generate_rows<F>(resolution: u32, object_transform: &Affine3x4, sample: F) -> SampleSet
where
    F: Fn(u32) -> (Vec3, Vec3) + Sync,
{
    let len = resolution as usize * resolution as usize;
    if len == 0 {
        return SampleSet::default();
    }

    let mut positions = vec![Vec3::ZERO; len];
    let mut normals = vec![Vec3::ZERO; len];
    let row_len = resolution as usize;

    positions
        .par_chunks_mut(row_len)
        .zip(normals.par_chunks_mut(row_len))
        .enumerate()
        .for_each(|(row, (row_positions, row_normals))| {
            let first = (row * row_len) as u32;
            for (offset, (position, normal)) in
                row_positions.iter_mut().zip(row_normals.iter_mut()).enumerate()
            {
                let (local_position, local_normal) = sample(first + offset as u32);
                *position = object_transform.transform_point(local_position);
                *normal = object_transform.transform_vector(local_normal).normalize();
            }
        });

    SampleSet::new(positions, normals)
}
