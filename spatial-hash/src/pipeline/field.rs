//! Hash Field
//!
//! The result of one computation: `R²` hashes plus the positions and
//! normals they were derived from. A field never changes after it is
//! built; recomputing produces a new one.

use serde::Serialize;

use crate::core::fingerprint::{fingerprint_field, Fingerprint};
use crate::core::vec3::Vec3;
use super::config::SampleMode;

/// Immutable per-cell hash results, index-aligned with their samples.
#[derive(Clone, Debug, PartialEq)]
pub struct HashField {
    mode: SampleMode,
    seed: i32,
    resolution: u32,
    vertical_offset: f32,
    hashes: Vec<u32>,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
}

impl HashField {
    pub(crate) fn new(
        mode: SampleMode,
        seed: i32,
        resolution: u32,
        vertical_offset: f32,
        hashes: Vec<u32>,
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
    ) -> Self {
        debug_assert_eq!(hashes.len(), resolution as usize * resolution as usize);
        Self {
            mode,
            seed,
            resolution,
            vertical_offset,
            hashes,
            positions,
            normals,
        }
    }

    /// Coordinate source the field was hashed from.
    pub fn mode(&self) -> SampleMode {
        self.mode
    }

    /// Seed the field was hashed with.
    pub fn seed(&self) -> i32 {
        self.seed
    }

    /// Cells per grid side.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// One hash per cell, row by row.
    pub fn hashes(&self) -> &[u32] {
        &self.hashes
    }

    /// Sample positions. Empty for index-derived modes.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Sample normals. Empty for index-derived modes or when the generator
    /// supplied none.
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// True when the field holds no cells.
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Hash at grid column `u`, row `v`.
    pub fn get(&self, u: u32, v: u32) -> Option<u32> {
        if u >= self.resolution || v >= self.resolution {
            return None;
        }
        self.hashes.get((v * self.resolution + u) as usize).copied()
    }

    /// Iterate over grid rows.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.hashes.chunks(self.resolution.max(1) as usize)
    }

    /// Per-draw renderer config: `(R, 1 / R, vertical_offset / R)`.
    pub fn instance_config(&self) -> [f32; 3] {
        let r = self.resolution as f32;
        [r, 1.0 / r, self.vertical_offset / r]
    }

    /// SHA-256 over seed, resolution and every hash.
    pub fn fingerprint(&self) -> Fingerprint {
        fingerprint_field(self.seed, self.resolution, &self.hashes)
    }

    /// Summary statistics for logs and reports.
    pub fn summary(&self) -> FieldSummary {
        let min = self.hashes.iter().copied().min().unwrap_or(0);
        let max = self.hashes.iter().copied().max().unwrap_or(0);
        let top_byte_sum: u64 = self.hashes.iter().map(|h| (h >> 24) as u64).sum();
        let mean_top_byte = if self.hashes.is_empty() {
            0.0
        } else {
            top_byte_sum as f64 / self.hashes.len() as f64
        };

        FieldSummary {
            seed: self.seed,
            resolution: self.resolution,
            cells: self.hashes.len(),
            min,
            max,
            mean_top_byte,
            fingerprint: hex::encode(self.fingerprint()),
        }
    }
}

/// Condensed view of a field.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldSummary {
    /// Seed used.
    pub seed: i32,
    /// Cells per side.
    pub resolution: u32,
    /// Total cells.
    pub cells: usize,
    /// Smallest hash.
    pub min: u32,
    /// Largest hash.
    pub max: u32,
    /// Mean of the top byte; near 127.5 for a well-spread field.
    pub mean_top_byte: f64,
    /// Hex fingerprint.
    pub fingerprint: String,
}
