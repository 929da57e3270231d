//! Hash Job
//!
//! The per-cell kernel and its data-parallel schedule.
//!
//! ```text
//!   index ──► coordinate ──► domain transform ──► floor ──► seed.eat(u).eat(v)[.eat(w)]
//!             (per mode)     (plane / surface)
//! ```
//!
//! Cells are split into batches of one grid row each and hashed with rayon.
//! Every cell reads only its own inputs and writes only its own slot, so
//! the output is identical no matter how batches are scheduled.

use rayon::prelude::*;
#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::core::affine::Affine3x4;
use crate::core::hash::SmallXxHash;
use crate::core::vec3::Vec3;
use crate::grid::sampler::{index_to_cell, index_to_plane_uv};

/// Coordinate source for one job.
#[derive(Clone, Copy, Debug)]
pub enum CellSource<'a> {
    /// Integer cell coordinates, no domain transform.
    IndexCentered,
    /// Continuous plane coordinates through the domain transform.
    TransformedPlane,
    /// One position per cell through the domain transform, three axes hashed.
    Positions(&'a [Vec3]),
}

/// Hashes every cell of an `R × R` grid.
#[derive(Clone, Copy, Debug)]
pub struct HashJob<'a> {
    /// Seeded accumulator copied into every cell.
    pub hash: SmallXxHash,
    /// Cells per grid side.
    pub resolution: u32,
    /// Domain transform (ignored for [`CellSource::IndexCentered`]).
    pub domain: Affine3x4,
    /// Coordinate source.
    pub source: CellSource<'a>,
}

impl HashJob<'_> {
    /// Hash of a single cell.
    ///
    /// For [`CellSource::Positions`] the index must be within the slice.
    ///
    /// Transformed coordinates outside the `i32` range, including ±inf from
    /// an extreme domain scale, clamp to `i32::MIN`/`i32::MAX` when floored.
    /// Such cells still hash deterministically but collapse onto the edge
    /// of the lattice.
    #[inline]
    pub fn execute(&self, index: u32) -> u32 {
        match self.source {
            CellSource::IndexCentered => {
                let (u, v) = index_to_cell(index, self.resolution);
                self.hash.eat(u).eat(v).as_u32()
            }
            CellSource::TransformedPlane => {
                let (u, v) = index_to_plane_uv(index, self.resolution);
                let p = self.domain.transform_point(Vec3::new(u, 0.0, v));
                let [u, v, _] = p.floor_to_lattice();
                self.hash.eat(u).eat(v).as_u32()
            }
            CellSource::Positions(positions) => {
                let p = self.domain.transform_point(positions[index as usize]);
                let [u, v, w] = p.floor_to_lattice();
                self.hash.eat(u).eat(v).eat(w).as_u32()
            }
        }
    }

    /// Number of batches the job is split into.
    pub fn batch_count(&self) -> usize {
        self.resolution as usize
    }

    /// Hash all cells, one grid row per batch, and wait for completion.
    pub fn run(&self) -> Vec<u32> {
        let row_len = self.resolution as usize;
        let mut hashes = vec![0u32; row_len * row_len];
        if hashes.is_empty() {
            return hashes;
        }

        hashes
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(row, slots)| {
                let first = (row * row_len) as u32;
                for (offset, slot) in slots.iter_mut().enumerate() {
                    *slot = self.execute(first + offset as u32);
                }
                #[cfg(feature = "debug-tracing")]
                trace!(row, "hash batch complete");
            });

        hashes
    }
}
