//! Grid Sampler
//!
//! Maps a linear cell index `i ∈ [0, R²)` to a lattice coordinate. Rows are
//! derived with single-precision arithmetic and a small epsilon so the
//! results stay bit-identical to the float formulation shaders and
//! position generators use:
//!
//! ```text
//!   row    = floor(i / R + 1e-5)          (f32)
//!   column = i - R * row
//! ```
//!
//! For resolutions above a few hundred the epsilon can no longer absorb the
//! rounding of `i / R`, and a handful of cells land one row early. That is
//! kept as-is for output parity.

/// Guard added before flooring so exact row boundaries do not round down.
pub const ROW_EPSILON: f32 = 0.00001;

/// Row of cell `index` as a float, `floor(index / resolution + ε)`.
#[inline]
pub fn row_of(index: u32, resolution: u32) -> f32 {
    let inv_resolution = 1.0 / resolution as f32;
    (inv_resolution * index as f32 + ROW_EPSILON).floor()
}

/// Integer cell coordinates centered on the origin.
///
/// Columns and rows both run over `[-R/2, R - R/2)` with integer division,
/// so even resolutions are symmetric and odd ones lean one cell positive.
#[inline]
pub fn index_to_cell(index: u32, resolution: u32) -> (i32, i32) {
    let r = resolution as i32;
    let v = row_of(index, resolution) as i32;
    let u = index as i32 - r * v - r / 2;
    (u, v - r / 2)
}

/// Continuous cell centers on a unit square centered on the origin,
/// each coordinate in `(-0.5, 0.5)`.
#[inline]
pub fn index_to_plane_uv(index: u32, resolution: u32) -> (f32, f32) {
    let (u, v) = index_to_unit_uv(index, resolution);
    (u - 0.5, v - 0.5)
}

/// Continuous cell centers on the unit square `(0, 1)²`.
#[inline]
pub fn index_to_unit_uv(index: u32, resolution: u32) -> (f32, f32) {
    let inv_resolution = 1.0 / resolution as f32;
    let row = row_of(index, resolution);
    let u = inv_resolution * (index as f32 - resolution as f32 * row + 0.5);
    let v = inv_resolution * (row + 0.5);
    (u, v)
}
