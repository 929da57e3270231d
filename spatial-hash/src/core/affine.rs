//! Affine Transforms
//!
//! Two affine maps act on every position-derived sample:
//!
//! ```text
//!   raw position ──► object transform ──► domain transform ──► floor ──► hash
//!                    (instance placement)  (SpaceTrs: pattern frequency)
//! ```
//!
//! Both are stored as [`Affine3x4`] values and kept separate so each can be
//! tested and changed on its own.

use serde::{Deserialize, Deserializer, Serialize};

use crate::DEFAULT_DOMAIN_SCALE;
use super::vec3::Vec3;

/// Column-major 3×4 affine matrix: a 3×3 linear part plus a translation
/// column.
///
/// Points are treated as homogeneous `(x, y, z, 1)`, vectors as
/// `(x, y, z, 0)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine3x4 {
    /// First linear column (image of +X)
    pub c0: Vec3,
    /// Second linear column (image of +Y)
    pub c1: Vec3,
    /// Third linear column (image of +Z)
    pub c2: Vec3,
    /// Translation column
    pub c3: Vec3,
}

impl Default for Affine3x4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine3x4 {
    /// The identity map.
    pub const IDENTITY: Self = Self {
        c0: Vec3::X,
        c1: Vec3::Y,
        c2: Vec3::Z,
        c3: Vec3::ZERO,
    };

    /// Build from explicit columns.
    #[inline]
    pub const fn from_cols(c0: Vec3, c1: Vec3, c2: Vec3, c3: Vec3) -> Self {
        Self { c0, c1, c2, c3 }
    }

    /// Pure translation.
    #[inline]
    pub const fn from_translation(translation: Vec3) -> Self {
        Self {
            c3: translation,
            ..Self::IDENTITY
        }
    }

    /// Pure (possibly non-uniform) scale.
    #[inline]
    pub const fn from_scale(scale: Vec3) -> Self {
        Self {
            c0: Vec3::new(scale.x, 0.0, 0.0),
            c1: Vec3::new(0.0, scale.y, 0.0),
            c2: Vec3::new(0.0, 0.0, scale.z),
            c3: Vec3::ZERO,
        }
    }

    /// Rotation from Euler angles in degrees.
    ///
    /// Applied about Z first, then X, then Y: `R = Ry · Rx · Rz`.
    pub fn from_euler_degrees(degrees: Vec3) -> Self {
        let (sx, cx) = degrees.x.to_radians().sin_cos();
        let (sy, cy) = degrees.y.to_radians().sin_cos();
        let (sz, cz) = degrees.z.to_radians().sin_cos();

        let rz = Self::from_cols(
            Vec3::new(cz, sz, 0.0),
            Vec3::new(-sz, cz, 0.0),
            Vec3::Z,
            Vec3::ZERO,
        );
        let rx = Self::from_cols(
            Vec3::X,
            Vec3::new(0.0, cx, sx),
            Vec3::new(0.0, -sx, cx),
            Vec3::ZERO,
        );
        let ry = Self::from_cols(
            Vec3::new(cy, 0.0, -sy),
            Vec3::Y,
            Vec3::new(sy, 0.0, cy),
            Vec3::ZERO,
        );

        rz.then(&rx).then(&ry)
    }

    /// Translation · rotation · scale.
    pub fn from_trs(translation: Vec3, rotation_degrees: Vec3, scale: Vec3) -> Self {
        Self::from_scale(scale)
            .then(&Self::from_euler_degrees(rotation_degrees))
            .then(&Self::from_translation(translation))
    }

    /// Transform a point (w = 1).
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.c0 * p.x + self.c1 * p.y + self.c2 * p.z + self.c3
    }

    /// Transform a direction (w = 0). Translation is ignored.
    #[inline]
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        self.c0 * v.x + self.c1 * v.y + self.c2 * v.z
    }

    /// Compose: apply `self` first, then `next`.
    pub fn then(&self, next: &Self) -> Self {
        Self {
            c0: next.transform_vector(self.c0),
            c1: next.transform_vector(self.c1),
            c2: next.transform_vector(self.c2),
            c3: next.transform_point(self.c3),
        }
    }

    /// True when every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.c0.is_finite() && self.c1.is_finite() && self.c2.is_finite() && self.c3.is_finite()
    }

    /// Row-major rows, each `[m0, m1, m2, translation]`.
    pub fn to_rows(&self) -> [[f32; 4]; 3] {
        [
            [self.c0.x, self.c1.x, self.c2.x, self.c3.x],
            [self.c0.y, self.c1.y, self.c2.y, self.c3.y],
            [self.c0.z, self.c1.z, self.c2.z, self.c3.z],
        ]
    }
}

// =============================================================================
// DOMAIN TRANSFORM
// =============================================================================

/// User-facing translation/rotation/scale of the hashing domain.
///
/// Larger scale packs more lattice cells into the same sample area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceTrs {
    /// Translation applied last.
    pub translation: Vec3,
    /// Euler rotation in degrees (Z, then X, then Y).
    pub rotation: Vec3,
    /// Per-axis scale applied first. Accepts a bare number in config files.
    #[serde(deserialize_with = "deserialize_scale")]
    pub scale: Vec3,
}

impl Default for SpaceTrs {
    fn default() -> Self {
        Self::uniform(DEFAULT_DOMAIN_SCALE)
    }
}

impl SpaceTrs {
    /// Uniform scale, no rotation or translation.
    pub const fn uniform(scale: f32) -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::splat(scale),
        }
    }

    /// Scale one, no rotation or translation.
    pub const fn identity() -> Self {
        Self::uniform(1.0)
    }

    /// Composed 3×4 matrix.
    pub fn matrix(&self) -> Affine3x4 {
        Affine3x4::from_trs(self.translation, self.rotation, self.scale)
    }

    /// Transform a single point through the composed matrix.
    pub fn apply(&self, point: Vec3) -> Vec3 {
        self.matrix().transform_point(point)
    }

    /// True when every parameter is finite.
    pub fn is_finite(&self) -> bool {
        self.translation.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScaleRepr {
    Uniform(f32),
    PerAxis(Vec3),
}

fn deserialize_scale<'de, D>(deserializer: D) -> Result<Vec3, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match ScaleRepr::deserialize(deserializer)? {
        ScaleRepr::Uniform(s) => Vec3::splat(s),
        ScaleRepr::PerAxis(v) => v,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_default_domain() {
        let domain = SpaceTrs::default();
        assert_eq!(domain.scale, Vec3::splat(8.0));
        assert_eq!(domain.rotation, Vec3::ZERO);
        assert_eq!(domain.translation, Vec3::ZERO);
        assert_eq!(domain.apply(Vec3::new(0.5, 0.0, -0.25)), Vec3::new(4.0, 0.0, -2.0));
    }

    #[test]
    fn test_identity_matrix_exact() {
        assert_eq!(SpaceTrs::identity().matrix(), Affine3x4::IDENTITY);
    }

    #[test]
    fn test_trs_order() {
        // scale 2, rotate 90° about Y, translate +1 X
        let m = Affine3x4::from_trs(Vec3::X, Vec3::new(0.0, 90.0, 0.0), Vec3::splat(2.0));
        // +X scaled to 2, rotated about Y to -Z, then shifted
        let p = m.transform_point(Vec3::X);
        assert!(approx_eq(p, Vec3::new(1.0, 0.0, -2.0)), "{p:?}");
    }

    #[test]
    fn test_euler_order_z_then_x() {
        // 90° about Z sends +X to +Y; 90° about X then sends +Y to +Z.
        let m = Affine3x4::from_euler_degrees(Vec3::new(90.0, 0.0, 90.0));
        let p = m.transform_point(Vec3::X);
        assert!(approx_eq(p, Vec3::Z), "{p:?}");
    }

    #[test]
    fn test_transform_vector_ignores_translation() {
        let m = Affine3x4::from_translation(Vec3::new(5.0, 6.0, 7.0));
        assert_eq!(m.transform_vector(Vec3::Y), Vec3::Y);
        assert_eq!(m.transform_point(Vec3::ZERO), Vec3::new(5.0, 6.0, 7.0));
    }

    #[test]
    fn test_then_composition() {
        let object = Affine3x4::from_trs(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 30.0, 0.0), Vec3::ONE);
        let domain = SpaceTrs::uniform(8.0).matrix();
        let p = Vec3::new(0.25, 0.0, -0.4);

        let composed = object.then(&domain).transform_point(p);
        let stepwise = domain.transform_point(object.transform_point(p));
        assert!(approx_eq(composed, stepwise));
    }

    #[test]
    fn test_to_rows() {
        let m = Affine3x4::from_trs(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(
            m.to_rows(),
            [[4.0, 0.0, 0.0, 1.0], [0.0, 5.0, 0.0, 2.0], [0.0, 0.0, 6.0, 3.0]]
        );
    }

    #[test]
    fn test_deserialize_uniform_scale() {
        let domain: SpaceTrs = serde_json::from_str(r#"{"scale": 4}"#).unwrap();
        assert_eq!(domain.scale, Vec3::splat(4.0));
        assert_eq!(domain.rotation, Vec3::ZERO);
    }

    #[test]
    fn test_deserialize_per_axis_scale() {
        let domain: SpaceTrs = serde_json::from_str(
            r#"{"scale": {"x": 1, "y": 2, "z": 3}, "rotation": {"x": 0, "y": 45, "z": 0}}"#,
        )
        .unwrap();
        assert_eq!(domain.scale, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(domain.rotation.y, 45.0);
    }

    #[test]
    fn test_deserialize_missing_fields_use_defaults() {
        let domain: SpaceTrs = serde_json::from_str("{}").unwrap();
        assert_eq!(domain, SpaceTrs::default());
    }

    proptest! {
        #[test]
        fn prop_identity_round_trip(x in -1.0e4f32..1.0e4, y in -1.0e4f32..1.0e4, z in -1.0e4f32..1.0e4) {
            let p = Vec3::new(x, y, z);
            prop_assert_eq!(SpaceTrs::identity().apply(p), p);
        }
    }
}
