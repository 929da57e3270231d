//! Pipeline Configuration
//!
//! Everything that determines a hash field, in one serializable value.
//! Configurations are validated before any buffer is allocated.

use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};

use crate::core::affine::SpaceTrs;
use crate::grid::shapes::Shape;
use crate::{DEFAULT_RESOLUTION, MAX_RESOLUTION, MIN_RESOLUTION};

/// Lowest accepted vertical offset.
pub const MIN_VERTICAL_OFFSET: f32 = -2.0;

/// Highest accepted vertical offset.
pub const MAX_VERTICAL_OFFSET: f32 = 2.0;

/// Where each cell's lattice coordinate comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SampleMode {
    /// Integer cell coordinates centered on the origin, hashed directly.
    /// The domain transform is not used.
    IndexCentered,
    /// Continuous plane coordinates pushed through the domain transform.
    TransformedPlane,
    /// Positions from a surface generator, placed by the object transform
    /// and then pushed through the domain transform. The vertical axis is
    /// hashed as well.
    Surface {
        /// Surface to sample.
        shape: Shape,
    },
    /// Positions supplied by the caller through
    /// `HashPipeline::compute_with_samples` or `compute_with_source`,
    /// hashed the same way as `Surface`.
    External,
}

impl Default for SampleMode {
    fn default() -> Self {
        SampleMode::Surface { shape: Shape::Plane }
    }
}

impl SampleMode {
    /// True when samples come from positions rather than the index alone.
    pub fn is_position_derived(&self) -> bool {
        matches!(self, SampleMode::Surface { .. } | SampleMode::External)
    }
}

/// Hash field configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashConfig {
    /// Seed for every cell's hash.
    pub seed: i32,
    /// Cells per grid side.
    pub resolution: i32,
    /// Height range of hash-driven instance offsets, passed through to the
    /// renderer.
    pub vertical_offset: f32,
    /// Domain transform applied before flooring.
    pub domain: SpaceTrs,
    /// Coordinate source.
    pub mode: SampleMode,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            resolution: DEFAULT_RESOLUTION,
            vertical_offset: 1.0,
            domain: SpaceTrs::default(),
            mode: SampleMode::default(),
        }
    }
}

impl HashConfig {
    /// Parse a JSON configuration and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check every parameter against its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_resolution(self.resolution)?;

        if !(MIN_VERTICAL_OFFSET..=MAX_VERTICAL_OFFSET).contains(&self.vertical_offset) {
            return Err(ConfigError::VerticalOffsetOutOfRange(self.vertical_offset));
        }

        if !self.domain.is_finite() {
            return Err(ConfigError::NonFiniteDomain);
        }

        Ok(())
    }

    /// Number of cells, `R²`. Only meaningful after validation.
    pub fn cell_count(&self) -> usize {
        let r = self.resolution.max(0) as usize;
        r * r
    }
}

/// Check a resolution against `[MIN_RESOLUTION, MAX_RESOLUTION]`.
pub fn validate_resolution(resolution: i32) -> Result<u32, ConfigError> {
    if (MIN_RESOLUTION..=MAX_RESOLUTION).contains(&resolution) {
        Ok(resolution as u32)
    } else {
        Err(ConfigError::ResolutionOutOfRange(resolution))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Resolution outside the accepted range.
    #[error("resolution {0} outside [{min}, {max}]", min = MIN_RESOLUTION, max = MAX_RESOLUTION)]
    ResolutionOutOfRange(i32),

    /// Vertical offset outside the accepted range.
    #[error(
        "vertical offset {0} outside [{min}, {max}]",
        min = MIN_VERTICAL_OFFSET,
        max = MAX_VERTICAL_OFFSET
    )]
    VerticalOffsetOutOfRange(f32),

    /// Domain transform contains NaN or infinity.
    #[error("domain transform is not finite")]
    NonFiniteDomain,

    /// Malformed configuration file.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec3::Vec3;
    use proptest::prelude::*;

    #[test]
    fn test_default_config() {
        let config = HashConfig::default();
        assert_eq!(config.seed, 0);
        assert_eq!(config.resolution, 16);
        assert_eq!(config.vertical_offset, 1.0);
        assert_eq!(config.domain.scale, Vec3::splat(8.0));
        assert_eq!(config.mode, SampleMode::Surface { shape: Shape::Plane });
        assert!(config.validate().is_ok());
        assert_eq!(config.cell_count(), 256);
    }

    #[test]
    fn test_resolution_bounds() {
        assert!(matches!(validate_resolution(0), Err(ConfigError::ResolutionOutOfRange(0))));
        assert!(matches!(validate_resolution(513), Err(ConfigError::ResolutionOutOfRange(513))));
        assert!(matches!(validate_resolution(-4), Err(ConfigError::ResolutionOutOfRange(-4))));
        assert_eq!(validate_resolution(1).unwrap(), 1);
        assert_eq!(validate_resolution(512).unwrap(), 512);
    }

    #[test]
    fn test_vertical_offset_bounds() {
        let config = HashConfig { vertical_offset: 2.5, ..HashConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::VerticalOffsetOutOfRange(_))));

        let config = HashConfig { vertical_offset: f32::NAN, ..HashConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::VerticalOffsetOutOfRange(_))));
    }

    #[test]
    fn test_non_finite_domain() {
        let mut config = HashConfig::default();
        config.domain.translation = Vec3::new(f32::INFINITY, 0.0, 0.0);
        assert!(matches!(config.validate(), Err(ConfigError::NonFiniteDomain)));
    }

    #[test]
    fn test_from_json() {
        let config = HashConfig::from_json_str(
            r#"{
                "seed": -17,
                "resolution": 64,
                "domain": { "scale": 4, "rotation": { "x": 0, "y": 30, "z": 0 } },
                "mode": { "kind": "surface", "shape": "uv_sphere" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.seed, -17);
        assert_eq!(config.resolution, 64);
        assert_eq!(config.vertical_offset, 1.0);
        assert_eq!(config.domain.scale, Vec3::splat(4.0));
        assert_eq!(config.domain.rotation.y, 30.0);
        assert_eq!(config.mode, SampleMode::Surface { shape: Shape::UvSphere });
    }

    #[test]
    fn test_from_json_index_modes() {
        let config = HashConfig::from_json_str(r#"{"mode": {"kind": "index_centered"}}"#).unwrap();
        assert_eq!(config.mode, SampleMode::IndexCentered);
        assert!(!config.mode.is_position_derived());

        let config = HashConfig::from_json_str(r#"{"mode": {"kind": "transformed_plane"}}"#).unwrap();
        assert_eq!(config.mode, SampleMode::TransformedPlane);

        let config = HashConfig::from_json_str(r#"{"mode": {"kind": "external"}}"#).unwrap();
        assert_eq!(config.mode, SampleMode::External);
        assert!(config.mode.is_position_derived());
    }

    #[test]
    fn test_error_messages_show_bounds() {
        assert_eq!(
            ConfigError::ResolutionOutOfRange(0).to_string(),
            format!("resolution 0 outside [{MIN_RESOLUTION}, {MAX_RESOLUTION}]")
        );
        assert_eq!(ConfigError::ResolutionOutOfRange(600).to_string(), "resolution 600 outside [1, 512]");
        assert_eq!(
            ConfigError::VerticalOffsetOutOfRange(2.5).to_string(),
            format!("vertical offset 2.5 outside [{MIN_VERTICAL_OFFSET}, {MAX_VERTICAL_OFFSET}]")
        );
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            HashConfig::from_json_str(r#"{"resolution": 1024}"#),
            Err(ConfigError::ResolutionOutOfRange(1024))
        ));
        assert!(matches!(
            HashConfig::from_json_str("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            HashConfig::load("/nonexistent/spatial-hash.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let config = HashConfig {
            seed: 99,
            resolution: 32,
            mode: SampleMode::TransformedPlane,
            ..HashConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(HashConfig::from_json_str(&json).unwrap(), config);
    }

    proptest! {
        #[test]
        fn prop_resolution_validation(resolution: i32) {
            let valid = (1..=512).contains(&resolution);
            prop_assert_eq!(validate_resolution(resolution).is_ok(), valid);
        }
    }
}
