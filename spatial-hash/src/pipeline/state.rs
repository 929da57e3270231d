//! Hash Pipeline
//!
//! Owns a configuration and the field computed from it.
//!
//! ```text
//!            compute()
//!   ┌──────┐ ─────────► ┌──────────┐
//!   │ Idle │            │ Computed │
//!   └──────┘ ◄───────── └──────────┘
//!        any setter, invalidate(), take_field()
//! ```
//!
//! There is no partial invalidation: any configuration change discards the
//! whole field and the next `compute()` regenerates samples and hashes as a
//! unit.

use tracing::{debug, instrument};

use crate::core::affine::{Affine3x4, SpaceTrs};
use crate::core::hash::SmallXxHash;
use crate::core::vec3::Vec3;
use crate::grid::shapes::{PositionSource, SampleSet};
use super::config::{validate_resolution, ConfigError, HashConfig, SampleMode};
use super::field::HashField;
use super::job::{CellSource, HashJob};

/// Pipeline lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    /// No valid field for the current configuration.
    Idle,
    /// A field matching the current configuration is available.
    Computed,
}

/// Deterministic hash field generator.
pub struct HashPipeline {
    config: HashConfig,
    resolution: u32,
    object_transform: Affine3x4,
    field: Option<HashField>,
}

impl HashPipeline {
    /// Create an idle pipeline. The configuration is validated first.
    pub fn new(config: HashConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let resolution = validate_resolution(config.resolution)?;
        Ok(Self {
            config,
            resolution,
            object_transform: Affine3x4::IDENTITY,
            field: None,
        })
    }

    /// Current configuration.
    pub fn config(&self) -> &HashConfig {
        &self.config
    }

    /// Validated resolution.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Placement of the sampled surface in world space.
    pub fn object_transform(&self) -> &Affine3x4 {
        &self.object_transform
    }

    /// Lifecycle state.
    pub fn state(&self) -> PipelineState {
        if self.field.is_some() {
            PipelineState::Computed
        } else {
            PipelineState::Idle
        }
    }

    /// True when a field for the current configuration is available.
    pub fn is_computed(&self) -> bool {
        self.field.is_some()
    }

    /// The computed field, if any.
    pub fn field(&self) -> Option<&HashField> {
        self.field.as_ref()
    }

    /// Hand the computed field to a consumer. The pipeline returns to Idle.
    pub fn take_field(&mut self) -> Option<HashField> {
        let field = self.field.take();
        if field.is_some() {
            debug!("field handed off, pipeline idle");
        }
        field
    }

    /// Discard the computed field.
    pub fn invalidate(&mut self) {
        if self.field.take().is_some() {
            debug!("configuration changed, field invalidated");
        }
    }

    // =========================================================================
    // CONFIGURATION
    // =========================================================================

    /// Replace the whole configuration.
    pub fn set_config(&mut self, config: HashConfig) -> Result<(), PipelineError> {
        config.validate()?;
        self.resolution = validate_resolution(config.resolution)?;
        self.config = config;
        self.invalidate();
        Ok(())
    }

    /// Change the seed.
    pub fn set_seed(&mut self, seed: i32) {
        self.config.seed = seed;
        self.invalidate();
    }

    /// Change the resolution. Rejected values leave the pipeline untouched.
    pub fn set_resolution(&mut self, resolution: i32) -> Result<(), PipelineError> {
        self.resolution = validate_resolution(resolution)?;
        self.config.resolution = resolution;
        self.invalidate();
        Ok(())
    }

    /// Change the renderer's vertical offset.
    pub fn set_vertical_offset(&mut self, vertical_offset: f32) -> Result<(), PipelineError> {
        self.set_config(HashConfig { vertical_offset, ..self.config.clone() })
    }

    /// Change the domain transform.
    pub fn set_domain(&mut self, domain: SpaceTrs) -> Result<(), PipelineError> {
        self.set_config(HashConfig { domain, ..self.config.clone() })
    }

    /// Change the coordinate source.
    pub fn set_mode(&mut self, mode: SampleMode) {
        self.config.mode = mode;
        self.invalidate();
    }

    /// Move the sampled surface.
    pub fn set_object_transform(&mut self, transform: Affine3x4) -> Result<(), PipelineError> {
        if !transform.is_finite() {
            return Err(PipelineError::NonFiniteObjectTransform);
        }
        self.object_transform = transform;
        self.invalidate();
        Ok(())
    }

    // =========================================================================
    // COMPUTATION
    // =========================================================================

    /// Compute the field for the current configuration.
    ///
    /// Surface modes generate positions first and hash only once generation
    /// has fully completed. Returns the existing field when already computed
    /// for the current mode. `External` mode has nothing to generate; its
    /// field comes from `compute_with_samples` or `compute_with_source`.
    #[instrument(skip(self), fields(seed = self.config.seed, resolution = self.resolution))]
    pub fn compute(&mut self) -> Result<&HashField, PipelineError> {
        let field = match self.field.take() {
            Some(field) if field.mode() == self.config.mode => field,
            _ => match self.config.mode {
                SampleMode::IndexCentered => self.hash_index(CellSource::IndexCentered),
                SampleMode::TransformedPlane => self.hash_index(CellSource::TransformedPlane),
                SampleMode::Surface { shape } => {
                    let samples = shape.generate(self.resolution, &self.object_transform);
                    debug!(?shape, samples = samples.len(), "positions generated");
                    self.hash_samples(samples)?
                }
                SampleMode::External => return Err(PipelineError::SamplesRequired),
            },
        };
        Ok(self.field.insert(field))
    }

    /// Compute an `External` mode field from a caller-supplied generator.
    pub fn compute_with_source(
        &mut self,
        source: &dyn PositionSource,
    ) -> Result<&HashField, PipelineError> {
        self.require_external()?;
        let samples = source.generate(self.resolution, &self.object_transform);
        self.compute_with_samples(samples)
    }

    /// Compute an `External` mode field from externally generated samples.
    ///
    /// Positions must already be placed by the object transform. The
    /// previous field is replaced only when the samples are accepted.
    pub fn compute_with_samples(&mut self, samples: SampleSet) -> Result<&HashField, PipelineError> {
        self.require_external()?;
        let field = self.hash_samples(samples)?;
        Ok(self.field.insert(field))
    }

    fn require_external(&self) -> Result<(), PipelineError> {
        match self.config.mode {
            SampleMode::External => Ok(()),
            mode => Err(PipelineError::ModeMismatch { mode }),
        }
    }

    fn job<'a>(&self, source: CellSource<'a>) -> HashJob<'a> {
        HashJob {
            hash: SmallXxHash::seed(self.config.seed),
            resolution: self.resolution,
            domain: self.config.domain.matrix(),
            source,
        }
    }

    fn hash_index(&self, source: CellSource<'_>) -> HashField {
        let job = self.job(source);
        debug!(batches = job.batch_count(), "hashing index grid");
        let hashes = job.run();
        self.finish(hashes, Vec::new(), Vec::new())
    }

    fn hash_samples(&self, samples: SampleSet) -> Result<HashField, PipelineError> {
        let expected = self.config.cell_count();
        if samples.positions.len() != expected {
            return Err(PipelineError::SampleCountMismatch {
                expected,
                actual: samples.positions.len(),
            });
        }
        if !samples.normals.is_empty() && samples.normals.len() != expected {
            return Err(PipelineError::NormalCountMismatch {
                expected,
                actual: samples.normals.len(),
            });
        }
        if let Some(index) = samples.positions.iter().position(|p| !p.is_finite()) {
            return Err(PipelineError::NonFinitePosition { index });
        }

        let job = self.job(CellSource::Positions(&samples.positions));
        debug!(batches = job.batch_count(), "hashing positions");
        let hashes = job.run();
        Ok(self.finish(hashes, samples.positions, samples.normals))
    }

    fn finish(&self, hashes: Vec<u32>, positions: Vec<Vec3>, normals: Vec<Vec3>) -> HashField {
        let field = HashField::new(
            self.config.mode,
            self.config.seed,
            self.resolution,
            self.config.vertical_offset,
            hashes,
            positions,
            normals,
        );
        debug!(
            cells = field.len(),
            fingerprint = %hex::encode(&field.fingerprint()[..8]),
            "hash field computed"
        );
        field
    }
}

/// Pipeline errors. All are precondition violations; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Position count does not match the grid.
    #[error("expected {expected} positions, got {actual}")]
    SampleCountMismatch {
        /// `R²`
        expected: usize,
        /// Supplied count
        actual: usize,
    },

    /// Normal count does not match the grid.
    #[error("expected {expected} normals, got {actual}")]
    NormalCountMismatch {
        /// `R²`
        expected: usize,
        /// Supplied count
        actual: usize,
    },

    /// A position contains NaN or infinity.
    #[error("position {index} is not finite")]
    NonFinitePosition {
        /// Offending cell
        index: usize,
    },

    /// The object transform contains NaN or infinity.
    #[error("object transform is not finite")]
    NonFiniteObjectTransform,

    /// External samples were offered while another mode is configured.
    #[error("external samples require external mode, configured {mode:?}")]
    ModeMismatch {
        /// Configured mode
        mode: SampleMode,
    },

    /// `External` mode was asked to compute without samples.
    #[error("external mode has no samples; use compute_with_samples")]
    SamplesRequired,
}
