use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_BLUR_KERNEL_SIZE, DEFAULT_BLUR_SIGMA, DEFAULT_UPSAMPLE_FACTOR};
use crate::error::{DriftError, Result};
use crate::filters::EdgeOperator;

/// Alignment and compositing options for one pipeline run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    pub preprocess: PreprocessConfig,
    /// Registration precision is `1 / upsample_factor` pixel.
    pub upsample_factor: UpsampleFactor,
    pub reference_policy: ReferencePolicy,
    pub composite: CompositeStrategy,
    /// Scale each cross-power bin to unit magnitude before the inverse transform.
    pub normalize_cross_power: bool,
    pub estimator: EstimatorKind,
    pub non_finite: NonFinitePolicy,
}

impl AlignConfig {
    /// Check parameters that are not enforced by their types.
    pub fn validate(&self) -> Result<()> {
        self.preprocess.validate()
    }
}

/// Filtering applied to the copies of frames used for registration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    pub blur: bool,
    /// Odd side length of the Gaussian kernel.
    pub blur_kernel_size: usize,
    /// Gaussian sigma; values <= 0 derive sigma from the kernel size.
    pub blur_sigma: f32,
    pub edge_filter: bool,
    pub edge_operator: EdgeOperator,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            blur: true,
            blur_kernel_size: DEFAULT_BLUR_KERNEL_SIZE,
            blur_sigma: DEFAULT_BLUR_SIGMA,
            edge_filter: false,
            edge_operator: EdgeOperator::default(),
        }
    }
}

impl PreprocessConfig {
    /// No filtering at all: registration runs on the raw frames.
    pub fn none() -> Self {
        Self {
            blur: false,
            edge_filter: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.blur && (self.blur_kernel_size == 0 || self.blur_kernel_size % 2 == 0) {
            return Err(DriftError::InvalidKernelSize(self.blur_kernel_size));
        }
        Ok(())
    }
}

/// Integer upsampling factor, at least 1.
///
/// Deserializes from any number and rejects values below 1 or with a
/// fractional part.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "u32")]
pub struct UpsampleFactor(u32);

impl UpsampleFactor {
    pub fn new(factor: u32) -> Result<Self> {
        if factor < 1 {
            return Err(DriftError::InvalidUpsampleFactor(factor as f64));
        }
        Ok(Self(factor))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for UpsampleFactor {
    fn default() -> Self {
        Self(DEFAULT_UPSAMPLE_FACTOR)
    }
}

impl TryFrom<f64> for UpsampleFactor {
    type Error = DriftError;

    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() || value < 1.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
            return Err(DriftError::InvalidUpsampleFactor(value));
        }
        Ok(Self(value as u32))
    }
}

impl From<UpsampleFactor> for u32 {
    fn from(factor: UpsampleFactor) -> u32 {
        factor.0
    }
}

impl fmt::Display for UpsampleFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}

/// Which frame each frame is registered against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferencePolicy {
    /// Every frame against frame 0. Independent estimates, parallel.
    #[default]
    FixedFirst,
    /// Every frame against its predecessor, shifts accumulated. Sequential,
    /// tolerates large total drift.
    RunningPrevious,
}

impl fmt::Display for ReferencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FixedFirst => write!(f, "Fixed First"),
            Self::RunningPrevious => write!(f, "Running Previous"),
        }
    }
}

/// How shifted frames are combined into the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompositeStrategy {
    /// Round shifts, grow the canvas to fit every frame.
    #[default]
    IntegerShift,
    /// Fourier-shift each frame by its exact shift into a frame-sized canvas.
    ExactSubpixel,
}

impl fmt::Display for CompositeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntegerShift => write!(f, "Integer Shift"),
            Self::ExactSubpixel => write!(f, "Exact Subpixel"),
        }
    }
}

/// Shift estimation algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstimatorKind {
    /// Cross-correlation peak refined by a locally upsampled DFT.
    #[default]
    UpsampledDft,
    /// Cross-correlation peak refined by a parabola fit; ignores `upsample_factor`.
    Paraboloid,
}

impl fmt::Display for EstimatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpsampledDft => write!(f, "Upsampled DFT"),
            Self::Paraboloid => write!(f, "Paraboloid"),
        }
    }
}

/// Handling of frames containing NaN or infinite values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NonFinitePolicy {
    /// Fail the whole run before any computation.
    #[default]
    Reject,
    /// Skip the frame: zero shift step, flagged degenerate, not summed.
    Propagate,
}

impl fmt::Display for NonFinitePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => write!(f, "Reject"),
            Self::Propagate => write!(f, "Propagate"),
        }
    }
}
