pub mod cross_power;
mod dispatcher;
pub mod estimator;
pub mod fourier_shift;
pub mod subpixel;
pub mod upsampled_dft;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::frame::ShiftVector;

pub use dispatcher::build_estimator;
pub use estimator::{coarse_shift, dft_registration, ParaboloidEstimator, UpsampledDftEstimator};
pub use fourier_shift::{fourier_shift, fourier_shift_frame};

/// Outcome of registering one image against another.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    /// Displacement of the target relative to the reference.
    pub shift: ShiftVector,
    /// Normalized RMS registration error in `[0, 1]`; 0 for a perfect match.
    pub error: f64,
    /// Global phase difference between the two images, in radians.
    pub phase_diff: f64,
    /// Set when the correlation surface had no usable peak; `shift` is then zero.
    pub degenerate: bool,
}

impl Registration {
    /// A frame registered against itself.
    pub fn identity() -> Self {
        Self {
            shift: ShiftVector::ZERO,
            error: 0.0,
            phase_diff: 0.0,
            degenerate: false,
        }
    }

    /// Zero shift flagged as low-confidence.
    pub fn degenerate() -> Self {
        Self {
            shift: ShiftVector::ZERO,
            error: 1.0,
            phase_diff: 0.0,
            degenerate: true,
        }
    }
}

/// Anything that can estimate the translation of `target` relative to `reference`.
///
/// Implementations must be interchangeable: the pipeline only relies on the
/// returned [`Registration`].
pub trait ShiftEstimator: Send + Sync {
    fn name(&self) -> &str;

    fn estimate(&self, reference: &Array2<f32>, target: &Array2<f32>) -> Result<Registration>;
}
