use ndarray::Array2;

use crate::error::Result;
use crate::frame::ShiftVector;

use super::cross_power::{find_correlation_peak, CorrelationPeak, CrossPower};
use super::subpixel::{refine_peak_paraboloid, refine_upsampled};
use super::{Registration, ShiftEstimator};

/// Canonical estimator: whole-pixel cross-correlation peak refined by a
/// locally upsampled DFT to `1/upsample_factor` pixel.
#[derive(Clone, Debug)]
pub struct UpsampledDftEstimator {
    pub upsample_factor: u32,
    /// Normalize the cross-power spectrum to unit magnitude (phase correlation).
    pub normalize: bool,
}

impl UpsampledDftEstimator {
    pub fn new(upsample_factor: u32, normalize: bool) -> Self {
        Self {
            upsample_factor,
            normalize,
        }
    }
}

impl ShiftEstimator for UpsampledDftEstimator {
    fn name(&self) -> &str {
        "upsampled-dft"
    }

    fn estimate(&self, reference: &Array2<f32>, target: &Array2<f32>) -> Result<Registration> {
        let cross = CrossPower::compute(reference, target, self.normalize)?;
        if !cross.structured {
            return Ok(Registration::degenerate());
        }
        let Some(coarse) = find_correlation_peak(&cross.correlation()) else {
            return Ok(Registration::degenerate());
        };

        let refined = refine_upsampled(&cross, &coarse, self.upsample_factor);
        Ok(Registration {
            shift: ShiftVector::from_correction(refined.row_correction, refined.col_correction),
            error: cross.registration_error(refined.value),
            phase_diff: refined.value.arg(),
            degenerate: false,
        })
    }
}

/// Whole-pixel cross-correlation peak only (`usfac = 1`).
pub fn coarse_shift(
    reference: &Array2<f32>,
    target: &Array2<f32>,
    normalize: bool,
) -> Result<Registration> {
    UpsampledDftEstimator::new(1, normalize).estimate(reference, target)
}

/// Estimate the shift of `target` relative to `reference` to `1/usfac` pixel.
pub fn dft_registration(
    reference: &Array2<f32>,
    target: &Array2<f32>,
    usfac: u32,
    normalize: bool,
) -> Result<Registration> {
    UpsampledDftEstimator::new(usfac, normalize).estimate(reference, target)
}

/// Cheaper estimator: whole-pixel peak refined by a 3-point parabola fit on
/// each axis of the correlation surface. Accuracy depends on the peak shape;
/// typically a few tenths of a pixel at best.
#[derive(Clone, Debug, Default)]
pub struct ParaboloidEstimator {
    pub normalize: bool,
}

impl ShiftEstimator for ParaboloidEstimator {
    fn name(&self) -> &str {
        "paraboloid"
    }

    fn estimate(&self, reference: &Array2<f32>, target: &Array2<f32>) -> Result<Registration> {
        let cross = CrossPower::compute(reference, target, self.normalize)?;
        if !cross.structured {
            return Ok(Registration::degenerate());
        }
        let correlation = cross.correlation();
        let Some(CorrelationPeak {
            row,
            col,
            row_correction,
            col_correction,
            value,
        }) = find_correlation_peak(&correlation)
        else {
            return Ok(Registration::degenerate());
        };

        let (delta_row, delta_col) = refine_peak_paraboloid(&correlation, row, col);
        Ok(Registration {
            shift: ShiftVector::from_correction(row_correction + delta_row, col_correction + delta_col),
            error: cross.registration_error(value),
            phase_diff: value.arg(),
            degenerate: false,
        })
    }
}
