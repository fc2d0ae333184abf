use ndarray::{Array2, Zip};
use num_complex::Complex;

use crate::consts::{FLAT_SURFACE_TOLERANCE, SPECTRUM_EPSILON, STRUCTURE_TOLERANCE};
use crate::error::{DriftError, Result};
use crate::fft::{fft2d_forward, ifft2d_complex, wrap_peak_index};

/// Cross-power spectrum `F(ref) · conj(F(tgt))` of two equally sized images,
/// together with the spectral energies needed for the registration error.
pub struct CrossPower {
    pub spectrum: Array2<Complex<f64>>,
    /// Energy of the reference spectrum (`Σ|F(ref)|²`, or the non-zero bin
    /// count when normalized).
    pub reference_energy: f64,
    /// Energy of the target spectrum, same convention.
    pub target_energy: f64,
    /// Both images carry spatial structure beyond their mean level.
    pub structured: bool,
}

impl CrossPower {
    /// Transform both images and form their cross-power spectrum.
    ///
    /// With `normalize` every bin is scaled to unit magnitude (classic phase
    /// correlation); bins with vanishing magnitude are zeroed.
    pub fn compute(reference: &Array2<f32>, target: &Array2<f32>, normalize: bool) -> Result<Self> {
        if reference.dim() != target.dim() {
            return Err(DriftError::PairShapeMismatch {
                reference: reference.dim(),
                target: target.dim(),
            });
        }

        let ref_fft = fft2d_forward(reference);
        let tgt_fft = fft2d_forward(target);
        let structured = relative_ac_amplitude(&ref_fft) > STRUCTURE_TOLERANCE
            && relative_ac_amplitude(&tgt_fft) > STRUCTURE_TOLERANCE;

        let mut spectrum = Zip::from(&ref_fft)
            .and(&tgt_fft)
            .map_collect(|a, b| *a * b.conj());

        if normalize {
            let mut live_bins = 0usize;
            spectrum.mapv_inplace(|v| {
                let mag = v.norm();
                if mag > SPECTRUM_EPSILON {
                    live_bins += 1;
                    v / mag
                } else {
                    Complex::new(0.0, 0.0)
                }
            });
            let energy = live_bins as f64;
            Ok(Self {
                spectrum,
                reference_energy: energy,
                target_energy: energy,
                structured,
            })
        } else {
            Ok(Self {
                spectrum,
                reference_energy: ref_fft.iter().map(|v| v.norm_sqr()).sum(),
                target_energy: tgt_fft.iter().map(|v| v.norm_sqr()).sum(),
                structured,
            })
        }
    }

    /// (height, width) of the images.
    pub fn dim(&self) -> (usize, usize) {
        self.spectrum.dim()
    }

    /// Complex whole-pixel cross-correlation (inverse transform of the spectrum).
    pub fn correlation(&self) -> Array2<Complex<f64>> {
        ifft2d_complex(&self.spectrum)
    }

    /// Normalized RMS registration error for a correlation peak value taken
    /// from an unnormalized DFT sum (no `1/(h*w)` factor).
    pub fn registration_error(&self, peak: Complex<f64>) -> f64 {
        let denom = self.reference_energy * self.target_energy;
        if denom <= 0.0 {
            return 1.0;
        }
        (1.0 - peak.norm_sqr() / denom).abs().sqrt().min(1.0)
    }
}

/// RMS amplitude of the non-DC bins relative to the whole spectrum.
///
/// The DC bin is excluded from the sum rather than subtracted from the total,
/// so a faint pattern on a large offset is not lost to cancellation.
fn relative_ac_amplitude(spectrum: &Array2<Complex<f64>>) -> f64 {
    let dc = spectrum.first().map_or(0.0, |v| v.norm_sqr());
    let ac: f64 = spectrum.iter().skip(1).map(|v| v.norm_sqr()).sum();
    let total = dc + ac;
    if total > 0.0 {
        (ac / total).sqrt()
    } else {
        0.0
    }
}

/// Whole-pixel correlation peak.
#[derive(Clone, Copy, Debug)]
pub struct CorrelationPeak {
    pub row: usize,
    pub col: usize,
    /// Signed row offset that moves the target onto the reference.
    pub row_correction: f64,
    /// Signed column offset that moves the target onto the reference.
    pub col_correction: f64,
    /// Peak value as an unnormalized DFT sum.
    pub value: Complex<f64>,
}

/// Locate the maximum-magnitude point of a correlation surface.
///
/// Returns `None` when the surface is flat to within FFT round-off or
/// contains non-finite values; such a surface has no meaningful peak.
pub fn find_correlation_peak(correlation: &Array2<Complex<f64>>) -> Option<CorrelationPeak> {
    let (h, w) = correlation.dim();
    let mut best = (0, 0);
    let mut best_mag = f64::NEG_INFINITY;
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;

    for ((row, col), v) in correlation.indexed_iter() {
        let re = v.re;
        if !re.is_finite() || !v.im.is_finite() {
            return None;
        }
        lo = lo.min(re);
        hi = hi.max(re);
        let mag = re.abs();
        if mag > best_mag {
            best_mag = mag;
            best = (row, col);
        }
    }

    if hi - lo <= FLAT_SURFACE_TOLERANCE * hi.abs().max(lo.abs()) {
        return None;
    }

    let (row, col) = best;
    Some(CorrelationPeak {
        row,
        col,
        row_correction: wrap_peak_index(row, h),
        col_correction: wrap_peak_index(col, w),
        value: correlation[[row, col]] * (h * w) as f64,
    })
}
