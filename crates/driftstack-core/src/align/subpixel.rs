use ndarray::Array2;
use num_complex::Complex;

use crate::consts::UPSAMPLED_SEARCH_WINDOW;

use super::cross_power::{CorrelationPeak, CrossPower};
use super::upsampled_dft::{upsampled_dft, UpsampledAxis};

/// Refined correction (the offset that moves the target onto the reference)
/// plus the correlation value at the refined peak.
#[derive(Clone, Copy, Debug)]
pub struct RefinedPeak {
    pub row_correction: f64,
    pub col_correction: f64,
    pub value: Complex<f64>,
}

/// Refine a whole-pixel peak to `1/usfac` pixel with a matrix-multiply DFT.
///
/// Only a `ceil(1.5·usfac)` square patch of the upsampled correlation is
/// evaluated, centred on the coarse peak. `usfac <= 1` returns the coarse
/// peak unchanged. Axes of length 1 always get a zero correction.
pub fn refine_upsampled(cross: &CrossPower, coarse: &CorrelationPeak, usfac: u32) -> RefinedPeak {
    if usfac <= 1 {
        return RefinedPeak {
            row_correction: coarse.row_correction,
            col_correction: coarse.col_correction,
            value: coarse.value,
        };
    }

    let up = usfac as f64;
    let row0 = (coarse.row_correction * up).round() / up;
    let col0 = (coarse.col_correction * up).round() / up;

    let window = (UPSAMPLED_SEARCH_WINDOW * up).ceil() as usize;
    let dftshift = (window / 2) as f64;

    let axis = |center: f64| UpsampledAxis {
        len: window,
        start: center - dftshift / up,
        usfac: up,
    };
    let patch = upsampled_dft(&cross.spectrum, axis(row0), axis(col0));

    let (best_row, best_col) = argmax_magnitude(&patch);
    let (h, w) = cross.dim();

    let row_correction = if h == 1 {
        0.0
    } else {
        row0 + (best_row as f64 - dftshift) / up
    };
    let col_correction = if w == 1 {
        0.0
    } else {
        col0 + (best_col as f64 - dftshift) / up
    };

    RefinedPeak {
        row_correction,
        col_correction,
        value: patch[[best_row, best_col]],
    }
}

/// Refine a whole-pixel peak by fitting a parabola through the peak and its
/// two neighbours along each axis of the real correlation surface.
///
/// Neighbours wrap around the borders. Returns `(delta_row, delta_col)`,
/// clamped to half a pixel.
pub fn refine_peak_paraboloid(
    correlation: &Array2<Complex<f64>>,
    peak_row: usize,
    peak_col: usize,
) -> (f64, f64) {
    let (h, w) = correlation.dim();
    let at = |r: usize, c: usize| correlation[[r, c]].re;

    let delta_row = parabola_vertex(
        at((peak_row + h - 1) % h, peak_col),
        at(peak_row, peak_col),
        at((peak_row + 1) % h, peak_col),
    );
    let delta_col = parabola_vertex(
        at(peak_row, (peak_col + w - 1) % w),
        at(peak_row, peak_col),
        at(peak_row, (peak_col + 1) % w),
    );

    (delta_row, delta_col)
}

fn parabola_vertex(prev: f64, curr: f64, next: f64) -> f64 {
    let curvature = prev - 2.0 * curr + next;
    if curvature.abs() > 1e-12 {
        ((prev - next) / (2.0 * curvature)).clamp(-0.5, 0.5)
    } else {
        0.0
    }
}

fn argmax_magnitude(data: &Array2<Complex<f64>>) -> (usize, usize) {
    let mut best = (0, 0);
    let mut best_val = f64::NEG_INFINITY;
    for ((r, c), v) in data.indexed_iter() {
        let val = v.norm();
        if val > best_val {
            best_val = val;
            best = (r, c);
        }
    }
    best
}
