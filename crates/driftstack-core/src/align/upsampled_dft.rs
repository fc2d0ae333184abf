//! Upsampled DFT by matrix multiplication (Guizar-Sicairos et al., 2008).
//!
//! Evaluates a small rectangular patch of the inverse transform of a spectrum
//! on a grid `usfac` times finer than the pixel grid, without zero-padding the
//! whole array. The result matches the corresponding region of a
//! `usfac·h × usfac·w` zero-padded inverse FFT (up to the `1/(h*w)` factor).
//!
//! Reference: "Efficient subpixel image registration algorithms",
//!            M. Guizar-Sicairos, S. T. Thurman, J. R. Fienup, Optics Letters 33(2), 2008.

use ndarray::Array2;
use num_complex::Complex;
use std::f64::consts::TAU;

use crate::fft::frequency_index;

/// Sampling grid along one axis: `len` points starting at `start` (in
/// original pixels), spaced `1/usfac` apart.
#[derive(Clone, Copy, Debug)]
pub struct UpsampledAxis {
    pub len: usize,
    pub start: f64,
    pub usfac: f64,
}

impl UpsampledAxis {
    pub fn position(&self, j: usize) -> f64 {
        self.start + j as f64 / self.usfac
    }
}

/// Evaluate `Σ_k spectrum[k] · exp(+i·2π·(f_r·y/h + f_c·x/w))` on the grid
/// `rows × cols`.
///
/// `spectrum` is in zero-frequency-first layout. Output shape is
/// `(rows.len, cols.len)`.
pub fn upsampled_dft(
    spectrum: &Array2<Complex<f64>>,
    rows: UpsampledAxis,
    cols: UpsampledAxis,
) -> Array2<Complex<f64>> {
    let (h, w) = spectrum.dim();

    // (rows.len, h): row kernel evaluated at each upsampled row position
    let row_kernel = Array2::from_shape_fn((rows.len, h), |(j, k)| {
        phase_factor(frequency_index(k, h) * rows.position(j) / h as f64)
    });
    // (w, cols.len): column kernel evaluated at each upsampled column position
    let col_kernel = Array2::from_shape_fn((w, cols.len), |(k, j)| {
        phase_factor(frequency_index(k, w) * cols.position(j) / w as f64)
    });

    row_kernel.dot(spectrum).dot(&col_kernel)
}

fn phase_factor(cycles: f64) -> Complex<f64> {
    Complex::from_polar(1.0, TAU * cycles)
}
