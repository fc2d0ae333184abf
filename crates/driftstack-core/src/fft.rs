//! 2-D FFT helpers built on `rustfft`.
//!
//! Transforms run row pass then column pass (inverse: column then row). Both
//! passes are spread over Rayon above [`PARALLEL_PIXEL_THRESHOLD`] pixels.
//! Spectra use the zero-frequency-first layout produced by `rustfft`, with no
//! quadrant swap.

use std::sync::Arc;

use ndarray::{Array2, ArrayView1, ArrayViewMut1, Axis};
use num_complex::Complex;
use num_traits::AsPrimitive;
use rayon::prelude::*;
use rustfft::{Fft, FftPlanner};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Signed frequency index of bin `k` on an axis of length `n`.
///
/// Bins `0..ceil(n/2)` are the non-negative frequencies, the remaining bins
/// wrap around to `-floor(n/2)..-1`.
pub fn frequency_index(k: usize, n: usize) -> f64 {
    if k < n.div_ceil(2) {
        k as f64
    } else {
        k as f64 - n as f64
    }
}

/// Map a peak index on an axis of length `n` to a signed pixel offset.
///
/// Indices past the axis midpoint wrap to negative offsets; this holds for
/// both even and odd `n`.
pub fn wrap_peak_index(k: usize, n: usize) -> f64 {
    if k > n / 2 {
        k as f64 - n as f64
    } else {
        k as f64
    }
}

/// 2D forward FFT of a real-valued array.
pub fn fft2d_forward<T>(data: &Array2<T>) -> Array2<Complex<f64>>
where
    T: AsPrimitive<f64>,
{
    let mut work = data.mapv(|v| Complex::new(v.as_(), 0.0));
    fft2d_forward_complex(&mut work);
    work
}

/// In-place 2D forward FFT of a complex array.
pub fn fft2d_forward_complex(work: &mut Array2<Complex<f64>>) {
    let (h, w) = work.dim();
    let mut planner = FftPlanner::new();
    let fft_row = planner.plan_fft_forward(w);
    let fft_col = planner.plan_fft_forward(h);
    let parallel = h * w >= PARALLEL_PIXEL_THRESHOLD;

    transform_lanes(work, Axis(0), &fft_row, parallel);
    transform_lanes(work, Axis(1), &fft_col, parallel);
}

/// 2D inverse FFT, normalized by `1/(h*w)`.
pub fn ifft2d_complex(data: &Array2<Complex<f64>>) -> Array2<Complex<f64>> {
    let (h, w) = data.dim();
    let mut planner = FftPlanner::new();
    let ifft_row = planner.plan_fft_inverse(w);
    let ifft_col = planner.plan_fft_inverse(h);
    let parallel = h * w >= PARALLEL_PIXEL_THRESHOLD;

    let mut work = data.clone();
    transform_lanes(&mut work, Axis(1), &ifft_col, parallel);
    transform_lanes(&mut work, Axis(0), &ifft_row, parallel);

    let scale = 1.0 / (h * w) as f64;
    work.mapv_inplace(|v| v * scale);
    work
}

/// 2D inverse FFT, returning the real part normalized by `1/(h*w)`.
pub fn ifft2d_real(data: &Array2<Complex<f64>>) -> Array2<f64> {
    ifft2d_complex(data).mapv(|v| v.re)
}

/// Run a 1-D transform over every lane of `work`.
///
/// `Axis(0)` iterates rows (transform along columns of each row),
/// `Axis(1)` iterates columns.
fn transform_lanes(
    work: &mut Array2<Complex<f64>>,
    axis: Axis,
    fft: &Arc<dyn Fft<f64>>,
    parallel: bool,
) {
    let run = |mut lane: ArrayViewMut1<Complex<f64>>| {
        let mut buf = lane.to_vec();
        fft.process(&mut buf);
        lane.assign(&ArrayView1::from(&buf[..]));
    };

    if parallel {
        work.axis_iter_mut(axis).into_par_iter().for_each(run);
    } else {
        work.axis_iter_mut(axis).for_each(run);
    }
}
