use ndarray::{Array2, ArrayView1, ArrayViewMut1, Axis, Zip};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Correlate every row with `kernel` (clamped boundary).
pub fn filter_horizontal(data: &Array2<f32>, kernel: &[f32]) -> Array2<f32> {
    filter_lanes(data, kernel, Axis(1))
}

/// Correlate every column with `kernel` (clamped boundary).
pub fn filter_vertical(data: &Array2<f32>, kernel: &[f32]) -> Array2<f32> {
    filter_lanes(data, kernel, Axis(0))
}

/// Apply a separable kernel: `horizontal` along rows, then `vertical` along columns.
pub fn filter_separable(data: &Array2<f32>, horizontal: &[f32], vertical: &[f32]) -> Array2<f32> {
    filter_vertical(&filter_horizontal(data, horizontal), vertical)
}

fn filter_lanes(data: &Array2<f32>, kernel: &[f32], axis: Axis) -> Array2<f32> {
    let (h, w) = data.dim();
    let mut result = Array2::<f32>::zeros((h, w));
    let zip = Zip::from(result.lanes_mut(axis)).and(data.lanes(axis));

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        zip.par_for_each(|dst, src| correlate_lane(src, dst, kernel));
    } else {
        zip.for_each(|dst, src| correlate_lane(src, dst, kernel));
    }

    result
}

fn correlate_lane(src: ArrayView1<f32>, mut dst: ArrayViewMut1<f32>, kernel: &[f32]) {
    let n = src.len() as isize;
    let radius = (kernel.len() / 2) as isize;

    for (i, out) in dst.iter_mut().enumerate() {
        let mut sum = 0.0f32;
        for (ki, &kv) in kernel.iter().enumerate() {
            let j = (i as isize + ki as isize - radius).clamp(0, n - 1) as usize;
            sum += src[j] * kv;
        }
        *out = sum;
    }
}
