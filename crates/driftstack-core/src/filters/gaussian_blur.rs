use ndarray::Array2;

use crate::error::{DriftError, Result};

use super::convolve::filter_separable;

/// Blur with a `size`x`size` Gaussian kernel.
///
/// A non-positive `sigma` is derived from the kernel size the same way
/// OpenCV does: `0.3 * ((size - 1) / 2 - 1) + 0.8`.
pub fn gaussian_blur_array(data: &Array2<f32>, size: usize, sigma: f32) -> Result<Array2<f32>> {
    let kernel = make_gaussian_kernel(size, sigma)?;
    Ok(filter_separable(data, &kernel, &kernel))
}

pub fn make_gaussian_kernel(size: usize, sigma: f32) -> Result<Vec<f32>> {
    if size == 0 || size % 2 == 0 {
        return Err(DriftError::InvalidKernelSize(size));
    }

    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
    };

    let radius = (size / 2) as f32;
    let s2 = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - radius;
            (-x * x / s2).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }

    Ok(kernel)
}
