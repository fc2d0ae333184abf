//! Preprocessing applied to frames before correlation.
//!
//! Filtered copies feed shift estimation only; the frames that are summed
//! into the canvas are never touched.

mod convolve;
pub mod edge;
pub mod gaussian_blur;

use ndarray::Array2;

use crate::error::Result;
use crate::pipeline::config::PreprocessConfig;

pub use convolve::{filter_horizontal, filter_separable, filter_vertical};
pub use edge::{gradient_magnitude_array, EdgeOperator};
pub use gaussian_blur::gaussian_blur_array;

/// Produce the copy of `data` used for registration: blur, then edge filter.
pub fn preprocess(data: &Array2<f32>, config: &PreprocessConfig) -> Result<Array2<f32>> {
    let mut out = if config.blur {
        gaussian_blur_array(data, config.blur_kernel_size, config.blur_sigma)?
    } else {
        data.clone()
    };
    if config.edge_filter {
        out = gradient_magnitude_array(&out, config.edge_operator);
    }
    Ok(out)
}
