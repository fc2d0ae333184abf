use std::fmt;

use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};

use super::convolve::filter_separable;

/// 3x3 derivative operator used for the gradient-magnitude filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeOperator {
    /// Smoothing `[3, 10, 3]`; better rotational symmetry.
    #[default]
    Scharr,
    /// Smoothing `[1, 2, 1]`.
    Sobel,
}

impl EdgeOperator {
    fn smoothing(self) -> [f32; 3] {
        match self {
            Self::Scharr => [3.0, 10.0, 3.0],
            Self::Sobel => [1.0, 2.0, 1.0],
        }
    }
}

impl fmt::Display for EdgeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scharr => write!(f, "Scharr"),
            Self::Sobel => write!(f, "Sobel"),
        }
    }
}

const DERIVATIVE: [f32; 3] = [-1.0, 0.0, 1.0];

/// Gradient magnitude `sqrt(Gx^2 + Gy^2)` with clamped borders.
pub fn gradient_magnitude_array(data: &Array2<f32>, operator: EdgeOperator) -> Array2<f32> {
    let smooth = operator.smoothing();
    let gx = filter_separable(data, &DERIVATIVE, &smooth);
    let gy = filter_separable(data, &smooth, &DERIVATIVE);

    Zip::from(&gx)
        .and(&gy)
        .map_collect(|&x, &y| (x * x + y * y).sqrt())
}
