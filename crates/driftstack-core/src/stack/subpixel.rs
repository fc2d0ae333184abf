use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::Array2;
use rayon::prelude::*;

use crate::align::fourier_shift;
use crate::consts::PARALLEL_FRAME_THRESHOLD;
use crate::error::{DriftError, Result};
use crate::frame::{FrameSource, ShiftVector};

use super::{check_per_frame_lengths, Canvas};

/// Fourier-shift every frame back by its exact shift and sum into a canvas
/// the size of one frame. Content pushed past a border wraps to the other side.
pub fn composite_subpixel<S, F>(
    source: &S,
    shifts: &[ShiftVector],
    contributes: &[bool],
    on_frame_done: F,
) -> Result<Canvas>
where
    S: FrameSource + ?Sized,
    F: Fn(usize) -> Result<()> + Send + Sync,
{
    let n = source.len();
    if n == 0 {
        return Err(DriftError::EmptyStack);
    }
    check_per_frame_lengths(n, shifts, contributes)?;
    let shape = source.frame_shape(0)?;
    let counter = AtomicUsize::new(0);

    let add_frame = |mut acc: Array2<f64>, i: usize| -> Result<Array2<f64>> {
        if contributes[i] {
            let frame = source.frame(i)?;
            if frame.shape() != shape {
                return Err(DriftError::ShapeMismatch {
                    index: i,
                    expected: shape,
                    found: frame.shape(),
                });
            }
            acc += &fourier_shift(&frame.data, -shifts[i]);
        }
        let done = counter.fetch_add(1, Ordering::Relaxed) + 1;
        on_frame_done(done)?;
        Ok(acc)
    };

    let data = if n >= PARALLEL_FRAME_THRESHOLD {
        (0..n)
            .into_par_iter()
            .try_fold(|| Array2::<f64>::zeros(shape), add_frame)
            .try_reduce(|| Array2::<f64>::zeros(shape), |a, b| Ok(a + b))?
    } else {
        (0..n).try_fold(Array2::<f64>::zeros(shape), add_frame)?
    };

    Ok(Canvas {
        data,
        reference_offset: (0, 0),
        frames_summed: contributes.iter().filter(|&&c| c).count(),
    })
}
