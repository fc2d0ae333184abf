use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::{s, Array2, Zip};
use rayon::prelude::*;

use crate::consts::PARALLEL_FRAME_THRESHOLD;
use crate::error::{DriftError, Result};
use crate::frame::{FrameSource, ShiftVector};

use super::{check_per_frame_lengths, Canvas, CanvasLayout};

/// Sum frames at their rounded shifts into a canvas grown to fit them all.
pub fn composite_integer<S, F>(
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
    let (h, w) = source.frame_shape(0)?;
    let layout = CanvasLayout::from_shifts((h, w), shifts);
    let counter = AtomicUsize::new(0);

    let add_frame = |mut acc: Array2<f64>, i: usize| -> Result<Array2<f64>> {
        if contributes[i] {
            let frame = source.frame(i)?;
            if frame.shape() != (h, w) {
                return Err(DriftError::ShapeMismatch {
                    index: i,
                    expected: (h, w),
                    found: frame.shape(),
                });
            }
            let (r0, c0) = layout.offsets[i];
            let mut region = acc.slice_mut(s![r0..r0 + h, c0..c0 + w]);
            Zip::from(&mut region)
                .and(&frame.data)
                .for_each(|dst, &v| *dst += v as f64);
        }
        let done = counter.fetch_add(1, Ordering::Relaxed) + 1;
        on_frame_done(done)?;
        Ok(acc)
    };

    let data = if n >= PARALLEL_FRAME_THRESHOLD {
        (0..n)
            .into_par_iter()
            .try_fold(|| Array2::<f64>::zeros(layout.shape), add_frame)
            .try_reduce(|| Array2::<f64>::zeros(layout.shape), |a, b| Ok(a + b))?
    } else {
        (0..n).try_fold(Array2::<f64>::zeros(layout.shape), add_frame)?
    };

    Ok(Canvas {
        data,
        reference_offset: layout.offsets[0],
        frames_summed: contributes.iter().filter(|&&c| c).count(),
    })
}
