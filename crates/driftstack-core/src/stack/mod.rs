//! Compositing of registered frames into a single canvas.
//!
//! Overlapping frames are summed, never averaged: the canvas is a dose sum.
//! Frame-parallel accumulation gives each worker its own partial canvas and
//! reduces them by addition.

pub mod integer;
pub mod layout;
pub mod subpixel;

use ndarray::Array2;

use crate::error::{DriftError, Result};
use crate::frame::{FrameSource, ShiftVector};
use crate::pipeline::config::CompositeStrategy;

pub use integer::composite_integer;
pub use layout::CanvasLayout;
pub use subpixel::composite_subpixel;

/// Summed output image.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    pub data: Array2<f64>,
    /// Top-left corner of the reference frame on the canvas.
    pub reference_offset: (usize, usize),
    /// Number of frames added into the canvas.
    pub frames_summed: usize,
}

impl Canvas {
    /// (height, width)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }
}

/// Composite every contributing frame of `source` with the given strategy.
///
/// `contributes[i] == false` leaves frame `i` out of the sum. `on_frame_done`
/// receives the running count of processed frames; an error from it aborts.
pub fn composite<S, F>(
    source: &S,
    shifts: &[ShiftVector],
    contributes: &[bool],
    strategy: CompositeStrategy,
    on_frame_done: F,
) -> Result<Canvas>
where
    S: FrameSource + ?Sized,
    F: Fn(usize) -> Result<()> + Send + Sync,
{
    match strategy {
        CompositeStrategy::IntegerShift => {
            composite_integer(source, shifts, contributes, on_frame_done)
        }
        CompositeStrategy::ExactSubpixel => {
            composite_subpixel(source, shifts, contributes, on_frame_done)
        }
    }
}

/// Both per-frame slices must have exactly one entry per frame.
fn check_per_frame_lengths(n: usize, shifts: &[ShiftVector], contributes: &[bool]) -> Result<()> {
    if shifts.len() != n {
        return Err(DriftError::PerFrameLengthMismatch {
            what: "shifts",
            expected: n,
            found: shifts.len(),
        });
    }
    if contributes.len() != n {
        return Err(DriftError::PerFrameLengthMismatch {
            what: "contribution flags",
            expected: n,
            found: contributes.len(),
        });
    }
    Ok(())
}
