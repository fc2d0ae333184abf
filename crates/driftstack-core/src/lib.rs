pub mod consts;
pub mod error;
pub mod fft;
pub mod frame;
pub mod filters;
pub mod align;
pub mod stack;
pub mod pipeline;
pub mod io;

pub use error::{DriftError, Result};
pub use frame::{Frame, FrameSource, ImageStack, ShiftVector};
pub use pipeline::{align, align_stack, align_stack_with, AlignmentOutput};
