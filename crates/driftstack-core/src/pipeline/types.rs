use std::fmt;

use crate::align::Registration;
use crate::frame::ShiftList;
use crate::stack::Canvas;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Validating,
    EstimatingShifts,
    Compositing,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validating => write!(f, "Validating frames"),
            Self::EstimatingShifts => write!(f, "Estimating shifts"),
            Self::Compositing => write!(f, "Compositing"),
        }
    }
}

/// Thread-safe progress reporting and cancellation for the pipeline.
///
/// All methods have default no-op implementations. `advance` may be called
/// from several worker threads at once.
pub trait ProgressReporter: Send + Sync {
    /// A new stage has started. `total_items` is the number of frames it
    /// visits, if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// `items_done` frames of the current stage are finished.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}

    /// Polled between per-frame steps; returning true aborts the run with
    /// [`DriftError::Cancelled`](crate::DriftError::Cancelled).
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Reporter that ignores everything and never cancels.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// Everything produced by one pipeline run.
#[derive(Clone, Debug)]
pub struct AlignmentOutput {
    pub canvas: Canvas,
    /// Cumulative shift of each frame relative to the reference coordinates.
    pub shifts: ShiftList,
    /// Pairwise estimate behind each shift. Under a running reference these
    /// are the increments against the previous usable frame.
    pub registrations: Vec<Registration>,
    /// Frames whose estimate fell back to a zero shift.
    pub degenerate_frames: Vec<usize>,
    /// Frames left out of the canvas because they held non-finite values.
    pub skipped_frames: Vec<usize>,
}
