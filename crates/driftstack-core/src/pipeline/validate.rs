use tracing::warn;

use crate::error::{DriftError, Result};
use crate::frame::FrameSource;

use super::config::{AlignConfig, NonFinitePolicy};
use super::types::ProgressReporter;

/// Check the whole source and the configuration before any computation.
///
/// Returns one flag per frame: `true` when the frame holds only finite
/// values and takes part in registration and compositing.
pub(super) fn validate_source<S>(
    source: &S,
    config: &AlignConfig,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<bool>>
where
    S: FrameSource + ?Sized,
{
    config.validate()?;

    if source.is_empty() {
        return Err(DriftError::EmptyStack);
    }
    let expected = source.frame_shape(0)?;
    if expected.0 == 0 || expected.1 == 0 {
        return Err(DriftError::EmptyFrame);
    }
    for index in 1..source.len() {
        let found = source.frame_shape(index)?;
        if found != expected {
            return Err(DriftError::ShapeMismatch {
                index,
                expected,
                found,
            });
        }
    }

    let mut usable = Vec::with_capacity(source.len());
    for index in 0..source.len() {
        if reporter.is_cancelled() {
            return Err(DriftError::Cancelled);
        }
        let finite = source.is_finite(index)?;
        if !finite {
            match config.non_finite {
                NonFinitePolicy::Reject => return Err(DriftError::NonFiniteFrame { index }),
                NonFinitePolicy::Propagate => {
                    warn!(frame = index, "Frame holds non-finite values, skipping");
                }
            }
        }
        usable.push(finite);
        reporter.advance(index + 1);
    }
    Ok(usable)
}
