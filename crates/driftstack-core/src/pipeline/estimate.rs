use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::Array2;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::align::{Registration, ShiftEstimator};
use crate::consts::PARALLEL_FRAME_THRESHOLD;
use crate::error::{DriftError, Result};
use crate::filters::preprocess;
use crate::frame::{FrameSource, ShiftList, ShiftVector};

use super::config::PreprocessConfig;
use super::types::ProgressReporter;

/// Register every usable frame against the first usable one.
///
/// Estimates are independent and run frame-parallel for larger stacks.
pub(super) fn estimate_fixed_first<S>(
    source: &S,
    usable: &[bool],
    preprocess_config: &PreprocessConfig,
    estimator: &dyn ShiftEstimator,
    reporter: &dyn ProgressReporter,
) -> Result<(Vec<Registration>, ShiftList)>
where
    S: FrameSource + ?Sized,
{
    let n = source.len();
    let Some(anchor_index) = usable.iter().position(|&u| u) else {
        return Ok((vec![Registration::degenerate(); n], vec![ShiftVector::ZERO; n]));
    };
    let anchor = load_preprocessed(source, anchor_index, preprocess_config)?;
    let counter = AtomicUsize::new(0);

    let register = |i: usize| -> Result<Registration> {
        if reporter.is_cancelled() {
            return Err(DriftError::Cancelled);
        }
        let registration = if !usable[i] {
            Registration::degenerate()
        } else if i == anchor_index {
            Registration::identity()
        } else {
            let target = load_preprocessed(source, i, preprocess_config)?;
            estimator.estimate(&anchor, &target)?
        };
        log_registration(i, &registration, usable[i]);
        let done = counter.fetch_add(1, Ordering::Relaxed) + 1;
        reporter.advance(done);
        Ok(registration)
    };

    let registrations: Vec<Registration> = if n >= PARALLEL_FRAME_THRESHOLD {
        (0..n).into_par_iter().map(register).collect::<Result<_>>()?
    } else {
        (0..n).map(register).collect::<Result<_>>()?
    };
    let shifts = registrations.iter().map(|r| r.shift).collect();
    Ok((registrations, shifts))
}

/// Register each usable frame against the last frame that registered cleanly
/// and chain the increments. A degenerate frame never becomes the reference,
/// so `cumulative` always holds the reference's shift. Holds at most two
/// preprocessed frames at a time.
pub(super) fn estimate_running_previous<S>(
    source: &S,
    usable: &[bool],
    preprocess_config: &PreprocessConfig,
    estimator: &dyn ShiftEstimator,
    reporter: &dyn ProgressReporter,
) -> Result<(Vec<Registration>, ShiftList)>
where
    S: FrameSource + ?Sized,
{
    let n = source.len();
    let mut registrations = Vec::with_capacity(n);
    let mut shifts = Vec::with_capacity(n);
    let mut previous: Option<Array2<f32>> = None;
    let mut cumulative = ShiftVector::ZERO;

    for i in 0..n {
        if reporter.is_cancelled() {
            return Err(DriftError::Cancelled);
        }
        let registration = if usable[i] {
            let current = load_preprocessed(source, i, preprocess_config)?;
            let registration = match &previous {
                Some(reference) => estimator.estimate(reference, &current)?,
                None => Registration::identity(),
            };
            if !registration.degenerate {
                previous = Some(current);
            }
            registration
        } else {
            Registration::degenerate()
        };

        // degenerate increments are zero: the frame inherits the reference's shift
        cumulative = cumulative + registration.shift;
        log_registration(i, &registration, usable[i]);
        registrations.push(registration);
        shifts.push(cumulative);
        reporter.advance(i + 1);
    }

    Ok((registrations, shifts))
}

fn load_preprocessed<S>(source: &S, index: usize, config: &PreprocessConfig) -> Result<Array2<f32>>
where
    S: FrameSource + ?Sized,
{
    let frame = source.frame(index)?;
    preprocess(&frame.data, config)
}

fn log_registration(index: usize, registration: &Registration, usable: bool) {
    if registration.degenerate && usable {
        warn!(frame = index, "Flat correlation surface, using zero shift");
    }
    debug!(
        frame = index,
        shift = %registration.shift,
        error = registration.error,
        phase_diff = registration.phase_diff,
        "Registered frame"
    );
}
