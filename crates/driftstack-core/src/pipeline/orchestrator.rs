use std::sync::Arc;

use tracing::info;

use crate::align::{build_estimator, ShiftEstimator};
use crate::error::{DriftError, Result};
use crate::frame::{FrameSource, ShiftList};
use crate::stack::{composite, Canvas};

use super::config::{AlignConfig, ReferencePolicy};
use super::estimate::{estimate_fixed_first, estimate_running_previous};
use super::types::{AlignmentOutput, NoOpReporter, PipelineStage, ProgressReporter};
use super::validate::validate_source;

/// Register and composite a stack with the estimator selected by `config`.
pub fn align_stack<S>(source: &S, config: &AlignConfig) -> Result<AlignmentOutput>
where
    S: FrameSource + ?Sized,
{
    let estimator = build_estimator(config);
    align_stack_with(source, config, estimator.as_ref(), Arc::new(NoOpReporter))
}

/// Register and composite a stack, returning only the canvas and the shifts.
pub fn align<S>(source: &S, config: &AlignConfig) -> Result<(Canvas, ShiftList)>
where
    S: FrameSource + ?Sized,
{
    let output = align_stack(source, config)?;
    Ok((output.canvas, output.shifts))
}

/// Run the full pipeline with an explicit estimator and progress reporter.
///
/// Validation covers the whole source before any estimation starts. The
/// reporter is polled for cancellation between per-frame steps.
pub fn align_stack_with<S>(
    source: &S,
    config: &AlignConfig,
    estimator: &dyn ShiftEstimator,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<AlignmentOutput>
where
    S: FrameSource + ?Sized,
{
    let total = source.len();

    reporter.begin_stage(PipelineStage::Validating, Some(total));
    let usable = validate_source(source, config, reporter.as_ref())?;
    reporter.finish_stage();

    let (height, width) = source.frame_shape(0)?;
    info!(
        frames = total,
        height,
        width,
        policy = %config.reference_policy,
        estimator = estimator.name(),
        upsample = %config.upsample_factor,
        "Aligning stack"
    );

    reporter.begin_stage(PipelineStage::EstimatingShifts, Some(total));
    let (registrations, shifts) = match config.reference_policy {
        ReferencePolicy::FixedFirst => estimate_fixed_first(
            source,
            &usable,
            &config.preprocess,
            estimator,
            reporter.as_ref(),
        )?,
        ReferencePolicy::RunningPrevious => estimate_running_previous(
            source,
            &usable,
            &config.preprocess,
            estimator,
            reporter.as_ref(),
        )?,
    };
    reporter.finish_stage();

    let degenerate_frames: Vec<usize> = registrations
        .iter()
        .enumerate()
        .filter(|(_, r)| r.degenerate)
        .map(|(i, _)| i)
        .collect();
    let skipped_frames: Vec<usize> = usable
        .iter()
        .enumerate()
        .filter(|(_, u)| !**u)
        .map(|(i, _)| i)
        .collect();

    reporter.begin_stage(PipelineStage::Compositing, Some(total));
    let r = reporter.clone();
    let canvas = composite(source, &shifts, &usable, config.composite, move |done| {
        if r.is_cancelled() {
            return Err(DriftError::Cancelled);
        }
        r.advance(done);
        Ok(())
    })?;
    reporter.finish_stage();

    let (canvas_height, canvas_width) = canvas.shape();
    info!(
        canvas_height,
        canvas_width,
        strategy = %config.composite,
        summed = canvas.frames_summed,
        degenerate = degenerate_frames.len(),
        skipped = skipped_frames.len(),
        "Compositing complete"
    );

    Ok(AlignmentOutput {
        canvas,
        shifts,
        registrations,
        degenerate_frames,
        skipped_frames,
    })
}
