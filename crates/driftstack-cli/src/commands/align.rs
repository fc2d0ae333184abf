use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use driftstack_core::align::build_estimator;
use driftstack_core::io::{save_canvas, ImageSequence};
use driftstack_core::pipeline::{align_stack_with, AlignmentOutput};
use driftstack_core::FrameSource;
use serde::Serialize;

use super::options::AlignOptions;
use crate::progress::BarReporter;

#[derive(Args)]
pub struct AlignArgs {
    /// Input images, in stack order
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    #[command(flatten)]
    pub options: AlignOptions,

    /// Composite output path (.tiff for 16-bit, .png for 8-bit)
    #[arg(short, long, default_value = "composite.tiff")]
    pub output: PathBuf,

    /// Write the per-frame shifts to this TOML file
    #[arg(long)]
    pub shifts: Option<PathBuf>,
}

pub fn run(args: &AlignArgs) -> Result<()> {
    let config = args.options.to_config()?;
    let source = ImageSequence::new(args.images.clone());

    crate::summary::print_align_summary(&config, source.len(), &args.output);

    let estimator = build_estimator(&config);
    let reporter = Arc::new(BarReporter::new()?);
    let output = align_stack_with(&source, &config, estimator.as_ref(), reporter.clone())
        .context("Alignment failed")?;
    reporter.finish();

    save_canvas(&output.canvas, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    if let Some(ref path) = args.shifts {
        write_shift_report(&output, source.paths(), path)?;
    }

    crate::summary::print_alignment_result(&output, &args.output);
    Ok(())
}

#[derive(Serialize)]
struct ShiftReport {
    canvas_height: usize,
    canvas_width: usize,
    frames: Vec<FrameEntry>,
}

#[derive(Serialize)]
struct FrameEntry {
    index: usize,
    path: String,
    dr: f64,
    dc: f64,
    error: f64,
    phase_diff: f64,
    degenerate: bool,
    skipped: bool,
}

fn write_shift_report(output: &AlignmentOutput, paths: &[PathBuf], path: &Path) -> Result<()> {
    let (canvas_height, canvas_width) = output.canvas.shape();
    let frames = output
        .shifts
        .iter()
        .zip(&output.registrations)
        .zip(paths)
        .enumerate()
        .map(|(index, ((shift, registration), frame_path))| FrameEntry {
            index,
            path: frame_path.display().to_string(),
            dr: shift.dr,
            dc: shift.dc,
            error: registration.error,
            phase_diff: registration.phase_diff,
            degenerate: registration.degenerate,
            skipped: output.skipped_frames.contains(&index),
        })
        .collect();

    let report = ShiftReport {
        canvas_height,
        canvas_width,
        frames,
    };
    let toml_str = toml::to_string_pretty(&report)?;
    std::fs::write(path, toml_str)
        .with_context(|| format!("Failed to write shift report to {}", path.display()))?;
    Ok(())
}
