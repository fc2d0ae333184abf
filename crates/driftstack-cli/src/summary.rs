use std::path::Path;

use console::Style;
use driftstack_core::align::Registration;
use driftstack_core::pipeline::config::{AlignConfig, UpsampleFactor};
use driftstack_core::pipeline::AlignmentOutput;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    warning: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            warning: Style::new().yellow().bold(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_align_summary(config: &AlignConfig, frame_count: usize, output: &Path) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Driftstack Alignment"));
    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(frame_count)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Estimator"),
        s.method.apply_to(config.estimator)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Upsampling"),
        s.value.apply_to(config.upsample_factor)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Reference"),
        s.method.apply_to(config.reference_policy)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Composite"),
        s.method.apply_to(config.composite)
    );

    let pre = &config.preprocess;
    if pre.blur {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Blur"),
            s.value
                .apply_to(format!("{}px, sigma {}", pre.blur_kernel_size, pre.blur_sigma))
        );
    } else {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Blur"),
            s.disabled.apply_to("disabled")
        );
    }
    if pre.edge_filter {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Edges"),
            s.method.apply_to(pre.edge_operator)
        );
    }
    println!();
}

pub fn print_alignment_result(output: &AlignmentOutput, path: &Path) {
    let s = Styles::new();
    let (h, w) = output.canvas.shape();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Canvas"),
        s.value.apply_to(format!("{w}x{h}"))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Summed"),
        s.value.apply_to(output.canvas.frames_summed)
    );
    if let Some(last) = output.shifts.last() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Final drift"),
            s.value.apply_to(last)
        );
    }
    if !output.degenerate_frames.is_empty() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Degenerate"),
            s.warning.apply_to(format!("{:?}", output.degenerate_frames))
        );
    }
    if !output.skipped_frames.is_empty() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Skipped"),
            s.warning.apply_to(format!("{:?}", output.skipped_frames))
        );
    }
    println!();
    println!("Output saved to {}", s.path.apply_to(path.display()));
}

pub fn print_registration(registration: &Registration, estimator: &str, upsample: UpsampleFactor) {
    let s = Styles::new();

    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Estimator"),
        s.method.apply_to(format!("{estimator} ({upsample})"))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Shift"),
        s.value.apply_to(registration.shift)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Error"),
        s.value.apply_to(format!("{:.6}", registration.error))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Phase"),
        s.value.apply_to(format!("{:+.6} rad", registration.phase_diff))
    );
    if registration.degenerate {
        println!(
            "  {}",
            s.warning
                .apply_to("Correlation surface is flat; the shift is a zero fallback")
        );
    }
    println!();
}
