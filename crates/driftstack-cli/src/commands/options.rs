use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use driftstack_core::filters::EdgeOperator;
use driftstack_core::pipeline::config::{
    AlignConfig, CompositeStrategy, EstimatorKind, NonFinitePolicy, PreprocessConfig,
    ReferencePolicy, UpsampleFactor,
};

#[derive(Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    FixedFirst,
    RunningPrevious,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum CompositeArg {
    Integer,
    Subpixel,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum EstimatorArg {
    UpsampledDft,
    Paraboloid,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum EdgeArg {
    Scharr,
    Sobel,
}

/// Alignment options shared by the commands that register images.
#[derive(Args)]
pub struct AlignOptions {
    /// Alignment config file (TOML); replaces every flag below
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Upsampling factor: shifts are resolved to 1/N pixel
    #[arg(short, long, default_value = "1")]
    pub upsample: u32,

    /// Reference frame policy
    #[arg(long, value_enum, default_value = "fixed-first")]
    pub policy: PolicyArg,

    /// Compositing strategy
    #[arg(long, value_enum, default_value = "integer")]
    pub composite: CompositeArg,

    /// Shift estimator
    #[arg(long, value_enum, default_value = "upsampled-dft")]
    pub estimator: EstimatorArg,

    /// Disable the Gaussian pre-blur
    #[arg(long)]
    pub no_blur: bool,

    /// Gaussian kernel size (odd)
    #[arg(long, default_value = "7")]
    pub blur_size: usize,

    /// Gaussian sigma (<= 0 derives it from the kernel size)
    #[arg(long, default_value = "3.0", allow_negative_numbers = true)]
    pub blur_sigma: f32,

    /// Register on gradient magnitude instead of intensity
    #[arg(long)]
    pub edge: bool,

    /// Gradient operator used with --edge
    #[arg(long, value_enum, default_value = "scharr")]
    pub edge_operator: EdgeArg,

    /// Normalize the cross-power spectrum (phase correlation)
    #[arg(long)]
    pub normalize: bool,

    /// Skip frames with NaN or infinite values instead of failing
    #[arg(long)]
    pub skip_non_finite: bool,
}

impl AlignOptions {
    /// Load the config file if given, otherwise build the config from flags.
    pub fn to_config(&self) -> Result<AlignConfig> {
        if let Some(ref path) = self.config {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            let config: AlignConfig = toml::from_str(&contents).context("Invalid alignment config")?;
            return Ok(config);
        }

        Ok(AlignConfig {
            preprocess: PreprocessConfig {
                blur: !self.no_blur,
                blur_kernel_size: self.blur_size,
                blur_sigma: self.blur_sigma,
                edge_filter: self.edge,
                edge_operator: match self.edge_operator {
                    EdgeArg::Scharr => EdgeOperator::Scharr,
                    EdgeArg::Sobel => EdgeOperator::Sobel,
                },
            },
            upsample_factor: UpsampleFactor::new(self.upsample)?,
            reference_policy: match self.policy {
                PolicyArg::FixedFirst => ReferencePolicy::FixedFirst,
                PolicyArg::RunningPrevious => ReferencePolicy::RunningPrevious,
            },
            composite: match self.composite {
                CompositeArg::Integer => CompositeStrategy::IntegerShift,
                CompositeArg::Subpixel => CompositeStrategy::ExactSubpixel,
            },
            normalize_cross_power: self.normalize,
            estimator: match self.estimator {
                EstimatorArg::UpsampledDft => EstimatorKind::UpsampledDft,
                EstimatorArg::Paraboloid => EstimatorKind::Paraboloid,
            },
            non_finite: if self.skip_non_finite {
                NonFinitePolicy::Propagate
            } else {
                NonFinitePolicy::Reject
            },
        })
    }
}
