use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use driftstack_core::align::build_estimator;
use driftstack_core::filters::preprocess;
use driftstack_core::io::load_image;

use super::options::AlignOptions;

#[derive(Args)]
pub struct RegisterArgs {
    /// Reference image
    pub reference: PathBuf,

    /// Image whose shift relative to the reference is estimated
    pub target: PathBuf,

    #[command(flatten)]
    pub options: AlignOptions,
}

pub fn run(args: &RegisterArgs) -> Result<()> {
    let config = args.options.to_config()?;
    config.validate()?;

    let reference = load_image(&args.reference)
        .with_context(|| format!("Failed to read {}", args.reference.display()))?;
    let target = load_image(&args.target)
        .with_context(|| format!("Failed to read {}", args.target.display()))?;

    let estimator = build_estimator(&config);
    let registration = estimator.estimate(
        &preprocess(&reference.data, &config.preprocess)?,
        &preprocess(&target.data, &config.preprocess)?,
    )?;

    crate::summary::print_registration(&registration, estimator.name(), config.upsample_factor);
    Ok(())
}
