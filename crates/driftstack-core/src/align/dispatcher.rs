use crate::pipeline::config::{AlignConfig, EstimatorKind};

use super::{ParaboloidEstimator, ShiftEstimator, UpsampledDftEstimator};

/// Build the shift estimator selected by the configuration.
pub fn build_estimator(config: &AlignConfig) -> Box<dyn ShiftEstimator> {
    match config.estimator {
        EstimatorKind::UpsampledDft => Box::new(UpsampledDftEstimator::new(
            config.upsample_factor.get(),
            config.normalize_cross_power,
        )),
        EstimatorKind::Paraboloid => Box::new(ParaboloidEstimator {
            normalize: config.normalize_cross_power,
        }),
    }
}
