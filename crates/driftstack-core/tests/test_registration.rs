mod common;

use approx::assert_abs_diff_eq;
use ndarray::Array2;

use driftstack_core::align::{
    coarse_shift, dft_registration, ParaboloidEstimator, ShiftEstimator, UpsampledDftEstimator,
};
use driftstack_core::frame::ShiftVector;
use driftstack_core::DriftError;

use common::{centered_blobs, roll, subpixel_shifted};

#[test]
fn test_identical_images_have_zero_shift() {
    let image = centered_blobs(64, 64);
    let reg = dft_registration(&image, &image, 8, false).unwrap();
    assert_eq!(reg.shift, ShiftVector::ZERO);
    assert!(!reg.degenerate);
    assert!(reg.error < 1e-6, "error={}", reg.error);
    assert!(reg.phase_diff.abs() < 1e-9);
}

#[test]
fn test_integer_roll_recovered_exactly() {
    let reference = centered_blobs(64, 64);
    let target = roll(&reference, 3, -2);
    let reg = coarse_shift(&reference, &target, false).unwrap();
    assert_eq!(reg.shift, ShiftVector::new(3.0, -2.0));
}

#[test]
fn test_integer_roll_recovered_with_normalized_spectrum() {
    let reference = centered_blobs(48, 40);
    let target = roll(&reference, -5, 7);
    let reg = coarse_shift(&reference, &target, true).unwrap();
    assert_eq!(reg.shift, ShiftVector::new(-5.0, 7.0));
    assert!(reg.error < 1e-6, "error={}", reg.error);
}

#[test]
fn test_large_roll_wraps_to_negative() {
    let reference = centered_blobs(64, 64);
    let target = roll(&reference, 40, 0);
    let reg = coarse_shift(&reference, &target, false).unwrap();
    assert_eq!(reg.shift, ShiftVector::new(-24.0, 0.0));
}

#[test]
fn test_subpixel_shift_within_one_eighth() {
    let reference = centered_blobs(64, 64);
    let truth = ShiftVector::new(1.25, -0.75);
    let target = subpixel_shifted(&reference, truth);

    let reg = dft_registration(&reference, &target, 8, false).unwrap();
    assert!(
        reg.shift.max_abs_diff(truth) <= 1.0 / 8.0,
        "estimated {} for {}",
        reg.shift,
        truth
    );
}

#[test]
fn test_fine_upsampling_precision() {
    let reference = centered_blobs(64, 64);
    let truth = ShiftVector::new(0.37, -1.61);
    let target = subpixel_shifted(&reference, truth);

    let reg = dft_registration(&reference, &target, 100, false).unwrap();
    assert_abs_diff_eq!(reg.shift.dr, truth.dr, epsilon = 0.011);
    assert_abs_diff_eq!(reg.shift.dc, truth.dc, epsilon = 0.011);
    assert!(reg.error < 0.05, "error={}", reg.error);
}

#[test]
fn test_estimates_are_antisymmetric() {
    let a = centered_blobs(64, 64);
    let b = subpixel_shifted(&a, ShiftVector::new(1.25, -0.75));

    let ab = dft_registration(&a, &b, 8, false).unwrap();
    let ba = dft_registration(&b, &a, 8, false).unwrap();
    assert_abs_diff_eq!(ab.shift.dr, -ba.shift.dr, epsilon = 1e-9);
    assert_abs_diff_eq!(ab.shift.dc, -ba.shift.dc, epsilon = 1e-9);
}

#[test]
fn test_upsample_factor_one_matches_coarse() {
    let reference = centered_blobs(32, 32);
    let target = roll(&reference, 2, 1);
    let coarse = coarse_shift(&reference, &target, false).unwrap();
    let fine = dft_registration(&reference, &target, 1, false).unwrap();
    assert_eq!(coarse.shift, fine.shift);
}

#[test]
fn test_constant_images_are_degenerate() {
    let flat = Array2::<f32>::from_elem((16, 16), 0.5);
    let reg = dft_registration(&flat, &flat, 4, false).unwrap();
    assert!(reg.degenerate);
    assert_eq!(reg.shift, ShiftVector::ZERO);
}

#[test]
fn test_faint_pattern_on_bright_pedestal_recovered() {
    let reference = centered_blobs(64, 64).mapv(|v| 1000.0 + 0.01 * v);
    let target = roll(&reference, 3, -2);
    for normalize in [false, true] {
        let reg = dft_registration(&reference, &target, 1, normalize).unwrap();
        assert!(!reg.degenerate, "normalize={normalize}");
        assert_eq!(reg.shift, ShiftVector::new(3.0, -2.0), "normalize={normalize}");
    }
}

#[test]
fn test_zero_images_are_degenerate_when_normalized() {
    let zeros = Array2::<f32>::zeros((16, 16));
    let reg = dft_registration(&zeros, &zeros, 4, true).unwrap();
    assert!(reg.degenerate);
    assert_eq!(reg.shift, ShiftVector::ZERO);
}

#[test]
fn test_pair_shape_mismatch() {
    let a = Array2::<f32>::zeros((16, 16));
    let b = Array2::<f32>::zeros((16, 17));
    let err = dft_registration(&a, &b, 2, false).unwrap_err();
    assert!(matches!(err, DriftError::PairShapeMismatch { .. }));
}

#[test]
fn test_single_row_images_only_shift_columns() {
    let row = Array2::from_shape_fn((1, 64), |(_, c)| {
        let x = c as f64 - 30.0;
        (-x * x / 18.0).exp() as f32 + 0.5 * (-(x - 9.0).powi(2) / 8.0).exp() as f32
    });
    let target = roll(&row, 0, 3);
    let reg = dft_registration(&row, &target, 4, false).unwrap();
    assert_eq!(reg.shift.dr, 0.0);
    assert_abs_diff_eq!(reg.shift.dc, 3.0, epsilon = 0.25);
}

#[test]
fn test_paraboloid_estimator_recovers_integer_shift() {
    let reference = centered_blobs(64, 64);
    let target = roll(&reference, 3, -2);
    let estimator = ParaboloidEstimator::default();
    assert_eq!(estimator.name(), "paraboloid");

    let reg = estimator.estimate(&reference, &target).unwrap();
    assert!(reg.shift.max_abs_diff(ShiftVector::new(3.0, -2.0)) < 0.5);
}

#[test]
fn test_paraboloid_estimator_approximates_subpixel_shift() {
    let reference = centered_blobs(64, 64);
    let truth = ShiftVector::new(2.4, 1.3);
    let target = subpixel_shifted(&reference, truth);
    let reg = ParaboloidEstimator::default()
        .estimate(&reference, &target)
        .unwrap();
    assert!(reg.shift.max_abs_diff(truth) < 0.5, "estimated {}", reg.shift);
}

#[test]
fn test_estimator_trait_object() {
    let estimators: Vec<Box<dyn ShiftEstimator>> = vec![
        Box::new(UpsampledDftEstimator::new(4, false)),
        Box::new(ParaboloidEstimator::default()),
    ];
    let reference = centered_blobs(32, 32);
    let target = roll(&reference, 1, 2);
    for estimator in &estimators {
        let reg = estimator.estimate(&reference, &target).unwrap();
        assert!(
            reg.shift.max_abs_diff(ShiftVector::new(1.0, 2.0)) < 0.5,
            "{}: {}",
            estimator.name(),
            reg.shift
        );
    }
}
