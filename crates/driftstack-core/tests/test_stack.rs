mod common;

use ndarray::Array2;

use driftstack_core::frame::{Frame, ImageStack, ShiftVector};
use driftstack_core::stack::{composite_integer, composite_subpixel, CanvasLayout};
use driftstack_core::DriftError;

use common::{centered_blobs, subpixel_shifted};

fn no_progress(_: usize) -> driftstack_core::Result<()> {
    Ok(())
}

#[test]
fn test_canvas_grows_by_shift_ranges() {
    let shifts = [
        ShiftVector::new(0.0, 0.0),
        ShiftVector::new(-2.0, 5.0),
        ShiftVector::new(3.0, 2.0),
    ];
    let layout = CanvasLayout::from_shifts((10, 12), &shifts);
    assert_eq!(layout.shape, (15, 17));
    assert_eq!(layout.offsets, vec![(3, 5), (5, 0), (0, 3)]);
}

#[test]
fn test_integer_composite_sums_overlaps() {
    let frames = vec![
        Frame::new(Array2::from_elem((2, 2), 1.0)),
        Frame::new(Array2::from_elem((2, 2), 2.0)),
    ];
    let stack = ImageStack::new(frames).unwrap();
    let shifts = [ShiftVector::ZERO, ShiftVector::new(0.0, 1.0)];

    let canvas = composite_integer(&stack, &shifts, &[true, true], no_progress).unwrap();
    assert_eq!(canvas.shape(), (2, 3));
    // frame 1 moves left by one column onto the reference
    let expected = Array2::from_shape_vec((2, 3), vec![2.0, 3.0, 1.0, 2.0, 3.0, 1.0]).unwrap();
    assert_eq!(canvas.data, expected);
    assert_eq!(canvas.reference_offset, (0, 1));
    assert_eq!(canvas.frames_summed, 2);
}

#[test]
fn test_integer_composite_skips_excluded_frames() {
    let frames: Vec<Frame> = (0..5)
        .map(|i| Frame::new(Array2::from_elem((3, 3), i as f32)))
        .collect();
    let stack = ImageStack::new(frames).unwrap();
    let shifts = vec![ShiftVector::ZERO; 5];
    let include = [true, false, true, true, false];

    let canvas = composite_integer(&stack, &shifts, &include, no_progress).unwrap();
    assert!(canvas.data.iter().all(|&v| v == 0.0 + 2.0 + 3.0));
    assert_eq!(canvas.frames_summed, 3);
}

#[test]
fn test_subpixel_composite_realigns_frames() {
    let base = centered_blobs(32, 32);
    let shifts = [
        ShiftVector::ZERO,
        ShiftVector::new(0.5, -1.25),
        ShiftVector::new(-2.0, 0.75),
    ];
    let frames = shifts
        .iter()
        .map(|&s| Frame::new(subpixel_shifted(&base, s)))
        .collect();
    let stack = ImageStack::new(frames).unwrap();

    let canvas = composite_subpixel(&stack, &shifts, &[true; 3], no_progress).unwrap();
    assert_eq!(canvas.shape(), (32, 32));
    for (got, &want) in canvas.data.iter().zip(base.iter()) {
        assert!((got - 3.0 * want as f64).abs() < 1e-4);
    }
}

#[test]
fn test_progress_error_aborts() {
    let frames = vec![Frame::new(Array2::zeros((2, 2))); 6];
    let stack = ImageStack::new(frames).unwrap();
    let shifts = vec![ShiftVector::ZERO; 6];
    let err = composite_integer(&stack, &shifts, &[true; 6], |done| {
        if done >= 3 {
            Err(DriftError::Cancelled)
        } else {
            Ok(())
        }
    })
    .unwrap_err();
    assert!(matches!(err, DriftError::Cancelled));
}

#[test]
fn test_per_frame_slices_must_match_stack_length() {
    let frames = vec![Frame::new(Array2::zeros((4, 4))); 3];
    let stack = ImageStack::new(frames).unwrap();
    let short_shifts = vec![ShiftVector::ZERO; 2];
    let shifts = vec![ShiftVector::ZERO; 3];

    let err = composite_integer(&stack, &short_shifts, &[true; 3], no_progress).unwrap_err();
    assert!(matches!(
        err,
        DriftError::PerFrameLengthMismatch { what: "shifts", expected: 3, found: 2 }
    ));
    let err = composite_subpixel(&stack, &short_shifts, &[true; 3], no_progress).unwrap_err();
    assert!(matches!(err, DriftError::PerFrameLengthMismatch { found: 2, .. }));

    let err = composite_integer(&stack, &shifts, &[true; 1], no_progress).unwrap_err();
    assert!(matches!(
        err,
        DriftError::PerFrameLengthMismatch { what: "contribution flags", expected: 3, found: 1 }
    ));
    let err = composite_subpixel(&stack, &shifts, &[true; 4], no_progress).unwrap_err();
    assert!(matches!(err, DriftError::PerFrameLengthMismatch { found: 4, .. }));
}
