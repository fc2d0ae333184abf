mod common;

use std::path::PathBuf;

use ndarray::Array2;

use driftstack_core::frame::{FrameSource, ShiftVector};
use driftstack_core::io::{load_image, save_canvas, save_png, save_tiff, ImageSequence};
use driftstack_core::pipeline::config::{AlignConfig, PreprocessConfig};
use driftstack_core::stack::Canvas;
use driftstack_core::{align_stack, DriftError};

use common::{centered_blobs, roll};

#[test]
fn test_save_load_roundtrip_tiff() {
    let mut data = Array2::<f64>::zeros((4, 4));
    data[[0, 1]] = 0.5;
    data[[1, 0]] = 1.0;
    data[[2, 3]] = 0.25;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.tiff");

    save_tiff(&data, &path).unwrap();
    let loaded = load_image(&path).unwrap();

    assert_eq!(loaded.width(), 4);
    assert_eq!(loaded.height(), 4);
    assert!((loaded.data[[0, 0]] - 0.0).abs() < 1e-4);
    assert!((loaded.data[[0, 1]] - 0.5).abs() < 1e-3);
    assert!((loaded.data[[1, 0]] - 1.0).abs() < 1e-4);
    assert!((loaded.data[[2, 3]] - 0.25).abs() < 1e-3);
}

#[test]
fn test_save_png() {
    let data = Array2::<f64>::from_elem((8, 8), 0.5);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.png");

    save_png(&data, &path).unwrap();
    let loaded = load_image(&path).unwrap();
    assert!((loaded.data[[3, 3]] - 128.0 / 255.0).abs() < 1e-3);
}

#[test]
fn test_save_canvas_rescales_to_range() {
    let canvas = Canvas {
        data: Array2::from_shape_vec((1, 3), vec![10.0, 15.0, 20.0]).unwrap(),
        reference_offset: (0, 0),
        frames_summed: 2,
    };
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("canvas.tif");

    save_canvas(&canvas, &path).unwrap();
    let loaded = load_image(&path).unwrap();
    assert!(loaded.data[[0, 0]].abs() < 1e-4);
    assert!((loaded.data[[0, 1]] - 0.5).abs() < 1e-3);
    assert!((loaded.data[[0, 2]] - 1.0).abs() < 1e-4);
}

#[test]
fn test_image_sequence_source() {
    let dir = tempfile::tempdir().unwrap();
    let base = centered_blobs(32, 32);
    let peak = base.iter().cloned().fold(0.0f32, f32::max);
    let normalized = base.mapv(|v| v / peak);

    let paths: Vec<PathBuf> = [(0, 0), (2, -3)]
        .iter()
        .enumerate()
        .map(|(i, &(dr, dc))| {
            let path = dir.path().join(format!("frame_{i}.tiff"));
            let rolled = roll(&normalized, dr, dc).mapv(|v| v as f64);
            save_tiff(&rolled, &path).unwrap();
            path
        })
        .collect();

    let sequence = ImageSequence::new(paths);
    assert_eq!(sequence.len(), 2);
    assert_eq!(sequence.frame_shape(1).unwrap(), (32, 32));

    let config = AlignConfig {
        preprocess: PreprocessConfig::none(),
        ..AlignConfig::default()
    };
    let output = align_stack(&sequence, &config).unwrap();
    assert_eq!(output.shifts[1], ShiftVector::new(2.0, -3.0));
    assert_eq!(output.canvas.shape(), (34, 35));
}

#[test]
fn test_image_sequence_out_of_range() {
    let sequence = ImageSequence::new(vec![PathBuf::from("missing.tiff")]);
    assert!(matches!(
        sequence.frame(4),
        Err(DriftError::FrameIndexOutOfRange { index: 4, total: 1 })
    ));
}

#[test]
fn test_missing_file_is_an_error() {
    assert!(load_image(&PathBuf::from("/nonexistent/frame.png")).is_err());
}
