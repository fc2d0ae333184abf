use std::path::Path;

use image::{ImageBuffer, ImageFormat, Luma};
use ndarray::Array2;

use crate::error::Result;
use crate::frame::Frame;
use crate::stack::Canvas;

/// Load an image file as a grayscale frame with values in `[0, 1]`.
pub fn load_image(path: &Path) -> Result<Frame> {
    let gray = image::open(path)?.to_luma16();
    let (w, h) = gray.dimensions();
    let data = Array2::from_shape_fn((h as usize, w as usize), |(row, col)| {
        gray.get_pixel(col as u32, row as u32).0[0] as f32 / 65535.0
    });
    Ok(Frame::new(data))
}

/// Linearly map `data` onto `[0, 1]` using its own minimum and maximum.
///
/// A constant image maps to all zeros.
pub fn rescale_unit(data: &Array2<f64>) -> Array2<f64> {
    let (lo, hi) = data
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = hi - lo;
    if !range.is_finite() || range <= 0.0 {
        return Array2::zeros(data.dim());
    }
    data.mapv(|v| ((v - lo) / range).clamp(0.0, 1.0))
}

/// Save unit-range data as 16-bit grayscale TIFF.
pub fn save_tiff(data: &Array2<f64>, path: &Path) -> Result<()> {
    let (h, w) = data.dim();
    let img = ImageBuffer::<Luma<u16>, Vec<u16>>::from_fn(w as u32, h as u32, |x, y| {
        Luma([(data[[y as usize, x as usize]].clamp(0.0, 1.0) * 65535.0).round() as u16])
    });
    img.save_with_format(path, ImageFormat::Tiff)?;
    Ok(())
}

/// Save unit-range data as 8-bit grayscale PNG.
pub fn save_png(data: &Array2<f64>, path: &Path) -> Result<()> {
    let (h, w) = data.dim();
    let img = ImageBuffer::<Luma<u8>, Vec<u8>>::from_fn(w as u32, h as u32, |x, y| {
        Luma([(data[[y as usize, x as usize]].clamp(0.0, 1.0) * 255.0).round() as u8])
    });
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save a canvas rescaled to its own range, choosing format from file extension.
pub fn save_canvas(canvas: &Canvas, path: &Path) -> Result<()> {
    let scaled = rescale_unit(&canvas.data);
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => save_png(&scaled, path),
        _ => save_tiff(&scaled, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rescale_unit_spans_range() {
        let data = Array2::from_shape_vec((1, 3), vec![2.0, 4.0, 6.0]).unwrap();
        let out = rescale_unit(&data);
        assert_eq!(out[[0, 0]], 0.0);
        assert_eq!(out[[0, 1]], 0.5);
        assert_eq!(out[[0, 2]], 1.0);
    }

    #[test]
    fn test_rescale_unit_constant_is_zero() {
        let data = Array2::from_elem((2, 2), 7.0);
        assert!(rescale_unit(&data).iter().all(|&v| v == 0.0));
    }
}
