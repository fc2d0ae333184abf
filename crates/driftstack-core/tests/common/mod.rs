#![allow(dead_code)]

use ndarray::Array2;

use driftstack_core::align::fourier_shift;
use driftstack_core::frame::{Frame, ImageStack, ShiftVector};

/// Small deterministic generator so synthetic scenes are reproducible.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Uniform in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Sum of Gaussian blobs of varying size and brightness.
pub fn blob_scene(h: usize, w: usize, blobs: usize, seed: u64) -> Array2<f32> {
    let mut rng = Lcg::new(seed);
    let params: Vec<(f64, f64, f64, f64)> = (0..blobs)
        .map(|_| {
            (
                rng.next_f64() * h as f64,
                rng.next_f64() * w as f64,
                1.5 + rng.next_f64() * 3.0,
                0.3 + rng.next_f64() * 0.7,
            )
        })
        .collect();
    Array2::from_shape_fn((h, w), |(r, c)| {
        params
            .iter()
            .map(|&(cr, cc, sigma, amp)| {
                let d2 = (r as f64 - cr).powi(2) + (c as f64 - cc).powi(2);
                amp * (-d2 / (2.0 * sigma * sigma)).exp()
            })
            .sum::<f64>() as f32
    })
}

/// Asymmetric test image with blobs kept away from the borders.
pub fn centered_blobs(h: usize, w: usize) -> Array2<f32> {
    let blobs = [
        (0.35, 0.40, 3.0, 1.0),
        (0.55, 0.62, 2.0, 0.7),
        (0.62, 0.35, 4.0, 0.5),
        (0.42, 0.58, 1.5, 0.9),
    ];
    Array2::from_shape_fn((h, w), |(r, c)| {
        blobs
            .iter()
            .map(|&(fr, fc, sigma, amp): &(f64, f64, f64, f64)| {
                let d2 = (r as f64 - fr * h as f64).powi(2) + (c as f64 - fc * w as f64).powi(2);
                amp * (-d2 / (2.0 * sigma * sigma)).exp()
            })
            .sum::<f64>() as f32
    })
}

/// Circular roll: `out(r, c) = data(r - dr, c - dc)` with wrap-around.
pub fn roll(data: &Array2<f32>, dr: isize, dc: isize) -> Array2<f32> {
    let (h, w) = data.dim();
    let (hi, wi) = (h as isize, w as isize);
    Array2::from_shape_fn((h, w), |(r, c)| {
        let sr = (r as isize - dr).rem_euclid(hi) as usize;
        let sc = (c as isize - dc).rem_euclid(wi) as usize;
        data[[sr, sc]]
    })
}

/// Band-limited sub-pixel translation of `data` by `shift`.
pub fn subpixel_shifted(data: &Array2<f32>, shift: ShiftVector) -> Array2<f32> {
    fourier_shift(data, shift).mapv(|v| v as f32)
}

/// `h x w` window of `scene` whose top-left corner is `(row, col)`.
pub fn crop(scene: &Array2<f32>, row: usize, col: usize, h: usize, w: usize) -> Array2<f32> {
    scene
        .slice(ndarray::s![row..row + h, col..col + w])
        .to_owned()
}

/// Stack of `base` rolled by each integer shift.
pub fn rolled_stack(base: &Array2<f32>, shifts: &[(isize, isize)]) -> ImageStack {
    let frames = shifts
        .iter()
        .map(|&(dr, dc)| Frame::new(roll(base, dr, dc)))
        .collect();
    ImageStack::new(frames).unwrap()
}
