use ndarray::Array2;
use num_complex::Complex;
use num_traits::AsPrimitive;
use std::f64::consts::TAU;

use crate::fft::{fft2d_forward, frequency_index, ifft2d_real};
use crate::frame::{Frame, ShiftVector};

/// Translate an image by a (possibly fractional) shift, wrapping at the borders.
///
/// Content moves by `+shift`: `out(r, c) = in(r - dr, c - dc)`. The shift is
/// applied as a phase ramp on the image spectrum and the real part of the
/// inverse transform is kept, so whole-pixel shifts reproduce a circular roll
/// and fractional shifts interpolate band-limited.
pub fn fourier_shift<T>(data: &Array2<T>, shift: ShiftVector) -> Array2<f64>
where
    T: AsPrimitive<f64>,
{
    let (h, w) = data.dim();
    let mut spectrum = fft2d_forward(data);

    let row_ramp: Vec<Complex<f64>> = (0..h)
        .map(|k| ramp(-shift.dr * frequency_index(k, h) / h as f64))
        .collect();
    let col_ramp: Vec<Complex<f64>> = (0..w)
        .map(|k| ramp(-shift.dc * frequency_index(k, w) / w as f64))
        .collect();

    for ((r, c), v) in spectrum.indexed_iter_mut() {
        *v *= row_ramp[r] * col_ramp[c];
    }

    ifft2d_real(&spectrum)
}

/// Fourier-shift a frame, keeping `f32` storage.
pub fn fourier_shift_frame(frame: &Frame, shift: ShiftVector) -> Frame {
    Frame::new(fourier_shift(&frame.data, shift).mapv(|v| v as f32))
}

fn ramp(cycles: f64) -> Complex<f64> {
    Complex::from_polar(1.0, TAU * cycles)
}
