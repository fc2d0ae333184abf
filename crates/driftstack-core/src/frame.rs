use std::borrow::Cow;
use std::fmt;
use std::ops::{Add, Neg, Sub};

use ndarray::{Array2, Array3, ArrayD, Axis, Ix2};
use serde::{Deserialize, Serialize};

use crate::error::{DriftError, Result};

/// A single grayscale frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<f32>,
}

impl Frame {
    pub fn new(data: Array2<f32>) -> Self {
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// (height, width)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// True when no pixel is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

impl From<Array2<f32>> for Frame {
    fn from(data: Array2<f32>) -> Self {
        Self::new(data)
    }
}

/// Translation of a frame relative to its reference, in pixels.
///
/// A frame with shift `s` shows the reference content displaced by `s`:
/// `frame(r, c) ≈ reference(r - dr, c - dc)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShiftVector {
    /// Row (vertical) shift.
    pub dr: f64,
    /// Column (horizontal) shift.
    pub dc: f64,
}

impl ShiftVector {
    pub const ZERO: ShiftVector = ShiftVector { dr: 0.0, dc: 0.0 };

    pub fn new(dr: f64, dc: f64) -> Self {
        Self { dr, dc }
    }

    /// Shift of a frame whose registration correction (the offset that moves
    /// it back onto its reference) is `(row, col)`.
    pub fn from_correction(row: f64, col: f64) -> Self {
        // 0.0 - x keeps a zero correction at +0.0
        Self::new(0.0 - row, 0.0 - col)
    }

    /// Round both components to the nearest whole pixel.
    pub fn round(self) -> (i64, i64) {
        (self.dr.round() as i64, self.dc.round() as i64)
    }

    /// Largest absolute difference between the two components.
    pub fn max_abs_diff(self, other: ShiftVector) -> f64 {
        (self.dr - other.dr).abs().max((self.dc - other.dc).abs())
    }
}

impl Add for ShiftVector {
    type Output = ShiftVector;

    fn add(self, rhs: ShiftVector) -> ShiftVector {
        ShiftVector::new(self.dr + rhs.dr, self.dc + rhs.dc)
    }
}

impl Sub for ShiftVector {
    type Output = ShiftVector;

    fn sub(self, rhs: ShiftVector) -> ShiftVector {
        ShiftVector::new(self.dr - rhs.dr, self.dc - rhs.dc)
    }
}

impl Neg for ShiftVector {
    type Output = ShiftVector;

    fn neg(self) -> ShiftVector {
        ShiftVector::new(-self.dr, -self.dc)
    }
}

impl fmt::Display for ShiftVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:+.3}, {:+.3})", self.dr, self.dc)
    }
}

/// One shift per frame, index-aligned with the stack.
pub type ShiftList = Vec<ShiftVector>;

/// Read-only, indexed access to the frames of a stack.
///
/// Implementations may hold every frame in memory or decode on demand; the
/// pipeline asks for at most a couple of frames per worker at a time.
pub trait FrameSource: Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (height, width) of frame `index`, without decoding it if possible.
    fn frame_shape(&self, index: usize) -> Result<(usize, usize)>;

    fn frame(&self, index: usize) -> Result<Cow<'_, Frame>>;

    fn is_finite(&self, index: usize) -> Result<bool> {
        Ok(self.frame(index)?.is_finite())
    }
}

impl FrameSource for [Frame] {
    fn len(&self) -> usize {
        <[Frame]>::len(self)
    }

    fn frame_shape(&self, index: usize) -> Result<(usize, usize)> {
        Ok(frame_at(self, index)?.shape())
    }

    fn frame(&self, index: usize) -> Result<Cow<'_, Frame>> {
        Ok(Cow::Borrowed(frame_at(self, index)?))
    }
}

fn frame_at(frames: &[Frame], index: usize) -> Result<&Frame> {
    frames.get(index).ok_or(DriftError::FrameIndexOutOfRange {
        index,
        total: frames.len(),
    })
}

/// An ordered, non-empty sequence of equally shaped frames.
#[derive(Clone, Debug)]
pub struct ImageStack {
    frames: Vec<Frame>,
}

impl ImageStack {
    pub fn new(frames: Vec<Frame>) -> Result<Self> {
        let first = frames.first().ok_or(DriftError::EmptyStack)?;
        let expected = first.shape();
        if expected.0 == 0 || expected.1 == 0 {
            return Err(DriftError::EmptyFrame);
        }
        for (index, frame) in frames.iter().enumerate().skip(1) {
            if frame.shape() != expected {
                return Err(DriftError::ShapeMismatch {
                    index,
                    expected,
                    found: frame.shape(),
                });
            }
        }
        Ok(Self { frames })
    }

    pub fn from_arrays(arrays: Vec<Array2<f32>>) -> Result<Self> {
        Self::new(arrays.into_iter().map(Frame::new).collect())
    }

    /// Build a stack from arrays of unchecked dimensionality.
    pub fn from_dyn(arrays: Vec<ArrayD<f32>>) -> Result<Self> {
        let frames = arrays
            .into_iter()
            .enumerate()
            .map(|(index, arr)| {
                let ndim = arr.ndim();
                arr.into_dimensionality::<Ix2>()
                    .map(Frame::new)
                    .map_err(|_| DriftError::NotTwoDimensional { index, ndim })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(frames)
    }

    /// Split a (frames, height, width) array along axis 0.
    pub fn from_array3(stack: &Array3<f32>) -> Result<Self> {
        let frames = stack
            .axis_iter(Axis(0))
            .map(|slice| Frame::new(slice.to_owned()))
            .collect();
        Self::new(frames)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// (height, width) shared by every frame.
    pub fn shape(&self) -> (usize, usize) {
        self.frames[0].shape()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

impl FrameSource for ImageStack {
    fn len(&self) -> usize {
        self.frames.len()
    }

    fn frame_shape(&self, index: usize) -> Result<(usize, usize)> {
        self.frames.as_slice().frame_shape(index)
    }

    fn frame(&self, index: usize) -> Result<Cow<'_, Frame>> {
        self.frames.as_slice().frame(index)
    }
}
