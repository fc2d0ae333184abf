use crate::frame::ShiftVector;

/// Canvas size and per-frame placement for whole-pixel compositing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanvasLayout {
    /// (height, width) of the canvas.
    pub shape: (usize, usize),
    /// Top-left corner of each frame on the canvas, index-aligned with the shifts.
    pub offsets: Vec<(usize, usize)>,
}

impl CanvasLayout {
    /// Lay out frames of `frame_shape` displaced by `shifts`.
    ///
    /// Shifts are rounded to whole pixels. Each frame is placed opposite to
    /// its displacement so that every frame lands on the reference
    /// coordinates; the smallest placement is `(0, 0)` and the canvas grows by
    /// the row and column shift ranges independently.
    pub fn from_shifts(frame_shape: (usize, usize), shifts: &[ShiftVector]) -> Self {
        let rounded: Vec<(i64, i64)> = shifts.iter().map(|s| s.round()).collect();

        let max_r = rounded.iter().map(|s| s.0).max().unwrap_or(0);
        let min_r = rounded.iter().map(|s| s.0).min().unwrap_or(0);
        let max_c = rounded.iter().map(|s| s.1).max().unwrap_or(0);
        let min_c = rounded.iter().map(|s| s.1).min().unwrap_or(0);

        let shape = (
            frame_shape.0 + (max_r - min_r) as usize,
            frame_shape.1 + (max_c - min_c) as usize,
        );
        let offsets = rounded
            .iter()
            .map(|&(r, c)| ((max_r - r) as usize, (max_c - c) as usize))
            .collect();

        Self { shape, offsets }
    }

    /// Growth of the canvas over a single frame, (rows, cols).
    pub fn growth(&self, frame_shape: (usize, usize)) -> (usize, usize) {
        (self.shape.0 - frame_shape.0, self.shape.1 - frame_shape.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_shifts_keeps_frame_shape() {
        let layout = CanvasLayout::from_shifts((10, 12), &[ShiftVector::ZERO; 3]);
        assert_eq!(layout.shape, (10, 12));
        assert_eq!(layout.offsets, vec![(0, 0); 3]);
    }

    #[test]
    fn test_offsets_oppose_displacement() {
        let shifts = [ShiftVector::ZERO, ShiftVector::new(2.0, -1.0)];
        let layout = CanvasLayout::from_shifts((4, 4), &shifts);
        assert_eq!(layout.shape, (6, 5));
        assert_eq!(layout.offsets, vec![(2, 0), (0, 1)]);
    }

    #[test]
    fn test_rounding_before_layout() {
        let shifts = [ShiftVector::ZERO, ShiftVector::new(0.6, -0.4)];
        let layout = CanvasLayout::from_shifts((4, 4), &shifts);
        assert_eq!(layout.shape, (5, 4));
        assert_eq!(layout.growth((4, 4)), (1, 0));
    }
}
