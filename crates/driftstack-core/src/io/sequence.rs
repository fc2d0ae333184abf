use std::borrow::Cow;
use std::path::PathBuf;

use crate::error::{DriftError, Result};
use crate::frame::{Frame, FrameSource};

use super::image_io::load_image;

/// A stack backed by image files, decoded one frame at a time on request.
#[derive(Clone, Debug)]
pub struct ImageSequence {
    paths: Vec<PathBuf>,
}

impl ImageSequence {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    fn path(&self, index: usize) -> Result<&PathBuf> {
        self.paths.get(index).ok_or(DriftError::FrameIndexOutOfRange {
            index,
            total: self.paths.len(),
        })
    }
}

impl FrameSource for ImageSequence {
    fn len(&self) -> usize {
        self.paths.len()
    }

    fn frame_shape(&self, index: usize) -> Result<(usize, usize)> {
        let (w, h) = image::image_dimensions(self.path(index)?)?;
        Ok((h as usize, w as usize))
    }

    fn frame(&self, index: usize) -> Result<Cow<'_, Frame>> {
        Ok(Cow::Owned(load_image(self.path(index)?)?))
    }

    /// Decoded integer pixels are always finite.
    fn is_finite(&self, index: usize) -> Result<bool> {
        self.path(index)?;
        Ok(true)
    }
}
