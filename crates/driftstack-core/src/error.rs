use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriftError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Empty image stack")]
    EmptyStack,

    #[error("Frame has zero width or height")]
    EmptyFrame,

    #[error("Frame {index} is {}x{} but the stack is {}x{}", .found.1, .found.0, .expected.1, .expected.0)]
    ShapeMismatch {
        index: usize,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Array size mismatch: {}x{} vs {}x{}", .reference.1, .reference.0, .target.1, .target.0)]
    PairShapeMismatch {
        reference: (usize, usize),
        target: (usize, usize),
    },

    #[error("Frame {index} has {ndim} dimensions, expected 2")]
    NotTwoDimensional { index: usize, ndim: usize },

    #[error("Upsampling factor must be an integer >= 1, got {0}")]
    InvalidUpsampleFactor(f64),

    #[error("Blur kernel size must be odd and positive, got {0}")]
    InvalidKernelSize(usize),

    #[error("Frame {index} contains NaN or infinite values")]
    NonFiniteFrame { index: usize },

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Got {found} {what} for a stack of {expected} frames")]
    PerFrameLengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Alignment cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DriftError>;
