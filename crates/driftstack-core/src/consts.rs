/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Minimum frame count to use frame-level Rayon parallelism.
pub const PARALLEL_FRAME_THRESHOLD: usize = 4;

/// Default side length of the smoothing kernel applied before correlation.
pub const DEFAULT_BLUR_KERNEL_SIZE: usize = 7;

/// Default Gaussian sigma of the smoothing kernel.
pub const DEFAULT_BLUR_SIGMA: f32 = 3.0;

/// Default upsampling factor. 1 means whole-pixel registration only.
pub const DEFAULT_UPSAMPLE_FACTOR: u32 = 1;

/// Side of the upsampled search patch, in original pixels.
/// The patch is `ceil(UPSAMPLED_SEARCH_WINDOW * usfac)` upsampled pixels wide.
pub const UPSAMPLED_SEARCH_WINDOW: f64 = 1.5;

/// Relative peak-to-peak spread below which a correlation surface is flat.
/// Sits at FFT round-off level so a weak pattern on a large mean still counts.
pub const FLAT_SURFACE_TOLERANCE: f64 = 64.0 * f64::EPSILON;

/// Relative non-DC spectral amplitude below which an image is uniform.
pub const STRUCTURE_TOLERANCE: f64 = 1e-9;

/// Spectral bins with magnitude below this are zeroed during normalization.
pub const SPECTRUM_EPSILON: f64 = 1e-12;
