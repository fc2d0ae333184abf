pub mod image_io;
pub mod sequence;

pub use image_io::{load_image, rescale_unit, save_canvas, save_png, save_tiff};
pub use sequence::ImageSequence;
