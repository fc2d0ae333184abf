pub mod align;
pub mod config;
pub mod options;
pub mod register;
