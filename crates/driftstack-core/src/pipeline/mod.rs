pub mod config;
mod estimate;
mod orchestrator;
mod types;
mod validate;

pub use config::AlignConfig;
pub use orchestrator::{align, align_stack, align_stack_with};
pub use types::{AlignmentOutput, NoOpReporter, PipelineStage, ProgressReporter};
