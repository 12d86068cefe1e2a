//! Library side of the `fleetgraph` binary: project paths and pipeline steps.

pub mod paths;
pub mod pipeline;

pub use paths::PipelinePaths;
pub use pipeline::{ExportFormat, Step, StepReport};
