pub mod config_file;
pub mod error;
mod pipeline;
mod plan;
mod state;
pub mod steps;

pub use config_file::ServerConfig;
pub use error::{Component, InstallError};
pub use pipeline::{InstallJob, StepContext, spawn};
pub use plan::{InstallOptions, InstallPlan};
pub use state::{
    LOG_CAPACITY, LogBuffer, LogLevel, LogLine, PipelinePhase, PipelineState, SharedPipeline,
    lock,
};
