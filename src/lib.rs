// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod exporter;
pub mod models;
pub mod pipeline;
pub mod topics;
pub mod utils;

pub use config::{BatchConfig, Config, ToolConfig};
pub use error::{DriverError, Result};
pub use exporter::JsonExporter;
pub use models::{
    Invocation, InvocationOutcome, InvocationStatus, Metric, OutputSpec, RunProfile, ToolFlags,
    TopicTarget,
};
pub use pipeline::{
    BatchPlan, BatchPlanner, BatchReport, BatchRunner, ExitState, Launcher, PipelineStats,
    ProcessLauncher, ProgressTracker,
};
pub use topics::{OutputNamer, TopicFile, TopicScanner};
pub use utils::{HealthCheck, HealthReport, HealthStatus, OperationTimer, Validator};
