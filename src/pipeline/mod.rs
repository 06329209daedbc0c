// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod planner;
mod progress;
mod report;
mod runner;

pub use planner::{BatchPlan, BatchPlanner};
pub use progress::{PipelineStats, ProgressTracker};
pub use report::BatchReport;
pub use runner::{BatchRunner, ExitState, Launcher, ProcessLauncher};
