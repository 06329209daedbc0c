// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod flags;
pub mod invocation;
pub mod profile;

pub use flags::{Metric, ToolFlags};
pub use invocation::{Invocation, InvocationOutcome, InvocationStatus};
pub use profile::{OutputSpec, RunProfile, TopicTarget};
