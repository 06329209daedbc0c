// file: src/models/invocation.rs
// description: resolved network tool invocations and their recorded outcomes
// reference: internal data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    pub profile: String,
    pub label: String,
    pub program: String,
    pub args: Vec<String>,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Author ranking the tool writes next to the network.
    pub companion_path: PathBuf,
    /// Directory the tool runs in; inherited when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

impl Invocation {
    /// Value following `flag` in the argument list, if present.
    pub fn flag_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|arg| arg == flag)
            .and_then(|idx| self.args.get(idx + 1))
            .map(String::as_str)
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.args.iter().any(|arg| arg == flag)
    }

    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            if arg.contains(char::is_whitespace) {
                line.push_str(&format!("'{}'", arg));
            } else {
                line.push_str(arg);
            }
        }
        line
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvocationStatus {
    Succeeded,
    /// Exited non-zero, or `None` when terminated by a signal.
    Failed { exit_code: Option<i32> },
    LaunchFailed { message: String },
}

impl InvocationStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationStatus::Succeeded)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationOutcome {
    pub invocation: Invocation,
    #[serde(flatten)]
    pub status: InvocationStatus,
    pub duration_ms: u64,
    /// The network file was created or changed by this invocation.
    pub network_written: bool,
    pub companion_written: bool,
}
