// file: src/models/profile.rs
// description: named run profiles, directory targets and output labels
// reference: internal data structures

use super::flags::ToolFlags;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn enabled_by_default() -> bool {
    true
}

/// A directory of topic files and the directory its networks are written to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicTarget {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl TopicTarget {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// One network written per topic file, named `<label><stem>.gml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub label: String,
    #[serde(default)]
    pub flags: ToolFlags,
}

impl OutputSpec {
    pub fn new(label: impl Into<String>, flags: ToolFlags) -> Self {
        Self {
            label: label.into(),
            flags,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub targets: Vec<TopicTarget>,
    #[serde(default)]
    pub outputs: Vec<OutputSpec>,
}

impl RunProfile {
    pub fn active_targets(&self) -> impl Iterator<Item = &TopicTarget> {
        self.targets.iter().filter(|target| target.enabled)
    }
}
