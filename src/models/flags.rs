// file: src/models/flags.rs
// description: network tool flag set and its command line rendering
// reference: network.py argument parser

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Edge similarity metric accepted by the network tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Overlap,
    Cosine,
    Jaccard,
    Inverse,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Overlap => "overlap",
            Metric::Cosine => "cosine",
            Metric::Jaccard => "jaccard",
            Metric::Inverse => "inverse",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flags passed to one invocation of the network tool.
///
/// Unset fields are omitted from the command line so the tool applies its
/// own defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolFlags {
    /// Edge weight cutoff. `Some(0.0)` is rendered explicitly as `0`.
    pub p_threshold: Option<f64>,
    pub exclude_authors: Vec<String>,
    pub metric: Option<Metric>,
    /// Build a network of authors instead of sources.
    pub authors: bool,
    pub min_count: Option<u32>,
    pub min_weight: Option<f64>,
    pub use_frequency: bool,
    pub bipartite: bool,
    pub user_data: Option<PathBuf>,
}

impl ToolFlags {
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(threshold) = self.p_threshold {
            args.push("--p_threshold".to_string());
            args.push(threshold.to_string());
        }

        if !self.exclude_authors.is_empty() {
            args.push("--exclude_authors".to_string());
            args.extend(self.exclude_authors.iter().cloned());
        }

        if let Some(metric) = self.metric {
            args.push("--metric".to_string());
            args.push(metric.to_string());
        }

        if self.authors {
            args.push("--authors".to_string());
        }

        if let Some(min_count) = self.min_count {
            args.push("--min_count".to_string());
            args.push(min_count.to_string());
        }

        if let Some(min_weight) = self.min_weight {
            args.push("--min_weight".to_string());
            args.push(min_weight.to_string());
        }

        if self.use_frequency {
            args.push("--use_frequency".to_string());
        }

        if self.bipartite {
            args.push("--bipartite".to_string());
        }

        if let Some(ref path) = self.user_data {
            args.push("--user-data".to_string());
            args.push(path.display().to_string());
        }

        args
    }
}
