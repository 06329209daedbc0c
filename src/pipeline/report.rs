// file: src/pipeline/report.rs
// description: summary of one batch run, written out by the json exporter

use crate::models::InvocationOutcome;
use crate::pipeline::progress::PipelineStats;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub started_at: String,
    pub finished_at: String,
    pub profiles: Vec<String>,
    pub stats: PipelineStats,
    pub outcomes: Vec<InvocationOutcome>,
}

impl BatchReport {
    pub fn failures(&self) -> impl Iterator<Item = &InvocationOutcome> {
        self.outcomes.iter().filter(|o| !o.status.is_success())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}
