// file: src/exporter/json.rs
// description: json export of batch run reports

use crate::error::Result;
use crate::pipeline::BatchReport;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn report_path(&self, report: &BatchReport) -> PathBuf {
        self.output_dir.join(format!("batch-{}.json", report.run_id))
    }

    pub fn write_report(&self, report: &BatchReport, pretty: bool) -> Result<PathBuf> {
        let path = self.report_path(report);
        let body = if pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };

        fs::write(&path, body)?;
        info!(
            "Wrote batch report ({} invocations) to {}",
            report.outcomes.len(),
            path.display()
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Invocation, InvocationOutcome, InvocationStatus};
    use crate::pipeline::PipelineStats;
    use tempfile::tempdir;
    use uuid::Uuid;

    fn report() -> BatchReport {
        let invocation = Invocation {
            profile: "default".to_string(),
            label: "network-".to_string(),
            program: "python3".to_string(),
            args: vec!["network.py".to_string()],
            input_path: PathBuf::from("topics/0.5/climate.txt"),
            output_path: PathBuf::from("networks/0.5/network-climate.gml"),
            companion_path: PathBuf::from("networks/0.5/network-climate.csv"),
            working_dir: None,
        };

        BatchReport {
            run_id: Uuid::new_v4(),
            started_at: "2026-10-14T09:00:00+00:00".to_string(),
            finished_at: "2026-10-14T09:05:00+00:00".to_string(),
            profiles: vec!["default".to_string()],
            stats: PipelineStats::new(),
            outcomes: vec![InvocationOutcome {
                invocation,
                status: InvocationStatus::Failed { exit_code: Some(1) },
                duration_ms: 120,
                network_written: false,
                companion_written: false,
            }],
        }
    }

    #[test]
    fn test_exporter_creates_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("reports/nested");
        assert!(JsonExporter::new(&nested).is_ok());
        assert!(nested.is_dir());
    }

    #[test]
    fn test_write_report() {
        let dir = tempdir().unwrap();
        let exporter = JsonExporter::new(dir.path()).unwrap();
        let report = report();

        let path = exporter.write_report(&report, true).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            format!("batch-{}.json", report.run_id)
        );

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let outcome = &written["outcomes"][0];
        assert_eq!(outcome["status"], "failed");
        assert_eq!(outcome["exit_code"], 1);
        assert_eq!(
            outcome["invocation"]["output_path"],
            "networks/0.5/network-climate.gml"
        );
        assert_eq!(outcome["companion_written"], false);
        assert!(outcome["invocation"].get("working_dir").is_none());
    }
}
