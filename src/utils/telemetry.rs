// file: src/utils/telemetry.rs
// description: operation timing and environment health checks for batch runs
// reference: tracing based observability

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    fn icon(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "✓",
            HealthStatus::Degraded => "⚠",
            HealthStatus::Unhealthy => "✗",
        }
    }
}

/// Result of checking one prerequisite of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    pub component: String,
    pub status: HealthStatus,
    pub message: Option<String>,
}

impl HealthCheck {
    pub fn healthy(component: &str) -> Self {
        Self {
            component: component.to_string(),
            status: HealthStatus::Healthy,
            message: None,
        }
    }

    pub fn degraded(component: &str, message: String) -> Self {
        Self {
            component: component.to_string(),
            status: HealthStatus::Degraded,
            message: Some(message),
        }
    }

    pub fn unhealthy(component: &str, message: String) -> Self {
        Self {
            component: component.to_string(),
            status: HealthStatus::Unhealthy,
            message: Some(message),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub overall_status: HealthStatus,
    pub checks: Vec<HealthCheck>,
    pub checked_at: String,
    pub version: String,
}

impl HealthReport {
    pub fn new(checks: Vec<HealthCheck>, version: String) -> Self {
        let overall_status = if checks.iter().any(|c| c.status == HealthStatus::Unhealthy) {
            HealthStatus::Unhealthy
        } else if checks.iter().any(|c| c.status == HealthStatus::Degraded) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        Self {
            overall_status,
            checks,
            checked_at: chrono::Utc::now()
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
            version,
        }
    }

    pub fn format(&self) -> String {
        let mut output = format!(
            "{} Batch environment: {:?}\nVersion: {}\nChecked: {}\n\n",
            self.overall_status.icon(),
            self.overall_status,
            self.version,
            self.checked_at
        );

        for check in &self.checks {
            output.push_str(&format!(
                "{} {} ({:?})",
                check.status.icon(),
                check.component,
                check.status
            ));

            if let Some(ref msg) = check.message {
                output.push_str(&format!("\n  {}", msg));
            }

            output.push('\n');
        }

        output
    }
}

pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        info!("Starting operation: {}", operation);
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish_with_count(self, count: usize) -> Duration {
        let elapsed = self.elapsed();
        info!(
            "Completed operation: {} - {} invocations in {:.2}s",
            self.operation,
            count,
            elapsed.as_secs_f64()
        );
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_status_takes_worst_check() {
        let report = HealthReport::new(
            vec![
                HealthCheck::healthy("tool program"),
                HealthCheck::degraded("topics/0.75", "missing".to_string()),
            ],
            "0.1.0".to_string(),
        );
        assert_eq!(report.overall_status, HealthStatus::Degraded);

        let report = HealthReport::new(
            vec![
                HealthCheck::degraded("topics/0.75", "missing".to_string()),
                HealthCheck::unhealthy("network.py", "not found".to_string()),
            ],
            "0.1.0".to_string(),
        );
        assert_eq!(report.overall_status, HealthStatus::Unhealthy);
    }

    #[test]
    fn test_empty_report_is_healthy() {
        let report = HealthReport::new(vec![], "0.1.0".to_string());
        assert_eq!(report.overall_status, HealthStatus::Healthy);
    }

    #[test]
    fn test_format_includes_messages() {
        let report = HealthReport::new(
            vec![HealthCheck::unhealthy(
                "database",
                "data/nela.db not found".to_string(),
            )],
            "0.1.0".to_string(),
        );
        let text = report.format();
        assert!(text.contains("✗ database (Unhealthy)"));
        assert!(text.contains("data/nela.db not found"));
    }

    #[test]
    fn test_timer_measures_elapsed() {
        let timer = OperationTimer::new("profile default");
        std::thread::sleep(Duration::from_millis(5));
        assert!(timer.finish_with_count(0) >= Duration::from_millis(5));
    }
}
