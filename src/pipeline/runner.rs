// file: src/pipeline/runner.rs
// description: prepares output directories and runs planned invocations one at a time
// reference: sequential child process execution with tokio::process

use crate::error::{DriverError, Result};
use crate::models::{Invocation, InvocationOutcome, InvocationStatus};
use crate::pipeline::planner::BatchPlan;
use crate::pipeline::progress::ProgressTracker;
use crate::pipeline::report::BatchReport;
use crate::utils::OperationTimer;
use chrono::Utc;
use std::fs;
use std::future::Future;
use std::path::Path;
use std::time::{Instant, SystemTime};
use tokio::process::Command;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// How a launched tool exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitState {
    pub success: bool,
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

/// Starts the network tool for one invocation and waits for it to exit.
pub trait Launcher {
    fn launch(&self, invocation: &Invocation) -> impl Future<Output = Result<ExitState>> + Send;
}

/// Spawns the tool as a child process sharing this process's stdio.
#[derive(Debug, Clone, Default)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&self, invocation: &Invocation) -> impl Future<Output = Result<ExitState>> + Send {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        if let Some(ref dir) = invocation.working_dir {
            command.current_dir(dir);
        }
        let program = invocation.program.clone();

        async move {
            let status = command
                .status()
                .await
                .map_err(|source| DriverError::Launch { program, source })?;

            Ok(ExitState {
                success: status.success(),
                code: status.code(),
            })
        }
    }
}

pub struct BatchRunner<L> {
    launcher: L,
    colored: bool,
    show_progress: bool,
}

impl<L: Launcher> BatchRunner<L> {
    pub fn new(launcher: L) -> Self {
        Self {
            launcher,
            colored: true,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool, colored: bool) -> Self {
        self.show_progress = show_progress;
        self.colored = colored;
        self
    }

    /// Creates every output directory of the plan. Existing directories are fine.
    pub fn prepare_directories(&self, plan: &BatchPlan) -> Result<()> {
        for dir in &plan.output_dirs {
            fs::create_dir_all(dir).map_err(|source| DriverError::DirectoryCreation {
                path: dir.clone(),
                source,
            })?;
            debug!("Output directory ready: {}", dir.display());
        }
        Ok(())
    }

    /// Runs the plan sequentially. A failing invocation is recorded and the
    /// batch moves on to the next one.
    pub async fn run(&self, plan: &BatchPlan) -> Result<BatchReport> {
        let started_at = Utc::now().to_rfc3339();
        let timer = OperationTimer::new("network batch");

        self.prepare_directories(plan)?;

        if plan.is_empty() {
            warn!("No topic files found; nothing to run");
        }

        let progress = if self.show_progress {
            ProgressTracker::new(plan.len(), self.colored)
        } else {
            ProgressTracker::hidden(plan.len())
        };

        let mut outcomes = Vec::with_capacity(plan.len());

        for invocation in &plan.invocations {
            progress.set_message(invocation.output_path.display().to_string());
            let outcome = self.run_one(invocation, &progress).await;

            if outcome.status.is_success() {
                progress.inc_succeeded();
            } else {
                progress.inc_failed();
            }
            if outcome.network_written {
                progress.add_network();
            }

            outcomes.push(outcome);
        }

        let stats = progress.get_stats();
        progress.finish();
        timer.finish_with_count(outcomes.len());

        info!(
            "Batch finished: {} succeeded, {} failed, {} networks written",
            stats.invocations_succeeded, stats.invocations_failed, stats.networks_written
        );

        Ok(BatchReport {
            run_id: Uuid::new_v4(),
            started_at,
            finished_at: Utc::now().to_rfc3339(),
            profiles: plan.profiles.clone(),
            stats,
            outcomes,
        })
    }

    async fn run_one(&self, invocation: &Invocation, progress: &ProgressTracker) -> InvocationOutcome {
        progress.suspend(|| debug!("Running: {}", invocation.command_line()));
        let network_before = file_stamp(&invocation.output_path);
        let companion_before = file_stamp(&invocation.companion_path);
        let start = Instant::now();

        let status = match self.launcher.launch(invocation).await {
            Ok(exit) if exit.success => InvocationStatus::Succeeded,
            Ok(exit) => {
                progress.suspend(|| {
                    warn!(
                        "Network tool failed for {} (exit code {:?})",
                        invocation.input_path.display(),
                        exit.code
                    )
                });
                InvocationStatus::Failed { exit_code: exit.code }
            }
            Err(e) => {
                progress.suspend(|| error!("{}", e));
                InvocationStatus::LaunchFailed {
                    message: e.to_string(),
                }
            }
        };

        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let succeeded = status.is_success();

        InvocationOutcome {
            network_written: succeeded && written_since(&invocation.output_path, network_before),
            companion_written: succeeded
                && written_since(&invocation.companion_path, companion_before),
            invocation: invocation.clone(),
            status,
            duration_ms,
        }
    }
}

/// Modification time and size of a regular file.
fn file_stamp(path: &Path) -> Option<(SystemTime, u64)> {
    let meta = fs::metadata(path).ok()?;
    if !meta.is_file() {
        return None;
    }
    Some((meta.modified().ok()?, meta.len()))
}

/// The file exists now and was absent or different before the launch.
fn written_since(path: &Path, before: Option<(SystemTime, u64)>) -> bool {
    match file_stamp(path) {
        Some(after) => before != Some(after),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::pipeline::planner::BatchPlanner;
    use crate::topics::OutputNamer;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records every call and writes the network and its author ranking for
    /// inputs not listed as failing.
    #[derive(Default)]
    struct RecordingLauncher {
        calls: Mutex<Vec<Invocation>>,
        /// Output directories that existed at each call.
        dirs_present: Mutex<Vec<bool>>,
        failing_topics: Vec<String>,
        skip_companion: bool,
    }

    impl Launcher for RecordingLauncher {
        fn launch(
            &self,
            invocation: &Invocation,
        ) -> impl Future<Output = Result<ExitState>> + Send {
            let dir_exists = invocation
                .output_path
                .parent()
                .map(Path::is_dir)
                .unwrap_or(false);
            self.dirs_present.lock().unwrap().push(dir_exists);
            self.calls.lock().unwrap().push(invocation.clone());

            let fails = self
                .failing_topics
                .iter()
                .any(|t| invocation.input_path.ends_with(t));
            if !fails {
                fs::write(&invocation.output_path, "graph [\n]\n").unwrap();
                if !self.skip_companion {
                    fs::write(&invocation.companion_path, "author,pagerank\n").unwrap();
                }
            }

            async move {
                Ok(ExitState {
                    success: !fails,
                    code: Some(if fails { 1 } else { 0 }),
                })
            }
        }
    }

    fn fixture(root: &Path, topics: &[&str]) -> Config {
        let mut config = Config::default_config();
        config.tool.script = None;
        config.tool.database = None;
        for profile in &mut config.profiles {
            for target in &mut profile.targets {
                target.input_dir = root.join(&target.input_dir);
                target.output_dir = root.join(&target.output_dir);
            }
        }
        fs::create_dir_all(root.join("topics/0.5")).unwrap();
        for topic in topics {
            fs::write(root.join("topics/0.5").join(topic), "rowid,month,source\n").unwrap();
        }
        config
    }

    fn plan(config: &Config, names: &[&str]) -> BatchPlan {
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        let profiles = config.select_profiles(&names).unwrap();
        BatchPlanner::new(config).plan(&profiles)
    }

    fn runner(launcher: RecordingLauncher) -> BatchRunner<RecordingLauncher> {
        BatchRunner::new(launcher).with_progress(false, false)
    }

    #[tokio::test]
    async fn test_directories_exist_before_first_invocation() {
        let temp = TempDir::new().unwrap();
        let config = fixture(temp.path(), &["climate.txt"]);
        let plan = plan(&config, &["default"]);

        let runner = runner(RecordingLauncher::default());
        let report = runner.run(&plan).await.unwrap();

        assert_eq!(*runner.launcher.dirs_present.lock().unwrap(), vec![true]);
        assert!(temp.path().join("networks/0.75").is_dir());
        assert_eq!(report.stats.invocations_succeeded, 1);
        assert_eq!(report.stats.networks_written, 1);
        assert!(report.outcomes[0].network_written);
        assert!(report.outcomes[0].companion_written);
    }

    #[tokio::test]
    async fn test_rerun_with_existing_directories() {
        let temp = TempDir::new().unwrap();
        let config = fixture(temp.path(), &["climate.txt"]);
        let plan = plan(&config, &["default"]);

        let runner = runner(RecordingLauncher::default());
        runner.run(&plan).await.unwrap();
        let report = runner.run(&plan).await.unwrap();

        assert!(!report.has_failures());
        assert_eq!(runner.launcher.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failure_does_not_halt_batch() {
        let temp = TempDir::new().unwrap();
        let config = fixture(temp.path(), &["climate.txt", "election.txt", "vaccine.txt"]);
        let plan = plan(&config, &["default"]);

        let runner = runner(RecordingLauncher {
            failing_topics: vec!["election.txt".to_string()],
            ..Default::default()
        });
        let report = runner.run(&plan).await.unwrap();

        assert_eq!(runner.launcher.calls.lock().unwrap().len(), 3);
        assert_eq!(report.stats.invocations_succeeded, 2);
        assert_eq!(report.stats.invocations_failed, 1);

        let failed: Vec<_> = report.failures().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(
            failed[0].status,
            InvocationStatus::Failed { exit_code: Some(1) }
        );
        assert!(!failed[0].network_written);
        assert!(!failed[0].companion_written);
    }

    #[tokio::test]
    async fn test_stale_network_not_counted_when_rerun_fails() {
        let temp = TempDir::new().unwrap();
        let config = fixture(temp.path(), &["climate.txt"]);
        let plan = plan(&config, &["default"]);

        let first = runner(RecordingLauncher::default());
        let report = first.run(&plan).await.unwrap();
        assert!(report.outcomes[0].network_written);

        let second = runner(RecordingLauncher {
            failing_topics: vec!["climate.txt".to_string()],
            ..Default::default()
        });
        let report = second.run(&plan).await.unwrap();

        let outcome = &report.outcomes[0];
        assert!(outcome.invocation.output_path.is_file());
        assert!(!outcome.network_written);
        assert!(!outcome.companion_written);
        assert_eq!(report.stats.networks_written, 0);
        assert_eq!(report.stats.invocations_failed, 1);
    }

    #[tokio::test]
    async fn test_missing_companion_is_reported() {
        let temp = TempDir::new().unwrap();
        let config = fixture(temp.path(), &["climate.txt"]);
        let plan = plan(&config, &["default"]);

        let runner = runner(RecordingLauncher {
            skip_companion: true,
            ..Default::default()
        });
        let report = runner.run(&plan).await.unwrap();

        let outcome = &report.outcomes[0];
        assert!(outcome.status.is_success());
        assert!(outcome.network_written);
        assert!(!outcome.companion_written);
        assert!(!outcome.invocation.companion_path.exists());
    }

    #[test]
    fn test_written_since_detects_changes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("network-climate.gml");

        assert!(!written_since(&path, None));
        fs::write(&path, "graph [\n]\n").unwrap();
        assert!(written_since(&path, None));

        let before = file_stamp(&path);
        assert!(!written_since(&path, before));
        fs::write(&path, "graph [\n  node [ id 0 ]\n]\n").unwrap();
        assert!(written_since(&path, before));

        assert_eq!(file_stamp(temp.path()), None);
    }

    #[tokio::test]
    async fn test_invocations_run_in_plan_order() {
        let temp = TempDir::new().unwrap();
        let config = fixture(temp.path(), &["climate.txt"]);
        let plan = plan(&config, &["dual-metric"]);

        let runner = runner(RecordingLauncher::default());
        runner.run(&plan).await.unwrap();

        let outputs: Vec<PathBuf> = runner
            .launcher
            .calls
            .lock()
            .unwrap()
            .iter()
            .map(|i| i.output_path.clone())
            .collect();
        assert_eq!(
            outputs,
            vec![
                temp.path().join("networks/0.5/network-sources-climate.gml"),
                temp.path().join("networks/0.5/network-authors-climate.gml"),
            ]
        );
    }

    #[tokio::test]
    async fn test_unwritable_output_dir_aborts() {
        let temp = TempDir::new().unwrap();
        let config = fixture(temp.path(), &["climate.txt"]);
        fs::write(temp.path().join("networks"), "not a directory").unwrap();
        let plan = plan(&config, &["default"]);

        let runner = runner(RecordingLauncher::default());
        let err = runner.run(&plan).await.unwrap_err();

        assert!(matches!(err, DriverError::DirectoryCreation { .. }));
        assert!(runner.launcher.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_program_is_recorded() {
        let temp = TempDir::new().unwrap();
        let mut config = fixture(temp.path(), &["climate.txt"]);
        config.tool.program = "netbatch-test-no-such-program".to_string();
        let plan = plan(&config, &["default"]);

        let runner = BatchRunner::new(ProcessLauncher).with_progress(false, false);
        let report = runner.run(&plan).await.unwrap();

        assert_eq!(report.stats.invocations_failed, 1);
        assert!(matches!(
            report.outcomes[0].status,
            InvocationStatus::LaunchFailed { .. }
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_runs_in_working_dir() {
        let temp = TempDir::new().unwrap();
        let tool_dir = temp.path().join("tool");
        fs::create_dir_all(&tool_dir).unwrap();
        let output_path = temp.path().join("cwd.gml");

        let invocation = Invocation {
            profile: "default".to_string(),
            label: "network-".to_string(),
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                "pwd > \"$0\"".to_string(),
                output_path.display().to_string(),
            ],
            input_path: temp.path().join("climate.txt"),
            companion_path: OutputNamer::companion_path(&output_path),
            output_path: output_path.clone(),
            working_dir: Some(tool_dir.clone()),
        };

        let exit = ProcessLauncher.launch(&invocation).await.unwrap();
        assert!(exit.success);

        let cwd = fs::read_to_string(&output_path).unwrap();
        assert_eq!(
            fs::canonicalize(cwd.trim()).unwrap(),
            fs::canonicalize(&tool_dir).unwrap()
        );
    }
}
