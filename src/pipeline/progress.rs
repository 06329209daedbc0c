// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for batch execution
// reference: uses indicatif for progress bars and tracks invocation counts

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineStats {
    pub invocations_planned: usize,
    pub invocations_succeeded: usize,
    pub invocations_failed: usize,
    pub networks_written: usize,
    pub duration_secs: u64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invocations_per_minute(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        self.completed() as f64 * 60.0 / self.duration_secs as f64
    }

    pub fn completed(&self) -> usize {
        self.invocations_succeeded + self.invocations_failed
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.completed();
        if total == 0 {
            return 0.0;
        }
        (self.invocations_succeeded as f64 / total as f64) * 100.0
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    planned: usize,
    succeeded: AtomicUsize,
    failed: AtomicUsize,
    networks_written: AtomicUsize,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(total_invocations: usize, colored: bool) -> Self {
        let multi_progress = MultiProgress::new();
        Self::build(multi_progress, total_invocations, colored)
    }

    /// Tracks counts without drawing anything.
    pub fn hidden(total_invocations: usize) -> Self {
        let multi_progress = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        Self::build(multi_progress, total_invocations, false)
    }

    fn build(multi_progress: MultiProgress, total: usize, colored: bool) -> Self {
        let main_bar = create_progress_bar(&multi_progress, total as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            planned: total,
            succeeded: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            networks_written: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn inc_succeeded(&self) {
        self.succeeded.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn inc_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn add_network(&self) {
        self.networks_written.fetch_add(1, Ordering::SeqCst);
    }

    pub fn set_message(&self, message: String) {
        self.main_bar.set_message(message);
    }

    /// Runs `f` with the bars cleared so log lines are not overdrawn.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.main_bar.suspend(f)
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Batch complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> PipelineStats {
        PipelineStats {
            invocations_planned: self.planned,
            invocations_succeeded: self.succeeded.load(Ordering::SeqCst),
            invocations_failed: self.failed.load(Ordering::SeqCst),
            networks_written: self.networks_written.load(Ordering::SeqCst),
            duration_secs: self.start_time.elapsed().as_secs(),
        }
    }

    fn update_detail_bar(&self) {
        let networks = self.networks_written.load(Ordering::SeqCst);
        let failed = self.failed.load(Ordering::SeqCst);

        self.detail_bar
            .set_message(format!("Networks: {} | Failed: {}", networks, failed));
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    let (template, chars) = if colored {
        (
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            "█▓▒░",
        )
    } else {
        ("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}", "=>-")
    };

    if let Ok(style) = ProgressStyle::default_bar().template(template) {
        bar.set_style(style.progress_chars(chars));
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    if let Ok(style) = ProgressStyle::default_bar().template("{msg}") {
        bar.set_style(style);
    }
    bar
}
