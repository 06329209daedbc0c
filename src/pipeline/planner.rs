// file: src/pipeline/planner.rs
// description: expands run profiles into the ordered list of tool invocations
// reference: one invocation per topic file per output label

use crate::config::{Config, ToolConfig};
use crate::models::{Invocation, OutputSpec, RunProfile, TopicTarget};
use crate::topics::{OutputNamer, TopicFile, TopicScanner};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchPlan {
    pub profiles: Vec<String>,
    /// Created before the first invocation, in first-seen order.
    pub output_dirs: Vec<PathBuf>,
    pub invocations: Vec<Invocation>,
}

impl BatchPlan {
    pub fn is_empty(&self) -> bool {
        self.invocations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.invocations.len()
    }
}

pub struct BatchPlanner {
    tool: ToolConfig,
    scanner: TopicScanner,
    namer: OutputNamer,
}

impl BatchPlanner {
    pub fn new(config: &Config) -> Self {
        Self {
            tool: config.tool.clone(),
            scanner: TopicScanner::new(&config.batch),
            namer: OutputNamer::new(&config.batch),
        }
    }

    /// Ordered by profile, target, topic file, then output label.
    pub fn plan(&self, profiles: &[&RunProfile]) -> BatchPlan {
        let mut plan = BatchPlan::default();

        for profile in profiles {
            plan.profiles.push(profile.name.clone());

            for target in profile.active_targets() {
                if !plan.output_dirs.contains(&target.output_dir) {
                    plan.output_dirs.push(target.output_dir.clone());
                }

                for topic in self.scanner.scan(&target.input_dir) {
                    for output in &profile.outputs {
                        plan.invocations
                            .push(self.invocation(profile, target, output, &topic));
                    }
                }
            }

            debug!(
                "Profile {}: {} of {} targets active",
                profile.name,
                profile.active_targets().count(),
                profile.targets.len()
            );
        }

        info!(
            "Planned {} invocations across {} profiles",
            plan.invocations.len(),
            plan.profiles.len()
        );
        plan
    }

    fn invocation(
        &self,
        profile: &RunProfile,
        target: &TopicTarget,
        output: &OutputSpec,
        topic: &TopicFile,
    ) -> Invocation {
        let mut output_path = self
            .namer
            .network_path(&target.output_dir, &output.label, &topic.file_name);
        let mut input_path = topic.path.clone();

        // Relative paths would resolve against the tool's directory instead of ours.
        if self.tool.working_dir.is_some() {
            output_path = absolute_or_same(output_path);
            input_path = absolute_or_same(input_path);
        }
        let companion_path = OutputNamer::companion_path(&output_path);

        Invocation {
            profile: profile.name.clone(),
            label: output.label.clone(),
            program: self.tool.program.clone(),
            args: self.build_args(&output_path, &input_path, output),
            input_path,
            output_path,
            companion_path,
            working_dir: self.tool.working_dir.clone(),
        }
    }

    fn build_args(&self, output_path: &Path, input_path: &Path, output: &OutputSpec) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(ref script) = self.tool.script {
            args.push(script.display().to_string());
        }
        if let Some(ref database) = self.tool.database {
            args.push(database.display().to_string());
        }

        args.push(output_path.display().to_string());
        args.push("--rowid".to_string());
        args.push(input_path.display().to_string());
        args.extend(output.flags.to_args());
        args
    }
}

fn absolute_or_same(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}
