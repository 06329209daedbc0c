// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{DriverError, Result};
use crate::models::{Metric, OutputSpec, RunProfile, ToolFlags, TopicTarget};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const DEFAULT_EXCLUDED_AUTHOR: &str = "realDonaldTrump";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub tool: ToolConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub profiles: Vec<RunProfile>,
}

/// How the external network tool is launched.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolConfig {
    pub program: String,
    #[serde(default)]
    pub script: Option<PathBuf>,
    /// NELA database, passed as the first positional argument.
    #[serde(default)]
    pub database: Option<PathBuf>,
    /// Directory the tool runs in. `network.py` reads `data/labels.csv`
    /// relative to it.
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BatchConfig {
    pub input_extension: String,
    pub output_extension: String,
    pub skip_hidden: bool,
    pub write_report: bool,
    pub reports_dir: PathBuf,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_extension: "txt".to_string(),
            output_extension: "gml".to_string(),
            skip_hidden: true,
            write_report: true,
            reports_dir: PathBuf::from("reports"),
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("NETBATCH")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| DriverError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| DriverError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        let threshold_targets = || {
            vec![
                TopicTarget::new("topics/0.5", "networks/0.5"),
                TopicTarget::new("topics/0.75", "networks/0.75"),
            ]
        };

        Self {
            tool: ToolConfig {
                program: "python3".to_string(),
                script: Some(PathBuf::from("network.py")),
                database: Some(PathBuf::from("data/nela.db")),
                working_dir: None,
            },
            batch: BatchConfig::default(),
            profiles: vec![
                RunProfile {
                    name: "default".to_string(),
                    description: "Source networks without the most cited author".to_string(),
                    enabled: true,
                    targets: threshold_targets(),
                    outputs: vec![OutputSpec::new(
                        "network-",
                        ToolFlags {
                            exclude_authors: vec![DEFAULT_EXCLUDED_AUTHOR.to_string()],
                            ..Default::default()
                        },
                    )],
                },
                RunProfile {
                    name: "dual-metric".to_string(),
                    description: "Jaccard source network and overlap author network".to_string(),
                    enabled: true,
                    targets: threshold_targets(),
                    outputs: vec![
                        OutputSpec::new(
                            "network-sources-",
                            ToolFlags {
                                metric: Some(Metric::Jaccard),
                                ..Default::default()
                            },
                        ),
                        OutputSpec::new(
                            "network-authors-",
                            ToolFlags {
                                metric: Some(Metric::Overlap),
                                authors: true,
                                min_count: Some(5),
                                ..Default::default()
                            },
                        ),
                    ],
                },
                RunProfile {
                    name: "unfiltered".to_string(),
                    description: "No edge threshold on the April 20 topic split".to_string(),
                    enabled: false,
                    targets: vec![TopicTarget::new(
                        "topics/0.5_april_20",
                        "networks/0.5_april_20",
                    )],
                    outputs: vec![OutputSpec::new(
                        "network-",
                        ToolFlags {
                            p_threshold: Some(0.0),
                            exclude_authors: vec![DEFAULT_EXCLUDED_AUTHOR.to_string()],
                            ..Default::default()
                        },
                    )],
                },
            ],
        }
    }

    /// Profiles to run, in order.
    ///
    /// With no names every enabled profile is returned. Named profiles are
    /// returned as given, including disabled ones.
    pub fn select_profiles(&self, names: &[String]) -> Result<Vec<&RunProfile>> {
        if names.is_empty() {
            return Ok(self.profiles.iter().filter(|p| p.enabled).collect());
        }

        names
            .iter()
            .map(|name| {
                self.profiles
                    .iter()
                    .find(|p| &p.name == name)
                    .ok_or_else(|| DriverError::UnknownProfile(name.clone()))
            })
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.tool.program.trim().is_empty() {
            return Err(DriverError::Config(
                "tool.program must not be empty".to_string(),
            ));
        }

        Validator::validate_extension(&self.batch.input_extension)
            .map_err(|e| DriverError::Config(format!("batch.input_extension: {}", e)))?;
        Validator::validate_extension(&self.batch.output_extension)
            .map_err(|e| DriverError::Config(format!("batch.output_extension: {}", e)))?;

        let mut seen = HashSet::new();
        for profile in &self.profiles {
            Validator::validate_profile_name(&profile.name)?;

            if !seen.insert(profile.name.as_str()) {
                return Err(DriverError::Config(format!(
                    "duplicate profile name: {}",
                    profile.name
                )));
            }

            if profile.outputs.is_empty() {
                return Err(DriverError::Config(format!(
                    "profile {} has no outputs",
                    profile.name
                )));
            }

            for output in &profile.outputs {
                Validator::validate_label(&output.label)?;
                Validator::validate_flags(&output.flags)?;
            }
        }

        Ok(())
    }
}
