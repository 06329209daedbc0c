// file: src/topics/naming.rs
// description: derives network output paths from topic file names

use crate::config::BatchConfig;
use std::path::{Path, PathBuf};

const COMPANION_EXTENSION: &str = "csv";

#[derive(Debug, Clone)]
pub struct OutputNamer {
    input_suffix: String,
    output_extension: String,
}

impl OutputNamer {
    pub fn new(config: &BatchConfig) -> Self {
        Self {
            input_suffix: format!(".{}", config.input_extension),
            output_extension: config.output_extension.clone(),
        }
    }

    /// File name without the input extension. Names that do not carry it
    /// (or consist of nothing but it) are kept whole.
    pub fn stem<'a>(&self, file_name: &'a str) -> &'a str {
        match file_name.strip_suffix(&self.input_suffix) {
            Some(stem) if !stem.is_empty() => stem,
            _ => file_name,
        }
    }

    pub fn network_path(&self, output_dir: &Path, label: &str, file_name: &str) -> PathBuf {
        output_dir.join(format!(
            "{}{}.{}",
            label,
            self.stem(file_name),
            self.output_extension
        ))
    }

    pub fn companion_path(network_path: &Path) -> PathBuf {
        network_path.with_extension(COMPANION_EXTENSION)
    }
}
