// file: src/topics/scanner.rs
// description: lists the topic files directly inside a threshold directory
// reference: https://docs.rs/walkdir

use crate::config::BatchConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicFile {
    pub path: PathBuf,
    pub file_name: String,
}

pub struct TopicScanner {
    skip_hidden: bool,
}

impl TopicScanner {
    pub fn new(config: &BatchConfig) -> Self {
        Self {
            skip_hidden: config.skip_hidden,
        }
    }

    /// Topic files in `dir`, sorted by name. A missing directory yields none.
    pub fn scan(&self, dir: &Path) -> Vec<TopicFile> {
        if !dir.is_dir() {
            warn!("Topic directory not found, skipping: {}", dir.display());
            return Vec::new();
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
                warn!("Skipping non-UTF-8 file name: {}", entry.path().display());
                continue;
            };

            if self.skip_hidden && file_name.starts_with('.') {
                debug!("Skipping hidden file: {}", entry.path().display());
                continue;
            }

            files.push(TopicFile {
                path: entry.path().to_path_buf(),
                file_name,
            });
        }

        info!("Found {} topic files in {}", files.len(), dir.display());
        files
    }
}
