//! JSON files in a local directory.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads `<collection>.json` files from a directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the files are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read one collection.
    pub async fn read(&self, name: &'static str) -> Result<String> {
        let path = self.dir.join(format!("{}.json", name));
        debug!("Reading {}", path.display());

        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))
    }
}
