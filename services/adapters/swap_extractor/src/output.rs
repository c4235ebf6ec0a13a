//! Swap record persistence

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dex::SwapExtraction;
use tracing::info;

/// Writes the latest extraction as pretty-printed JSON
#[derive(Debug, Clone)]
pub struct SwapWriter {
    path: PathBuf,
}

impl SwapWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write(&self, extraction: &SwapExtraction) -> Result<()> {
        let json = to_pretty_json(extraction)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        info!("Data written to {}", self.path.display());
        Ok(())
    }
}

pub fn to_pretty_json(extraction: &SwapExtraction) -> Result<String> {
    serde_json::to_string_pretty(extraction).context("Failed to serialize swap record")
}
