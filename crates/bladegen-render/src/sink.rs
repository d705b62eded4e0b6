//! File persistence for rendered documents.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures while persisting rendered documents.
#[derive(Debug, Error)]
pub enum RenderError {
    /// filesystem failure while creating the directory or writing
    #[error("failed to persist document: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes rendered documents as `{stem}.yaml` files under one output
/// directory. Directory creation is idempotent; existing files with
/// the same stem are overwritten.
#[derive(Debug, Clone)]
pub struct FileSink {
    root: PathBuf,
}

impl FileSink {
    /// Output directory used when the caller does not pick one.
    pub const DEFAULT_DIR: &'static str = "generated-yamls";

    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `content` to `{root}/{stem}.yaml`, creating the directory
    /// if needed, and return the written path.
    pub async fn persist(&self, stem: &str, content: &str) -> Result<PathBuf, RenderError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(format!("{stem}.yaml"));
        tokio::fs::write(&path, content).await?;
        tracing::info!(path = %path.display(), "wrote experiment document");
        Ok(path)
    }
}

impl Default for FileSink {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIR)
    }
}
