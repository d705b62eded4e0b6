//! Generator configuration.

use std::path::PathBuf;

use bladegen_classify::BackendConfig;

/// Settings for an [`ExperimentGenerator`](crate::ExperimentGenerator).
///
/// Everything is optional: a default configuration runs the pure
/// pipeline with no persistence and no backend.
#[derive(Debug, Clone, Default)]
pub struct GeneratorConfig {
    /// Directory rendered documents are written to; `None` disables
    /// persistence entirely.
    pub output_dir: Option<PathBuf>,
    /// Connection settings for an optional classification backend.
    /// Settings alone do not install one; pair them with
    /// [`ExperimentGenerator::with_backend`](crate::ExperimentGenerator::with_backend).
    pub backend: Option<BackendConfig>,
}

impl GeneratorConfig {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist rendered documents under `dir`.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Record backend connection settings.
    #[must_use]
    pub fn with_backend(mut self, backend: BackendConfig) -> Self {
        self.backend = Some(backend);
        self
    }
}
