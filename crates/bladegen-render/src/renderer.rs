//! Deterministic rendering of validated intents into documents.
//!
//! The renderer is the last pure stage of the pipeline. It never
//! panics and never returns `Err` past its boundary: anything that
//! prevents emission comes back as `success = false` with an error
//! message inside the [`RenderedDocument`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use bladegen_schema::{is_matcher_name, Action, ParamMap, Scope, Target};

use crate::document::{
    ExperimentDocument, ExperimentEntry, ExperimentSpec, KeyedValue, Metadata, API_VERSION, KIND,
};

/// Terminal artifact of one render call. No further mutation happens
/// after construction apart from the persistence layer appending the
/// paths it wrote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedDocument {
    /// Whether emission succeeded.
    pub success: bool,
    /// The emitted YAML; empty on failure.
    pub content: String,
    /// Failure description when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    /// Advisory notes carried over from earlier pipeline stages.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
    /// Files this document was persisted to, in write order.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub written_paths: Vec<PathBuf>,
}

impl RenderedDocument {
    fn ok(content: String) -> Self {
        Self {
            success: true,
            content,
            error: None,
            warnings: Vec::new(),
            written_paths: Vec::new(),
        }
    }

    /// An artifact describing why emission could not happen.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: String::new(),
            error: Some(error.into()),
            warnings: Vec::new(),
            written_paths: Vec::new(),
        }
    }

    /// Attach pipeline warnings to the artifact.
    #[must_use]
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// Splits a completed parameter map into renderer inputs: matcher
/// entries, flag entries, and the timeout lifted out so the renderer
/// can append it last. Input order is preserved within each list.
#[must_use]
pub fn split_parameters(parameters: &ParamMap) -> (Vec<KeyedValue>, Vec<KeyedValue>, String) {
    let mut matchers = Vec::new();
    let mut flags = Vec::new();
    let mut timeout = String::new();

    for (name, value) in parameters {
        if name == "timeout" {
            timeout = value.to_string();
        } else if is_matcher_name(name) {
            matchers.push(KeyedValue::new(name.clone(), value.clone()));
        } else {
            flags.push(KeyedValue::new(name.clone(), value.clone()));
        }
    }

    (matchers, flags, timeout)
}

/// Renders one (scope, target, action, parameters) tuple into a fixed
/// document skeleton.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigRenderer;

impl ConfigRenderer {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Render a single experiment document.
    ///
    /// The flags slice is copied before the timeout is appended, so a
    /// caller may reuse the same slices across calls; repeated renders
    /// of the same inputs produce byte-identical output.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn render(
        &self,
        scope: Scope,
        target: Target,
        action: Action,
        matchers: &[KeyedValue],
        flags: &[KeyedValue],
        timeout: &str,
        namespace: Option<&str>,
    ) -> RenderedDocument {
        if let Some(entry) = matchers.iter().chain(flags.iter()).find(|e| e.name.is_empty()) {
            tracing::warn!(value = %entry.value, "rejected entry with empty name");
            return RenderedDocument::failed(
                "matcher and flag entries must have a non-empty name",
            );
        }

        let mut all_flags = flags.to_vec();
        if !timeout.is_empty() {
            all_flags.push(KeyedValue::new("timeout", timeout));
        }

        let document = ExperimentDocument {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: Metadata {
                name: format!("{scope}-{target}-{action}"),
                namespace: namespace.map(str::to_string),
            },
            spec: ExperimentSpec {
                experiments: vec![ExperimentEntry {
                    scope,
                    target,
                    action,
                    desc: format!("{scope}-scope {target} {action} experiment"),
                    matchers: matchers.to_vec(),
                    flags: all_flags,
                }],
            },
        };

        match serde_yaml::to_string(&document) {
            Ok(content) => {
                tracing::debug!(
                    name = %document.metadata.name,
                    bytes = content.len(),
                    "rendered experiment document"
                );
                RenderedDocument::ok(content)
            }
            Err(err) => RenderedDocument::failed(format!("failed to serialize document: {err}")),
        }
    }
}
