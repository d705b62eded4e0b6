//! Pluggable classification backends.
//!
//! The rule-based [`InstructionClassifier`](crate::InstructionClassifier)
//! always works offline; a backend is an optional first-chance
//! classifier (typically a local LLM endpoint) consulted before the
//! rules. A backend that returns `None` (unreachable, over quota,
//! unparseable reply) silently yields to the rule path, so the
//! pipeline never fails because a backend does.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::intent::ParsedIntent;

/// First-chance intent classifier consulted before the rule tables.
#[async_trait]
pub trait IntentBackend: Send + Sync {
    /// Try to classify the instruction. `None` means "no answer, fall
    /// back to the rules". Backends must not panic or block forever.
    async fn classify(&self, instruction: &str) -> Option<ParsedIntent>;
}

/// Connection settings for a model-serving backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Model identifier understood by the serving endpoint.
    pub model: String,
    /// Base URL of the serving endpoint.
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model: "qwen2.5:7b".to_string(),
            base_url: "http://localhost:11434".to_string(),
        }
    }
}

impl BackendConfig {
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
