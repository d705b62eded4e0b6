//! Structured fault intent produced by classification.
//!
//! A [`ParsedIntent`] is the hand-off between the classifier and the
//! optimizer/renderer stages: everything downstream works off this
//! struct, never off the raw instruction text.

use serde::{Deserialize, Serialize};

use bladegen_schema::{Action, ParamMap, Scope, Target};

/// A fault-injection instruction resolved into scope, target, action
/// and extracted parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedIntent {
    /// Unique experiment name, `{scope}-{target}-{action}-{timestamp}`.
    pub name: String,
    /// Resolved deployment scope (first match wins).
    pub scope: Scope,
    /// Every scope whose keywords matched, in priority order. Used by
    /// multi-scope generation; always contains at least `scope` when
    /// any keyword matched, and is empty when the scope fell back to
    /// the default.
    pub candidate_scopes: Vec<Scope>,
    /// Resolved fault target.
    pub target: Target,
    /// Resolved fault action.
    pub action: Action,
    /// Parameters extracted from the text, in extraction order.
    pub parameters: ParamMap,
    /// Human-readable summary of the experiment.
    pub description: String,
    /// Classification confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    /// Advisory notes gathered during classification (missing required
    /// parameters, format suggestions). Never fatal.
    pub warnings: Vec<String>,
}

impl ParsedIntent {
    /// Short one-line summary for log and console output.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}/{}/{} ({} params, confidence {:.2})",
            self.scope,
            self.target,
            self.action,
            self.parameters.len(),
            self.confidence
        )
    }
}
