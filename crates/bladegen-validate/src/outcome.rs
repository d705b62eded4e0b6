//! Result of validating one parameter set.

use serde::{Deserialize, Serialize};

/// Everything the validator found, split so later stages can react to
/// each category: `errors` block rendering, `warnings` are advisory,
/// and the two name lists drive targeted auto-repair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// True when `errors` is empty. Warnings never affect validity.
    pub is_valid: bool,
    /// Blocking problems, human-readable.
    pub errors: Vec<String>,
    /// Non-blocking advisories.
    pub warnings: Vec<String>,
    /// Names of required parameters that were absent or empty.
    pub missing_required: Vec<String>,
    /// Names of parameters whose values failed their rule.
    pub invalid_parameters: Vec<String>,
}
