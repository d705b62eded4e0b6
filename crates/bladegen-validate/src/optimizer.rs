//! Parameter optimization: scope defaults, environment detection and a
//! single auto-repair pass.
//!
//! The optimizer never rejects anything. It fills what it can, then
//! hands the caller a parameter set plus the advisory warnings it
//! accumulated; re-validation of the repaired set is the caller's job
//! so that repairs stay a single bounded pass rather than a loop.

use std::sync::Arc;

use bladegen_schema::{ParamMap, ParamValue, Scope, ScopeCatalog};

use crate::outcome::ValidationOutcome;
use crate::probe::{NullProbe, OrchestratorProbe};
use crate::validator::ParameterValidator;

/// Fills gaps in an extracted parameter set before rendering.
///
/// Order of precedence, strongest first: values already present, scope
/// defaults, environment detection, repair defaults.
pub struct ParameterOptimizer {
    probe: Arc<dyn OrchestratorProbe>,
    validator: ParameterValidator,
}

impl ParameterOptimizer {
    #[must_use]
    pub fn new(probe: Arc<dyn OrchestratorProbe>) -> Self {
        Self {
            probe,
            validator: ParameterValidator::new(),
        }
    }

    /// Optimizer that never touches the environment; useful for tests
    /// and air-gapped runs.
    #[must_use]
    pub fn offline() -> Self {
        Self::new(Arc::new(NullProbe))
    }

    /// Produce a completed parameter set and the warnings gathered on
    /// the way. The input map is never modified.
    pub async fn optimize(&self, parameters: &ParamMap, scope: Scope) -> (ParamMap, Vec<String>) {
        let mut params = parameters.clone();
        let mut warnings = Vec::new();

        // 1. Scope defaults for anything not provided.
        let schema = ScopeCatalog::global().get(scope);
        for (name, value) in schema.default_params {
            if !params.contains_key(*name) {
                params.insert((*name).to_string(), ParamValue::scalar(*value));
            }
        }

        // 2. Fill remaining gaps from the live environment.
        self.detect_missing(&mut params, scope).await;

        // 3. See what is still wrong.
        let outcome = self.validator.validate(&params, scope);
        warnings.extend(outcome.warnings.iter().cloned());

        // 4. One repair pass over exactly what validation flagged.
        if !outcome.is_valid && apply_repairs(&mut params, scope, &outcome) {
            warnings.push("auto-repaired some invalid or missing parameters".to_string());
        }

        (params, warnings)
    }

    async fn detect_missing(&self, params: &mut ParamMap, scope: Scope) {
        match scope {
            Scope::Node => {
                if is_blank(params, "names") {
                    if let Some(node) = self.probe.detect_node().await {
                        tracing::info!(node = %node, "filled names from detected node");
                        params.insert("names".to_string(), ParamValue::list(vec![node]));
                    }
                }
            }
            Scope::Pod => {
                if is_blank(params, "namespace") {
                    if let Some(namespace) = self.probe.detect_namespace().await {
                        tracing::info!(namespace = %namespace, "filled namespace from context");
                        params.insert("namespace".to_string(), ParamValue::list(vec![namespace]));
                    }
                }
            }
            Scope::Container => {
                if is_blank(params, "namespace") {
                    if let Some(namespace) = self.probe.detect_namespace().await {
                        tracing::info!(namespace = %namespace, "filled namespace from context");
                        params.insert("namespace".to_string(), ParamValue::list(vec![namespace]));
                    }
                }
                if is_blank(params, "container-names") {
                    if let Some(containers) = self.probe.detect_container_names().await {
                        tracing::info!(count = containers.len(), "filled container-names");
                        params.insert("container-names".to_string(), ParamValue::list(containers));
                    }
                }
            }
            Scope::Host => {
                if is_blank(params, "names") {
                    if let Some(hostname) = self.probe.detect_hostname().await {
                        tracing::info!(host = %hostname, "filled names from hostname");
                        params.insert("names".to_string(), ParamValue::list(vec![hostname]));
                    }
                }
            }
            // Runtime experiments want explicit container ids; nothing
            // worth guessing here.
            Scope::Cri => {}
        }
    }
}

fn is_blank(params: &ParamMap, name: &str) -> bool {
    params.get(name).map_or(true, ParamValue::is_empty)
}

/// Apply the repair table to what validation flagged. Returns whether
/// anything changed. Parameters with no safe default (a cri experiment
/// without names) are deliberately left broken for the final validation
/// to reject.
fn apply_repairs(params: &mut ParamMap, scope: Scope, outcome: &ValidationOutcome) -> bool {
    let mut repaired = false;

    for name in &outcome.missing_required {
        let fill = match (name.as_str(), scope) {
            ("names", Scope::Node) => Some(ParamValue::list(vec!["localhost"])),
            ("names", Scope::Host) => Some(ParamValue::list(vec!["127.0.0.1"])),
            ("namespace", _) => Some(ParamValue::list(vec!["default"])),
            ("container-names", _) => Some(ParamValue::list(vec!["main"])),
            _ => None,
        };
        if let Some(value) = fill {
            tracing::warn!(parameter = %name, "filled missing required parameter with a default");
            params.insert(name.clone(), value);
            repaired = true;
        }
    }

    for name in &outcome.invalid_parameters {
        match name.as_str() {
            "timeout" => {
                let bare = params
                    .get(name)
                    .and_then(|v| v.as_scalar())
                    .filter(|raw| !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()))
                    .map(str::to_string);
                if let Some(raw) = bare {
                    let fixed = format!("{raw}s");
                    tracing::warn!(from = %raw, to = %fixed, "appended seconds unit to bare timeout");
                    params.insert(name.clone(), ParamValue::scalar(fixed));
                    repaired = true;
                }
            }
            "enable-base64" => {
                tracing::warn!("reset malformed enable-base64 to 'false'");
                params.insert(name.clone(), ParamValue::scalar("false"));
                repaired = true;
            }
            _ => {}
        }
    }

    repaired
}
