//! Scope-aware parameter validation.
//!
//! Checks one parameter set against the deployment scope's schema and
//! the per-parameter value rules. Pure and idempotent: validating the
//! same map twice yields the same outcome, and the input is never
//! modified. Unknown parameter names pass through untouched.

use once_cell::sync::Lazy;
use regex::Regex;

use bladegen_schema::{rule_for, ParamMap, Scope, ScopeCatalog};

use crate::outcome::ValidationOutcome;

/// Well-formed timeout split into digits and unit, for the
/// longer-than-an-hour check.
static TIMEOUT_UNIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)([smh])$").expect("validation patterns are constants"));

const SECONDS_PER_HOUR: u64 = 3600;

/// Stateless validator for extracted or hand-built parameter sets.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParameterValidator;

impl ParameterValidator {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Validate `parameters` for use under `scope`.
    ///
    /// Findings are ordered: missing required parameters first, then
    /// per-value rule failures in map order, then cross-parameter
    /// checks. Warnings never make an outcome invalid.
    #[must_use]
    pub fn validate(&self, parameters: &ParamMap, scope: Scope) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::default();
        let schema = ScopeCatalog::global().get(scope);

        // 1. Required parameters must be present and non-empty.
        for required in schema.required_params {
            let missing = parameters
                .get(*required)
                .map_or(true, bladegen_schema::ParamValue::is_empty);
            if missing {
                outcome.missing_required.push((*required).to_string());
            }
        }
        if !outcome.missing_required.is_empty() {
            outcome.errors.push(format!(
                "missing required parameters: {}",
                outcome.missing_required.join(", ")
            ));
        }

        // 2. Every present value must satisfy its rule; the rule itself
        // decides whether an empty value is acceptable.
        for (name, value) in parameters {
            if let Some(rule) = rule_for(name) {
                if let Err(reason) = rule.check(value) {
                    outcome
                        .errors
                        .push(format!("parameter '{name}' is invalid: {reason}"));
                    outcome.invalid_parameters.push(name.clone());
                }
            }
        }

        // 3. Cross-parameter checks.
        self.check_container_pinning(parameters, scope, &mut outcome);
        self.check_timeout_magnitude(parameters, &mut outcome);

        // 4. Advisories.
        self.advise_safe_mode(parameters, scope, &mut outcome);
        self.advise_base64(parameters, scope, &mut outcome);

        outcome.is_valid = outcome.errors.is_empty();

        tracing::debug!(
            scope = %scope,
            valid = outcome.is_valid,
            errors = outcome.errors.len(),
            warnings = outcome.warnings.len(),
            "validated parameters"
        );

        outcome
    }

    /// Container experiments must pin which container they hit.
    /// Recorded under `missing_required` as well so repair can fill it.
    fn check_container_pinning(
        &self,
        parameters: &ParamMap,
        scope: Scope,
        outcome: &mut ValidationOutcome,
    ) {
        if scope != Scope::Container {
            return;
        }
        let missing = parameters
            .get("container-names")
            .map_or(true, bladegen_schema::ParamValue::is_empty);
        if missing {
            outcome
                .errors
                .push("container scope requires container-names to pin a container".to_string());
            outcome.missing_required.push("container-names".to_string());
        }
    }

    /// A timeout over an hour expressed in seconds is almost always a
    /// typo for minutes; reject it and ask for a larger unit.
    fn check_timeout_magnitude(&self, parameters: &ParamMap, outcome: &mut ValidationOutcome) {
        let Some(timeout) = parameters.get("timeout").and_then(|v| v.as_scalar()) else {
            return;
        };
        let Some(caps) = TIMEOUT_UNIT_RE.captures(timeout) else {
            return;
        };
        if &caps[2] != "s" {
            return;
        }
        let seconds: u64 = match caps[1].parse() {
            Ok(n) => n,
            Err(_) => return,
        };
        if seconds > SECONDS_PER_HOUR {
            outcome.errors.push(format!(
                "parameter 'timeout' is invalid: {timeout} exceeds an hour, use 'm' or 'h' units"
            ));
            outcome.invalid_parameters.push("timeout".to_string());
        }
    }

    fn advise_safe_mode(&self, parameters: &ParamMap, scope: Scope, outcome: &mut ValidationOutcome) {
        if scope != Scope::Host {
            return;
        }
        let enabled = parameters
            .get("safe-mode")
            .and_then(|v| v.as_scalar())
            .map_or(false, |v| v == "true");
        if !enabled {
            outcome
                .warnings
                .push("safe-mode is not enabled; host faults will execute for real".to_string());
        }
    }

    fn advise_base64(&self, parameters: &ParamMap, scope: Scope, outcome: &mut ValidationOutcome) {
        if scope != Scope::Container {
            return;
        }
        let Some(content) = parameters.get("content").and_then(|v| v.as_scalar()) else {
            return;
        };
        let encoded = parameters
            .get("enable-base64")
            .and_then(|v| v.as_scalar())
            .map_or(false, |v| v == "true");
        if content.chars().count() > 100 && !encoded {
            outcome.warnings.push(
                "content is over 100 characters; set enable-base64=true to avoid quoting issues"
                    .to_string(),
            );
        }
    }
}
