//! Per-parameter validation rules
//!
//! A rule keys off the parameter *name* and constrains the shape of its
//! value: a pattern, an optional numeric range, and whether an empty value
//! is acceptable. Names without a rule pass through untouched; unknown
//! parameters are not an error.

use crate::params::ParamValue;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::RangeInclusive;

/// Value constraint for one parameter name
#[derive(Debug)]
pub struct ParamRule {
    pattern: Regex,
    range: Option<RangeInclusive<u64>>,
    required: bool,
    message: &'static str,
}

impl ParamRule {
    fn new(pattern: &str, message: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("rule patterns are compile-time constants"),
            range: None,
            required: true,
            message,
        }
    }

    fn with_range(mut self, range: RangeInclusive<u64>) -> Self {
        self.range = Some(range);
        self
    }

    /// Human-readable constraint description
    #[inline]
    #[must_use]
    pub fn message(&self) -> &'static str {
        self.message
    }

    /// Check a value against this rule
    ///
    /// List values are checked element-wise; every element must satisfy the
    /// pattern and range.
    pub fn check(&self, value: &ParamValue) -> Result<(), String> {
        if value.is_empty() {
            if self.required {
                return Err("value must not be empty".to_string());
            }
            return Ok(());
        }

        for item in value.items() {
            if !self.pattern.is_match(item) {
                return Err(self.message.to_string());
            }
            if let Some(range) = &self.range {
                match item.parse::<u64>() {
                    Ok(n) if range.contains(&n) => {}
                    _ => return Err(self.message.to_string()),
                }
            }
        }

        Ok(())
    }
}

const IPV4: &str = r"^(?:\d{1,3}\.){3}\d{1,3}$";

static RULES: Lazy<Vec<(&'static str, ParamRule)>> = Lazy::new(|| {
    vec![
        (
            "timeout",
            ParamRule::new(
                r"^\d+[smh]$",
                "timeout must use a unit suffix, like '300s', '5m' or '1h'",
            ),
        ),
        (
            "delay",
            ParamRule::new(r"^\d+$", "delay must be 1-60000 milliseconds")
                .with_range(1..=60_000),
        ),
        (
            "load",
            ParamRule::new(r"^\d+$", "load must be a percentage between 1 and 100")
                .with_range(1..=100),
        ),
        (
            "percent",
            ParamRule::new(r"^\d+$", "percent must be between 1 and 100").with_range(1..=100),
        ),
        (
            "size",
            ParamRule::new(
                r"^\d+[KMG]?$",
                "size must be a number with an optional K/M/G suffix (megabytes when unitless)",
            ),
        ),
        (
            "ip",
            ParamRule::new(IPV4, "ip must be a dotted-quad IPv4 address"),
        ),
        (
            "destination-ip",
            ParamRule::new(IPV4, "destination-ip must be a dotted-quad IPv4 address"),
        ),
        (
            "enable-base64",
            ParamRule::new(r"^(true|false)$", "enable-base64 must be 'true' or 'false'"),
        ),
    ]
});

/// Rule for a parameter name, if one exists
#[must_use]
pub fn rule_for(name: &str) -> Option<&'static ParamRule> {
    RULES.iter().find(|(n, _)| *n == name).map(|(_, rule)| rule)
}
