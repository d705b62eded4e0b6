//! Typed model of the emitted experiment document.
//!
//! Field declaration order here *is* the emission order: serde_yaml
//! writes struct fields and sequences in the order they are declared
//! and pushed, which is what makes rendered output reproducible enough
//! for golden-file comparison.

use serde::{Deserialize, Serialize};

use bladegen_schema::{Action, ParamValue, Scope, Target};

/// API group and version every emitted document declares.
pub const API_VERSION: &str = "chaosblade.io/v1alpha1";

/// Resource kind every emitted document declares.
pub const KIND: &str = "ChaosBlade";

/// Complete experiment resource, ready for YAML emission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentDocument {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub spec: ExperimentSpec,
}

/// Resource metadata: generated name, optional namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentSpec {
    pub experiments: Vec<ExperimentEntry>,
}

/// One experiment: the scope/target/action triple, a description, and
/// the ordered matcher and flag lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentEntry {
    pub scope: Scope,
    pub target: Target,
    pub action: Action,
    pub desc: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub matchers: Vec<KeyedValue>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub flags: Vec<KeyedValue>,
}

/// Ordered name/value pair as it appears in matcher and flag lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedValue {
    pub name: String,
    pub value: ParamValue,
}

impl KeyedValue {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
