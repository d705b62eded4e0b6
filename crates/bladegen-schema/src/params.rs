//! Parameter value model
//!
//! Extracted parameters are an insertion-ordered mapping from name to a
//! scalar or list-of-strings value. Order matters: validation reports and
//! rendered documents must reproduce it exactly.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Insertion-ordered parameter mapping
pub type ParamMap = IndexMap<String, ParamValue>;

/// Scalar-or-list parameter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Single string value
    Scalar(String),
    /// Ordered list of string values
    List(Vec<String>),
}

impl ParamValue {
    /// Build a scalar value
    #[inline]
    #[must_use]
    pub fn scalar(value: impl Into<String>) -> Self {
        ParamValue::Scalar(value.into())
    }

    /// Build a list value
    #[inline]
    #[must_use]
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ParamValue::List(values.into_iter().map(Into::into).collect())
    }

    /// Scalar view, `None` for lists
    #[inline]
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            ParamValue::Scalar(s) => Some(s.as_str()),
            ParamValue::List(_) => None,
        }
    }

    /// List view, `None` for scalars
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ParamValue::Scalar(_) => None,
            ParamValue::List(items) => Some(items),
        }
    }

    /// Whether the value carries no content (empty string or empty list)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            ParamValue::Scalar(s) => s.is_empty(),
            ParamValue::List(items) => items.is_empty(),
        }
    }

    /// Individual string items: one for a scalar, each element for a list
    pub fn items(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            ParamValue::Scalar(s) => std::slice::from_ref(s),
            ParamValue::List(items) => items,
        };
        slice.iter().map(String::as_str)
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Scalar(s) => f.write_str(s),
            ParamValue::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Scalar(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Scalar(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::List(values)
    }
}

/// Parameter names rendered as matchers (entity selectors); everything
/// else renders as a flag.
pub const MATCHER_NAMES: [&str; 6] = [
    "names",
    "labels",
    "namespace",
    "container-names",
    "container-ids",
    "container-runtime",
];

/// Whether a parameter name selects entities rather than tuning behavior
#[inline]
#[must_use]
pub fn is_matcher_name(name: &str) -> bool {
    MATCHER_NAMES.contains(&name)
}
