//! Experiment scope catalog
//!
//! A scope is the class of entity an experiment acts on (node, pod,
//! container, cri, host). Each scope carries detection keywords in two
//! languages, a priority used to break ties when several scopes match,
//! and the matcher names the scope requires or accepts.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Class of entity an experiment acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Kubernetes node
    Node,
    /// Kubernetes pod
    Pod,
    /// Container inside a pod
    Container,
    /// Container runtime (docker, containerd)
    Cri,
    /// Bare host
    Host,
}

impl Scope {
    /// Scope assumed when no keyword matches
    pub const DEFAULT: Scope = Scope::Host;

    /// Lowercase identifier used in documents and file names
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Node => "node",
            Scope::Pod => "pod",
            Scope::Container => "container",
            Scope::Cri => "cri",
            Scope::Host => "host",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of one scope
#[derive(Debug, Clone, Copy)]
pub struct ScopeSchema {
    /// Scope identifier
    pub id: Scope,
    /// Human-readable description
    pub description: &'static str,
    /// Tie-break priority; lower number wins
    pub priority: u8,
    /// Detection keywords, lowercase, Chinese and English in parallel
    pub keywords: &'static [&'static str],
    /// Matcher names that must be present for this scope
    pub required_params: &'static [&'static str],
    /// Matcher names the scope accepts in addition
    pub optional_params: &'static [&'static str],
    /// Flag defaults applied by the optimizer when absent
    pub default_params: &'static [(&'static str, &'static str)],
}

/// Built-in scope table, priority ascending. The order is binding: the
/// classifier resolves multi-scope matches to the first entry that hit.
static SCHEMAS: [ScopeSchema; 5] = [
    ScopeSchema {
        id: Scope::Node,
        description: "Kubernetes node",
        priority: 1,
        keywords: &["节点", "node", "k8s节点", "kubernetes节点", "worker"],
        required_params: &["names"],
        optional_params: &["labels", "namespace"],
        default_params: &[("timeout", "300s")],
    },
    ScopeSchema {
        id: Scope::Pod,
        description: "Kubernetes pod",
        priority: 2,
        keywords: &["pod", "容器组", "波德"],
        required_params: &["namespace"],
        optional_params: &["names", "labels"],
        default_params: &[("timeout", "300s")],
    },
    ScopeSchema {
        id: Scope::Container,
        description: "container inside a pod",
        priority: 3,
        keywords: &["容器", "container", "集装箱"],
        required_params: &["namespace"],
        optional_params: &["names", "labels", "container-ids"],
        default_params: &[("timeout", "300s")],
    },
    ScopeSchema {
        id: Scope::Cri,
        description: "container runtime",
        priority: 4,
        keywords: &["cri", "运行时", "docker", "containerd", "容器运行时"],
        required_params: &["names"],
        optional_params: &["container-runtime"],
        default_params: &[("timeout", "60s")],
    },
    ScopeSchema {
        id: Scope::Host,
        description: "bare host",
        priority: 5,
        keywords: &["主机", "host", "服务器", "机器", "物理机"],
        required_params: &["names"],
        optional_params: &["safe-mode"],
        default_params: &[("timeout", "300s")],
    },
];

static CATALOG: Lazy<ScopeCatalog> = Lazy::new(|| {
    let catalog = ScopeCatalog { schemas: &SCHEMAS };
    catalog.verify();
    catalog
});

/// Read-only catalog of all scope schemas
///
/// Initialized once per process; the table is verified on first access and
/// a malformed table aborts startup rather than failing per call.
#[derive(Debug, Clone, Copy)]
pub struct ScopeCatalog {
    schemas: &'static [ScopeSchema],
}

impl ScopeCatalog {
    /// Process-wide catalog instance
    ///
    /// # Panics
    /// Panics on first access if the built-in table violates its invariants
    /// (duplicate ids, priorities out of order).
    #[inline]
    #[must_use]
    pub fn global() -> &'static ScopeCatalog {
        &CATALOG
    }

    /// All schemas in priority order (ascending)
    #[inline]
    #[must_use]
    pub fn all(&self) -> &'static [ScopeSchema] {
        self.schemas
    }

    /// Schema for one scope
    #[must_use]
    pub fn get(&self, scope: Scope) -> &'static ScopeSchema {
        self.schemas
            .iter()
            .find(|s| s.id == scope)
            .expect("catalog verified complete at startup")
    }

    /// Scopes whose keyword set hits the text, in priority order
    ///
    /// Matching is case-insensitive substring containment; an empty result
    /// means the caller should fall back to [`Scope::DEFAULT`].
    #[must_use]
    pub fn match_keywords(&self, text: &str) -> Vec<Scope> {
        let lowered = text.to_lowercase();
        self.schemas
            .iter()
            .filter(|s| s.keywords.iter().any(|k| lowered.contains(k)))
            .map(|s| s.id)
            .collect()
    }

    /// Check table invariants, aborting on violation
    fn verify(&self) {
        assert_eq!(self.schemas.len(), 5, "scope catalog must cover every scope");
        for pair in self.schemas.windows(2) {
            assert!(
                pair[0].priority < pair[1].priority,
                "scope priorities must be unique and ascending"
            );
            assert_ne!(pair[0].id, pair[1].id, "duplicate scope schema");
        }
        for schema in self.schemas {
            assert!(!schema.keywords.is_empty(), "scope without keywords: {}", schema.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_covers_all_scopes() {
        let catalog = ScopeCatalog::global();
        assert_eq!(catalog.all().len(), 5);
        for scope in [Scope::Node, Scope::Pod, Scope::Container, Scope::Cri, Scope::Host] {
            assert_eq!(catalog.get(scope).id, scope);
        }
    }

    #[test]
    fn match_chinese_keywords() {
        let catalog = ScopeCatalog::global();
        assert_eq!(catalog.match_keywords("在节点上执行"), vec![Scope::Node]);
        assert_eq!(catalog.match_keywords("在主机上执行"), vec![Scope::Host]);
    }

    #[test]
    fn match_english_keywords_case_insensitive() {
        let catalog = ScopeCatalog::global();
        assert_eq!(catalog.match_keywords("on the Node"), vec![Scope::Node]);
        assert_eq!(catalog.match_keywords("restart the POD"), vec![Scope::Pod]);
    }

    #[test]
    fn multi_match_ordered_by_priority() {
        let catalog = ScopeCatalog::global();
        // "容器组" (pod) contains "容器" (container), so both hit; pod wins.
        let matches = catalog.match_keywords("在容器组上执行");
        assert_eq!(matches, vec![Scope::Pod, Scope::Container]);
    }

    #[test]
    fn no_match_is_empty() {
        let catalog = ScopeCatalog::global();
        assert!(catalog.match_keywords("完全无关的文字").is_empty());
        assert_eq!(Scope::DEFAULT, Scope::Host);
    }

    #[test]
    fn default_params_present() {
        let catalog = ScopeCatalog::global();
        assert_eq!(catalog.get(Scope::Node).default_params, &[("timeout", "300s")]);
        assert_eq!(catalog.get(Scope::Cri).default_params, &[("timeout", "60s")]);
    }

    #[test]
    fn scope_display_lowercase() {
        assert_eq!(Scope::Container.to_string(), "container");
        assert_eq!(Scope::Cri.as_str(), "cri");
    }

    #[test]
    fn scope_serde_lowercase() {
        let json = serde_json::to_string(&Scope::Pod).unwrap();
        assert_eq!(json, "\"pod\"");
        let back: Scope = serde_json::from_str("\"host\"").unwrap();
        assert_eq!(back, Scope::Host);
    }
}
