//! Experiment target catalog
//!
//! A target is the subsystem being perturbed (cpu, network, file, ...).
//! Targets are checked in a fixed declaration order when classifying text;
//! the first target whose keyword set hits wins. That order is binding:
//! `cpu` is checked before `network`, `network` before `process`, and so
//! on down the table.

use crate::scope::Scope;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Subsystem an experiment perturbs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// CPU load
    Cpu,
    /// Network faults (delay, loss, bandwidth)
    Network,
    /// Process control
    Process,
    /// Disk I/O and usage
    Disk,
    /// Memory pressure
    Mem,
    /// File operations
    File,
    /// Script execution
    Script,
    /// Syscall interception
    Strace,
    /// System services
    Systemd,
    /// Clock manipulation
    Time,
}

impl Target {
    /// Target assumed when no keyword matches
    pub const DEFAULT: Target = Target::File;

    /// Lowercase identifier used in documents and file names
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Cpu => "cpu",
            Target::Network => "network",
            Target::Process => "process",
            Target::Disk => "disk",
            Target::Mem => "mem",
            Target::File => "file",
            Target::Script => "script",
            Target::Strace => "strace",
            Target::Systemd => "systemd",
            Target::Time => "time",
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of one target
#[derive(Debug, Clone, Copy)]
pub struct TargetSchema {
    /// Target identifier
    pub id: Target,
    /// Detection keywords, lowercase, Chinese and English in parallel
    pub keywords: &'static [&'static str],
    /// Scopes this target can run under
    pub supported_scopes: &'static [Scope],
    /// Scope used when the instruction names none
    pub default_scope: Scope,
    /// Whether more than one scope is valid
    pub multi_scope: bool,
}

impl TargetSchema {
    /// Whether `scope` is valid for this target
    #[inline]
    #[must_use]
    pub fn supports(&self, scope: Scope) -> bool {
        self.supported_scopes.contains(&scope)
    }
}

/// Built-in target table. Declaration order is the classification order.
static SCHEMAS: [TargetSchema; 10] = [
    TargetSchema {
        id: Target::Cpu,
        keywords: &["cpu", "处理器", "中央处理器", "核心"],
        supported_scopes: &[Scope::Node, Scope::Pod, Scope::Container, Scope::Host],
        default_scope: Scope::Host,
        multi_scope: true,
    },
    TargetSchema {
        id: Target::Network,
        keywords: &["网络", "network", "网卡", "端口", "延迟", "丢包", "带宽"],
        supported_scopes: &[Scope::Node, Scope::Pod, Scope::Container, Scope::Host],
        default_scope: Scope::Host,
        multi_scope: true,
    },
    TargetSchema {
        id: Target::Process,
        keywords: &["进程", "process", "杀死", "停止", "进程名"],
        supported_scopes: &[Scope::Node, Scope::Pod, Scope::Container, Scope::Host, Scope::Cri],
        default_scope: Scope::Host,
        multi_scope: true,
    },
    TargetSchema {
        id: Target::Disk,
        keywords: &["磁盘", "disk", "硬盘", "io", "读写", "占用"],
        supported_scopes: &[Scope::Node, Scope::Host],
        default_scope: Scope::Host,
        multi_scope: true,
    },
    TargetSchema {
        id: Target::Mem,
        keywords: &["内存", "memory", "ram", "内存负载"],
        supported_scopes: &[Scope::Node, Scope::Pod, Scope::Container, Scope::Host],
        default_scope: Scope::Host,
        multi_scope: true,
    },
    TargetSchema {
        id: Target::File,
        keywords: &["文件", "file", "创建文件", "修改文件", "删除文件"],
        supported_scopes: &[Scope::Node, Scope::Pod, Scope::Container, Scope::Host],
        default_scope: Scope::Host,
        multi_scope: true,
    },
    TargetSchema {
        id: Target::Script,
        keywords: &["脚本", "script", "shell", "bash"],
        supported_scopes: &[Scope::Node, Scope::Host],
        default_scope: Scope::Host,
        multi_scope: true,
    },
    TargetSchema {
        id: Target::Strace,
        keywords: &["系统调用", "strace", "syscall"],
        supported_scopes: &[Scope::Host],
        default_scope: Scope::Host,
        multi_scope: false,
    },
    TargetSchema {
        id: Target::Systemd,
        keywords: &["服务", "service", "systemd", "守护进程"],
        supported_scopes: &[Scope::Host],
        default_scope: Scope::Host,
        multi_scope: false,
    },
    TargetSchema {
        id: Target::Time,
        keywords: &["时间", "time", "时钟", "ntp"],
        supported_scopes: &[Scope::Host],
        default_scope: Scope::Host,
        multi_scope: false,
    },
];

static CATALOG: Lazy<TargetCatalog> = Lazy::new(|| {
    let catalog = TargetCatalog { schemas: &SCHEMAS };
    catalog.verify();
    catalog
});

/// Read-only catalog of all target schemas
#[derive(Debug, Clone, Copy)]
pub struct TargetCatalog {
    schemas: &'static [TargetSchema],
}

impl TargetCatalog {
    /// Process-wide catalog instance
    ///
    /// # Panics
    /// Panics on first access if the built-in table violates its invariants
    /// (a non-multi-scope target with more than one scope, or a default
    /// scope outside the supported set).
    #[inline]
    #[must_use]
    pub fn global() -> &'static TargetCatalog {
        &CATALOG
    }

    /// All schemas in declaration (classification) order
    #[inline]
    #[must_use]
    pub fn all(&self) -> &'static [TargetSchema] {
        self.schemas
    }

    /// Schema for one target
    #[must_use]
    pub fn get(&self, target: Target) -> &'static TargetSchema {
        self.schemas
            .iter()
            .find(|s| s.id == target)
            .expect("catalog verified complete at startup")
    }

    /// First target in declaration order whose keyword set hits the text
    #[must_use]
    pub fn match_keywords(&self, text: &str) -> Option<Target> {
        let lowered = text.to_lowercase();
        self.schemas
            .iter()
            .find(|s| s.keywords.iter().any(|k| lowered.contains(k)))
            .map(|s| s.id)
    }

    /// Check table invariants, aborting on violation
    fn verify(&self) {
        assert_eq!(self.schemas.len(), 10, "target catalog must cover every target");
        for (i, schema) in self.schemas.iter().enumerate() {
            assert!(
                self.schemas[i + 1..].iter().all(|s| s.id != schema.id),
                "duplicate target schema: {}",
                schema.id
            );
            assert!(
                schema.supports(schema.default_scope),
                "default scope of {} not in its supported set",
                schema.id
            );
            if !schema.multi_scope {
                assert_eq!(
                    schema.supported_scopes.len(),
                    1,
                    "single-scope target {} must support exactly one scope",
                    schema.id
                );
            }
        }
    }
}
