//! Testing utilities for the bladegen workspace
//!
//! Shared fakes and fixture instructions used by the integration
//! suites. Everything here is deterministic; no subprocesses, no
//! network, no clock.

#![allow(missing_docs)]

use async_trait::async_trait;
use bladegen_classify::{IntentBackend, ParsedIntent};
use bladegen_schema::{is_matcher_name, ParamMap, ParamValue};
use bladegen_validate::OrchestratorProbe;

/// The four canonical demo instructions, one per pipeline shape.
pub const NODE_FILE_INSTRUCTION: &str =
    "在节点 node-1 上添加文件 /root/test.log，内容为 hello world";
pub const POD_DELAY_INSTRUCTION: &str =
    "在 Pod web-app-pod 上创建网络延迟，延迟 100ms，网卡 eth0";
pub const CONTAINER_LOAD_INSTRUCTION: &str =
    "在容器 app-container 中创建 CPU 负载，负载 60%，核心数 2";
pub const HOST_KILL_INSTRUCTION: &str = "在主机 192.168.1.100 上停止 nginx 服务";

/// Build a parameter map the way the classifier would: matcher names
/// and multi-item values become lists, everything else a scalar.
#[must_use]
pub fn scripted_params(entries: &[(&str, &[&str])]) -> ParamMap {
    let mut params = ParamMap::new();
    for (name, items) in entries {
        if items.len() == 1 && !is_matcher_name(name) {
            params.insert((*name).to_string(), ParamValue::scalar(items[0]));
        } else {
            params.insert((*name).to_string(), ParamValue::list(items.iter().copied()));
        }
    }
    params
}

/// Probe with scripted answers instead of subprocess calls.
#[derive(Debug, Default, Clone)]
pub struct FakeProbe {
    pub node: Option<String>,
    pub namespace: Option<String>,
    pub containers: Option<Vec<String>>,
    pub hostname: Option<String>,
}

impl FakeProbe {
    /// A probe that detects nothing, like an air-gapped machine.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A probe that answers every query, like a healthy cluster.
    pub fn full_cluster() -> Self {
        Self {
            node: Some("worker-1".to_string()),
            namespace: Some("default".to_string()),
            containers: Some(vec!["app".to_string()]),
            hostname: Some("test-host".to_string()),
        }
    }

    pub fn with_node(mut self, node: &str) -> Self {
        self.node = Some(node.to_string());
        self
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }

    pub fn with_containers(mut self, containers: &[&str]) -> Self {
        self.containers = Some(containers.iter().map(|c| (*c).to_string()).collect());
        self
    }

    pub fn with_hostname(mut self, hostname: &str) -> Self {
        self.hostname = Some(hostname.to_string());
        self
    }
}

#[async_trait]
impl OrchestratorProbe for FakeProbe {
    async fn detect_node(&self) -> Option<String> {
        self.node.clone()
    }

    async fn detect_namespace(&self) -> Option<String> {
        self.namespace.clone()
    }

    async fn detect_container_names(&self) -> Option<Vec<String>> {
        self.containers.clone()
    }

    async fn detect_hostname(&self) -> Option<String> {
        self.hostname.clone()
    }
}

/// Backend with a scripted answer; `None` means "decline and fall back
/// to the rules".
#[derive(Debug, Default, Clone)]
pub struct FakeBackend {
    pub intent: Option<ParsedIntent>,
}

impl FakeBackend {
    pub fn declining() -> Self {
        Self::default()
    }

    pub fn answering(intent: ParsedIntent) -> Self {
        Self {
            intent: Some(intent),
        }
    }
}

#[async_trait]
impl IntentBackend for FakeBackend {
    async fn classify(&self, _instruction: &str) -> Option<ParsedIntent> {
        self.intent.clone()
    }
}
