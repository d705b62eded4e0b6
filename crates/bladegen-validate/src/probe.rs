//! Environment probes feeding smart parameter detection.
//!
//! A probe answers "what does the surrounding environment look like":
//! current cluster node, active namespace, container names, hostname.
//! Every query is best-effort and time-bounded; `None` always means
//! "could not tell", never an error the caller must handle.

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

/// Best-effort environment discovery for filling omitted parameters.
#[async_trait]
pub trait OrchestratorProbe: Send + Sync {
    /// Name of a reachable cluster node, if any.
    async fn detect_node(&self) -> Option<String>;
    /// Namespace the current context points at.
    async fn detect_namespace(&self) -> Option<String>;
    /// Container names of a running pod.
    async fn detect_container_names(&self) -> Option<Vec<String>>;
    /// This machine's hostname.
    async fn detect_hostname(&self) -> Option<String>;
}

/// Probe backed by the `kubectl` CLI, with hostname fallbacks for
/// off-cluster use. Every subprocess call is capped by a timeout so a
/// hung kubeconfig can never stall the pipeline.
#[derive(Debug, Clone)]
pub struct KubectlProbe {
    timeout: Duration,
}

impl KubectlProbe {
    /// Cap applied to each probe subprocess.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run one command, bounded by the probe timeout. Returns trimmed
    /// stdout, or `None` on timeout, spawn failure, non-zero exit or
    /// empty output.
    async fn run(&self, program: &str, args: &[&str]) -> Option<String> {
        let result =
            tokio::time::timeout(self.timeout, Command::new(program).args(args).output()).await;
        let output = match result {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                tracing::debug!(program, error = %err, "probe command failed to start");
                return None;
            }
            Err(_) => {
                tracing::debug!(program, timeout = ?self.timeout, "probe command timed out");
                return None;
            }
        };
        if !output.status.success() {
            tracing::debug!(program, code = ?output.status.code(), "probe command failed");
            return None;
        }
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if stdout.is_empty() {
            None
        } else {
            Some(stdout)
        }
    }
}

impl Default for KubectlProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrchestratorProbe for KubectlProbe {
    async fn detect_node(&self) -> Option<String> {
        if let Some(node) = self
            .run(
                "kubectl",
                &["get", "nodes", "-o", "jsonpath={.items[0].metadata.name}"],
            )
            .await
        {
            tracing::info!(node = %node, "detected cluster node");
            return Some(node);
        }
        // Off-cluster: treat this machine as the node.
        let fallback = self
            .detect_hostname()
            .await
            .unwrap_or_else(|| "localhost".to_string());
        tracing::info!(node = %fallback, "no cluster reachable, using local fallback");
        Some(fallback)
    }

    async fn detect_namespace(&self) -> Option<String> {
        let namespace = self
            .run(
                "kubectl",
                &["config", "view", "--minify", "-o", "jsonpath={..namespace}"],
            )
            .await
            .unwrap_or_else(|| "default".to_string());
        tracing::info!(namespace = %namespace, "resolved namespace");
        Some(namespace)
    }

    async fn detect_container_names(&self) -> Option<Vec<String>> {
        let raw = self
            .run(
                "kubectl",
                &[
                    "get",
                    "pods",
                    "-o",
                    "jsonpath={.items[0].spec.containers[*].name}",
                ],
            )
            .await?;
        let names: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
        if names.is_empty() {
            None
        } else {
            tracing::info!(count = names.len(), "detected pod containers");
            Some(names)
        }
    }

    async fn detect_hostname(&self) -> Option<String> {
        if let Some(hostname) = self.run("hostname", &[]).await {
            return Some(hostname);
        }
        std::env::var("HOSTNAME").ok().filter(|h| !h.is_empty())
    }
}

/// Probe that never detects anything. Keeps the optimizer fully
/// offline; missing parameters fall through to the repair defaults.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProbe;

#[async_trait]
impl OrchestratorProbe for NullProbe {
    async fn detect_node(&self) -> Option<String> {
        None
    }

    async fn detect_namespace(&self) -> Option<String> {
        None
    }

    async fn detect_container_names(&self) -> Option<Vec<String>> {
        None
    }

    async fn detect_hostname(&self) -> Option<String> {
        None
    }
}
