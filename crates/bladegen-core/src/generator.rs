//! The end-to-end pipeline facade.
//!
//! An [`ExperimentGenerator`] wires the four stages together:
//! classify (backend first when installed, rules otherwise), optimize,
//! re-validate the repaired parameters, render, and optionally persist.
//! One instruction in, one [`GenerationReport`] out; nothing in the
//! pipeline panics or aborts a batch.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use bladegen_classify::{InstructionClassifier, IntentBackend, ParsedIntent};
use bladegen_render::{split_parameters, ConfigRenderer, FileSink, RenderedDocument};
use bladegen_schema::{ParamMap, Scope, ScopeCatalog, TargetCatalog};
use bladegen_validate::{
    KubectlProbe, OrchestratorProbe, ParameterOptimizer, ParameterValidator, ValidationOutcome,
};

use crate::config::GeneratorConfig;

/// The four canonical demo instructions, one per pipeline shape.
pub const DEMO_INSTRUCTIONS: [&str; 4] = [
    "在节点 node-1 上添加文件 /root/test.log，内容为 hello world",
    "在 Pod web-app-pod 上创建网络延迟，延迟 100ms，网卡 eth0",
    "在容器 app-container 中创建 CPU 负载，负载 60%，核心数 2",
    "在主机 192.168.1.100 上停止 nginx 服务",
];

/// Failures outside the per-instruction pipeline itself.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// failed to read a batch instruction file
    #[error("failed to read instructions: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything one instruction produced, stage by stage.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    /// The instruction as given.
    pub instruction: String,
    /// Classified intent, parameters as extracted.
    pub intent: ParsedIntent,
    /// Parameters after defaults, detection and repair.
    pub parameters: ParamMap,
    /// Final validation of the repaired parameters.
    pub outcome: ValidationOutcome,
    /// Rendered (and possibly persisted) document.
    pub document: RenderedDocument,
}

impl GenerationReport {
    /// Whether this instruction ended with a usable document on disk
    /// or in memory.
    #[inline]
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.document.success
    }
}

/// Facade over the classify → optimize → validate → render pipeline.
pub struct ExperimentGenerator {
    config: GeneratorConfig,
    classifier: InstructionClassifier,
    optimizer: ParameterOptimizer,
    validator: ParameterValidator,
    renderer: ConfigRenderer,
    backend: Option<Arc<dyn IntentBackend>>,
}

impl ExperimentGenerator {
    /// Generator probing the environment through `kubectl`.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_probe(config, Arc::new(KubectlProbe::new()))
    }

    /// Generator with a caller-supplied environment probe.
    #[must_use]
    pub fn with_probe(config: GeneratorConfig, probe: Arc<dyn OrchestratorProbe>) -> Self {
        if let Some(settings) = &config.backend {
            tracing::debug!(
                model = %settings.model,
                base_url = %settings.base_url,
                "classification backend settings loaded"
            );
        }
        Self {
            config,
            classifier: InstructionClassifier::new(),
            optimizer: ParameterOptimizer::new(probe),
            validator: ParameterValidator::new(),
            renderer: ConfigRenderer::new(),
            backend: None,
        }
    }

    /// Install a first-chance classification backend. The rule-based
    /// classifier remains the fallback whenever the backend declines.
    #[must_use]
    pub fn with_backend(mut self, backend: Arc<dyn IntentBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Run the full pipeline for one instruction.
    pub async fn generate(&self, instruction: &str) -> GenerationReport {
        let intent = self.classify(instruction).await;
        let stem = intent.name.clone();
        self.finish(instruction, intent, stem).await
    }

    /// Run many instructions concurrently; reports come back in input
    /// order and one failure never aborts the rest.
    pub async fn generate_many(&self, instructions: &[String]) -> Vec<GenerationReport> {
        let runs = instructions.iter().map(|i| self.generate(i));
        futures::future::join_all(runs).await
    }

    /// Render one instruction once per scope its target supports, in
    /// catalog priority order. Persisted files get a `-{scope}` suffix.
    pub async fn generate_all_scopes(&self, instruction: &str) -> Vec<GenerationReport> {
        let intent = self.classify(instruction).await;
        let target_schema = TargetCatalog::global().get(intent.target);

        let mut reports = Vec::new();
        for schema in ScopeCatalog::global().all() {
            if !target_schema.supports(schema.id) {
                continue;
            }
            let mut scoped = intent.clone();
            scoped.scope = schema.id;
            let stem = format!("{}-{}", intent.name, schema.id);
            reports.push(self.finish(instruction, scoped, stem).await);
        }
        reports
    }

    async fn classify(&self, instruction: &str) -> ParsedIntent {
        if let Some(backend) = &self.backend {
            if let Some(intent) = backend.classify(instruction).await {
                tracing::debug!(name = %intent.name, "backend supplied the intent");
                return intent;
            }
            tracing::debug!("backend declined, falling back to rules");
        }
        self.classifier.classify(instruction)
    }

    /// Optimize, re-validate, render and persist one already-classified
    /// intent. `stem` names the output file when persistence is on.
    async fn finish(
        &self,
        instruction: &str,
        intent: ParsedIntent,
        stem: String,
    ) -> GenerationReport {
        let (parameters, optimize_warnings) = self
            .optimizer
            .optimize(&intent.parameters, intent.scope)
            .await;
        let outcome = self.validator.validate(&parameters, intent.scope);

        // Roll warnings up across stages, dropping exact repeats (the
        // optimizer already surfaced this validator's advisories once).
        let mut warnings: Vec<String> = Vec::new();
        for warning in intent
            .warnings
            .iter()
            .chain(optimize_warnings.iter())
            .chain(outcome.warnings.iter())
        {
            if !warnings.contains(warning) {
                warnings.push(warning.clone());
            }
        }

        let mut document = if outcome.is_valid {
            let (matchers, flags, timeout) = split_parameters(&parameters);
            let namespace = parameters
                .get("namespace")
                .and_then(|v| v.items().next().map(str::to_string));
            self.renderer.render(
                intent.scope,
                intent.target,
                intent.action,
                &matchers,
                &flags,
                &timeout,
                namespace.as_deref(),
            )
        } else {
            RenderedDocument::failed(format!(
                "parameters failed validation: {}",
                outcome.errors.join("; ")
            ))
        };
        document = document.with_warnings(warnings);

        if document.success {
            if let Some(dir) = &self.config.output_dir {
                let sink = FileSink::new(dir);
                match sink.persist(&stem, &document.content).await {
                    Ok(path) => document.written_paths.push(path),
                    Err(err) => {
                        document.success = false;
                        document.error = Some(err.to_string());
                    }
                }
            }
        }

        tracing::info!(
            instruction,
            scope = %intent.scope,
            target = %intent.target,
            action = %intent.action,
            success = document.success,
            "pipeline finished"
        );

        GenerationReport {
            instruction: instruction.to_string(),
            intent,
            parameters,
            outcome,
            document,
        }
    }
}

/// Read a batch instruction file: one instruction per line, blank
/// lines and surrounding whitespace dropped.
pub async fn load_instructions(path: &Path) -> Result<Vec<String>, GenerateError> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Scopes a rendered-per-scope run would cover for `target`, exposed
/// for front ends that want to show the plan before running.
#[must_use]
pub fn supported_scopes(target: bladegen_schema::Target) -> Vec<Scope> {
    let schema = TargetCatalog::global().get(target);
    ScopeCatalog::global()
        .all()
        .iter()
        .map(|s| s.id)
        .filter(|scope| schema.supports(*scope))
        .collect()
}
