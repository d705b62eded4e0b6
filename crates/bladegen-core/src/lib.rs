//! bladegen: natural-language fault instructions to experiment YAML.
//!
//! The workspace splits along pipeline stages:
//!
//! - `bladegen-schema`: scope/target/action catalogs, parameter model,
//!   value rules
//! - `bladegen-classify`: instruction text to [`ParsedIntent`]
//! - `bladegen-validate`: validation, environment probing, auto-repair
//! - `bladegen-render`: document emission and persistence
//!
//! This crate ties them into the [`ExperimentGenerator`] facade and the
//! `bladegen` binary. Typical use:
//!
//! ```no_run
//! # async fn run() {
//! use bladegen_core::{ExperimentGenerator, GeneratorConfig};
//!
//! let generator = ExperimentGenerator::new(GeneratorConfig::new());
//! let report = generator.generate("在主机 192.168.1.100 上停止 nginx 服务").await;
//! assert!(report.succeeded());
//! println!("{}", report.document.content);
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod generator;

pub use config::GeneratorConfig;
pub use generator::{
    load_instructions, supported_scopes, ExperimentGenerator, GenerateError, GenerationReport,
    DEMO_INSTRUCTIONS,
};

// Re-exported so binary and downstream callers need only this crate.
pub use bladegen_classify::{BackendConfig, InstructionClassifier, IntentBackend, ParsedIntent};
pub use bladegen_render::RenderedDocument;
pub use bladegen_schema::{Action, Scope, ScopeCatalog, Target, TargetCatalog};
pub use bladegen_validate::{KubectlProbe, NullProbe, ValidationOutcome};

/// Crate version, from Cargo metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
