//! Validation and optimization for experiment parameters.
//!
//! Three cooperating pieces:
//!
//! - [`ParameterValidator`]: pure, scope-aware checks producing a
//!   [`ValidationOutcome`]
//! - [`OrchestratorProbe`]: best-effort environment discovery
//!   ([`KubectlProbe`] for real clusters, [`NullProbe`] for offline)
//! - [`ParameterOptimizer`]: defaults, detection and a single
//!   auto-repair pass, in that order
//!
//! The optimizer deliberately does not re-validate after repairing;
//! callers run the validator once more on the result so every repair
//! stays observable and bounded.

#![warn(unreachable_pub)]

pub mod optimizer;
pub mod outcome;
pub mod probe;
pub mod validator;

pub use optimizer::ParameterOptimizer;
pub use outcome::ValidationOutcome;
pub use probe::{KubectlProbe, NullProbe, OrchestratorProbe};
pub use validator::ParameterValidator;

/// Crate version, from Cargo metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
