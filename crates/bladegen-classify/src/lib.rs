//! Instruction classification for fault-injection experiments.
//!
//! This crate turns free-form natural-language instructions (Chinese,
//! English, or mixed) into structured [`ParsedIntent`] values:
//!
//! - [`InstructionClassifier`]: offline keyword/pattern classifier,
//!   always available, never rejects an input
//! - [`IntentBackend`]: optional first-chance backend (e.g. a local
//!   model endpoint) that can pre-empt the rules
//!
//! Classification is deliberately permissive: anything it cannot
//! resolve falls back to defaults and is surfaced through the intent's
//! confidence score and warnings, leaving rejection decisions to the
//! validation stage.

#![warn(unreachable_pub)]

pub mod backend;
pub mod classifier;
pub mod intent;

pub use backend::{BackendConfig, IntentBackend};
pub use classifier::InstructionClassifier;
pub use intent::ParsedIntent;

/// Crate version, from Cargo metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
