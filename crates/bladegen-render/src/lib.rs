//! Experiment document rendering and persistence.
//!
//! - [`document`]: the typed YAML document model
//! - [`ConfigRenderer`]: pure, deterministic emission; failures come
//!   back inside the [`RenderedDocument`], never as panics
//! - [`FileSink`]: writes documents under an output directory
//!
//! Rendering preserves matcher/flag order exactly so output is stable
//! enough for golden-file comparison.

#![warn(unreachable_pub)]

pub mod document;
pub mod renderer;
pub mod sink;

pub use document::{
    ExperimentDocument, ExperimentEntry, ExperimentSpec, KeyedValue, Metadata, API_VERSION, KIND,
};
pub use renderer::{split_parameters, ConfigRenderer, RenderedDocument};
pub use sink::{FileSink, RenderError};

/// Crate version, from Cargo metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
