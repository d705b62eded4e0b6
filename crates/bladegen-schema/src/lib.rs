//! bladegen-schema - static experiment catalogs
//!
//! Read-only tables describing the chaos-experiment vocabulary:
//! - Scopes (node/pod/container/cri/host) with keywords, priorities and
//!   matcher requirements
//! - Targets (cpu/network/.../time) with their supported scopes
//! - Actions (delay/loss/.../modify) with an ordered keyword table
//! - The scalar-or-list parameter value model and per-name validation rules
//!
//! Tables are process-wide constants verified once at first access; nothing
//! here mutates after initialization, so the catalogs are safe to share
//! across threads without locking.

#![warn(unreachable_pub)]

pub mod action;
pub mod params;
pub mod rules;
pub mod scope;
pub mod target;

// Re-exports for convenience
pub use action::Action;
pub use params::{is_matcher_name, ParamMap, ParamValue, MATCHER_NAMES};
pub use rules::{rule_for, ParamRule};
pub use scope::{Scope, ScopeCatalog, ScopeSchema};
pub use target::{Target, TargetCatalog, TargetSchema};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
