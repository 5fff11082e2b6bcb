//! Configuration module for site mirroring
//!
//! This module provides the `MirrorConfig` struct, its type-safe builder and
//! JSON loading with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::{Complete, MirrorConfigBuilder, WithOutputDir};
pub use types::{LinkKind, MirrorConfig, TagRule, default_tag_rules};
