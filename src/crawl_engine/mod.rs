//! Crawl Engine Module
//!
//! This module contains the mirror crawl engine: the frontier, the link
//! rewrite engine and the orchestrator loop, plus the types and helpers
//! they share.

// Sub-modules
pub mod cleanup;
pub mod crawl_types;
pub mod execution;
pub mod frontier;
pub mod link_processor;
pub mod orchestrator;
pub mod page_timeout;
pub mod progress;

// Re-exports for public API
pub use execution::{mirror, mirror_with_progress};

// Re-export orchestration and progress types for advanced usage
pub use orchestrator::{Mirror, StopHandle};
pub use progress::{NoOpProgress, ProgressReporter};

// Re-export frontier and link engine types
pub use frontier::{EnqueueOutcome, Frontier, ScopePolicy};
pub use link_processor::{LinkOutcome, LinkProcessor, rewrite_value};

// Re-export crawl types
pub use crawl_types::{CrawlError, CrawlItem, CrawlResult, CrawlSummary};
