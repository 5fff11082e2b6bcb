//! Core types for mirror crawling.
//!
//! This module contains the error type shared by the engine and its
//! collaborators, the queue item type, and the end-of-run summary.

use std::path::PathBuf;
use std::time::Duration;

use crate::remote_url::RemoteUrl;

/// Error type for crawl operations
///
/// Every kind except `RendererExhausted` is recovered locally by the
/// orchestrator; the crawl moves on to the next frontier item.
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    /// Empty or unparsable link value
    #[error("Invalid URL: {0:?}")]
    InvalidUrl(String),

    /// Navigation, script execution or DOM serialization failed
    #[error("Render failed for {url}: {message}")]
    RenderFailure { url: String, message: String },

    /// A non-page resource could not be fetched
    #[error("Resource fetch failed for {url}: {message}")]
    ResourceFetchFailure { url: String, message: String },

    /// Writing a page or resource to disk failed
    #[error("Failed to persist {}: {source}", path.display())]
    PersistFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The browser session is gone; the run cannot continue
    #[error("Browser session lost: {0}")]
    RendererExhausted(String),

    /// The browser could not be found or started
    #[error("Browser launch failed: {0}")]
    BrowserLaunch(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CrawlError {
    /// Whether this error ends the whole run
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::RendererExhausted(_) | Self::BrowserLaunch(_))
    }

    pub(crate) fn persist(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::PersistFailure {
            path: path.into(),
            source,
        }
    }
}

impl From<anyhow::Error> for CrawlError {
    fn from(err: anyhow::Error) -> Self {
        // Use {:#} to preserve full error chain with context
        Self::BrowserLaunch(format!("{err:#}"))
    }
}

/// Convenience alias for Result with `CrawlError`
pub type CrawlResult<T> = Result<T, CrawlError>;

/// A pending page visit: the target and its BFS distance from a seed
///
/// Seeds are depth 1; a page discovered on a depth `d` page is depth `d + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlItem {
    pub url: RemoteUrl,
    pub depth: u32,
}

impl CrawlItem {
    #[must_use]
    pub fn new(url: RemoteUrl, depth: u32) -> Self {
        Self { url, depth }
    }
}

/// Counters reported when a run finishes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub pages_saved: usize,
    pub pages_failed: usize,
    pub resources_saved: usize,
    pub resources_failed: usize,
    pub links_rewritten: usize,
    pub links_enqueued: usize,
    /// Set when a stop was requested before the frontier drained
    pub cancelled: bool,
    pub elapsed: Duration,
}

impl std::fmt::Display for CrawlSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} pages saved ({} failed), {} resources saved ({} failed), {} links rewritten in {:.1}s",
            self.pages_saved,
            self.pages_failed,
            self.resources_saved,
            self.resources_failed,
            self.links_rewritten,
            self.elapsed.as_secs_f64()
        )?;
        if self.cancelled {
            write!(f, " (stopped early)")?;
        }
        Ok(())
    }
}
