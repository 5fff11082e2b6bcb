//! Progress reporting abstraction for mirror runs
//!
//! Defines the `ProgressReporter` trait for lifecycle event reporting
//! and provides a no-op implementation for simple use cases.

use std::path::Path;

use super::crawl_types::{CrawlError, CrawlSummary};

/// Trait for reporting crawl progress at key lifecycle events
///
/// Implementations can send updates to channels, log to console, update UI, etc.
/// Hooks are called from the crawl loop itself and should return quickly.
pub trait ProgressReporter: Send + Sync {
    /// Seeding finished with `seeded` start URLs in the queue
    fn report_crawl_started(&self, seeded: usize);

    /// A page was popped and is about to be rendered
    fn report_page_started(&self, url: &str, depth: u32);

    /// A rendered page was written to `path`
    fn report_page_saved(&self, url: &str, path: &Path);

    /// A resource was fetched and written to `path`
    fn report_resource_saved(&self, url: &str, path: &Path, bytes: u64);

    /// A page or resource failed; the crawl continues
    fn report_item_failed(&self, url: &str, error: &CrawlError);

    /// The run is over, whether drained, cancelled or aborted
    fn report_completed(&self, summary: &CrawlSummary);
}

/// Progress reporter that does nothing
///
/// Used by `mirror()` which only logs.
/// All methods are no-ops and will be inlined away by the compiler.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    #[inline(always)]
    fn report_crawl_started(&self, _seeded: usize) {}

    #[inline(always)]
    fn report_page_started(&self, _url: &str, _depth: u32) {}

    #[inline(always)]
    fn report_page_saved(&self, _url: &str, _path: &Path) {}

    #[inline(always)]
    fn report_resource_saved(&self, _url: &str, _path: &Path, _bytes: u64) {}

    #[inline(always)]
    fn report_item_failed(&self, _url: &str, _error: &CrawlError) {}

    #[inline(always)]
    fn report_completed(&self, _summary: &CrawlSummary) {}
}
