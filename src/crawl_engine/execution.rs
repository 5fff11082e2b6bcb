//! Production wiring for a mirror run
//!
//! Connects the orchestrator to Chromium, reqwest and the local
//! filesystem. Tests drive `Mirror` directly with in-memory collaborators.

use log::info;

use crate::config::MirrorConfig;
use crate::content_saver::FsStore;
use crate::page_renderer::ChromiumRenderer;
use crate::resource_fetcher::HttpFetcher;

use super::crawl_types::{CrawlResult, CrawlSummary};
use super::orchestrator::{Mirror, StopHandle};
use super::progress::{NoOpProgress, ProgressReporter};

/// Mirror the configured site with no progress reporting
///
/// This is a thin wrapper around `mirror_with_progress` that uses
/// `NoOpProgress` and a stop handle nobody holds.
pub async fn mirror(config: MirrorConfig) -> CrawlResult<CrawlSummary> {
    mirror_with_progress(config, NoOpProgress, StopHandle::new()).await
}

/// Mirror the configured site, reporting to `progress` and honoring `stop`
///
/// The output directory and HTTP client are checked before the browser is
/// launched, so configuration mistakes fail fast.
pub async fn mirror_with_progress<P: ProgressReporter>(
    config: MirrorConfig,
    progress: P,
    stop: StopHandle,
) -> CrawlResult<CrawlSummary> {
    config.validate()?;
    config.mirror_layout()?;
    let fetcher = HttpFetcher::new(&config)?;

    info!(target: "sitemirror::execution", "Launching browser");
    let renderer = ChromiumRenderer::launch(&config).await?;

    Mirror::new(config, renderer, fetcher, FsStore::new())
        .with_progress(progress)
        .with_stop_handle(stop)
        .run()
        .await
}
