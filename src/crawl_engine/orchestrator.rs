//! Main crawl orchestration logic
//!
//! Drives one mirror run from seeding to completion:
//! INIT, SEEDING, then POP/RENDER/EXTRACT/PERSIST until the frontier is
//! empty, a stop is requested, or the renderer is lost.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::{debug, error, info, warn};

use super::crawl_types::{CrawlError, CrawlItem, CrawlResult, CrawlSummary};
use super::frontier::Frontier;
use super::link_processor::{LinkOutcome, LinkProcessor};
use super::progress::{NoOpProgress, ProgressReporter};
use crate::config::{LinkKind, MirrorConfig};
use crate::content_saver::FileStore;
use crate::page_renderer::PageRenderer;
use crate::remote_url::MirrorLayout;
use crate::resource_fetcher::ResourceFetcher;

/// Requests a run-level stop, honored between pages
///
/// Clones share one flag. The page being processed when the stop arrives
/// is finished first.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One mirror run over its collaborators
pub struct Mirror<R, F, S, P = NoOpProgress> {
    config: MirrorConfig,
    renderer: R,
    fetcher: F,
    store: S,
    progress: P,
    stop: StopHandle,
}

impl<R, F, S> Mirror<R, F, S, NoOpProgress>
where
    R: PageRenderer,
    F: ResourceFetcher,
    S: FileStore,
{
    pub fn new(config: MirrorConfig, renderer: R, fetcher: F, store: S) -> Self {
        Self {
            config,
            renderer,
            fetcher,
            store,
            progress: NoOpProgress,
            stop: StopHandle::new(),
        }
    }
}

impl<R, F, S, P> Mirror<R, F, S, P>
where
    R: PageRenderer,
    F: ResourceFetcher,
    S: FileStore,
    P: ProgressReporter,
{
    /// Report lifecycle events to `progress`
    pub fn with_progress<Q: ProgressReporter>(self, progress: Q) -> Mirror<R, F, S, Q> {
        Mirror {
            config: self.config,
            renderer: self.renderer,
            fetcher: self.fetcher,
            store: self.store,
            progress,
            stop: self.stop,
        }
    }

    #[must_use]
    pub fn with_stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    /// Handle that stops this run between pages
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Crawl until done and release the renderer
    ///
    /// Per-item failures are counted in the summary. The only error returned
    /// is a fatal one (renderer lost, unusable output directory); the
    /// renderer is shut down in every case.
    pub async fn run(mut self) -> CrawlResult<CrawlSummary> {
        let started = Instant::now();
        let mut summary = CrawlSummary::default();

        let result = self.crawl(&mut summary).await;

        debug!(target: "sitemirror::orchestrator", "Releasing renderer");
        self.renderer.shutdown().await;

        summary.elapsed = started.elapsed();
        self.progress.report_completed(&summary);

        match result {
            Ok(()) => {
                info!(target: "sitemirror::orchestrator", "Mirror finished: {summary}");
                Ok(summary)
            }
            Err(e) => {
                error!(target: "sitemirror::orchestrator", "Mirror aborted: {e} ({summary})");
                Err(e)
            }
        }
    }

    async fn crawl(&mut self, summary: &mut CrawlSummary) -> CrawlResult<()> {
        // INIT
        let layout = self.config.mirror_layout()?;
        info!(target: "sitemirror::orchestrator", "Mirroring into {}", layout.root().display());
        if self.config.allowed_prefixes().is_empty() {
            warn!(
                target: "sitemirror::orchestrator",
                "No allowed URL prefixes configured; nothing is in scope"
            );
        }

        // SEEDING
        let mut frontier = Frontier::new(self.config.scope_policy());
        let seeded = frontier.seed(self.config.start_urls(), &layout);
        info!(target: "sitemirror::orchestrator", "Seeded {seeded} start URL(s)");
        self.progress.report_crawl_started(seeded);

        // LOOP
        loop {
            if self.stop.is_stopped() {
                summary.cancelled = !frontier.is_empty();
                info!(
                    target: "sitemirror::orchestrator",
                    "Stop requested, {} page(s) left unvisited",
                    frontier.pending()
                );
                break;
            }
            let Some(item) = frontier.pop_next() else {
                break;
            };

            self.visit(&item, &mut frontier, &layout, summary).await?;
            frontier.mark_downloaded(item.url.url_path());
        }

        Ok(())
    }

    async fn visit(
        &mut self,
        item: &CrawlItem,
        frontier: &mut Frontier,
        layout: &MirrorLayout,
        summary: &mut CrawlSummary,
    ) -> CrawlResult<()> {
        let url = item.url.as_str();
        info!(target: "sitemirror::orchestrator", "Navigate to: {url} [depth {}]", item.depth);
        self.progress.report_page_started(url, item.depth);

        // RENDER
        if let Err(e) = self.renderer.navigate(url, self.config.cookies()).await {
            return page_failed(&self.progress, item, e, summary);
        }

        // EXTRACT_LINKS then EXTRACT_RESOURCES
        let mut links = LinkProcessor {
            frontier,
            layout,
            fetcher: &self.fetcher,
            store: &self.store,
            progress: &self.progress,
            convert_links: self.config.convert_links(),
        };
        let rules = self
            .config
            .rules_of_kind(LinkKind::Page)
            .chain(self.config.rules_of_kind(LinkKind::Resource));
        for rule in rules {
            let elements = match self.renderer.find_elements(&rule.tag).await {
                Ok(elements) => elements,
                Err(e) => return page_failed(&self.progress, item, e, summary),
            };
            debug!(
                target: "sitemirror::orchestrator",
                "  Iterate {:?} links: {}.{} x {}",
                rule.kind,
                rule.tag,
                rule.attribute,
                elements.len()
            );

            for element in &elements {
                match links.process(&mut self.renderer, element, rule, item).await? {
                    LinkOutcome::Enqueued => summary.links_enqueued += 1,
                    LinkOutcome::Rewritten => summary.links_rewritten += 1,
                    LinkOutcome::ResourceSaved { rewritten } => {
                        summary.resources_saved += 1;
                        if rewritten {
                            summary.links_rewritten += 1;
                        }
                    }
                    LinkOutcome::ResourceFailed => summary.resources_failed += 1,
                    LinkOutcome::Invalid | LinkOutcome::OutOfScope | LinkOutcome::Known => {}
                }
            }
        }

        // PERSIST
        let html = match self.renderer.serialized_document().await {
            Ok(html) => html,
            Err(e) => return page_failed(&self.progress, item, e, summary),
        };
        let path = item.url.local_path();
        match self.store.write(path, html.as_bytes()).await {
            Ok(()) => {
                info!(target: "sitemirror::orchestrator", "  Page download to: {}", path.display());
                summary.pages_saved += 1;
                self.progress.report_page_saved(url, path);
            }
            Err(e) => {
                error!(target: "sitemirror::orchestrator", "Store file fail: {e}");
                summary.pages_failed += 1;
                if self.config.stop_on_failure() {
                    warn!(target: "sitemirror::orchestrator", "Abandoning {url}");
                    self.progress.report_item_failed(url, &e);
                }
            }
        }

        Ok(())
    }
}

/// Record a page that could not be rendered; fatal errors pass through
fn page_failed<P: ProgressReporter>(
    progress: &P,
    item: &CrawlItem,
    error: CrawlError,
    summary: &mut CrawlSummary,
) -> CrawlResult<()> {
    if error.is_fatal() {
        return Err(error);
    }
    warn!(target: "sitemirror::orchestrator", "Page skipped: {error}");
    summary.pages_failed += 1;
    progress.report_item_failed(item.url.as_str(), &error);
    Ok(())
}
