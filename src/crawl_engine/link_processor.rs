//! Link rewrite engine
//!
//! Decides, for one link-carrying element of the page being visited, whether
//! to enqueue its target, fetch it as a resource, rewrite the attribute to
//! the local copy, or leave it alone.

use std::path::Path;

use log::{debug, info, trace, warn};

use super::crawl_types::{CrawlError, CrawlItem, CrawlResult};
use super::frontier::{EnqueueOutcome, Frontier};
use super::progress::ProgressReporter;
use crate::config::{LinkKind, TagRule};
use crate::content_saver::FileStore;
use crate::page_renderer::PageRenderer;
use crate::remote_url::{MirrorLayout, RemoteUrl};
use crate::resource_fetcher::ResourceFetcher;

/// What happened to one discovered link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Attribute missing, empty or unparsable
    Invalid,
    /// Outside the allowed prefixes or past the depth limit
    OutOfScope,
    /// Page link queued for a later visit
    Enqueued,
    /// Known target; attribute now points at the local copy
    Rewritten,
    /// Known target left untouched (conversion disabled or not expressible)
    Known,
    /// Resource fetched and stored
    ResourceSaved { rewritten: bool },
    /// Resource could not be fetched or stored; it will not be retried
    ResourceFailed,
}

/// Value of an attribute pointing at `link`'s local copy from `page_local`
///
/// Only the identity portion of `current` is replaced so that any query or
/// fragment text survives. When `current` does not begin with the identity
/// (relative or differently cased source text) the normalized URL is used.
#[must_use]
pub fn rewrite_value(current: &str, link: &RemoteUrl, page_local: &Path) -> Option<String> {
    let relative = crate::utils::relative_href(page_local, link.local_path())?;
    match current.trim().strip_prefix(link.url_path()) {
        Some(rest) => Some(format!("{relative}{rest}")),
        None => link.replace_identity(&relative),
    }
}

/// Processes the links of the page currently loaded in the renderer
pub struct LinkProcessor<'a, F, S, P> {
    pub frontier: &'a mut Frontier,
    pub layout: &'a MirrorLayout,
    pub fetcher: &'a F,
    pub store: &'a S,
    pub progress: &'a P,
    pub convert_links: bool,
}

impl<F, S, P> LinkProcessor<'_, F, S, P>
where
    F: ResourceFetcher,
    S: FileStore,
    P: ProgressReporter,
{
    /// Handle `element`'s `rule.attribute` on `page`
    ///
    /// Per-link failures are absorbed into the outcome; only a lost renderer
    /// is returned as an error.
    pub async fn process<R: PageRenderer>(
        &mut self,
        renderer: &mut R,
        element: &R::Element,
        rule: &TagRule,
        page: &CrawlItem,
    ) -> CrawlResult<LinkOutcome> {
        let raw = match renderer.attribute(element, &rule.attribute).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(LinkOutcome::Invalid),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                debug!(target: "sitemirror::links", "Skipping <{}>: {e}", rule.tag);
                return Ok(LinkOutcome::Invalid);
            }
        };

        let link = match self.layout.parse(&raw) {
            Ok(link) => link,
            Err(e) => {
                trace!(target: "sitemirror::links", "{e}");
                return Ok(LinkOutcome::Invalid);
            }
        };

        match rule.kind {
            LinkKind::Page => self.page_link(renderer, element, rule, page, &raw, link).await,
            LinkKind::Resource => self.resource_link(renderer, element, rule, page, &raw, link).await,
        }
    }

    async fn page_link<R: PageRenderer>(
        &mut self,
        renderer: &mut R,
        element: &R::Element,
        rule: &TagRule,
        page: &CrawlItem,
        raw: &str,
        link: RemoteUrl,
    ) -> CrawlResult<LinkOutcome> {
        if self.frontier.is_known(link.url_path()) {
            return self.rewrite(renderer, element, rule, page, raw, &link).await;
        }

        Ok(match self.frontier.try_enqueue(link, page.depth + 1) {
            EnqueueOutcome::Enqueued => LinkOutcome::Enqueued,
            EnqueueOutcome::OutOfScope => LinkOutcome::OutOfScope,
            EnqueueOutcome::AlreadyKnown => LinkOutcome::Known,
            EnqueueOutcome::Invalid => LinkOutcome::Invalid,
        })
    }

    async fn resource_link<R: PageRenderer>(
        &mut self,
        renderer: &mut R,
        element: &R::Element,
        rule: &TagRule,
        page: &CrawlItem,
        raw: &str,
        link: RemoteUrl,
    ) -> CrawlResult<LinkOutcome> {
        // A queued page will be rendered to this same local path later.
        if self.frontier.is_known(link.url_path()) {
            return self.rewrite(renderer, element, rule, page, raw, &link).await;
        }
        if !self.frontier.is_in_scope(link.url_path(), page.depth) {
            trace!(target: "sitemirror::links", "Resource out of scope: {}", link.url_path());
            return Ok(LinkOutcome::OutOfScope);
        }

        let fetched = self.fetch_resource(&link).await;
        self.frontier.mark_downloaded(link.url_path());

        match fetched {
            Ok(bytes) => {
                info!(
                    target: "sitemirror::links",
                    "  Resource download to: {} ({bytes} bytes)",
                    link.local_path().display()
                );
                self.progress
                    .report_resource_saved(link.as_str(), link.local_path(), bytes);
                let rewritten = self.rewrite(renderer, element, rule, page, raw, &link).await?
                    == LinkOutcome::Rewritten;
                Ok(LinkOutcome::ResourceSaved { rewritten })
            }
            Err(e) => {
                warn!(target: "sitemirror::links", "Resource skipped: {e}");
                self.progress.report_item_failed(link.as_str(), &e);
                Ok(LinkOutcome::ResourceFailed)
            }
        }
    }

    async fn fetch_resource(&self, link: &RemoteUrl) -> CrawlResult<u64> {
        let stream = self.fetcher.fetch(link.as_str()).await?;
        self.store.copy_stream(link.local_path(), stream).await
    }

    /// Point the element's attribute at the local copy of `link`
    async fn rewrite<R: PageRenderer>(
        &mut self,
        renderer: &mut R,
        element: &R::Element,
        rule: &TagRule,
        page: &CrawlItem,
        raw: &str,
        link: &RemoteUrl,
    ) -> CrawlResult<LinkOutcome> {
        if !self.convert_links {
            return Ok(LinkOutcome::Known);
        }
        let Some(value) = rewrite_value(raw, link, page.url.local_path()) else {
            debug!(target: "sitemirror::links", "Cannot express {} relative to the page", link.url_path());
            return Ok(LinkOutcome::Known);
        };

        match renderer.set_attribute(element, &rule.attribute, &value).await {
            Ok(()) => {
                trace!(target: "sitemirror::links", "Rewrote {raw} -> {value}");
                Ok(LinkOutcome::Rewritten)
            }
            Err(e @ CrawlError::RendererExhausted(_)) => Err(e),
            Err(e) => {
                debug!(target: "sitemirror::links", "Rewrite of {raw} failed: {e}");
                Ok(LinkOutcome::Known)
            }
        }
    }
}
