//! Breadth-first crawl frontier
//!
//! Tracks every crawl identity (`RemoteUrl::url_path`) in at most one of two
//! sets: `queued` (waiting in the FIFO) and `downloaded` (visited or fetched,
//! whatever the outcome). Anything in neither set is unseen.

use std::collections::{HashSet, VecDeque};

use log::{debug, trace};

use super::crawl_types::CrawlItem;
use crate::remote_url::{MirrorLayout, RemoteUrl};

/// Result of offering a URL to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// Added to the back of the queue
    Enqueued,
    /// Already queued or downloaded; the caller should rewrite instead
    AlreadyKnown,
    /// Fails the prefix allow-list or the depth limit
    OutOfScope,
    /// The raw value did not parse
    Invalid,
}

/// Prefix allow-list plus depth limit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopePolicy {
    allowed_prefixes: Vec<String>,
    max_depth: u32,
}

impl ScopePolicy {
    /// `max_depth == 0` disables the depth limit. An empty prefix list
    /// matches nothing.
    #[must_use]
    pub fn new(allowed_prefixes: Vec<String>, max_depth: u32) -> Self {
        Self {
            allowed_prefixes,
            max_depth,
        }
    }

    #[must_use]
    pub fn allowed_prefixes(&self) -> &[String] {
        &self.allowed_prefixes
    }

    #[must_use]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// `url_path` starts with an allowed prefix and `depth` is under the limit
    #[must_use]
    pub fn is_in_scope(&self, url_path: &str, depth: u32) -> bool {
        let prefix_ok = self
            .allowed_prefixes
            .iter()
            .any(|prefix| url_path.starts_with(prefix.as_str()));
        let depth_ok = self.max_depth == 0 || depth < self.max_depth;
        prefix_ok && depth_ok
    }
}

/// FIFO queue of pending visits with dedup bookkeeping
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<CrawlItem>,
    queued: HashSet<String>,
    downloaded: HashSet<String>,
    scope: ScopePolicy,
}

impl Frontier {
    #[must_use]
    pub fn new(scope: ScopePolicy) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn scope(&self) -> &ScopePolicy {
        &self.scope
    }

    /// Queue the start URLs at depth 1; returns how many were enqueued
    ///
    /// Invalid, out-of-scope and duplicate seeds are skipped.
    pub fn seed<I, S>(&mut self, raw_urls: I, layout: &MirrorLayout) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seeded = 0;
        for raw in raw_urls {
            let raw = raw.as_ref();
            match self.try_enqueue_raw(raw, 1, layout) {
                EnqueueOutcome::Enqueued => seeded += 1,
                outcome => debug!(
                    target: "sitemirror::frontier",
                    "Start URL {raw} not queued: {outcome:?}"
                ),
            }
        }
        seeded
    }

    /// Offer a discovered URL at `depth`
    pub fn try_enqueue(&mut self, url: RemoteUrl, depth: u32) -> EnqueueOutcome {
        if self.is_known(url.url_path()) {
            return EnqueueOutcome::AlreadyKnown;
        }
        if !self.scope.is_in_scope(url.url_path(), depth) {
            trace!(target: "sitemirror::frontier", "Out of scope at depth {depth}: {}", url.url_path());
            return EnqueueOutcome::OutOfScope;
        }

        debug!(target: "sitemirror::frontier", "Add url to download queue: {}", url.url_path());
        self.queued.insert(url.url_path().to_string());
        self.queue.push_back(CrawlItem::new(url, depth));
        EnqueueOutcome::Enqueued
    }

    /// Parse `raw` with `layout` and offer it at `depth`
    pub fn try_enqueue_raw(&mut self, raw: &str, depth: u32, layout: &MirrorLayout) -> EnqueueOutcome {
        match layout.parse(raw) {
            Ok(url) => self.try_enqueue(url, depth),
            Err(_) => EnqueueOutcome::Invalid,
        }
    }

    /// Take the next item off the front of the queue
    ///
    /// The popped identity moves straight to `downloaded`, so links back to
    /// the page being visited count as known while it is processed. An item
    /// marked downloaded by a direct `mark_downloaded` call while it waited
    /// is dropped rather than visited twice.
    pub fn pop_next(&mut self) -> Option<CrawlItem> {
        while let Some(item) = self.queue.pop_front() {
            if self.queued.remove(item.url.url_path()) {
                self.downloaded.insert(item.url.url_path().to_string());
                return Some(item);
            }
            trace!(
                target: "sitemirror::frontier",
                "Skipping {}: downloaded while queued",
                item.url.url_path()
            );
        }
        None
    }

    /// Record `url_path` as done; returns false if it already was
    pub fn mark_downloaded(&mut self, url_path: &str) -> bool {
        self.queued.remove(url_path);
        self.downloaded.insert(url_path.to_string())
    }

    #[must_use]
    pub fn is_queued(&self, url_path: &str) -> bool {
        self.queued.contains(url_path)
    }

    #[must_use]
    pub fn is_downloaded(&self, url_path: &str) -> bool {
        self.downloaded.contains(url_path)
    }

    /// Queued or downloaded
    #[must_use]
    pub fn is_known(&self, url_path: &str) -> bool {
        self.is_queued(url_path) || self.is_downloaded(url_path)
    }

    #[must_use]
    pub fn is_in_scope(&self, url_path: &str, depth: u32) -> bool {
        self.scope.is_in_scope(url_path, depth)
    }

    /// Items still waiting to be popped
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queued.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    #[must_use]
    pub fn downloaded_count(&self) -> usize {
        self.downloaded.len()
    }
}
