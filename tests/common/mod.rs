//! Test utilities shared by the sitemirror integration tests
//!
//! Provides an in-memory renderer that serves canned pages, a fetcher backed
//! by a map of bodies, a store that can be told to fail, and a progress
//! reporter that records every hook call.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use sitemirror::config::MirrorConfig;
use sitemirror::content_saver::{FileStore, FsStore};
use sitemirror::crawl_engine::{CrawlError, CrawlResult, CrawlSummary, ProgressReporter};
use sitemirror::page_renderer::PageRenderer;
use sitemirror::resource_fetcher::{ByteStream, ResourceFetcher};

/// One element of a fake page
#[derive(Debug, Clone)]
pub struct FakeElement {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
}

impl FakeElement {
    pub fn new(tag: &str, attr: &str, value: &str) -> Self {
        let mut attrs = BTreeMap::new();
        attrs.insert(attr.to_string(), value.to_string());
        Self {
            tag: tag.to_string(),
            attrs,
        }
    }

    pub fn bare(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
        }
    }

    fn to_html(&self) -> String {
        let attrs: String = self
            .attrs
            .iter()
            .map(|(name, value)| format!(" {name}=\"{value}\""))
            .collect();
        format!("<{}{attrs}></{}>", self.tag, self.tag)
    }
}

pub fn anchor(href: &str) -> FakeElement {
    FakeElement::new("a", "href", href)
}

pub fn img(src: &str) -> FakeElement {
    FakeElement::new("img", "src", src)
}

pub fn script(src: &str) -> FakeElement {
    FakeElement::new("script", "src", src)
}

pub fn stylesheet(href: &str) -> FakeElement {
    FakeElement::new("link", "href", href)
}

/// What the fake renderer did, readable after the renderer moved into a run
#[derive(Debug, Default)]
pub struct RendererLog {
    pub navigations: Vec<String>,
    pub cookies: Vec<BTreeMap<String, String>>,
    pub shutdowns: usize,
}

/// `PageRenderer` over a fixed set of pages keyed by navigated URL
///
/// Unknown URLs render as an empty document. Element handles are indexes
/// into the current document.
pub struct FakeRenderer {
    site: HashMap<String, Vec<FakeElement>>,
    failing: HashSet<String>,
    exhaust_on: Option<String>,
    dom: Vec<FakeElement>,
    current: String,
    pub log: Arc<Mutex<RendererLog>>,
}

impl FakeRenderer {
    pub fn new() -> Self {
        Self {
            site: HashMap::new(),
            failing: HashSet::new(),
            exhaust_on: None,
            dom: Vec::new(),
            current: String::new(),
            log: Arc::new(Mutex::new(RendererLog::default())),
        }
    }

    pub fn page(mut self, url: &str, elements: Vec<FakeElement>) -> Self {
        self.site.insert(url.to_string(), elements);
        self
    }

    /// Navigation to `url` fails with a render error
    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    /// Navigation to `url` reports the browser as gone
    pub fn exhausted_on(mut self, url: &str) -> Self {
        self.exhaust_on = Some(url.to_string());
        self
    }

    pub fn log(&self) -> Arc<Mutex<RendererLog>> {
        Arc::clone(&self.log)
    }

    pub fn load(&mut self, url: &str) {
        self.current = url.to_string();
        self.dom = self.site.get(url).cloned().unwrap_or_default();
    }

    pub fn element_attr(&self, index: usize, name: &str) -> Option<String> {
        self.dom.get(index).and_then(|e| e.attrs.get(name).cloned())
    }
}

impl PageRenderer for FakeRenderer {
    type Element = usize;

    async fn navigate(&mut self, url: &str, cookies: &BTreeMap<String, String>) -> CrawlResult<()> {
        {
            let mut log = self.log.lock().unwrap();
            log.navigations.push(url.to_string());
            log.cookies.push(cookies.clone());
        }
        if self.exhaust_on.as_deref() == Some(url) {
            return Err(CrawlError::RendererExhausted("test browser died".into()));
        }
        if self.failing.contains(url) {
            return Err(CrawlError::RenderFailure {
                url: url.to_string(),
                message: "net::ERR_CONNECTION_REFUSED".into(),
            });
        }
        self.load(url);
        Ok(())
    }

    async fn find_elements(&mut self, tag_name: &str) -> CrawlResult<Vec<usize>> {
        Ok(self
            .dom
            .iter()
            .enumerate()
            .filter(|(_, e)| e.tag == tag_name)
            .map(|(i, _)| i)
            .collect())
    }

    async fn attribute(&mut self, element: &usize, name: &str) -> CrawlResult<Option<String>> {
        Ok(self.element_attr(*element, name))
    }

    async fn set_attribute(&mut self, element: &usize, name: &str, value: &str) -> CrawlResult<()> {
        let el = self.dom.get_mut(*element).ok_or_else(|| CrawlError::RenderFailure {
            url: self.current.clone(),
            message: "stale element".into(),
        })?;
        el.attrs.insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn serialized_document(&mut self) -> CrawlResult<String> {
        let body: String = self.dom.iter().map(FakeElement::to_html).collect();
        Ok(format!("<html><body>{body}</body></html>"))
    }

    async fn shutdown(&mut self) {
        self.log.lock().unwrap().shutdowns += 1;
    }
}

/// `ResourceFetcher` serving bodies from a map; anything else is a 404
#[derive(Clone, Default)]
pub struct FakeFetcher {
    bodies: HashMap<String, Vec<u8>>,
    pub fetched: Arc<Mutex<Vec<String>>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, url: &str, body: &[u8]) -> Self {
        self.bodies.insert(url.to_string(), body.to_vec());
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

impl ResourceFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> CrawlResult<ByteStream> {
        self.fetched.lock().unwrap().push(url.to_string());
        match self.bodies.get(url) {
            Some(body) => {
                let chunks: Vec<CrawlResult<Bytes>> = body
                    .chunks(4)
                    .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
                    .collect();
                Ok(Box::pin(futures::stream::iter(chunks)))
            }
            None => Err(CrawlError::ResourceFetchFailure {
                url: url.to_string(),
                message: "HTTP 404 Not Found".into(),
            }),
        }
    }
}

/// `FsStore` that refuses to write the listed paths
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: FsStore,
    refuse: HashSet<PathBuf>,
}

impl FlakyStore {
    pub fn refusing(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            inner: FsStore::new(),
            refuse: paths.into_iter().collect(),
        }
    }

    fn check(&self, path: &Path) -> CrawlResult<()> {
        if self.refuse.contains(path) {
            return Err(CrawlError::PersistFailure {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only volume"),
            });
        }
        Ok(())
    }
}

impl FileStore for FlakyStore {
    async fn write(&self, path: &Path, bytes: &[u8]) -> CrawlResult<()> {
        self.check(path)?;
        self.inner.write(path, bytes).await
    }

    async fn copy_stream(&self, path: &Path, stream: ByteStream) -> CrawlResult<u64> {
        self.check(path)?;
        self.inner.copy_stream(path, stream).await
    }
}

/// `ProgressReporter` that keeps a line per hook call
#[derive(Clone, Default)]
pub struct RecordingProgress {
    pub events: Arc<Mutex<Vec<String>>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl ProgressReporter for RecordingProgress {
    fn report_crawl_started(&self, seeded: usize) {
        self.push(format!("started {seeded}"));
    }

    fn report_page_started(&self, url: &str, depth: u32) {
        self.push(format!("page {url} {depth}"));
    }

    fn report_page_saved(&self, url: &str, _path: &Path) {
        self.push(format!("saved {url}"));
    }

    fn report_resource_saved(&self, url: &str, _path: &Path, bytes: u64) {
        self.push(format!("resource {url} {bytes}"));
    }

    fn report_item_failed(&self, url: &str, _error: &CrawlError) {
        self.push(format!("failed {url}"));
    }

    fn report_completed(&self, summary: &CrawlSummary) {
        self.push(format!("completed {}", summary.pages_saved));
    }
}

/// Config rooted at `root` allowing everything under `http://ex.com/`
pub fn config_for(root: &Path, start: &str) -> MirrorConfig {
    MirrorConfig::builder()
        .output_dir(root)
        .start_url(start)
        .allow_prefix("http://ex.com/")
        .build()
        .unwrap()
}
