//! Page rendering through a real browser engine.
//!
//! The crawl engine only needs five capabilities from a renderer: navigate
//! with cookies, find elements by tag, read and write an attribute, and
//! serialize the live document. `PageRenderer` captures exactly that, so the
//! engine can be driven by Chromium in production and by an in-memory DOM in
//! tests.

pub mod chromium;
pub mod js_scripts;

use std::collections::BTreeMap;

use crate::crawl_engine::CrawlResult;

pub use chromium::ChromiumRenderer;

/// A browser session owned by one crawl run
///
/// Every method blocks the crawl loop until it completes. Failures are
/// reported as `CrawlError::RenderFailure` unless the session itself is
/// gone, which is `CrawlError::RendererExhausted`.
#[allow(async_fn_in_trait)]
pub trait PageRenderer {
    /// Handle to a DOM element of the current document
    type Element;

    /// Load `url`, injecting `cookies` for it. An empty map injects nothing.
    async fn navigate(&mut self, url: &str, cookies: &BTreeMap<String, String>) -> CrawlResult<()>;

    /// All elements with tag `tag_name`, in document order
    async fn find_elements(&mut self, tag_name: &str) -> CrawlResult<Vec<Self::Element>>;

    /// Current value of `name` on `element`, `None` when absent
    async fn attribute(&mut self, element: &Self::Element, name: &str) -> CrawlResult<Option<String>>;

    /// Overwrite `name` on the live element
    async fn set_attribute(&mut self, element: &Self::Element, name: &str, value: &str) -> CrawlResult<()>;

    /// HTML of the live document, including any attribute rewrites
    async fn serialized_document(&mut self) -> CrawlResult<String>;

    /// Release the browser session; safe to call more than once
    async fn shutdown(&mut self);
}
