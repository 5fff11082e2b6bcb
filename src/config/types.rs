//! Core configuration types for site mirroring
//!
//! This module contains the `MirrorConfig` struct and the tag classification
//! records that decide which links are crawled and which are fetched.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::utils::{
    DEFAULT_MAX_DEPTH, DEFAULT_NAVIGATION_TIMEOUT_SECS, DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
    DEFAULT_PAGE_NAME, DEFAULT_RESOURCE_TIMEOUT_SECS, DEFAULT_SCRIPT_TIMEOUT_SECS,
};

/// How a discovered link is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Rendered in the browser and scanned for further links
    Page,
    /// Fetched once as an opaque byte stream
    Resource,
}

/// One element tag and the attribute that carries its link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRule {
    pub tag: String,
    pub attribute: String,
    pub kind: LinkKind,
}

impl TagRule {
    #[must_use]
    pub fn page(tag: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attribute: attribute.into(),
            kind: LinkKind::Page,
        }
    }

    #[must_use]
    pub fn resource(tag: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attribute: attribute.into(),
            kind: LinkKind::Resource,
        }
    }
}

/// Tag rules used when none are configured
///
/// Page rules come first; order matters because it decides the order in
/// which sibling pages are discovered and therefore popped.
#[must_use]
pub fn default_tag_rules() -> Vec<TagRule> {
    vec![
        TagRule::page("a", "href"),
        TagRule::page("iframe", "src"),
        TagRule::resource("img", "src"),
        TagRule::resource("script", "src"),
        TagRule::resource("link", "href"),
    ]
}

/// Main configuration struct for a mirror run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Seed URLs, visited at depth 1
    pub(crate) start_urls: Vec<String>,

    /// A URL is crawled only if its identity starts with one of these.
    /// Empty means nothing is in scope.
    pub(crate) allowed_prefixes: Vec<String>,

    /// Pages are visited while `depth < max_depth`; 0 disables the limit
    pub(crate) max_depth: u32,

    /// Root of the mirrored tree. Normalized to an absolute path when the
    /// crawl starts.
    pub(crate) output_dir: PathBuf,

    /// File name stored for URLs ending in `/`
    pub(crate) default_page_name: String,

    /// Rewrite links to already-known targets so they point at local copies
    pub(crate) convert_links: bool,

    /// Abandon the current page's write when persisting fails. The crawl
    /// itself always continues with the next item.
    pub(crate) stop_on_failure: bool,

    /// Cookies injected before every navigation
    pub(crate) cookies: BTreeMap<String, String>,

    /// Ordered tag/attribute classification
    pub(crate) tag_rules: Vec<TagRule>,

    pub(crate) headless: bool,

    /// Browser binary to use instead of searching the system
    pub(crate) chrome_executable: Option<PathBuf>,

    /// Browser profile directory; a per-process temp dir when unset
    pub(crate) chrome_data_dir: Option<PathBuf>,

    /// Timeout in seconds for `page.goto()`
    pub(crate) page_load_timeout_secs: u64,

    /// Timeout in seconds for the load event and ready-state wait
    pub(crate) navigation_timeout_secs: u64,

    /// Timeout in seconds for each DOM query or mutation
    pub(crate) script_timeout_secs: u64,

    /// Timeout in seconds for each resource download
    pub(crate) resource_timeout_secs: u64,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            start_urls: Vec::new(),
            allowed_prefixes: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            output_dir: PathBuf::from("./mirror"),
            default_page_name: DEFAULT_PAGE_NAME.to_string(),
            convert_links: true,
            stop_on_failure: false,
            cookies: BTreeMap::new(),
            tag_rules: default_tag_rules(),
            headless: true,
            chrome_executable: None,
            chrome_data_dir: None,
            page_load_timeout_secs: DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
            navigation_timeout_secs: DEFAULT_NAVIGATION_TIMEOUT_SECS,
            script_timeout_secs: DEFAULT_SCRIPT_TIMEOUT_SECS,
            resource_timeout_secs: DEFAULT_RESOURCE_TIMEOUT_SECS,
        }
    }
}
