//! Remote URL identity and its mirrored location.
//!
//! A `RemoteUrl` is built once per discovered link. Its `url_path`
//! (`scheme://authority/path`, no query or fragment) is the crawl identity:
//! two links that differ only in query or fragment are the same target.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use url::Url;

use crate::crawl_engine::crawl_types::CrawlError;
use crate::utils::{get_mirror_path, relative_href};

/// An immutable, cheaply-cloneable parsed URL paired with its local path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteUrl {
    url: Arc<Url>,
    url_path: String,
    query: Option<String>,
    fragment: Option<String>,
    local_path: PathBuf,
}

impl RemoteUrl {
    /// Parse a raw link value and derive its local path.
    ///
    /// Empty input, relative references and URLs without a host (`mailto:`,
    /// `javascript:`, `data:`) are rejected with `CrawlError::InvalidUrl`.
    /// Callers treat that as "skip this link".
    pub fn parse(raw: &str, root: &Path, default_page: &str) -> Result<Self, CrawlError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CrawlError::InvalidUrl(raw.to_string()));
        }

        let url = Url::parse(trimmed).map_err(|_| CrawlError::InvalidUrl(raw.to_string()))?;
        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(CrawlError::InvalidUrl(raw.to_string())),
        };

        let authority = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.clone(),
        };
        let url_path = format!("{}://{}{}", url.scheme(), authority, url.path());
        let query = url
            .query()
            .filter(|q| !q.is_empty())
            .map(|q| format!("?{q}"));
        let fragment = url
            .fragment()
            .filter(|f| !f.is_empty())
            .map(|f| format!("#{f}"));
        let local_path = get_mirror_path(&host, url.path(), root, default_page);

        Ok(Self {
            url: Arc::new(url),
            url_path,
            query,
            fragment,
            local_path,
        })
    }

    /// Full URL text as the browser should navigate to it
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Crawl identity: `scheme://authority/path`
    #[must_use]
    pub fn url_path(&self) -> &str {
        &self.url_path
    }

    #[must_use]
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    #[must_use]
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Path without query or fragment
    #[must_use]
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Query string including the leading `?`
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Fragment including the leading `#`
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Where this URL is stored in the mirror
    #[must_use]
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// Replace the identity portion of the URL text with `replacement`.
    ///
    /// Whatever follows the identity (query, fragment) is carried over
    /// verbatim. Returns `None` when the serialized URL does not start with
    /// its identity, which happens for URLs carrying credentials.
    #[must_use]
    pub fn replace_identity(&self, replacement: &str) -> Option<String> {
        let rest = self.as_str().strip_prefix(self.url_path.as_str())?;
        Some(format!("{replacement}{rest}"))
    }

    /// Attribute value that points from `page_local` at this URL's local copy
    #[must_use]
    pub fn local_href_from(&self, page_local: &Path) -> Option<String> {
        let relative = relative_href(page_local, &self.local_path)?;
        self.replace_identity(&relative)
    }
}

impl fmt::Display for RemoteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The mirror root and default page name every `RemoteUrl` is derived with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorLayout {
    root: PathBuf,
    default_page: String,
}

impl MirrorLayout {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, default_page: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            default_page: default_page.into(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn default_page(&self) -> &str {
        &self.default_page
    }

    pub fn parse(&self, raw: &str) -> Result<RemoteUrl, CrawlError> {
        RemoteUrl::parse(raw, &self.root, &self.default_page)
    }
}
