//! Resource downloads over plain HTTP
//!
//! Images, scripts and stylesheets are never rendered. They are fetched once
//! as a byte stream and handed to the file store.

use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use log::debug;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};

use crate::config::MirrorConfig;
use crate::crawl_engine::{CrawlError, CrawlResult};
use crate::utils::CHROME_USER_AGENT;

/// Body of a fetched resource, chunk by chunk
pub type ByteStream = Pin<Box<dyn Stream<Item = CrawlResult<Bytes>> + Send>>;

/// Opens byte streams for resource URLs
#[allow(async_fn_in_trait)]
pub trait ResourceFetcher {
    /// Start downloading `url`
    ///
    /// Connection errors and non-success statuses are reported as
    /// `CrawlError::ResourceFetchFailure`. Errors while reading the body
    /// surface as items of the returned stream.
    async fn fetch(&self, url: &str) -> CrawlResult<ByteStream>;
}

/// `ResourceFetcher` on top of a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Client with the browser's user agent, the resource timeout, and the
    /// configured cookies sent on every request
    pub fn new(config: &MirrorConfig) -> CrawlResult<Self> {
        let mut headers = HeaderMap::new();
        if !config.cookies().is_empty() {
            let cookie = config
                .cookies()
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            let value = HeaderValue::from_str(&cookie)
                .map_err(|e| CrawlError::Config(format!("cookie is not a valid header value: {e}")))?;
            headers.insert(COOKIE, value);
        }

        let client = reqwest::Client::builder()
            .user_agent(CHROME_USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.resource_timeout_secs()))
            .connect_timeout(Duration::from_secs(config.resource_timeout_secs().min(30)))
            .build()
            .map_err(|e| CrawlError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> CrawlResult<ByteStream> {
        let fetch_failure = |message: String| CrawlError::ResourceFetchFailure {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_failure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_failure(format!("HTTP {status}")));
        }
        debug!(
            target: "sitemirror::fetcher",
            "Fetching {url} ({} bytes announced)",
            response.content_length().map_or_else(|| "unknown".to_string(), |n| n.to_string())
        );

        let owned_url = url.to_string();
        let stream = response.bytes_stream().map(move |chunk| {
            chunk.map_err(|e| CrawlError::ResourceFetchFailure {
                url: owned_url.clone(),
                message: e.to_string(),
            })
        });
        Ok(Box::pin(stream))
    }
}
