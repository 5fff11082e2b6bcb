//! `PageRenderer` backed by a single Chromium tab

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use chromiumoxide::{Browser, Element, Page};
use log::{debug, info, trace, warn};
use serde::Deserialize;
use tokio::task::JoinHandle;

use super::PageRenderer;
use super::js_scripts::{READY_STATE_SCRIPT, set_attribute_fn};
use crate::browser_setup::{LaunchedBrowser, launch_browser};
use crate::config::MirrorConfig;
use crate::crawl_engine::cleanup::{CleanupResult, cleanup_browser_and_data};
use crate::crawl_engine::page_timeout::with_page_timeout;
use crate::crawl_engine::{CrawlError, CrawlResult};

const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadyState {
    ready_state: String,
    images_loaded: bool,
    body_exists: bool,
}

impl ReadyState {
    fn is_settled(&self) -> bool {
        self.ready_state == "complete" && self.images_loaded && self.body_exists
    }
}

struct Session {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: Page,
    user_data_dir: std::path::PathBuf,
    owns_user_data_dir: bool,
}

/// Drives one Chromium tab for the whole crawl
pub struct ChromiumRenderer {
    session: Option<Session>,
    current_url: String,
    page_load_timeout_secs: u64,
    navigation_timeout_secs: u64,
    script_timeout_secs: u64,
}

impl ChromiumRenderer {
    /// Launch a browser for `config` and open the tab every page is loaded in
    pub async fn launch(config: &MirrorConfig) -> CrawlResult<Self> {
        let LaunchedBrowser {
            mut browser,
            handler_task,
            user_data_dir,
            owns_user_data_dir,
        } = launch_browser(config).await?;

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                if let Err(close_err) = browser.close().await {
                    trace!(target: "sitemirror::renderer", "Browser close after failed launch: {close_err}");
                }
                handler_task.abort();
                return Err(CrawlError::BrowserLaunch(format!("failed to open tab: {e}")));
            }
        };
        info!(target: "sitemirror::renderer", "Browser ready, profile at {}", user_data_dir.display());

        Ok(Self {
            session: Some(Session {
                browser,
                handler_task,
                page,
                user_data_dir,
                owns_user_data_dir,
            }),
            current_url: String::new(),
            page_load_timeout_secs: config.page_load_timeout_secs(),
            navigation_timeout_secs: config.navigation_timeout_secs(),
            script_timeout_secs: config.script_timeout_secs(),
        })
    }

    fn page(&self) -> CrawlResult<&Page> {
        match &self.session {
            Some(session) if !session.handler_task.is_finished() => Ok(&session.page),
            _ => Err(CrawlError::RendererExhausted("browser connection closed".into())),
        }
    }

    /// A failure after the CDP connection died means the browser is gone
    fn classify<T>(&self, result: CrawlResult<T>) -> CrawlResult<T> {
        match result {
            Err(CrawlError::RenderFailure { url, message })
                if self
                    .session
                    .as_ref()
                    .is_none_or(|s| s.handler_task.is_finished()) =>
            {
                Err(CrawlError::RendererExhausted(format!("{url}: {message}")))
            }
            other => other,
        }
    }

    fn render_failure(url: &str, e: impl std::fmt::Display) -> CrawlError {
        CrawlError::RenderFailure {
            url: url.to_string(),
            message: e.to_string(),
        }
    }

    async fn wait_until_ready(page: &Page, url: &str, timeout_secs: u64) {
        let deadline = Instant::now() + Duration::from_secs(timeout_secs);
        loop {
            match page.evaluate(READY_STATE_SCRIPT).await {
                Ok(result) => match result.into_value::<ReadyState>() {
                    Ok(state) if state.is_settled() => return,
                    Ok(state) => trace!(target: "sitemirror::renderer", "Not ready yet: {state:?}"),
                    Err(e) => trace!(target: "sitemirror::renderer", "Unreadable ready state: {e}"),
                },
                Err(e) => trace!(target: "sitemirror::renderer", "Ready-state probe failed: {e}"),
            }
            if Instant::now() >= deadline {
                debug!(
                    target: "sitemirror::renderer",
                    "Document for {url} still loading after {timeout_secs}s, continuing"
                );
                return;
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    }
}

impl PageRenderer for ChromiumRenderer {
    type Element = Element;

    async fn navigate(&mut self, url: &str, cookies: &BTreeMap<String, String>) -> CrawlResult<()> {
        self.current_url = url.to_string();
        let result: CrawlResult<()> = async {
            let page = self.page()?;

            if !cookies.is_empty() {
                let params = cookies
                    .iter()
                    .map(|(name, value)| {
                        CookieParam::builder()
                            .name(name.clone())
                            .value(value.clone())
                            .url(url.to_string())
                            .build()
                            .map_err(|e| Self::render_failure(url, format!("bad cookie {name}: {e}")))
                    })
                    .collect::<CrawlResult<Vec<_>>>()?;
                page.set_cookies(params)
                    .await
                    .map_err(|e| Self::render_failure(url, format!("cookie injection failed: {e}")))?;
            }

            with_page_timeout(
                async { page.goto(url).await.map(|_| ()).map_err(|e| Self::render_failure(url, e)) },
                self.page_load_timeout_secs,
                url,
                "Page navigation",
            )
            .await?;

            with_page_timeout(
                async {
                    page.wait_for_navigation()
                        .await
                        .map(|_| ())
                        .map_err(|e| Self::render_failure(url, e))
                },
                self.navigation_timeout_secs,
                url,
                "Page load",
            )
            .await?;

            Self::wait_until_ready(page, url, self.navigation_timeout_secs).await;
            Ok(())
        }
        .await;
        self.classify(result)
    }

    async fn find_elements(&mut self, tag_name: &str) -> CrawlResult<Vec<Element>> {
        let url = self.current_url.clone();
        let result: CrawlResult<Vec<Element>> = async {
            let page = self.page()?;
            with_page_timeout(
                async {
                    match page.find_elements(tag_name).await {
                        Ok(elements) => Ok(elements),
                        // CDP reports "no node found" as an error for an empty match
                        Err(e) if e.to_string().contains("No node") => Ok(Vec::new()),
                        Err(e) => Err(Self::render_failure(&url, e)),
                    }
                },
                self.script_timeout_secs,
                &url,
                "Element query",
            )
            .await
        }
        .await;
        self.classify(result)
    }

    async fn attribute(&mut self, element: &Element, name: &str) -> CrawlResult<Option<String>> {
        let url = self.current_url.clone();
        let result: CrawlResult<Option<String>> = async {
            self.page()?;
            with_page_timeout(
                async {
                    // The DOM property is the resolved absolute URL for href/src
                    match element.property(name).await {
                        Ok(Some(serde_json::Value::String(value))) => return Ok(Some(value)),
                        Ok(_) => {}
                        Err(e) => trace!(target: "sitemirror::renderer", "Property {name} unreadable: {e}"),
                    }
                    element
                        .attribute(name)
                        .await
                        .map_err(|e| Self::render_failure(&url, e))
                },
                self.script_timeout_secs,
                &url,
                "Attribute read",
            )
            .await
        }
        .await;
        self.classify(result)
    }

    async fn set_attribute(&mut self, element: &Element, name: &str, value: &str) -> CrawlResult<()> {
        let url = self.current_url.clone();
        let result: CrawlResult<()> = async {
            self.page()?;
            with_page_timeout(
                async {
                    element
                        .call_js_fn(set_attribute_fn(name, value), false)
                        .await
                        .map(|_| ())
                        .map_err(|e| Self::render_failure(&url, e))
                },
                self.script_timeout_secs,
                &url,
                "Attribute write",
            )
            .await
        }
        .await;
        self.classify(result)
    }

    async fn serialized_document(&mut self) -> CrawlResult<String> {
        let url = self.current_url.clone();
        let result: CrawlResult<String> = async {
            let page = self.page()?;
            with_page_timeout(
                async { page.content().await.map_err(|e| Self::render_failure(&url, e)) },
                self.script_timeout_secs,
                &url,
                "Document serialization",
            )
            .await
        }
        .await;
        self.classify(result)
    }

    async fn shutdown(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let Session {
            browser,
            handler_task,
            page,
            user_data_dir,
            owns_user_data_dir,
        } = session;

        if let Err(e) = page.close().await {
            trace!(target: "sitemirror::renderer", "Closing tab failed: {e}");
        }
        let profile = owns_user_data_dir.then_some(user_data_dir.as_path());
        match cleanup_browser_and_data(browser, profile).await {
            CleanupResult::Success => info!(target: "sitemirror::renderer", "Browser shut down"),
            CleanupResult::PartialFailure(errors) => {
                warn!(target: "sitemirror::renderer", "Browser shutdown incomplete: {}", errors.join("; "));
            }
        }
        handler_task.abort();
    }
}
