//! Type-safe builder for `MirrorConfig` using the typestate pattern
//!
//! `output_dir` and at least one `start_url` must be provided before
//! `build()` becomes available; everything else has a default.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::PathBuf;

use super::types::{MirrorConfig, TagRule};
use crate::crawl_engine::CrawlResult;

// Type states for the builder
pub struct WithOutputDir;
pub struct Complete;

pub struct MirrorConfigBuilder<State = ()> {
    config: MirrorConfig,
    _phantom: PhantomData<State>,
}

impl Default for MirrorConfigBuilder<()> {
    fn default() -> Self {
        Self {
            config: MirrorConfig::default(),
            _phantom: PhantomData,
        }
    }
}

impl MirrorConfig {
    /// Create a builder for configuring a `MirrorConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> MirrorConfigBuilder<()> {
        MirrorConfigBuilder::default()
    }
}

impl<State> MirrorConfigBuilder<State> {
    fn transition<Next>(self) -> MirrorConfigBuilder<Next> {
        MirrorConfigBuilder {
            config: self.config,
            _phantom: PhantomData,
        }
    }

    /// Add a URL prefix that is allowed to be crawled
    #[must_use]
    pub fn allow_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.allowed_prefixes.push(prefix.into());
        self
    }

    /// Replace the allowed prefixes
    #[must_use]
    pub fn allowed_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.allowed_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Depth limit; 0 disables it
    #[must_use]
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.config.max_depth = depth;
        self
    }

    #[must_use]
    pub fn default_page_name(mut self, name: impl Into<String>) -> Self {
        self.config.default_page_name = name.into();
        self
    }

    #[must_use]
    pub fn convert_links(mut self, enabled: bool) -> Self {
        self.config.convert_links = enabled;
        self
    }

    #[must_use]
    pub fn stop_on_failure(mut self, enabled: bool) -> Self {
        self.config.stop_on_failure = enabled;
        self
    }

    #[must_use]
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.cookies.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn cookies(mut self, cookies: BTreeMap<String, String>) -> Self {
        self.config.cookies = cookies;
        self
    }

    /// Replace the tag classification; order is preserved
    #[must_use]
    pub fn tag_rules(mut self, rules: Vec<TagRule>) -> Self {
        self.config.tag_rules = rules;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    #[must_use]
    pub fn chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.chrome_executable = Some(path.into());
        self
    }

    #[must_use]
    pub fn chrome_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.chrome_data_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn page_load_timeout_secs(mut self, secs: u64) -> Self {
        self.config.page_load_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn navigation_timeout_secs(mut self, secs: u64) -> Self {
        self.config.navigation_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn script_timeout_secs(mut self, secs: u64) -> Self {
        self.config.script_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn resource_timeout_secs(mut self, secs: u64) -> Self {
        self.config.resource_timeout_secs = secs;
        self
    }
}

impl MirrorConfigBuilder<()> {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> MirrorConfigBuilder<WithOutputDir> {
        self.config.output_dir = dir.into();
        self.transition()
    }
}

impl MirrorConfigBuilder<WithOutputDir> {
    pub fn start_url(mut self, url: impl Into<String>) -> MirrorConfigBuilder<Complete> {
        self.config.start_urls.push(url.into());
        self.transition()
    }
}

impl MirrorConfigBuilder<Complete> {
    /// Add another seed URL
    #[must_use]
    pub fn start_url(mut self, url: impl Into<String>) -> Self {
        self.config.start_urls.push(url.into());
        self
    }

    // Build method only available when all required fields are set
    pub fn build(self) -> CrawlResult<MirrorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
