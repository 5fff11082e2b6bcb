//! Loading and validation for `MirrorConfig`

use std::path::Path;

use super::types::MirrorConfig;
use crate::crawl_engine::{CrawlError, CrawlResult, ScopePolicy};
use crate::remote_url::MirrorLayout;
use crate::utils::normalize_root;

impl MirrorConfig {
    /// Read a JSON config file; missing keys take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> CrawlResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CrawlError::Config(format!("cannot read {}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| CrawlError::Config(format!("invalid config {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot start a crawl
    ///
    /// An empty prefix list is allowed: the crawl visits nothing, which the
    /// orchestrator reports with a warning.
    pub fn validate(&self) -> CrawlResult<()> {
        if self.start_urls.is_empty() {
            return Err(CrawlError::Config("at least one start URL is required".into()));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(CrawlError::Config("output directory must not be empty".into()));
        }

        let name = self.default_page_name.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\\') {
            return Err(CrawlError::Config(format!(
                "default page name must be a plain file name, got {name:?}"
            )));
        }

        if self.tag_rules.is_empty() {
            return Err(CrawlError::Config("at least one tag rule is required".into()));
        }
        for rule in &self.tag_rules {
            if rule.tag.trim().is_empty() || rule.attribute.trim().is_empty() {
                return Err(CrawlError::Config(format!(
                    "tag rule needs both a tag and an attribute: {rule:?}"
                )));
            }
        }

        let timeouts = [
            ("page_load_timeout_secs", self.page_load_timeout_secs),
            ("navigation_timeout_secs", self.navigation_timeout_secs),
            ("script_timeout_secs", self.script_timeout_secs),
            ("resource_timeout_secs", self.resource_timeout_secs),
        ];
        if let Some((field, _)) = timeouts.iter().find(|(_, secs)| *secs == 0) {
            return Err(CrawlError::Config(format!("{field} must be greater than zero")));
        }

        Ok(())
    }

    /// Resolve the output directory and build the layout used for every URL
    pub fn mirror_layout(&self) -> CrawlResult<MirrorLayout> {
        let root = normalize_root(&self.output_dir).map_err(|e| {
            CrawlError::Config(format!(
                "invalid output directory {}: {e}",
                self.output_dir.display()
            ))
        })?;
        Ok(MirrorLayout::new(root, self.default_page_name.clone()))
    }

    #[must_use]
    pub fn scope_policy(&self) -> ScopePolicy {
        ScopePolicy::new(self.allowed_prefixes.clone(), self.max_depth)
    }

    /// Apply command-line overrides on top of a loaded file
    pub fn with_overrides(
        mut self,
        output_dir: Option<std::path::PathBuf>,
        max_depth: Option<u32>,
        headed: bool,
        no_convert_links: bool,
    ) -> CrawlResult<Self> {
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        if let Some(depth) = max_depth {
            self.max_depth = depth;
        }
        if headed {
            self.headless = false;
        }
        if no_convert_links {
            self.convert_links = false;
        }
        self.validate()?;
        Ok(self)
    }
}
