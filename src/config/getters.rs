//! Getter methods for `MirrorConfig`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::types::{LinkKind, MirrorConfig, TagRule};

impl MirrorConfig {
    #[must_use]
    pub fn start_urls(&self) -> &[String] {
        &self.start_urls
    }

    #[must_use]
    pub fn allowed_prefixes(&self) -> &[String] {
        &self.allowed_prefixes
    }

    #[must_use]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub fn default_page_name(&self) -> &str {
        &self.default_page_name
    }

    #[must_use]
    pub fn convert_links(&self) -> bool {
        self.convert_links
    }

    #[must_use]
    pub fn stop_on_failure(&self) -> bool {
        self.stop_on_failure
    }

    #[must_use]
    pub fn cookies(&self) -> &BTreeMap<String, String> {
        &self.cookies
    }

    #[must_use]
    pub fn tag_rules(&self) -> &[TagRule] {
        &self.tag_rules
    }

    /// Rules of one kind, in configured order
    pub fn rules_of_kind(&self, kind: LinkKind) -> impl Iterator<Item = &TagRule> {
        self.tag_rules.iter().filter(move |rule| rule.kind == kind)
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn chrome_executable(&self) -> Option<&PathBuf> {
        self.chrome_executable.as_ref()
    }

    #[must_use]
    pub fn chrome_data_dir(&self) -> Option<&PathBuf> {
        self.chrome_data_dir.as_ref()
    }

    #[must_use]
    pub fn page_load_timeout_secs(&self) -> u64 {
        self.page_load_timeout_secs
    }

    #[must_use]
    pub fn navigation_timeout_secs(&self) -> u64 {
        self.navigation_timeout_secs
    }

    #[must_use]
    pub fn script_timeout_secs(&self) -> u64 {
        self.script_timeout_secs
    }

    #[must_use]
    pub fn resource_timeout_secs(&self) -> u64 {
        self.resource_timeout_secs
    }
}
