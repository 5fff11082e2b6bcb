//! Shared configuration constants for sitemirror
//!
//! Default values used by the configuration builder and the collaborator
//! implementations, kept in one place to avoid magic numbers.

/// File name used for URLs whose path ends in `/`
pub const DEFAULT_PAGE_NAME: &str = "index.html";

/// Default depth limit: 0 disables the limit
pub const DEFAULT_MAX_DEPTH: u32 = 0;

/// Timeout for `page.goto()` in seconds
pub const DEFAULT_PAGE_LOAD_TIMEOUT_SECS: u64 = 30;

/// Timeout for waiting on the load event after navigation, in seconds
pub const DEFAULT_NAVIGATION_TIMEOUT_SECS: u64 = 30;

/// Timeout for a single DOM query or mutation, in seconds
pub const DEFAULT_SCRIPT_TIMEOUT_SECS: u64 = 10;

/// Timeout for a whole resource download, in seconds
pub const DEFAULT_RESOURCE_TIMEOUT_SECS: u64 = 60;

/// Chrome user agent string sent by the resource fetcher and the browser
///
/// Kept in sync with the managed Chromium so page and resource requests
/// look like they come from the same client.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
