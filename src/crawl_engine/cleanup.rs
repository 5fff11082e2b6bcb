//! Browser and resource cleanup functionality
//!
//! This module handles tearing the browser down once the crawl is done.

use chromiumoxide::Browser;
use log::{debug, warn};
use std::path::Path;

/// Result of cleanup operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupResult {
    /// All cleanup operations succeeded
    Success,
    /// Some cleanup operations failed, with error details
    PartialFailure(Vec<String>),
}

/// Close the browser, wait for its process, and remove its profile directory
/// when one is given
pub async fn cleanup_browser_and_data(mut browser: Browser, chrome_data_dir: Option<&Path>) -> CleanupResult {
    let mut errors = Vec::new();

    debug!(target: "sitemirror::cleanup", "Closing browser");
    if let Err(e) = browser.close().await {
        warn!(target: "sitemirror::cleanup", "Failed to close browser: {e}");
        errors.push(format!("Browser close failed: {e}"));
    }

    // Wait for browser process to fully exit before touching its profile
    if let Err(e) = browser.wait().await {
        warn!(target: "sitemirror::cleanup", "Failed to wait for browser exit: {e}");
        errors.push(format!("Browser wait failed: {e}"));
    } else {
        debug!(target: "sitemirror::cleanup", "Browser process exited");
    }

    if let Some(dir) = chrome_data_dir {
        errors.extend(remove_profile_dir(dir).await);
    }

    if errors.is_empty() {
        CleanupResult::Success
    } else {
        CleanupResult::PartialFailure(errors)
    }
}

/// Remove a browser profile directory; a missing directory is not an error
pub async fn remove_profile_dir(chrome_data_dir: &Path) -> Option<String> {
    match tokio::fs::remove_dir_all(chrome_data_dir).await {
        Ok(()) => {
            debug!(target: "sitemirror::cleanup", "Removed {}", chrome_data_dir.display());
            None
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!(target: "sitemirror::cleanup", "Failed to clean up Chrome data directory: {e}");
            Some(format!("Directory cleanup failed: {e}"))
        }
    }
}
