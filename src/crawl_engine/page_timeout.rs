//! Timeout utilities for browser operations
//!
//! Every call into the browser is bounded so a hung page cannot stall the
//! single-threaded crawl loop forever.

use std::future::Future;
use std::time::Duration;

use super::crawl_types::{CrawlError, CrawlResult};

/// Run a browser operation for `url` with an explicit timeout
///
/// A timeout is reported as `CrawlError::RenderFailure` naming the
/// operation; errors from the operation itself pass through unchanged.
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout_secs: u64,
    url: &str,
    operation_name: &str,
) -> CrawlResult<T>
where
    F: Future<Output = CrawlResult<T>>,
{
    match tokio::time::timeout(Duration::from_secs(timeout_secs), operation).await {
        Ok(result) => result,
        Err(_) => Err(CrawlError::RenderFailure {
            url: url.to_string(),
            message: format!("{operation_name} timeout after {timeout_secs} seconds"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn slow_operation_times_out() {
        let result: CrawlResult<()> = with_page_timeout(
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            },
            1,
            "https://ex.com/",
            "Page navigation",
        )
        .await;

        match result {
            Err(CrawlError::RenderFailure { url, message }) => {
                assert_eq!(url, "https://ex.com/");
                assert!(message.contains("Page navigation timeout after 1 seconds"));
            }
            other => panic!("Expected RenderFailure, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn fast_operation_passes_through() {
        let result = with_page_timeout(async { Ok(7) }, 1, "https://ex.com/", "Page load").await;
        assert_eq!(result.ok(), Some(7));
    }
}
