use std::ffi::OsString;
use std::path::{Path, PathBuf};

use futures::StreamExt;
use log::{debug, trace};
use tokio::io::AsyncWriteExt;

use super::FileStore;
use crate::crawl_engine::{CrawlError, CrawlResult};
use crate::resource_fetcher::ByteStream;

/// `FileStore` on the local filesystem
///
/// Content goes to `<path>.part` first and is renamed into place once
/// complete, so an interrupted write never leaves a truncated file behind.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl FsStore {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn part_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().map(OsString::from).unwrap_or_default();
        name.push(".part");
        path.with_file_name(name)
    }

    async fn ensure_parent(path: &Path) -> CrawlResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CrawlError::persist(parent, e))?;
        }
        Ok(())
    }

    async fn discard(part: &Path) {
        if let Err(e) = tokio::fs::remove_file(part).await {
            trace!(target: "sitemirror::store", "No partial file to remove at {}: {e}", part.display());
        }
    }

    async fn drain(part: &Path, mut stream: ByteStream) -> CrawlResult<u64> {
        let mut file = tokio::fs::File::create(part)
            .await
            .map_err(|e| CrawlError::persist(part, e))?;
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .map_err(|e| CrawlError::persist(part, e))?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(|e| CrawlError::persist(part, e))?;
        Ok(written)
    }
}

impl FileStore for FsStore {
    async fn write(&self, path: &Path, bytes: &[u8]) -> CrawlResult<()> {
        Self::ensure_parent(path).await?;
        let part = Self::part_path(path);

        if let Err(e) = tokio::fs::write(&part, bytes).await {
            Self::discard(&part).await;
            return Err(CrawlError::persist(path, e));
        }
        if let Err(e) = tokio::fs::rename(&part, path).await {
            Self::discard(&part).await;
            return Err(CrawlError::persist(path, e));
        }

        debug!(target: "sitemirror::store", "Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    async fn copy_stream(&self, path: &Path, stream: ByteStream) -> CrawlResult<u64> {
        Self::ensure_parent(path).await?;
        let part = Self::part_path(path);

        let written = match Self::drain(&part, stream).await {
            Ok(written) => written,
            Err(e) => {
                Self::discard(&part).await;
                return Err(e);
            }
        };
        if let Err(e) = tokio::fs::rename(&part, path).await {
            Self::discard(&part).await;
            return Err(CrawlError::persist(path, e));
        }

        debug!(target: "sitemirror::store", "Copied {written} bytes to {}", path.display());
        Ok(written)
    }
}
