//! Persisting mirrored pages and resources
//!
//! Paths handed to a store are always absolute and inside the output root;
//! the store creates missing parent directories itself.

mod fs_store;

use std::path::Path;

use crate::crawl_engine::CrawlResult;
use crate::resource_fetcher::ByteStream;

pub use fs_store::FsStore;

/// Destination for mirrored content
#[allow(async_fn_in_trait)]
pub trait FileStore {
    /// Write `bytes` to `path`, replacing any existing file
    async fn write(&self, path: &Path, bytes: &[u8]) -> CrawlResult<()>;

    /// Drain `stream` into `path`, returning the number of bytes written
    ///
    /// On any failure no file is left at `path`. Stream errors are returned
    /// unchanged; filesystem errors are `CrawlError::PersistFailure`.
    async fn copy_stream(&self, path: &Path, stream: ByteStream) -> CrawlResult<u64>;
}
