pub mod browser_setup;
pub mod config;
pub mod content_saver;
pub mod crawl_engine;
pub mod page_renderer;
pub mod remote_url;
pub mod resource_fetcher;
pub mod utils;

pub use browser_setup::{LaunchedBrowser, download_managed_browser, find_browser_executable, launch_browser};
pub use config::{LinkKind, MirrorConfig, TagRule};
pub use content_saver::{FileStore, FsStore};
pub use crawl_engine::{
    CrawlError, CrawlItem, CrawlResult, CrawlSummary, EnqueueOutcome, Frontier, Mirror,
    NoOpProgress, ProgressReporter, ScopePolicy, StopHandle, mirror, mirror_with_progress,
};
pub use page_renderer::{ChromiumRenderer, PageRenderer};
pub use remote_url::{MirrorLayout, RemoteUrl};
pub use resource_fetcher::{ByteStream, HttpFetcher, ResourceFetcher};
pub use utils::{get_mirror_path, relative_href};
