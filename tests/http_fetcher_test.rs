//! Tests for the reqwest-backed resource fetcher against a local mock server

use futures::StreamExt;
use sitemirror::config::MirrorConfig;
use sitemirror::crawl_engine::CrawlError;
use sitemirror::resource_fetcher::{HttpFetcher, ResourceFetcher};

fn config(start: &str) -> MirrorConfig {
    MirrorConfig::builder()
        .output_dir("/tmp/mirror")
        .start_url(start)
        .cookie("session", "abc")
        .resource_timeout_secs(5)
        .build()
        .unwrap()
}

async fn collect(fetcher: &HttpFetcher, url: &str) -> Result<Vec<u8>, CrawlError> {
    let mut stream = fetcher.fetch(url).await?;
    let mut body = Vec::new();
    while let Some(chunk) = stream.next().await {
        body.extend_from_slice(&chunk?);
    }
    Ok(body)
}

#[tokio::test]
async fn test_fetch_streams_body_with_cookie_and_user_agent() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/static/app.js")
        .match_header("cookie", "session=abc")
        .match_header("user-agent", mockito::Matcher::Regex("Chrome/".into()))
        .with_status(200)
        .with_header("content-type", "application/javascript")
        .with_body("console.log('mirrored');")
        .create_async()
        .await;

    let fetcher = HttpFetcher::new(&config(&server.url())).unwrap();
    let body = collect(&fetcher, &format!("{}/static/app.js", server.url())).await.unwrap();

    assert_eq!(body, b"console.log('mirrored');");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_success_status_is_fetch_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/gone.png")
        .with_status(404)
        .create_async()
        .await;

    let fetcher = HttpFetcher::new(&config(&server.url())).unwrap();
    let url = format!("{}/gone.png", server.url());

    match fetcher.fetch(&url).await {
        Err(CrawlError::ResourceFetchFailure { url: failed, message }) => {
            assert_eq!(failed, url);
            assert!(message.contains("404"), "{message}");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("404 should not produce a stream"),
    }
}

#[tokio::test]
async fn test_unreachable_host_is_fetch_failure() {
    let fetcher = HttpFetcher::new(&config("http://127.0.0.1:9/")).unwrap();
    let result = fetcher.fetch("http://127.0.0.1:9/never.css").await;
    assert!(matches!(result, Err(CrawlError::ResourceFetchFailure { .. })));
}
