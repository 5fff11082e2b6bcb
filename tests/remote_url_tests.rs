//! Tests for URL identity and local path derivation

use std::path::{Path, PathBuf};

use proptest::prelude::*;
use sitemirror::crawl_engine::CrawlError;
use sitemirror::remote_url::{MirrorLayout, RemoteUrl};

fn layout() -> MirrorLayout {
    MirrorLayout::new(PathBuf::from("/mirror"), "index.html")
}

#[test]
fn test_root_url_maps_to_default_page() {
    let url = layout().parse("http://ex.com/").unwrap();
    assert_eq!(url.local_path(), Path::new("/mirror/ex.com/index.html"));
    assert_eq!(url.url_path(), "http://ex.com/");
}

#[test]
fn test_extensionless_path_gets_html_suffix() {
    let url = layout().parse("http://ex.com/a/b").unwrap();
    assert_eq!(url.local_path(), Path::new("/mirror/ex.com/a/b.html"));
}

#[test]
fn test_existing_extension_is_unchanged() {
    let url = layout().parse("http://ex.com/a/b.pdf").unwrap();
    assert_eq!(url.local_path(), Path::new("/mirror/ex.com/a/b.pdf"));
}

#[test]
fn test_custom_default_page_name() {
    let layout = MirrorLayout::new(PathBuf::from("/mirror"), "default.htm");
    let url = layout.parse("https://ex.com/docs/").unwrap();
    assert_eq!(url.local_path(), Path::new("/mirror/ex.com/docs/default.htm"));
}

#[test]
fn test_query_and_fragment_do_not_change_identity() {
    let plain = layout().parse("http://ex.com/c").unwrap();
    let decorated = layout().parse("http://ex.com/c?q=1#top").unwrap();

    assert_eq!(plain.url_path(), decorated.url_path());
    assert_eq!(plain.local_path(), decorated.local_path());
    assert_eq!(decorated.query(), Some("?q=1"));
    assert_eq!(decorated.fragment(), Some("#top"));
    assert_eq!(plain.query(), None);
    assert_eq!(plain.fragment(), None);
}

#[test]
fn test_port_is_part_of_identity_but_not_of_path() {
    let url = layout().parse("http://ex.com:8080/a/").unwrap();
    assert_eq!(url.url_path(), "http://ex.com:8080/a/");
    assert_eq!(url.local_path(), Path::new("/mirror/ex.com/a/index.html"));
}

#[test]
fn test_percent_encoded_path_is_decoded_on_disk() {
    let url = layout().parse("http://ex.com/docs/hello%20world.txt").unwrap();
    assert_eq!(url.local_path(), Path::new("/mirror/ex.com/docs/hello world.txt"));
}

#[test]
fn test_unusable_values_are_invalid() {
    for raw in ["", "   ", "not a url", "/relative/path", "mailto:someone@ex.com", "javascript:void(0)"] {
        match layout().parse(raw) {
            Err(CrawlError::InvalidUrl(_)) => {}
            other => panic!("expected InvalidUrl for {raw:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_replace_identity_keeps_suffix() {
    let url = layout().parse("http://ex.com/c?q=1#frag").unwrap();
    assert_eq!(url.replace_identity("../c.html").as_deref(), Some("../c.html?q=1#frag"));
}

#[test]
fn test_local_href_from_sibling_directory() {
    let url = layout().parse("http://ex.com/c").unwrap();
    let href = url.local_href_from(Path::new("/mirror/ex.com/a/index.html"));
    assert_eq!(href.as_deref(), Some("../c.html"));
}

#[test]
fn test_cross_host_href_goes_through_root() {
    let url = layout().parse("https://cdn.ex.com/x/y.js").unwrap();
    let href = url.local_href_from(Path::new("/mirror/ex.com/a/index.html"));
    assert_eq!(href.as_deref(), Some("../../cdn.ex.com/x/y.js"));
}

#[test]
fn test_parse_matches_direct_constructor() {
    let via_layout = layout().parse("http://ex.com/a/b").unwrap();
    let direct = RemoteUrl::parse("http://ex.com/a/b", Path::new("/mirror"), "index.html").unwrap();
    assert_eq!(via_layout, direct);
}

proptest! {
    #[test]
    fn prop_local_path_is_deterministic(
        segments in prop::collection::vec("[a-zA-Z0-9_%.-]{1,12}", 0..5),
        trailing_slash in any::<bool>(),
        query in prop::option::of("[a-z]{1,5}=[0-9]{1,3}"),
    ) {
        let mut raw = format!("http://ex.com/{}", segments.join("/"));
        if trailing_slash {
            raw.push('/');
        }
        if let Some(q) = query {
            raw.push('?');
            raw.push_str(&q);
        }

        let first = layout().parse(&raw);
        let second = layout().parse(&raw);
        match (first, second) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(a.local_path(), b.local_path());
                prop_assert_eq!(a.url_path(), b.url_path());
                prop_assert!(a.local_path().starts_with("/mirror/ex.com"));
            }
            (Err(_), Err(_)) => {}
            _ => prop_assert!(false, "parse of {} was not deterministic", raw),
        }
    }
}
