//! URL and path manipulation utilities.
//!
//! This module provides the pure functions that map remote URLs onto the
//! mirrored directory tree and compute hrefs between mirrored files.

use std::path::{Component, Path, PathBuf};

/// Suffix given to paths whose last segment carries no extension
pub const PAGE_EXTENSION: &str = ".html";

/// Get the mirror path for a URL path, preserving the host and path structure
///
/// 1. A path ending in `/` gets `default_page` appended.
/// 2. A last segment without a `.` gets `.html` appended.
/// 3. The path is percent-decoded; on invalid UTF-8 the raw path is used.
/// 4. The result is `root/host/<decoded path>`.
///
/// `.` and `..` segments left over after decoding are dropped so a mirrored
/// file can never land outside `root/host`.
#[must_use]
pub fn get_mirror_path(host: &str, url_path: &str, root: &Path, default_page: &str) -> PathBuf {
    let mut path = url_path.to_string();
    if path.is_empty() || path.ends_with('/') {
        path.push_str(default_page);
    } else {
        let last_segment = path.rsplit('/').next().unwrap_or_default();
        if !last_segment.contains('.') {
            path.push_str(PAGE_EXTENSION);
        }
    }

    let decoded = match urlencoding::decode(&path) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => path,
    };

    let mut mirror_path = root.join(host);
    for segment in decoded.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            continue;
        }
        mirror_path.push(segment);
    }
    mirror_path
}

/// Relative href from the directory containing `from_file` to `to_file`
///
/// Always uses forward slashes so the result can be written straight into
/// an `href`/`src` attribute. Returns `None` when no relative path exists
/// (for example one path is relative and the other absolute).
#[must_use]
pub fn relative_href(from_file: &Path, to_file: &Path) -> Option<String> {
    let from_dir = from_file.parent()?;
    let relative = pathdiff::diff_paths(to_file, from_dir)?;

    let parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// Resolve the configured output directory into the mirror root
///
/// Surrounding whitespace is trimmed, the path is made absolute against the
/// current directory, and trailing separators are dropped.
pub fn normalize_root(dir: &Path) -> std::io::Result<PathBuf> {
    let trimmed = dir.to_string_lossy();
    let trimmed = trimmed.trim();
    if trimmed.is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "output directory is empty",
        ));
    }
    let absolute = std::path::absolute(trimmed)?;
    // Re-collecting the components removes trailing separators and `.` parts
    Ok(absolute.components().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_gets_default_page() {
        let path = get_mirror_path("ex.com", "/", Path::new("/root"), "index.html");
        assert_eq!(path, PathBuf::from("/root/ex.com/index.html"));
    }

    #[test]
    fn extensionless_segment_gets_html() {
        let path = get_mirror_path("ex.com", "/a/b", Path::new("/root"), "index.html");
        assert_eq!(path, PathBuf::from("/root/ex.com/a/b.html"));
    }

    #[test]
    fn extension_is_kept() {
        let path = get_mirror_path("ex.com", "/a/b.pdf", Path::new("/root"), "index.html");
        assert_eq!(path, PathBuf::from("/root/ex.com/a/b.pdf"));
    }

    #[test]
    fn dotted_directory_does_not_count_as_extension() {
        let path = get_mirror_path("ex.com", "/v1.2/guide", Path::new("/root"), "index.html");
        assert_eq!(path, PathBuf::from("/root/ex.com/v1.2/guide.html"));
    }

    #[test]
    fn percent_encoding_is_decoded() {
        let path = get_mirror_path("ex.com", "/my%20docs/", Path::new("/root"), "index.html");
        assert_eq!(path, PathBuf::from("/root/ex.com/my docs/index.html"));
    }

    #[test]
    fn invalid_utf8_escape_keeps_raw_path() {
        let path = get_mirror_path("ex.com", "/bad%FF.txt", Path::new("/root"), "index.html");
        assert_eq!(path, PathBuf::from("/root/ex.com/bad%FF.txt"));
    }

    #[test]
    fn encoded_parent_segments_cannot_escape_host_dir() {
        let path = get_mirror_path("ex.com", "/%2e%2e/%2e%2e/etc/passwd", Path::new("/root"), "index.html");
        assert_eq!(path, PathBuf::from("/root/ex.com/etc/passwd.html"));
    }

    #[test]
    fn relative_href_walks_up() {
        let href = relative_href(
            Path::new("/root/ex.com/a/index.html"),
            Path::new("/root/ex.com/c.html"),
        );
        assert_eq!(href.as_deref(), Some("../c.html"));
    }

    #[test]
    fn relative_href_same_dir_and_across_hosts() {
        assert_eq!(
            relative_href(Path::new("/r/ex.com/a.html"), Path::new("/r/ex.com/b.html")).as_deref(),
            Some("b.html")
        );
        assert_eq!(
            relative_href(Path::new("/r/ex.com/a.html"), Path::new("/r/cdn.ex.com/x/y.js"))
                .as_deref(),
            Some("../cdn.ex.com/x/y.js")
        );
    }

    #[test]
    fn normalize_root_strips_trailing_separator() {
        let root = normalize_root(Path::new("/tmp/mirror/")).unwrap_or_default();
        assert_eq!(root, PathBuf::from("/tmp/mirror"));
        assert!(normalize_root(Path::new("   ")).is_err());
    }
}
