//! Static file serving module
//!
//! Maps request paths onto the configured root directory and builds the
//! response: file bytes, an index file, a directory listing, or an error
//! status. Every resolved path is checked against the canonical root so
//! `../` sequences can never escape it.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::percent_decode_str;
use tokio::fs;

use crate::config::StaticConfig;
use crate::handler::listing::{self, ListingEntry};
use crate::handler::router::RequestContext;
use crate::http::{self, cond, mime, RangeOutcome};
use crate::logger;

/// Result of resolving a request path against the root directory
#[derive(Debug)]
enum Resolved {
    /// A regular file (possibly an index file substituted for a directory)
    File(PathBuf),
    /// A directory with no index file
    Directory(PathBuf),
}

/// Resolution failure, already folded for information hiding
#[derive(Debug)]
enum ResolveError {
    /// Missing path, traversal attempt, or permission failure: all 404
    NotFound,
    /// Unexpected filesystem failure: 500
    Io(io::Error),
}

/// Serve a request from the configured static root
pub async fn serve(ctx: &RequestContext<'_>, cfg: &StaticConfig) -> Response<Full<Bytes>> {
    let Some(rel) = strip_url_prefix(ctx.path, &cfg.url_prefix) else {
        return http::build_404_response();
    };
    let Some(rel) = decode_path(rel) else {
        return http::build_404_response();
    };

    match resolve(cfg, &rel).await {
        Ok(Resolved::File(path)) => serve_resolved_file(ctx, &path).await,
        Ok(Resolved::Directory(dir)) => {
            if cfg.show_index {
                serve_listing(ctx, &dir).await
            } else {
                http::build_404_response()
            }
        }
        Err(ResolveError::NotFound) => http::build_404_response(),
        Err(ResolveError::Io(e)) => {
            logger::log_error(&format!("Failed to resolve '{}': {e}", ctx.path));
            http::build_500_response()
        }
    }
}

/// Strip the configured URL prefix from a request path
///
/// Returns None when the path lies outside the prefix. With an empty prefix
/// the path passes through unchanged.
pub fn strip_url_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        return Some(path);
    }
    let rest = path.strip_prefix('/')?.strip_prefix(prefix)?;
    match rest {
        "" => Some("/"),
        r if r.starts_with('/') => Some(r),
        // "/distx" must not match prefix "dist"
        _ => None,
    }
}

/// Percent-decode a request path
///
/// Rejects sequences that do not decode to UTF-8 and embedded NUL bytes.
fn decode_path(path: &str) -> Option<String> {
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    if decoded.contains('\0') {
        return None;
    }
    Some(decoded.into_owned())
}

/// Resolve a decoded relative path to a file or directory under the root
///
/// Both the root and the candidate are canonicalized; a candidate that does
/// not start with the canonical root is a traversal attempt and reported as
/// `NotFound`, never with detail.
async fn resolve(cfg: &StaticConfig, rel: &str) -> Result<Resolved, ResolveError> {
    let root = match fs::canonicalize(&cfg.root_dir).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static root directory not found or inaccessible '{}': {e}",
                cfg.root_dir
            ));
            return Err(ResolveError::NotFound);
        }
    };

    let candidate = root.join(rel.trim_start_matches('/'));
    let candidate = fs::canonicalize(&candidate).await.map_err(classify_io)?;

    if !candidate.starts_with(&root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {rel} -> {}",
            candidate.display()
        ));
        return Err(ResolveError::NotFound);
    }

    let meta = fs::metadata(&candidate).await.map_err(classify_io)?;
    if meta.is_dir() {
        for index in &cfg.index_files {
            let index_path = candidate.join(index);
            if fs::metadata(&index_path)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false)
            {
                return Ok(Resolved::File(index_path));
            }
        }
        return Ok(Resolved::Directory(candidate));
    }
    Ok(Resolved::File(candidate))
}

/// Fold filesystem errors into the response taxonomy
///
/// Permission failures deliberately map to `NotFound` so probing requests
/// cannot distinguish a protected path from a missing one.
fn classify_io(e: io::Error) -> ResolveError {
    match e.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied | io::ErrorKind::NotADirectory => {
            ResolveError::NotFound
        }
        _ => ResolveError::Io(e),
    }
}

/// Read a resolved file and build the response, honoring conditional and
/// range headers
async fn serve_resolved_file(ctx: &RequestContext<'_>, path: &Path) -> Response<Full<Bytes>> {
    let content = match fs::read(path).await {
        Ok(c) => c,
        Err(e) => {
            return match classify_io(e) {
                ResolveError::NotFound => http::build_404_response(),
                ResolveError::Io(e) => {
                    logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
                    http::build_500_response()
                }
            }
        }
    };
    let mtime = fs::metadata(path).await.ok().and_then(|m| m.modified().ok());
    let content_type = mime::content_type_for(path.extension().and_then(|e| e.to_str()));

    build_file_response(ctx, content, content_type, mtime)
}

/// Build the final file response: 304, 206, 416, or 200
fn build_file_response(
    ctx: &RequestContext<'_>,
    content: Vec<u8>,
    content_type: &str,
    mtime: Option<SystemTime>,
) -> Response<Full<Bytes>> {
    let etag = cond::content_etag(&content);
    let total_size = content.len();

    if cond::if_none_match(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }
    // If-Modified-Since only applies when no If-None-Match was sent (RFC 7232)
    if ctx.if_none_match.is_none() {
        if let Some(mtime) = mtime {
            if cond::unmodified_since(ctx.if_modified_since.as_deref(), mtime) {
                return http::build_304_response(&etag);
            }
        }
    }

    match http::evaluate_range(ctx.range_header.as_deref(), total_size) {
        RangeOutcome::Satisfiable(range) => http::response::build_partial_response(
            Bytes::from(content[range.start..=range.end].to_vec()),
            content_type,
            &etag,
            range,
            total_size,
            ctx.is_head,
        ),
        RangeOutcome::Unsatisfiable => http::build_416_response(total_size),
        RangeOutcome::Ignored => http::response::build_file_response(
            Bytes::from(content),
            content_type,
            &etag,
            mtime.map(cond::http_date).as_deref(),
            ctx.is_head,
        ),
    }
}

/// Serve a generated directory listing
async fn serve_listing(ctx: &RequestContext<'_>, dir: &Path) -> Response<Full<Bytes>> {
    match collect_entries(dir).await {
        Ok(entries) => {
            http::build_html_response(listing::render_listing(ctx.path, &entries), ctx.is_head)
        }
        Err(e) => match classify_io(e) {
            ResolveError::NotFound => http::build_404_response(),
            ResolveError::Io(e) => {
                logger::log_error(&format!("Failed to list directory '{}': {e}", dir.display()));
                http::build_500_response()
            }
        },
    }
}

/// Collect the direct children of a directory, sorted by name
async fn collect_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut read_dir = fs::read_dir(dir).await?;
    let mut entries = Vec::new();
    while let Some(entry) = read_dir.next_entry().await? {
        let meta = entry.metadata().await?;
        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: meta.is_dir(),
            size: meta.len(),
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_empty_prefix_is_noop() {
        assert_eq!(strip_url_prefix("/a/b.css", ""), Some("/a/b.css"));
        assert_eq!(strip_url_prefix("/", "/"), Some("/"));
    }

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_url_prefix("/app/a.js", "app"), Some("/a.js"));
        assert_eq!(strip_url_prefix("/app/a.js", "/app/"), Some("/a.js"));
        assert_eq!(strip_url_prefix("/app", "app"), Some("/"));
    }

    #[test]
    fn test_paths_outside_prefix_are_rejected() {
        assert_eq!(strip_url_prefix("/other/a.js", "app"), None);
        // Prefix must match a whole segment
        assert_eq!(strip_url_prefix("/appx/a.js", "app"), None);
    }

    #[test]
    fn test_decode_path() {
        assert_eq!(decode_path("/a%20b.txt"), Some("/a b.txt".to_string()));
        assert_eq!(decode_path("/plain.txt"), Some("/plain.txt".to_string()));
        // Embedded NUL is rejected
        assert_eq!(decode_path("/a%00b"), None);
        // Invalid UTF-8 after decoding is rejected
        assert_eq!(decode_path("/%ff%fe"), None);
    }
}
