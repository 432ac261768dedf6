//! Conditional request module
//!
//! `ETag` generation plus `If-None-Match` / `If-Modified-Since` evaluation,
//! so unchanged content is answered with 304 instead of a retransmit.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::SystemTime;

use chrono::{DateTime, Utc};

/// Generate a quoted `ETag` from file content using fast hashing
pub fn content_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    content.len().hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Check if the client's `If-None-Match` header matches the server's `ETag`
///
/// Handles a single `ETag`, a comma-separated list, and the `*` wildcard.
/// Returns true when the stored response is still valid (send 304).
pub fn if_none_match(header: Option<&str>, etag: &str) -> bool {
    header.is_some_and(|client| client.split(',').any(|e| e.trim() == etag || e.trim() == "*"))
}

/// Format a filesystem modification time as an IMF-fixdate `Last-Modified` value
pub fn http_date(mtime: SystemTime) -> String {
    DateTime::<Utc>::from(mtime)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Check if the file is unmodified since the client's `If-Modified-Since` date
///
/// HTTP dates have second precision, so both sides are compared at whole
/// seconds. An unparseable header is ignored (serve the full response).
pub fn unmodified_since(header: Option<&str>, mtime: SystemTime) -> bool {
    let Some(since) = header.and_then(|h| DateTime::parse_from_rfc2822(h).ok()) else {
        return false;
    };
    DateTime::<Utc>::from(mtime).timestamp() <= since.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_etag_shape_and_consistency() {
        let etag = content_etag(b"hello world");
        assert!(etag.starts_with('"') && etag.ends_with('"'));
        assert_eq!(etag, content_etag(b"hello world"));
        assert_ne!(etag, content_etag(b"hello worlds"));
    }

    #[test]
    fn test_if_none_match() {
        let etag = "\"abc123\"";
        assert!(if_none_match(Some("\"abc123\""), etag));
        assert!(if_none_match(Some("\"xyz\", \"abc123\""), etag));
        assert!(if_none_match(Some("*"), etag));
        assert!(!if_none_match(Some("\"different\""), etag));
        assert!(!if_none_match(None, etag));
    }

    #[test]
    fn test_http_date_format() {
        let epoch = SystemTime::UNIX_EPOCH;
        assert_eq!(http_date(epoch), "Thu, 01 Jan 1970 00:00:00 GMT");
    }

    #[test]
    fn test_unmodified_since() {
        let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        let stamp = http_date(mtime);

        // The formatted mtime itself counts as unmodified
        assert!(unmodified_since(Some(&stamp), mtime));
        // A later client date also counts
        let later = http_date(mtime + Duration::from_secs(3600));
        assert!(unmodified_since(Some(&later), mtime));
        // An earlier client date means the file changed since
        let earlier = http_date(mtime - Duration::from_secs(3600));
        assert!(!unmodified_since(Some(&earlier), mtime));
        // Garbage and absence are ignored
        assert!(!unmodified_since(Some("not a date"), mtime));
        assert!(!unmodified_since(None, mtime));
    }
}
