//! HTTP Range request parsing module
//!
//! Single-range `bytes` parsing per RFC 7233. Multi-range requests are
//! ignored and answered with the full representation.

/// A byte range resolved against a concrete file size, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    /// Number of bytes covered by this range (never zero by construction)
    #[inline]
    pub const fn byte_count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Outcome of evaluating a request's Range header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// A single satisfiable range; respond with 206
    Satisfiable(ByteRange),
    /// Syntactically valid but outside the file; respond with 416
    Unsatisfiable,
    /// No Range header, non-bytes unit, multi-range, or malformed; serve full body
    Ignored,
}

/// Evaluate a Range header value against a file of `len` bytes
///
/// Supported forms:
/// - `bytes=start-end`
/// - `bytes=start-`
/// - `bytes=-suffix` (last `suffix` bytes)
///
/// # Examples
/// ```
/// use staticd::http::range::{evaluate_range, ByteRange, RangeOutcome};
///
/// assert_eq!(
///     evaluate_range(Some("bytes=0-4"), 10),
///     RangeOutcome::Satisfiable(ByteRange { start: 0, end: 4 })
/// );
/// assert_eq!(evaluate_range(None, 10), RangeOutcome::Ignored);
/// ```
pub fn evaluate_range(header: Option<&str>, len: usize) -> RangeOutcome {
    let Some(spec) = header.and_then(|h| h.strip_prefix("bytes=")) else {
        return RangeOutcome::Ignored;
    };

    // Single range only
    if spec.contains(',') {
        return RangeOutcome::Ignored;
    }

    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeOutcome::Ignored;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    // An empty file satisfies no byte range
    if len == 0 {
        return RangeOutcome::Unsatisfiable;
    }

    if start_str.is_empty() {
        return evaluate_suffix(end_str, len);
    }

    let Ok(start) = start_str.parse::<usize>() else {
        return RangeOutcome::Ignored;
    };
    if start >= len {
        return RangeOutcome::Unsatisfiable;
    }

    let end = if end_str.is_empty() {
        len - 1
    } else {
        let Ok(end) = end_str.parse::<usize>() else {
            return RangeOutcome::Ignored;
        };
        if end < start {
            return RangeOutcome::Unsatisfiable;
        }
        // Ends past EOF are clamped, not rejected
        end.min(len - 1)
    };

    RangeOutcome::Satisfiable(ByteRange { start, end })
}

/// Evaluate a suffix range (`bytes=-suffix`)
fn evaluate_suffix(suffix_str: &str, len: usize) -> RangeOutcome {
    let Ok(suffix) = suffix_str.parse::<usize>() else {
        return RangeOutcome::Ignored;
    };
    if suffix == 0 {
        return RangeOutcome::Unsatisfiable;
    }
    RangeOutcome::Satisfiable(ByteRange {
        start: len.saturating_sub(suffix),
        end: len - 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_header() {
        assert_eq!(evaluate_range(None, 100), RangeOutcome::Ignored);
    }

    #[test]
    fn test_fixed_range() {
        assert_eq!(
            evaluate_range(Some("bytes=0-4"), 10),
            RangeOutcome::Satisfiable(ByteRange { start: 0, end: 4 })
        );
        match evaluate_range(Some("bytes=0-4"), 10) {
            RangeOutcome::Satisfiable(r) => assert_eq!(r.byte_count(), 5),
            other => panic!("expected Satisfiable, got {other:?}"),
        }
    }

    #[test]
    fn test_open_range() {
        assert_eq!(
            evaluate_range(Some("bytes=50-"), 100),
            RangeOutcome::Satisfiable(ByteRange { start: 50, end: 99 })
        );
    }

    #[test]
    fn test_suffix_range() {
        assert_eq!(
            evaluate_range(Some("bytes=-20"), 100),
            RangeOutcome::Satisfiable(ByteRange { start: 80, end: 99 })
        );
        // Suffix longer than the file covers the whole file
        assert_eq!(
            evaluate_range(Some("bytes=-500"), 100),
            RangeOutcome::Satisfiable(ByteRange { start: 0, end: 99 })
        );
    }

    #[test]
    fn test_end_clamped_to_file_size() {
        assert_eq!(
            evaluate_range(Some("bytes=90-200"), 100),
            RangeOutcome::Satisfiable(ByteRange { start: 90, end: 99 })
        );
    }

    #[test]
    fn test_unsatisfiable() {
        assert_eq!(
            evaluate_range(Some("bytes=200-"), 100),
            RangeOutcome::Unsatisfiable
        );
        assert_eq!(
            evaluate_range(Some("bytes=9-3"), 100),
            RangeOutcome::Unsatisfiable
        );
        assert_eq!(
            evaluate_range(Some("bytes=-0"), 100),
            RangeOutcome::Unsatisfiable
        );
        assert_eq!(evaluate_range(Some("bytes=0-"), 0), RangeOutcome::Unsatisfiable);
    }

    #[test]
    fn test_ignored_forms() {
        assert_eq!(evaluate_range(Some("bytes=a-b"), 100), RangeOutcome::Ignored);
        assert_eq!(
            evaluate_range(Some("bytes=0-9,20-29"), 100),
            RangeOutcome::Ignored
        );
        assert_eq!(evaluate_range(Some("items=0-9"), 100), RangeOutcome::Ignored);
        assert_eq!(evaluate_range(Some("bytes=10"), 100), RangeOutcome::Ignored);
    }
}
