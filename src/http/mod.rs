//! HTTP protocol layer module
//!
//! Protocol-level helpers (MIME typing, range parsing, cache validators,
//! response builders) decoupled from filesystem resolution.

pub mod cond;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use range::{evaluate_range, ByteRange, RangeOutcome};
pub use response::{
    build_304_response, build_404_response, build_405_response, build_416_response,
    build_500_response, build_html_response,
};
