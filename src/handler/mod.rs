//! Request handler module
//!
//! Request dispatch and the static file pipeline: path resolution under the
//! configured root, index files, directory listings, conditional and range
//! responses.

pub mod listing;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::{handle_request, RequestContext};
