//! staticd - HTTP server for a directory of static build output
//!
//! Every request is resolved against a single configured root directory
//! (for example `dist` or `target/trunk`, populated by an external build
//! step) and answered with file bytes, an index file, a generated directory
//! listing, or an error status.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
