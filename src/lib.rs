//! Frost - rate-limited static file server
//!
//! Serves a directory tree over a small HTTP/1.1 subset, one task per
//! connection, with per-client throttling and per-path hit counts.

pub mod config;
pub mod content;
pub mod hits;
pub mod http;
pub mod rate_limit;
pub mod server;
