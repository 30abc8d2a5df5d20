//! Filesystem side of the server: confining request targets to the content
//! root and rendering directory listings.

pub mod listing;
pub mod resolver;

pub use resolver::{Rejected, normalize_target, resolve, resolve_target};
