//! Maps request targets onto files below the content root.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

/// Why a target did not resolve to a path under the root.
///
/// Both variants are answered with the same 404.
#[derive(Debug, PartialEq, Eq)]
pub enum Rejected {
    /// Nothing exists at the joined path.
    NotFound,
    /// The canonical path lies outside the root.
    Traversal,
}

/// Forces a relative or empty target to `/` and percent-decodes it.
///
/// The result is also the hit counter key for the request.
pub fn normalize_target(raw: &str) -> String {
    let target = if raw.starts_with('/') { raw } else { "/" };
    percent_decode_str(target).decode_utf8_lossy().into_owned()
}

/// Resolves an already decoded target against `root`.
///
/// `root` must be canonical. Symlinks and `..` segments are resolved before
/// the containment check, which compares whole path components.
pub async fn resolve(target: &str, root: &Path) -> Result<PathBuf, Rejected> {
    // Every leading slash goes, otherwise `join` would treat the rest as absolute.
    let relative = target.trim_start_matches('/');
    let joined = root.join(relative);

    let canonical = tokio::fs::canonicalize(&joined)
        .await
        .map_err(|_| Rejected::NotFound)?;

    if canonical.starts_with(root) {
        Ok(canonical)
    } else {
        Err(Rejected::Traversal)
    }
}

/// Decodes a raw request target and resolves it in one step.
pub async fn resolve_target(raw: &str, root: &Path) -> Result<PathBuf, Rejected> {
    resolve(&normalize_target(raw), root).await
}
