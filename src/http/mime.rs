//! Content types by file extension.

use std::path::Path;

/// Content type for a bare extension (no dot), case-insensitive.
pub fn content_type_for(ext: &str) -> Option<&'static str> {
    let ty = match ext.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "png" => "image/png",
        "pdf" => "application/pdf",
        "css" => "text/css",
        "js" => "text/javascript",
        "json" => "application/json",
        "txt" => "text/plain",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => return None,
    };
    Some(ty)
}

/// Lowercased extension of `path` with its leading dot, e.g. ".png".
pub fn dotted_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
}
