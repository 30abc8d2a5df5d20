//! HTML directory listings.

use std::io;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::hits::HitCounter;
use crate::http::response::escape_html;

/// Characters left alone when a single path segment goes into a URL.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Same as [`SEGMENT`] but keeps `/` so whole paths stay readable.
pub const PATH: &AsciiSet = &SEGMENT.remove(b'/');

const DIR_SIZE: &str = "—";

/// 1024-based size with one decimal, e.g. "1.5 KB".
pub fn human_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if value < 1024.0 {
            return format!("{value:.1} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.1} TB")
}

/// Parent of a directory target, ending in `/`.
///
/// Empty segments are collapsed so the link never starts with `//`.
pub fn parent_of(target: &str) -> String {
    let mut segments: Vec<&str> = target.split('/').filter(|s| !s.is_empty()).collect();
    segments.pop();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

#[derive(Debug)]
struct Entry {
    name: String,
    is_dir: bool,
    size: u64,
    modified: Option<SystemTime>,
}

/// Renders the listing of `dir`, which `target` (ending in `/`) names.
///
/// Rows are sorted by name. Each row carries the hit count recorded for
/// `target + name`, with a trailing `/` for directories.
pub async fn render_listing(target: &str, dir: &Path, hits: &HitCounter) -> io::Result<Vec<u8>> {
    let mut entries = Vec::new();
    let mut read_dir = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        // Follows symlinks; dangling ones are left out.
        let meta = match tokio::fs::metadata(entry.path()).await {
            Ok(meta) => meta,
            Err(e) => {
                tracing::debug!(entry = %name, error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        entries.push(Entry {
            name,
            is_dir: meta.is_dir(),
            size: meta.len(),
            modified: meta.modified().ok(),
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    let keys: Vec<String> = entries
        .iter()
        .map(|e| {
            if e.is_dir {
                format!("{target}{}/", e.name)
            } else {
                format!("{target}{}", e.name)
            }
        })
        .collect();
    let counts = hits.counts_for(&keys).await;

    let title = escape_html(target);
    let mut html = String::with_capacity(1024 + entries.len() * 160);
    html.push_str("<!DOCTYPE html>\n<html lang='en'>\n<head>\n<meta charset='utf-8'>\n");
    html.push_str(&format!("<title>Content of {title}</title>\n</head>\n<body>\n"));
    html.push_str(&format!("<h1>Content of {title}</h1>\n"));

    if target != "/" {
        let parent = utf8_percent_encode(&parent_of(target), PATH).to_string();
        html.push_str(&format!(
            "<a class=\"parent-link\" href=\"{parent}\">Parent directory</a>\n"
        ));
    }

    html.push_str("<table>\n<thead><tr><th>Name</th><th>Size</th><th>Last modified</th><th>Hits</th></tr></thead>\n<tbody>\n");
    for (entry, hits) in entries.iter().zip(counts) {
        let mut href = utf8_percent_encode(&entry.name, SEGMENT).to_string();
        let mut shown = escape_html(&entry.name);
        let (class, size) = if entry.is_dir {
            href.push('/');
            shown.push('/');
            ("dir", DIR_SIZE.to_string())
        } else {
            ("file", human_size(entry.size))
        };
        let modified = entry
            .modified
            .map(|t| DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        html.push_str(&format!(
            "<tr class=\"{class}\"><td><a href=\"{href}\">{shown}</a></td><td>{size}</td><td>{modified}</td><td>{hits}</td></tr>\n"
        ));
    }
    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");

    Ok(html.into_bytes())
}
