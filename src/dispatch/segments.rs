//! Request path segmentation.
//!
//! # Rules
//! - Exactly one leading and one trailing `/` are removed
//! - The configured suffix is removed only when the path ends with it
//! - An empty remainder yields no segments; empty inner segments are kept
//! - Segments are percent-decoded; undecodable segments are kept verbatim

use std::borrow::Cow;

/// Strip the slashes and the suffix from a request path.
pub fn trim_path<'a>(path: &'a str, suffix: &str) -> &'a str {
    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);
    if suffix.is_empty() {
        return path;
    }
    path.strip_suffix(suffix).unwrap_or(path)
}

/// Split a request path into decoded segments.
pub fn segment_path(path: &str, suffix: &str) -> Vec<String> {
    let trimmed = trim_path(path, suffix);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('/').map(decode_segment).collect()
}

fn decode_segment(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}
