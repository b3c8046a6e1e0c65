//! Local inventory: which episodes are already in the output directory.
//!
//! Existence of a file with the URL's basename is the whole check. A truncated
//! file from some earlier tool counts as present.

use std::path::Path;

use crate::url_model::filename_from_url_path;

/// True if `dir` has no entry named after the last path segment of `url`.
///
/// URLs without a usable basename are never reported missing since they
/// could not be saved anyway.
pub fn is_missing(dir: &Path, url: &str) -> bool {
    match filename_from_url_path(url) {
        Some(name) => !dir.join(name).exists(),
        None => {
            tracing::warn!(url, "no filename in URL, skipping");
            false
        }
    }
}

/// URLs from `urls` that are missing locally, in input order.
pub fn filter_missing(dir: &Path, urls: &[String]) -> Vec<String> {
    urls.iter()
        .filter(|url| is_missing(dir, url))
        .cloned()
        .collect()
}
