//! Local filename derivation from an episode URL.

/// Final path segment of `url`, used as the local filename.
///
/// The query string and fragment are ignored. Returns `None` when the URL
/// does not parse or has no usable last segment (root path, `.` or `..`).
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.next_back()?;
    match segment {
        "" | "." | ".." => None,
        s => Some(s.to_string()),
    }
}
