//! Episode URL discovery.
//!
//! The archive suffix for a given date is unknown up front, so every suffix in
//! `0..=max_suffix` is tried with a HEAD request, highest first. Higher
//! suffixes have corresponded to newer numbering schemes, so the first hit
//! wins.

mod head;

pub use head::CurlProbe;

use anyhow::Result;

use crate::url_model::EpisodeTemplate;

/// Existence check for a candidate URL, without fetching the body.
pub trait Probe: Send + Sync {
    /// `Ok(true)` if the URL answered with a success status.
    fn exists(&self, url: &str) -> Result<bool>;
}

/// Scans suffixes from `max_suffix` down to 0 and returns the first URL the
/// probe reports as found, or `None` if no suffix matched.
///
/// A failing probe on one candidate is logged and the scan moves on.
pub fn find_episode_url(
    probe: &dyn Probe,
    template: &EpisodeTemplate,
    date_key: &str,
    max_suffix: u32,
) -> Option<String> {
    for suffix in (0..=max_suffix).rev() {
        let candidate = template.url_for(date_key, suffix);
        tracing::debug!("trying {}", candidate);
        match probe.exists(&candidate) {
            Ok(true) => return Some(candidate),
            Ok(false) => {}
            Err(e) => tracing::warn!(url = %candidate, "probe failed: {:#}", e),
        }
    }
    None
}
