//! Episode URL template and filename derivation.
//!
//! Archive URLs look like
//! `<base>/content/kexp/<YYYYMMDD><segment><NN>-<identifier>.mp3`, where `NN`
//! is a two-digit suffix nobody outside the archive can predict. The segment
//! and identifier have changed between archive revisions, so they come from
//! config rather than being baked in.

mod path;

pub use path::filename_from_url_path;

use serde::{Deserialize, Serialize};

/// Archive host used when the config does not override it.
pub const DEFAULT_BASE_URL: &str = "https://kexp-archive.streamguys1.com";
/// Fixed digits between the date and the suffix.
pub const DEFAULT_SEGMENT: &str = "0550";
/// Trailing show identifier before `.mp3`.
pub const DEFAULT_IDENTIFIER: &str = "33-1962-pacific-notions";

const ARCHIVE_PATH: &str = "content/kexp";

/// Builds candidate episode URLs for a date key and suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeTemplate {
    pub base_url: String,
    pub segment: String,
    pub identifier: String,
}

impl Default for EpisodeTemplate {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            segment: DEFAULT_SEGMENT.to_string(),
            identifier: DEFAULT_IDENTIFIER.to_string(),
        }
    }
}

impl EpisodeTemplate {
    /// Candidate URL for `date_key` (`YYYYMMDD`) and `suffix`, zero-padded to two digits.
    pub fn url_for(&self, date_key: &str, suffix: u32) -> String {
        format!(
            "{}/{}/{}{}{:02}-{}.mp3",
            self.base_url.trim_end_matches('/'),
            ARCHIVE_PATH,
            date_key,
            self.segment,
            suffix,
            self.identifier
        )
    }
}
