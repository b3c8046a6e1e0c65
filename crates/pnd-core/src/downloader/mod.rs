//! Episode downloader.
//!
//! One plain GET per episode, streamed into `<name>.part` next to the final
//! file and renamed into place once the body is complete. A failed transfer
//! removes its `.part` file, so the inventory never mistakes it for a finished
//! episode.

mod episode;
mod error;

pub use episode::download_episode;
pub use error::DownloadError;

use std::path::{Path, PathBuf};

/// Suffix for in-flight downloads.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path.
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}
