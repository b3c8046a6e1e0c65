//! Single-stream GET of one episode into the output directory.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{temp_path, DownloadError};
use crate::config::ArchiveConfig;
use crate::url_model::filename_from_url_path;

/// Downloads `url` into `dir`, naming the file after the URL's last path
/// segment. Returns the final path.
///
/// Blocking; call from `spawn_blocking` in async code.
pub fn download_episode(
    url: &str,
    dir: &Path,
    cfg: &ArchiveConfig,
) -> Result<PathBuf, DownloadError> {
    let name = filename_from_url_path(url).ok_or_else(|| DownloadError::InvalidUrl {
        url: url.to_string(),
    })?;
    let final_path = dir.join(name);
    let part = temp_path(&final_path);

    let mut file = File::create(&part).map_err(|source| DownloadError::Create {
        url: url.to_string(),
        path: part.clone(),
        source,
    })?;

    let fetched = fetch_into(url, &mut file, &part, cfg).and_then(|bytes| {
        file.sync_all().map_err(|source| DownloadError::Write {
            url: url.to_string(),
            path: part.clone(),
            source,
        })?;
        Ok(bytes)
    });
    drop(file);

    let bytes = match fetched {
        Ok(bytes) => bytes,
        Err(e) => {
            if let Err(rm) = fs::remove_file(&part) {
                tracing::warn!("could not remove {}: {}", part.display(), rm);
            }
            return Err(e);
        }
    };

    fs::rename(&part, &final_path).map_err(|source| DownloadError::Finalize {
        url: url.to_string(),
        path: final_path.clone(),
        source,
    })?;
    tracing::debug!(url, bytes, "saved {}", final_path.display());
    Ok(final_path)
}

/// Streams the response body of `url` into `file`. Returns bytes written.
fn fetch_into(
    url: &str,
    file: &mut File,
    part: &Path,
    cfg: &ArchiveConfig,
) -> Result<u64, DownloadError> {
    let network = |source: curl::Error| DownloadError::Network {
        url: url.to_string(),
        source,
    };

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(network)?;
    easy.follow_location(true).map_err(network)?;
    easy.max_redirections(10).map_err(network)?;
    easy.fail_on_error(true).map_err(network)?;
    easy.connect_timeout(cfg.connect_timeout()).map_err(network)?;
    easy.low_speed_limit(1024).map_err(network)?;
    easy.low_speed_time(Duration::from_secs(60)).map_err(network)?;
    easy.timeout(cfg.download_timeout()).map_err(network)?;

    let mut written = 0u64;
    let mut write_err = None;
    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| match file.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_err = Some(e);
                    Ok(0) // abort transfer
                }
            })
            .map_err(network)?;
        transfer.perform()
    };

    if let Some(source) = write_err {
        return Err(DownloadError::Write {
            url: url.to_string(),
            path: part.to_path_buf(),
            source,
        });
    }
    if let Err(e) = performed {
        if e.is_http_returned_error() {
            let status = easy.response_code().unwrap_or(0);
            return Err(DownloadError::Http {
                url: url.to_string(),
                status,
            });
        }
        return Err(network(e));
    }

    let status = easy.response_code().map_err(network)?;
    if !(200..300).contains(&status) {
        return Err(DownloadError::Http {
            url: url.to_string(),
            status,
        });
    }
    Ok(written)
}
