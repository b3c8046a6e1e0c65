//! libcurl HEAD probe.

use anyhow::{Context, Result};
use std::time::Duration;

use super::Probe;
use crate::config::ArchiveConfig;

/// HEAD-request probe backed by the curl crate.
///
/// Blocking; the pipeline runs it inside `spawn_blocking`.
#[derive(Debug, Clone)]
pub struct CurlProbe {
    connect_timeout: Duration,
    timeout: Duration,
}

impl CurlProbe {
    pub fn new(connect_timeout: Duration, timeout: Duration) -> Self {
        Self {
            connect_timeout,
            timeout,
        }
    }

    pub fn from_config(cfg: &ArchiveConfig) -> Self {
        Self::new(cfg.connect_timeout(), cfg.probe_timeout())
    }
}

impl Probe for CurlProbe {
    /// `Ok(true)` on a 2xx response, `Ok(false)` on any other status.
    /// Transport failures (DNS, refused connection, timeout) are errors.
    fn exists(&self, url: &str) -> Result<bool> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url).context("invalid URL")?;
        easy.nobody(true)?; // HEAD request
        easy.follow_location(true)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        easy.perform().with_context(|| format!("HEAD {} failed", url))?;

        let code = easy.response_code().context("no response code")?;
        tracing::trace!(url, code, "HEAD response");
        Ok((200..300).contains(&code))
    }
}
