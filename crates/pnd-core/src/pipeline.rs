//! The monthly fetch pipeline.
//!
//! Target month → candidate Sundays → probe every date concurrently → filter
//! against the output directory → download whatever is missing concurrently.
//! Both fan-outs are joined completely before the next stage starts, so the
//! download stage always sees the final missing list.

use anyhow::{bail, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::config::{ArchiveConfig, RunConfig};
use crate::downloader::{download_episode, DownloadError};
use crate::inventory::filter_missing;
use crate::period::{candidate_dates, date_key, TargetPeriod};
use crate::probe::{find_episode_url, Probe};

/// Progress notifications for whoever is driving the run (the CLI prints them).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// A download is about to start.
    Downloading(String),
    /// A download finished and was moved into place.
    Downloaded(PathBuf),
    /// A download failed; the string is the full error message.
    Failed(String),
}

/// What a run found and did.
#[derive(Debug)]
pub struct RunReport {
    pub period: TargetPeriod,
    /// `YYYYMMDD` keys of the Sundays that were probed.
    pub candidates: Vec<String>,
    /// One URL per date that answered a probe, sorted.
    pub discovered: Vec<String>,
    /// Discovered URLs with no local file, sorted.
    pub missing: Vec<String>,
    /// Files written by this run, sorted.
    pub downloaded: Vec<PathBuf>,
    pub failures: Vec<DownloadError>,
}

impl RunReport {
    /// True when every discovered episode was already on disk.
    pub fn nothing_to_do(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Runs the whole pipeline once.
///
/// Only a bad output directory is an error; probe misses and per-episode
/// download failures end up in the report.
pub async fn run(
    cfg: &RunConfig,
    probe: Arc<dyn Probe>,
    events: Option<mpsc::Sender<RunEvent>>,
) -> Result<RunReport> {
    if !cfg.output_dir.is_dir() {
        bail!(
            "output directory {} does not exist or is not a directory",
            cfg.output_dir.display()
        );
    }

    let period = TargetPeriod::resolve(cfg.today, cfg.offset);
    tracing::debug!("month: {}, year: {}", period.month(), period.year());

    let candidates: Vec<String> = candidate_dates(cfg.today, cfg.offset)
        .into_iter()
        .map(date_key)
        .collect();
    tracing::debug!("sundays: {:?}", candidates);

    let discovered = discover_episodes(probe, &cfg.archive, &candidates).await;
    let missing = filter_missing(&cfg.output_dir, &discovered);
    for url in &missing {
        tracing::debug!("missing URL: {}", url);
    }

    let mut report = RunReport {
        period,
        candidates,
        discovered,
        missing,
        downloaded: Vec::new(),
        failures: Vec::new(),
    };
    if report.nothing_to_do() {
        tracing::info!("no missing episodes for {}", report.period);
        return Ok(report);
    }

    let (downloaded, failures) =
        download_all(&report.missing, &cfg.output_dir, &cfg.archive, events).await;
    tracing::info!(
        "run for {} finished: {} downloaded, {} failed",
        report.period,
        downloaded.len(),
        failures.len()
    );
    report.downloaded = downloaded;
    report.failures = failures;
    Ok(report)
}

/// Probes every date key in parallel and returns the URLs that were found,
/// sorted and de-duplicated.
pub async fn discover_episodes(
    probe: Arc<dyn Probe>,
    archive: &ArchiveConfig,
    date_keys: &[String],
) -> Vec<String> {
    let mut join_set = JoinSet::new();
    for key in date_keys {
        let probe = Arc::clone(&probe);
        let template = archive.template.clone();
        let key = key.clone();
        let max_suffix = archive.max_suffix;
        join_set.spawn_blocking(move || {
            find_episode_url(&*probe, &template, &key, max_suffix)
        });
    }

    let mut found = Vec::new();
    while let Some(res) = join_set.join_next().await {
        match res {
            Ok(Some(url)) => {
                tracing::debug!("valid URL: {}", url);
                found.push(url);
            }
            Ok(None) => {}
            Err(e) => tracing::error!("probe task join: {}", e),
        }
    }
    found.sort();
    found.dedup();
    found
}

/// Downloads every URL in parallel. One failure never stops the others.
async fn download_all(
    urls: &[String],
    dir: &std::path::Path,
    archive: &ArchiveConfig,
    events: Option<mpsc::Sender<RunEvent>>,
) -> (Vec<PathBuf>, Vec<DownloadError>) {
    let mut join_set = JoinSet::new();
    for url in urls {
        emit(&events, RunEvent::Downloading(url.clone())).await;
        let url = url.clone();
        let dir = dir.to_path_buf();
        let archive = archive.clone();
        join_set.spawn_blocking(move || download_episode(&url, &dir, &archive));
    }

    let mut downloaded = Vec::new();
    let mut failures = Vec::new();
    while let Some(res) = join_set.join_next().await {
        match res {
            Ok(Ok(path)) => {
                emit(&events, RunEvent::Downloaded(path.clone())).await;
                downloaded.push(path);
            }
            Ok(Err(e)) => {
                // Failures reach the user through `events` and the report.
                tracing::debug!("{}", e);
                emit(&events, RunEvent::Failed(e.to_string())).await;
                failures.push(e);
            }
            Err(e) => tracing::error!("download task join: {}", e),
        }
    }
    downloaded.sort();
    (downloaded, failures)
}

async fn emit(events: &Option<mpsc::Sender<RunEvent>>, event: RunEvent) {
    if let Some(tx) = events {
        // A closed receiver only means nobody is printing.
        let _ = tx.send(event).await;
    }
}
