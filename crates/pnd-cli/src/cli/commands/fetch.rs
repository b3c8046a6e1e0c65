//! `pnd` – probe the archive and download missing episodes.

use anyhow::Result;
use pnd_core::config::RunConfig;
use pnd_core::pipeline::{self, RunEvent};
use pnd_core::probe::{CurlProbe, Probe};
use std::io::{self, Write};
use std::sync::Arc;

pub async fn run_fetch(cfg: &RunConfig) -> Result<()> {
    let probe = Arc::new(CurlProbe::from_config(&cfg.archive));
    fetch_and_report(cfg, probe, io::stdout()).await?;
    Ok(())
}

/// Runs the pipeline and writes the user-facing lines to `out`: one
/// `Downloading <url>` per attempt, one line per failure, or the
/// nothing-to-do message. Hands `out` back when done.
pub(crate) async fn fetch_and_report<W>(
    cfg: &RunConfig,
    probe: Arc<dyn Probe>,
    mut out: W,
) -> Result<W>
where
    W: Write + Send + 'static,
{
    let (event_tx, mut event_rx) = tokio::sync::mpsc::channel::<RunEvent>(16);
    let printer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let line = match event {
                RunEvent::Downloading(url) => format!("Downloading {}", url),
                RunEvent::Failed(msg) => msg,
                RunEvent::Downloaded(_) => continue,
            };
            if let Err(e) = writeln!(out, "{}", line) {
                tracing::warn!("could not print progress: {}", e);
            }
        }
        out
    });

    let report = pipeline::run(cfg, probe, Some(event_tx)).await;
    let mut out = printer
        .await
        .map_err(|e| anyhow::anyhow!("printer task join: {}", e))?;
    let report = report?;

    if report.nothing_to_do() {
        writeln!(out, "No missing podcasts")?;
    } else if !report.failures.is_empty() {
        tracing::info!(
            "{} of {} episode(s) failed",
            report.failures.len(),
            report.missing.len()
        );
    }
    Ok(out)
}
