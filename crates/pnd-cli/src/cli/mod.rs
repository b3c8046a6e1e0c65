//! CLI for pnd.

mod commands;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use pnd_core::config::{self, ArchiveConfig, RunConfig};
use pnd_core::period::MonthOffset;
use std::path::PathBuf;

use commands::run_fetch;

/// Downloads the Pacific Notions episodes of a month that are not on disk yet.
#[derive(Debug, Parser)]
#[command(name = "pnd")]
#[command(about = "Download missing Pacific Notions (KEXP) episodes for a month", long_about = None)]
pub struct Cli {
    /// Output directory for the podcasts.
    #[arg(short = 'o', long = "output-dir", default_value = ".", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Use the previous month instead of the current one.
    #[arg(long)]
    pub previous_month: bool,

    /// Number of previous months to go back (0 = current month).
    #[arg(short = 'p', long = "months-back", default_value_t = 0, value_name = "N")]
    pub months_back: u32,

    /// Print verbose tracing (target month, dates, probed and found URLs).
    #[arg(long)]
    pub debug: bool,

    /// Archive settings file. Defaults to ~/.config/pnd/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Highest URL suffix to probe per date, overriding the config file.
    #[arg(long, value_name = "N")]
    pub max_suffix: Option<u32>,
}

impl Cli {
    pub fn offset(&self) -> MonthOffset {
        MonthOffset::from_flags(self.previous_month, self.months_back)
    }

    /// Combines flags, archive settings and the current date into one run.
    pub fn run_config(&self, mut archive: ArchiveConfig, today: NaiveDate) -> RunConfig {
        if let Some(n) = self.max_suffix {
            archive.max_suffix = n;
        }
        RunConfig {
            output_dir: self.output_dir.clone(),
            offset: self.offset(),
            today,
            archive,
        }
    }

    pub async fn run(self) -> Result<()> {
        let archive = match &self.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", archive);

        let today = chrono::Local::now().date_naive();
        let cfg = self.run_config(archive, today);
        run_fetch(&cfg).await
    }
}
