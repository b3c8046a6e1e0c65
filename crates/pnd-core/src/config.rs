use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::period::MonthOffset;
use crate::url_model::EpisodeTemplate;

/// Highest suffix probed per date unless the config says otherwise.
pub const DEFAULT_MAX_SUFFIX: u32 = 12;

/// Archive settings loaded from `~/.config/pnd/config.toml`.
///
/// The archive has renumbered its URLs before; when episodes stop turning up,
/// this file is where the template and suffix range get fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Upper bound of the suffix scan (inclusive). Probing goes from here down to 0.
    pub max_suffix: u32,
    /// Connect timeout for HEAD probes and downloads, in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout for a single HEAD probe, in seconds.
    pub probe_timeout_secs: u64,
    /// Whole-request timeout for one episode download, in seconds.
    pub download_timeout_secs: u64,
    /// URL pieces for candidate episodes.
    pub template: EpisodeTemplate,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            max_suffix: DEFAULT_MAX_SUFFIX,
            connect_timeout_secs: 15,
            probe_timeout_secs: 30,
            download_timeout_secs: 3600,
            template: EpisodeTemplate::default(),
        }
    }
}

impl ArchiveConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

/// Everything one pipeline run needs. Built by the CLI; "today" is injected
/// so date logic never touches the clock.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub output_dir: PathBuf,
    pub offset: MonthOffset,
    pub today: NaiveDate,
    pub archive: ArchiveConfig,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pnd")?;
    Ok(xdg_dirs.get_config_home().join("pnd").join("config.toml"))
}

/// Load configuration from the default location, creating a default file if
/// none exists. An unusable config location only costs the file: the run
/// goes on with built-in defaults.
pub fn load_or_init() -> Result<ArchiveConfig> {
    match config_path() {
        Ok(path) => load_or_init_at(&path),
        Err(e) => {
            tracing::warn!("no config location ({:#}), using built-in defaults", e);
            Ok(ArchiveConfig::default())
        }
    }
}

/// Like [`load_or_init`] for an explicit path. A file that exists but does not
/// parse is still an error.
pub fn load_or_init_at(path: &Path) -> Result<ArchiveConfig> {
    if path.exists() {
        return load_from_path(path);
    }

    let default_cfg = ArchiveConfig::default();
    match write_config(path, &default_cfg) {
        Ok(()) => tracing::info!("created default config at {}", path.display()),
        Err(e) => tracing::warn!("{:#}; using built-in defaults", e),
    }
    Ok(default_cfg)
}

fn write_config(path: &Path, cfg: &ArchiveConfig) -> Result<()> {
    let toml = toml::to_string_pretty(cfg)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config dir {}", parent.display()))?;
    }
    fs::write(path, toml).with_context(|| format!("create config {}", path.display()))?;
    Ok(())
}

/// Load configuration from an explicit file. The file must exist.
pub fn load_from_path(path: &Path) -> Result<ArchiveConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: ArchiveConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url_model::{DEFAULT_BASE_URL, DEFAULT_IDENTIFIER, DEFAULT_SEGMENT};

    #[test]
    fn default_config_values() {
        let cfg = ArchiveConfig::default();
        assert_eq!(cfg.max_suffix, 12);
        assert_eq!(cfg.connect_timeout(), Duration::from_secs(15));
        assert_eq!(cfg.probe_timeout(), Duration::from_secs(30));
        assert_eq!(cfg.template.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.template.segment, DEFAULT_SEGMENT);
        assert_eq!(cfg.template.identifier, DEFAULT_IDENTIFIER);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = ArchiveConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ArchiveConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml = r#"
            max_suffix = 20

            [template]
            segment = "0600"
        "#;
        let cfg: ArchiveConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.max_suffix, 20);
        assert_eq!(cfg.download_timeout_secs, 3600);
        assert_eq!(cfg.template.segment, "0600");
        assert_eq!(cfg.template.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.template.identifier, DEFAULT_IDENTIFIER);
    }

    #[test]
    fn load_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "probe_timeout_secs = 5\n").unwrap();
        let cfg = load_from_path(&path).unwrap();
        assert_eq!(cfg.probe_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.max_suffix, DEFAULT_MAX_SUFFIX);
    }

    #[test]
    fn load_or_init_at_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pnd").join("config.toml");
        let cfg = load_or_init_at(&path).unwrap();
        assert_eq!(cfg, ArchiveConfig::default());
        assert_eq!(load_from_path(&path).unwrap(), cfg);
    }

    #[test]
    fn load_or_init_at_unwritable_location_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the config directory should be.
        let blocker = dir.path().join("pnd");
        fs::write(&blocker, b"not a directory").unwrap();
        let path = blocker.join("config.toml");

        let cfg = load_or_init_at(&path).unwrap();
        assert_eq!(cfg, ArchiveConfig::default());
        assert!(!path.exists());

        let err = write_config(&path, &cfg).unwrap_err();
        assert!(format!("{:#}", err).contains("create config dir"));
    }

    #[test]
    fn load_or_init_at_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_suffix = 3\n").unwrap();
        assert_eq!(load_or_init_at(&path).unwrap().max_suffix, 3);

        fs::write(&path, "max_suffix = [\n").unwrap();
        assert!(load_or_init_at(&path).is_err());
    }

    #[test]
    fn load_from_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from_path(&dir.path().join("missing.toml")).is_err());

        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "max_suffix = \"twelve\"\n").unwrap();
        let err = load_from_path(&bad).unwrap_err();
        assert!(format!("{:#}", err).contains("parse config"));
    }
}
