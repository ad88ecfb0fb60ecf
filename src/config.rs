use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::constants;

/// User preferences from `prefs.toml` in the config directory. Every field is optional.
#[derive(Serialize, Deserialize, Default, Debug, PartialEq, Eq)]
pub struct Config {
  /// Where the key/value store lives; defaults to `<data dir>/storage.json`.
  pub store_file: Option<PathBuf>,
  /// Storage cap in bytes; `0` disables it.
  pub quota_bytes: Option<usize>,
  /// `tracing` filter directive used when `RUST_LOG` is unset.
  pub log_filter: Option<String>,
  /// Shown on the avatar while no picture is set.
  pub initials: Option<String>,
}

impl Config {
  pub fn load() -> Self {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "folio") {
      let config_file = proj_dirs.config_dir().join("prefs.toml");
      if let Ok(content) = std::fs::read_to_string(config_file) {
        return Self::parse(&content);
      }
    }
    Self::default()
  }

  /// Parse preferences, falling back to defaults when the file is malformed.
  pub fn parse(content: &str) -> Self {
    toml::from_str(content).unwrap_or_default()
  }

  pub fn save(&self) -> Result<()> {
    let proj_dirs = ProjectDirs::from("", "", "folio").ok_or_else(|| anyhow!("No config directory available"))?;
    self.save_to(proj_dirs.config_dir())
  }

  /// Write `prefs.toml` into `config_dir`, creating the directory if needed.
  pub fn save_to(&self, config_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(config_dir)
      .with_context(|| format!("Failed to create config directory {}", config_dir.display()))?;
    let content = toml::to_string(self).context("Failed to render preferences")?;
    let config_file = config_dir.join("prefs.toml");
    std::fs::write(&config_file, content).with_context(|| format!("Failed to write {}", config_file.display()))?;
    Ok(())
  }

  /// Effective quota: the configured value, `None` for `0`, else the browser-like default.
  ///
  /// `quota_bytes = 0` in the file means "no cap"; the stores themselves take the
  /// cap literally, so this is where the zero is translated.
  pub fn quota(&self) -> Option<usize> {
    match self.quota_bytes {
      Some(0) => None,
      Some(bytes) => Some(bytes),
      None => Some(constants().default_quota_bytes),
    }
  }

  pub fn initials(&self) -> &str {
    self.initials.as_deref().unwrap_or("ME")
  }

  pub fn log_filter(&self) -> &str {
    self.log_filter.as_deref().unwrap_or("info")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_full() {
    let config = Config::parse(
      r#"
        store_file = "/tmp/folio.json"
        quota_bytes = 1024
        log_filter = "folio=debug"
        initials = "AK"
      "#,
    );
    assert_eq!(config.store_file, Some(PathBuf::from("/tmp/folio.json")));
    assert_eq!(config.quota(), Some(1024));
    assert_eq!(config.log_filter(), "folio=debug");
    assert_eq!(config.initials(), "AK");
  }

  #[test]
  fn parse_malformed_defaults() {
    assert_eq!(Config::parse("quota_bytes = [nope"), Config::default());
  }

  #[test]
  fn quota_defaults() {
    assert_eq!(Config::default().quota(), Some(5 * 1024 * 1024));
    let unlimited = Config { quota_bytes: Some(0), ..Config::default() };
    assert_eq!(unlimited.quota(), None);
  }

  #[test]
  fn round_trips_through_toml() {
    let config = Config { initials: Some("AK".to_string()), quota_bytes: Some(10), ..Config::default() };
    let text = toml::to_string(&config).unwrap();
    assert_eq!(Config::parse(&text), config);
  }

  #[test]
  fn save_to_writes_prefs_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("folio");
    let config = Config { initials: Some("ZZ".to_string()), ..Config::default() };
    config.save_to(&config_dir).unwrap();
    let written = std::fs::read_to_string(config_dir.join("prefs.toml")).unwrap();
    assert_eq!(Config::parse(&written), config);
  }

  #[test]
  fn save_to_unwritable_dir_errors() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where the config directory's parent should be.
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    let config = Config { initials: Some("ZZ".to_string()), ..Config::default() };
    assert!(config.save_to(&blocker.join("folio")).is_err());
  }
}
