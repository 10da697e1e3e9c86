//! Runtime configuration for the `folio` binary.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Settings deserialised from the optional TOML file and `FOLIO_*`
/// environment variables, in that order of precedence (environment wins).
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_store_path() -> PathBuf { PathBuf::from("folio.db") }

impl Settings {
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("FOLIO"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise Settings")
  }

  /// `store_path` with a leading `~/` expanded to the home directory.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_falls_back_to_default() {
    let settings = Settings::load(Path::new("/nonexistent/folio.toml")).unwrap();
    assert_eq!(settings.store_path, PathBuf::from("folio.db"));
  }

  #[test]
  fn plain_paths_are_untouched() {
    assert_eq!(expand_tilde(Path::new("/var/lib/folio.db")), PathBuf::from("/var/lib/folio.db"));
    assert_eq!(expand_tilde(Path::new("data/folio.db")), PathBuf::from("data/folio.db"));
  }
}
