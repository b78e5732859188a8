//! Runtime settings, layered from defaults, an optional TOML file and
//! `HNVAULT_*` environment variables.

use std::{path::{Path, PathBuf}, time::Duration};

use serde::Deserialize;

use crate::client::{ClientConfig, DEFAULT_API_URL};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// SQLite archive file.
  pub db_path:              PathBuf,
  /// Base URL of the item API.
  pub api_url:              String,
  pub request_timeout_secs: u64,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      db_path:              PathBuf::from("hn_archive.db"),
      api_url:              DEFAULT_API_URL.to_string(),
      request_timeout_secs: 30,
    }
  }
}

impl Settings {
  /// Read `file` if it exists, then the environment. Missing keys keep their
  /// defaults.
  pub fn load(file: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("HNVAULT"))
      .build()?
      .try_deserialize()
  }

  pub fn client_config(&self) -> ClientConfig {
    ClientConfig {
      base_url: self.api_url.clone(),
      timeout:  Duration::from_secs(self.request_timeout_secs),
    }
  }
}
