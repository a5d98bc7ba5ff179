//! Grader configuration for saass
//!
//! Configuration lives in `saass.toml`. Lookup order: an explicit `--config`
//! path, then `./saass.toml`, then `$SAASS_CONFIG_DIR/config.toml` or the
//! user config directory (`~/.config/saass/config.toml`), then defaults.
//! `SAASS_EMBEDDING_*` environment variables override the file.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::bail_invalid;
use crate::error::{Result, SaassError};

pub use types::{
    EmbeddingConfig, EmbeddingProvider, GraderConfig, PathsConfig, RubricConfig,
    DEFAULT_EMBEDDING_MODEL, DEFAULT_EMBEDDING_URL, MAX_TIMEOUT_SECONDS,
};

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "saass.toml";

const CONFIG_DIR: &str = "saass";
const CONFIG_FILE: &str = "config.toml";
const CONFIG_DIR_ENV_VAR: &str = "SAASS_CONFIG_DIR";

impl GraderConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| SaassError::io_operation("read config", path.display(), e))?;
        let config: GraderConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve configuration for a run started in `cwd`
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading explicit config");
            return Self::load(path);
        }

        let local = cwd.join(LOCAL_CONFIG_FILE);
        if local.is_file() {
            debug!(path = %local.display(), "loading local config");
            return Self::load(&local);
        }

        if let Some(user) = user_config_path() {
            if user.is_file() {
                debug!(path = %user.display(), "loading user config");
                return Self::load(&user);
            }
        }

        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Apply `SAASS_EMBEDDING_*` overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply embedding overrides from an arbitrary variable lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(provider) = get("SAASS_EMBEDDING_PROVIDER") {
            self.embedding.provider = provider.parse()?;
        }
        if let Some(url) = get("SAASS_EMBEDDING_URL") {
            self.embedding.url = url;
        }
        if let Some(model) = get("SAASS_EMBEDDING_MODEL") {
            self.embedding.model = model;
        }
        if let Some(timeout) = get("SAASS_EMBEDDING_TIMEOUT") {
            match timeout.parse::<u64>() {
                Ok(seconds) => {
                    self.embedding.timeout_seconds = seconds.clamp(1, MAX_TIMEOUT_SECONDS)
                }
                Err(_) => bail_invalid!("SAASS_EMBEDDING_TIMEOUT", timeout),
            }
        }

        self.validate()
    }

    /// Reject settings no run could use
    pub fn validate(&self) -> Result<()> {
        if self.embedding.dimensions == 0 {
            bail_invalid!("embedding.dimensions", self.embedding.dimensions);
        }
        if self.embedding.batch_size == 0 {
            bail_invalid!("embedding.batch_size", self.embedding.batch_size);
        }
        if !(1..=MAX_TIMEOUT_SECONDS).contains(&self.embedding.timeout_seconds) {
            bail_invalid!(
                "embedding.timeout_seconds (1-600)",
                self.embedding.timeout_seconds
            );
        }
        if self.embedding.provider == EmbeddingProvider::Http && self.embedding.url.is_empty() {
            bail_invalid!("embedding.url", "(empty)");
        }
        Ok(())
    }
}

fn user_config_path() -> Option<PathBuf> {
    let dir = match std::env::var(CONFIG_DIR_ENV_VAR) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::config_dir()?.join(CONFIG_DIR),
    };
    Some(dir.join(CONFIG_FILE))
}
