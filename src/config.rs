//! Server configuration.
//!
//! Loaded from an optional TOML file. Stock defaults are serialized to a
//! `toml::Value`, the user file is merged on top, and the result is
//! deserialized and validated. Command-line flags are applied last.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//!
//! [storage]
//! source_dir = "assets/full"   # <identifier>.jpg files, read-only
//! cache_dir = "assets/thumb"   # <width>x<height>-<identifier>.jpg, created if absent
//!
//! [output]
//! quality = 80                 # JPEG quality (1-100)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::cache::ThumbnailStore;
use crate::imaging::Quality;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "thumbnailer.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Listening address.
    pub server: ListenConfig,
    /// Source and cache directories.
    pub storage: StorageConfig,
    /// Encoding settings for generated thumbnails.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory of `<identifier>.jpg` source images. Never written to.
    pub source_dir: PathBuf,
    /// Directory of cached thumbnails. Created at startup if absent.
    pub cache_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("assets/full"),
            cache_dir: PathBuf::from("assets/thumb"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { quality: 80 }
    }
}

impl ServerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        if self.server.host.parse::<IpAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "server.host must be an IP address, got {:?}",
                self.server.host
            )));
        }
        if self.storage.source_dir.as_os_str().is_empty()
            || self.storage.cache_dir.as_os_str().is_empty()
        {
            return Err(ConfigError::Validation(
                "storage.source_dir and storage.cache_dir must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Socket address to bind. Only valid after [`validate`](Self::validate).
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.server.host.parse().map_err(|_| {
            ConfigError::Validation(format!("invalid server.host {:?}", self.server.host))
        })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    pub fn store(&self) -> ThumbnailStore {
        ThumbnailStore::new(&self.storage.source_dir, &self.storage.cache_dir)
    }

    pub fn quality(&self) -> Quality {
        Quality::new(self.output.quality)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ServerConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ServerConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ServerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load configuration.
///
/// - `Some(path)`: the file must exist.
/// - `None`: [`CONFIG_FILENAME`] in the working directory is used if present,
///   otherwise stock defaults.
pub fn load_config(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    let overlay = match path {
        Some(p) => Some(read_toml(p)?),
        None => {
            let default_path = Path::new(CONFIG_FILENAME);
            if default_path.exists() {
                Some(read_toml(default_path)?)
            } else {
                None
            }
        }
    };
    resolve_config(overlay)
}

fn read_toml(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Returns a fully-commented stock config file.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Thumbnailer Configuration
# =========================
#
# Every key is optional; the values below are the built-in defaults.
# Command-line flags override anything set here.

# ---------------------------------------------------------------------------
# HTTP listener
# ---------------------------------------------------------------------------
[server]
# IP address to bind. Use "0.0.0.0" to accept connections from other hosts.
host = "127.0.0.1"

port = 3000

# ---------------------------------------------------------------------------
# Storage
# ---------------------------------------------------------------------------
[storage]
# Source images, one <identifier>.jpg per image. Never modified.
source_dir = "assets/full"

# Generated thumbnails, named <width>x<height>-<identifier>.jpg.
# Created on startup if missing. Entries are never expired or deleted.
cache_dir = "assets/thumb"

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# JPEG encoding quality (1 = worst, 100 = best).
quality = 80
"##
}
