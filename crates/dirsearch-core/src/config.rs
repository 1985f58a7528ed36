//! Configuration types for dirsearch.
//!
//! [`Config::load`] reads `~/.config/dirsearch/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist, then applies `DIRSEARCH__*`
//! environment overrides. [`Config::defaults`] returns the same defaults
//! without touching the filesystem or environment (useful in tests).

use crate::error::{Error, Result};
use crate::filter::ValueEscaping;
use crate::types::{DerefPolicy, SearchConstraints};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[directory]
host        = ""
port        = 389
search_base = ""

[search]
size_limit      = 50
time_limit_secs = 30
page_size       = 20
escape_values   = false

# Per-field alias overrides, e.g.
# email = "mail; rfc822Mailbox"
[schema]
"#;

const ENV_PREFIX: &str = "DIRSEARCH";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration, loaded from `~/.config/dirsearch/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub search: SearchConfig,
    /// Field query name → alias declaration overrides.
    #[serde(default)]
    pub schema: BTreeMap<String, String>,
}

/// `[directory]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub search_base: String,
}

fn default_port() -> u16 { 389 }

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_port(),
            search_base: String::new(),
        }
    }
}

/// `[search]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_size_limit")]
    pub size_limit: u32,
    #[serde(default = "default_time_limit_secs")]
    pub time_limit_secs: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub escape_values: bool,
}

fn default_size_limit() -> u32 { 50 }
fn default_time_limit_secs() -> u64 { 30 }
fn default_page_size() -> u32 { 20 }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            size_limit: default_size_limit(),
            time_limit_secs: default_time_limit_secs(),
            page_size: default_page_size(),
            escape_values: false,
        }
    }
}

impl SearchConfig {
    /// Constraints for one call. Aliases are never dereferenced.
    pub fn constraints(&self, size_limit: u32) -> SearchConstraints {
        SearchConstraints {
            size_limit,
            time_limit: Duration::from_secs(self.time_limit_secs),
            deref: DerefPolicy::Never,
            batch_size: self.page_size,
        }
    }

    pub fn escaping(&self) -> ValueEscaping {
        if self.escape_values {
            ValueEscaping::Rfc4515
        } else {
            ValueEscaping::Verbatim
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/dirsearch/config.toml`, layered on top of the
    /// built-in defaults and under environment overrides. Creates the file
    /// with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::load_from(&path)
    }

    /// Load from an explicit file path. A missing file is not an error.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        Self::load_layered(path, None)
    }

    /// Defaults, then `path`, then `DIRSEARCH__*` variables taken from `env`
    /// (the process environment when `None`).
    fn load_layered(path: &Path, env: Option<config::Map<String, String>>) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Check the settings a search cannot run without. The error names the
    /// first offending key.
    pub fn validate(&self) -> Result<()> {
        if self.directory.host.trim().is_empty() {
            return Err(Error::Configuration("directory.host".to_string()));
        }
        if self.directory.port == 0 {
            return Err(Error::Configuration("directory.port".to_string()));
        }
        if self.directory.search_base.trim().is_empty() {
            return Err(Error::Configuration("directory.search_base".to_string()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("dirsearch")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
