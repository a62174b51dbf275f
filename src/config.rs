//! Configuration loading
//!
//! Layers embedded defaults, an optional local `blockdraw.toml`, and
//! `BLOCKDRAW_*` environment variables.

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use blockdraw_host::HostConfig;

/// Embedded default configuration (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Host connection settings
    #[serde(default)]
    pub host: HostConfig,
}

/// Load configuration from embedded defaults, files, and environment
pub fn load_config() -> Result<AppConfig> {
    let config = Config::builder()
        // 1. Embedded defaults (always available)
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        // 2. Local overrides (optional)
        .add_source(File::with_name("blockdraw").required(false))
        // 3. Environment variables (highest priority)
        // prefix_separator("_") so BLOCKDRAW_HOST__BASE_URL works (single _
        // after the prefix, __ between nesting levels).
        .add_source(
            Environment::with_prefix("BLOCKDRAW")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    config
        .try_deserialize()
        .context("Failed to deserialize configuration")
}
