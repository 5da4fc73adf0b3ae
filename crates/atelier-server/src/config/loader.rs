//! Configuration loading utilities.

use super::types::ServerConfig;
use super::validation::validate_config;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Load configuration from a file and the environment.
///
/// Environment variables win over the file. Nested fields use `__` as
/// the separator, so `ATELIER__AUTH__JWT_SECRET` sets
/// `auth.jwt_secret`.
pub struct ConfigLoader {
    config_path: Option<String>,
    env_prefix: String,
}

impl ConfigLoader {
    /// Loader with the default `ATELIER` prefix and no file.
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: "ATELIER".to_string(),
        }
    }

    /// Set config file path.
    pub fn with_config_path(mut self, path: impl Into<String>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Set environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration.
    pub fn load(&self) -> Result<ServerConfig> {
        let mut builder = config::Config::builder();

        if let Some(path) = &self.config_path {
            if Path::new(path).exists() {
                info!(path = %path, "Loading config file");
                builder = builder.add_source(config::File::with_name(path));
            }
        }

        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix)
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerConfig {
    /// Load and validate configuration from `CONFIG_PATH` and the
    /// environment. Startup must abort on any error from here; in
    /// particular a missing signing secret is fatal.
    pub fn from_env() -> Result<Self> {
        let config_path = std::env::var("CONFIG_PATH").ok();

        let mut loader = ConfigLoader::new();
        if let Some(path) = config_path {
            loader = loader.with_config_path(path);
        }

        let config = loader.load()?;
        validate_config(&config)
            .map_err(|errors| anyhow::anyhow!("Invalid configuration: {errors:?}"))?;
        Ok(config)
    }
}
