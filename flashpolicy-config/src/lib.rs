// Configuration for the flashpolicy server

pub mod app_config;
pub mod env;
pub mod error;
pub mod loader;
pub mod validation;

pub use app_config::{
    AccessEntry, AppConfig, DEFAULT_HOST, DEFAULT_POLICY_PATH, DEFAULT_PORT, HeadersEntry,
    PolicyRoute, PolicyView, ServerConfig, check_route_keys,
};
pub use env::{DEFAULT_PREFIX, EnvLoader};
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use validation::{ConfigValidator, Validate};

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Assembles an [`AppConfig`] from a file, `.env` and the environment.
///
/// Sources apply in order: defaults, the configuration file, then
/// `<PREFIX>_HOST` / `<PREFIX>_PORT`. The result is validated.
///
/// ```no_run
/// use flashpolicy_config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .file("flashpolicy.toml")
///     .load_dotenv(None)
///     .load_env()
///     .build()
///     .unwrap();
/// println!("listening on {}", config.server.bind_address());
/// ```
pub struct ConfigBuilder {
    file: Option<PathBuf>,
    load_env: bool,
    load_dotenv: bool,
    dotenv_path: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            file: None,
            load_env: false,
            load_dotenv: false,
            dotenv_path: None,
            env_prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    /// Read a `.json` or `.toml` file.
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Apply environment overrides.
    pub fn load_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Load a `.env` file into the process environment first. A missing
    /// default `.env` is ignored; an explicit path must exist.
    pub fn load_dotenv(mut self, path: Option<PathBuf>) -> Self {
        self.load_dotenv = true;
        self.dotenv_path = path;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn build(self) -> Result<AppConfig> {
        if self.load_dotenv {
            match self.dotenv_path {
                Some(ref path) => {
                    dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
                }
                None => {
                    dotenvy::dotenv().ok();
                }
            }
        }

        let mut config = match self.file {
            Some(ref path) => load_file(path)?,
            None => AppConfig::default(),
        };

        if self.load_env {
            apply_env(&mut config, &EnvLoader::new(Some(self.env_prefix.clone())))?;
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a configuration file without validating it. Unknown keys are
/// rejected.
pub fn load_file(path: &Path) -> Result<AppConfig> {
    let value = ConfigLoader::auto(path)?.load_file(path)?;
    let config = AppConfig::deserialize(&value)
        .map_err(|e| ConfigError::DeserializationError(e.to_string()))?;
    check_route_keys(&value, &config)?;
    Ok(config)
}

fn apply_env(config: &mut AppConfig, env: &EnvLoader) -> Result<()> {
    if let Some(host) = env.load_optional("HOST")? {
        config.server.host = host;
    }

    if let Some(port) = env.load_optional("PORT")? {
        config.server.port = port.trim().parse().map_err(|_| {
            ConfigError::ValidationError(format!("PORT must be a port number, found '{}'", port))
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = ConfigBuilder::new().build().unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigBuilder::new().file("/nonexistent/flashpolicy.toml").build();
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_env_without_overrides() {
        let config = ConfigBuilder::new()
            .with_prefix("FLASHPOLICY_UNSET_PREFIX_4711")
            .load_env()
            .build()
            .unwrap();
        assert_eq!(config.server.port, DEFAULT_PORT);
    }
}
