// Environment variable lookup

use crate::{ConfigError, Result};
use std::env;

/// Default prefix for configuration variables (`FLASHPOLICY_PORT`, ...).
pub const DEFAULT_PREFIX: &str = "FLASHPOLICY";

/// Reads prefixed environment variables.
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    fn full_key(&self, key: &str) -> String {
        match self.prefix {
            Some(ref prefix) => format!("{}_{}", prefix, key.to_uppercase()),
            None => key.to_uppercase(),
        }
    }

    /// Look up `<PREFIX>_<KEY>`. An unset variable is `None`; a value that
    /// is not valid unicode is an error.
    pub fn load_optional(&self, key: &str) -> Result<Option<String>> {
        match env::var(self.full_key(key)) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(ConfigError::EnvError(e)),
        }
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(Some(DEFAULT_PREFIX.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Only unset variables here; tests that set variables live in
    // tests/integration_test.rs and run serially.

    #[test]
    fn test_env_loader_missing_var() {
        let loader = EnvLoader::new(Some("FLASHPOLICY_TEST".to_string()));
        assert_eq!(loader.load_optional("MISSING_VAR_67890").unwrap(), None);
        assert_eq!(EnvLoader::new(None).load_optional("NONEXISTENT_VAR_12345").unwrap(), None);
    }

    #[test]
    fn test_prefix_applied() {
        let loader = EnvLoader::default();
        assert_eq!(loader.full_key("port"), "FLASHPOLICY_PORT");
        assert_eq!(EnvLoader::new(None).full_key("path"), "PATH");
    }
}
