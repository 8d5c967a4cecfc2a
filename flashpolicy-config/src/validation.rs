// Configuration validation

use crate::{ConfigError, Result};

/// Implemented by configuration types that check themselves after loading.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Reusable validation rules
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                field
            )));
        }
        Ok(())
    }

    pub fn is_port(value: u16, field: &str) -> Result<()> {
        if value == 0 {
            return Err(ConfigError::ValidationError(format!(
                "{} must be a valid port number",
                field
            )));
        }
        Ok(())
    }

    /// Request paths must be absolute and free of query strings.
    pub fn is_path(value: &str, field: &str) -> Result<()> {
        if !value.starts_with('/') || value.contains('?') || value.contains('#') {
            return Err(ConfigError::ValidationError(format!(
                "{} must be an absolute path such as /crossdomain.xml, found '{}'",
                field, value
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_empty_validation() {
        assert!(ConfigValidator::not_empty("value", "field").is_ok());
        assert!(ConfigValidator::not_empty("", "field").is_err());
        assert!(ConfigValidator::not_empty("   ", "field").is_err());
    }

    #[test]
    fn test_port_validation() {
        assert!(ConfigValidator::is_port(8843, "field").is_ok());
        assert!(ConfigValidator::is_port(0, "field").is_err());
    }

    #[test]
    fn test_path_validation() {
        assert!(ConfigValidator::is_path("/crossdomain.xml", "path").is_ok());
        assert!(ConfigValidator::is_path("crossdomain.xml", "path").is_err());
        assert!(ConfigValidator::is_path("/crossdomain.xml?x=1", "path").is_err());
    }
}
