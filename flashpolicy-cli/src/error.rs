//! Error types for the flashpolicy CLI.

use flashpolicy_config::ConfigError;
use flashpolicy_core::PolicyError;
use std::fmt;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub enum CliError {
    /// IO error (reading policy files, writing output)
    Io(std::io::Error),

    /// Configuration could not be loaded or failed validation
    Config(ConfigError),

    /// Policy document could not be built, parsed or serialized
    Policy(PolicyError),

    /// Server failed to start or stopped with an error
    Server(String),

    /// Invalid argument
    InvalidArgument(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::Config(e) => write!(f, "{}", e),
            CliError::Policy(e) => write!(f, "{}", e),
            CliError::Server(msg) => write!(f, "Server error: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::Policy(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<PolicyError> for CliError {
    fn from(e: PolicyError) -> Self {
        CliError::Policy(e)
    }
}

impl From<flashpolicy_http::Error> for CliError {
    fn from(e: flashpolicy_http::Error) -> Self {
        CliError::Server(e.to_string())
    }
}
