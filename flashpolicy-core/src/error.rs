// Error types for policy documents

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// A caller-supplied value is outside the accepted set.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The input is not well-formed XML.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Well-formed XML that is not a cross-domain policy this crate understands.
    #[error("Invalid policy document: {0}")]
    InvalidDocument(String),
}

pub type Result<T> = std::result::Result<T, PolicyError>;
