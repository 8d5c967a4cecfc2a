// Error types for the policy server

use crate::HttpStatus;
use flashpolicy_core::PolicyError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Route not found: {0}")]
    RouteNotFound(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// A policy could not be built or serialized.
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn http_status(&self) -> HttpStatus {
        match self {
            Error::RouteNotFound(_) => HttpStatus::NotFound,
            Error::MethodNotAllowed(_) => HttpStatus::MethodNotAllowed,
            Error::Policy(_) | Error::Io(_) => HttpStatus::InternalServerError,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.http_status().code()
    }

    pub fn is_server_error(&self) -> bool {
        self.http_status().is_server_error()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
