// HTTP request and response types

use crate::{Error, HttpStatus};
use flashpolicy_core::{CONTENT_TYPE, PolicyDocument};
use std::collections::HashMap;

/// An incoming request, detached from the transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: String,
    /// Request target; may still carry a query string.
    pub path: String,
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new("GET", path)
    }

    /// Path without the query string.
    pub fn route_path(&self) -> &str {
        self.path
            .split_once('?')
            .map(|(path, _)| path)
            .unwrap_or(&self.path)
    }
}

/// An outgoing response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn ok() -> Self {
        Self::new(HttpStatus::Ok.code())
    }

    /// 200 response carrying `policy` as `text/x-cross-domain-policy`.
    pub fn policy(policy: &PolicyDocument) -> Result<Self, Error> {
        Ok(Self::ok()
            .content_type(CONTENT_TYPE)
            .with_body(policy.to_bytes()?))
    }

    /// JSON error body, as sent for routing failures.
    pub fn from_error(error: &Error) -> Self {
        let status = error.status_code();
        let body = serde_json::json!({
            "error": error.to_string(),
            "status": status,
        });

        let mut response = Self::new(status)
            .content_type("application/json")
            .with_body(body.to_string().into_bytes());

        if let Error::MethodNotAllowed(_) = error {
            response = response.with_header("Allow", "GET, HEAD");
        }

        response
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn content_type(self, value: &str) -> Self {
        self.with_header("Content-Type", value)
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
