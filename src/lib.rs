// flashpolicy - Flash cross-domain policy files for Rust
//
// Builds, serializes and parses crossdomain.xml documents, and serves them
// over HTTP with the content type Flash Player expects.

// Re-export core functionality
pub use flashpolicy_core::*;

// Re-export the logging macros
pub use flashpolicy_log::{debug, error, info, trace, warn};

pub use flashpolicy_log;

// Re-export optional crates
#[cfg(feature = "config")]
pub use flashpolicy_config;

#[cfg(feature = "http")]
pub use flashpolicy_http;

/// Common imports.
///
/// ```
/// use flashpolicy::prelude::*;
///
/// let policy = simple_policy(["media.example.com"], None, None);
/// let xml = serialize(&policy).unwrap();
/// assert!(xml.ends_with(b"</cross-domain-policy>"));
/// ```
pub mod prelude {
    pub use crate::policies::{
        allow_access_from, allow_http_request_headers_from, new_policy, no_access_policy,
        serialize, simple_policy, site_control,
    };
    pub use crate::{
        AccessRule, CONTENT_TYPE, HeaderAccessRule, PolicyDocument, PolicyElement, PolicyError,
        SiteControl,
    };

    #[cfg(feature = "config")]
    pub use flashpolicy_config::{AppConfig, ConfigBuilder, PolicyRoute, PolicyView};

    #[cfg(feature = "http")]
    pub use flashpolicy_http::{HttpRequest, HttpResponse, Router, Server, views};
}
