//! Flash cross-domain policy documents.
//!
//! Builds, serializes and parses the XML files Flash Player fetches
//! (usually from `/crossdomain.xml`) to decide which remote domains, ports
//! and request headers a server trusts.
//!
//! ```
//! use flashpolicy_core::PolicyDocument;
//!
//! let policy = PolicyDocument::simple(["media.example.com", "api.example.com"], None, None);
//! let xml = policy.to_xml_string().unwrap();
//!
//! assert!(xml.starts_with("<?xml version=\"1.0\"?>"));
//! assert_eq!(xml.parse::<PolicyDocument>().unwrap(), policy);
//! ```

pub mod document;
pub mod error;
mod parser;
pub mod policies;
pub mod site_control;
mod writer;

pub use document::{
    AccessRule, DOCTYPE_NAME, DOCTYPE_SYSTEM_ID, HeaderAccessRule, PolicyDocument, PolicyElement,
    ROOT_ELEMENT,
};
pub use error::{PolicyError, Result};
pub use site_control::SiteControl;

/// Content type for served policy files.
pub const CONTENT_TYPE: &str = "text/x-cross-domain-policy; charset=utf-8";
