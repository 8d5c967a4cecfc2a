//! Function-style API over [`PolicyDocument`].
//!
//! These mirror the builder methods for callers that prefer passing the
//! document explicitly:
//!
//! ```
//! use flashpolicy_core::policies;
//!
//! let mut policy = policies::new_policy();
//! policies::allow_access_from(&mut policy, "media.example.com", None, None);
//! policies::site_control(&mut policy, "master-only").unwrap();
//!
//! let bytes = policies::serialize(&policy).unwrap();
//! assert!(std::str::from_utf8(&bytes).unwrap().contains("master-only"));
//! ```

use crate::{PolicyDocument, Result};

/// Meta-policy strings accepted by [`site_control`].
pub const VALID_SITE_CONTROL: [&str; 6] = [
    "all",
    "by-content-type",
    "by-ftp-filename",
    "master-only",
    "none",
    "none-this-response",
];

pub fn new_policy() -> PolicyDocument {
    PolicyDocument::new()
}

pub fn allow_access_from(
    policy: &mut PolicyDocument,
    domain: &str,
    to_ports: Option<&str>,
    secure: Option<bool>,
) {
    policy.allow_access_from(domain, to_ports, secure);
}

pub fn allow_http_request_headers_from<I, S>(
    policy: &mut PolicyDocument,
    domain: &str,
    headers: I,
    secure: Option<bool>,
) where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    policy.allow_http_request_headers_from(domain, headers, secure);
}

/// Fails with `InvalidArgument` unless `permitted` is in [`VALID_SITE_CONTROL`].
pub fn site_control(policy: &mut PolicyDocument, permitted: &str) -> Result<()> {
    policy.try_site_control(permitted).map(|_| ())
}

pub fn simple_policy<I, S>(domains: I, to_ports: Option<&str>, secure: Option<bool>) -> PolicyDocument
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    PolicyDocument::simple(domains, to_ports, secure)
}

pub fn no_access_policy() -> PolicyDocument {
    PolicyDocument::no_access()
}

pub fn serialize(policy: &PolicyDocument) -> Result<Vec<u8>> {
    policy.to_bytes()
}
