//! Views that serve policy documents.
//!
//! Each view builds its document and hands it to [`serve`], which fixes
//! the content type and status.

use crate::{HttpResponse, Result};
use flashpolicy_core::{PolicyDocument, SiteControl};

/// Serve an already-built policy.
pub fn serve(policy: &PolicyDocument) -> Result<HttpResponse> {
    HttpResponse::policy(policy)
}

/// Serve a policy granting full access to `domains`.
pub fn simple<I, S>(domains: I) -> Result<HttpResponse>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    serve(&PolicyDocument::simple(domains, None, None))
}

/// Serve a policy that permits nothing.
pub fn no_access() -> Result<HttpResponse> {
    serve(&PolicyDocument::no_access())
}

/// Serve a meta-policy, optionally granting access to `domains`.
///
/// `permitted` is checked against the known meta-policies.
pub fn metapolicy<I, S>(permitted: &str, domains: I) -> Result<HttpResponse>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let permitted = permitted.parse::<SiteControl>()?;
    serve(&PolicyDocument::metapolicy(permitted, domains))
}
