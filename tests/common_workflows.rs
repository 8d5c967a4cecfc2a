//! Integration tests for common flashpolicy workflows.
//!
//! These tests go through the facade crate the way an application would.

use flashpolicy::prelude::*;
use std::io::Write;

// =============================================================================
// Building Policies
// =============================================================================

#[test]
fn test_build_and_serialize_policy() {
    let mut policy = new_policy();
    site_control(&mut policy, "master-only").unwrap();
    allow_access_from(&mut policy, "*.example.com", Some("80,443"), None);
    allow_http_request_headers_from(&mut policy, "*.example.com", ["SOAPAction"], Some(true));

    let xml = String::from_utf8(serialize(&policy).unwrap()).unwrap();
    assert_eq!(
        xml,
        "<?xml version=\"1.0\"?>\n\
         <!DOCTYPE cross-domain-policy SYSTEM \"http://www.adobe.com/xml/dtds/cross-domain-policy.dtd\">\n\
         <cross-domain-policy>\n  \
         <site-control permitted-cross-domain-policies=\"master-only\"/>\n  \
         <allow-access-from domain=\"*.example.com\" to-ports=\"80,443\"/>\n  \
         <allow-http-request-headers-from domain=\"*.example.com\" headers=\"SOAPAction\" secure=\"true\"/>\n\
         </cross-domain-policy>"
    );
}

#[test]
fn test_rejected_site_control_leaves_policy_unchanged() {
    let mut policy = simple_policy(["a.com"], None, None);
    let before = policy.clone();

    let err = site_control(&mut policy, "sometimes").unwrap_err();
    assert!(matches!(err, PolicyError::InvalidArgument(_)));
    assert_eq!(policy, before);
}

#[test]
fn test_no_access_policy_round_trip() {
    let xml = serialize(&no_access_policy()).unwrap();
    let parsed = PolicyDocument::parse(&xml).unwrap();

    assert_eq!(parsed.site_controls().collect::<Vec<_>>(), vec![SiteControl::None]);
    assert_eq!(parsed.access_rules().count(), 0);
}

// =============================================================================
// Serving Policies
// =============================================================================

#[test]
fn test_configured_router_serves_policies() {
    let file = tempfile_toml(
        r#"
        [[policies]]
        path = "/crossdomain.xml"
        view = "simple"
        domains = ["media.example.com"]
        secure = false
        "#,
    );

    let config = ConfigBuilder::new().file(file.path()).build().unwrap();
    let router = Router::from_config(&config);

    let response = router.respond(&HttpRequest::get("/crossdomain.xml?v=2"));
    assert_eq!(response.status, 200);
    assert_eq!(response.header("content-type"), Some(CONTENT_TYPE));

    let policy = PolicyDocument::parse(&response.body).unwrap();
    assert_eq!(policy, simple_policy(["media.example.com"], None, Some(false)));

    let head = router.respond(&HttpRequest::new("HEAD", "/crossdomain.xml"));
    assert_eq!(head.status, 200);
    assert!(head.body.is_empty());

    assert_eq!(router.respond(&HttpRequest::get("/other.xml")).status, 404);
}

#[test]
fn test_views_produce_policy_responses() {
    let response = views::metapolicy("by-content-type", ["a.com"]).unwrap();
    let policy = PolicyDocument::parse(&response.body).unwrap();
    assert_eq!(policy.site_controls().next(), Some(SiteControl::ByContentType));
    assert_eq!(policy.access_rules().next().unwrap().domain, "a.com");

    assert!(views::metapolicy("sometimes", ["a.com"]).is_err());
}

fn tempfile_toml(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}
