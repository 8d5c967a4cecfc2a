// Policy document model and builder

use crate::{Result, SiteControl, parser, writer};
use std::str::FromStr;

/// Name of the DOCTYPE declared by every policy document.
pub const DOCTYPE_NAME: &str = "cross-domain-policy";

/// System identifier of the Adobe cross-domain policy DTD.
pub const DOCTYPE_SYSTEM_ID: &str = "http://www.adobe.com/xml/dtds/cross-domain-policy.dtd";

/// Tag name of the root element.
pub const ROOT_ELEMENT: &str = "cross-domain-policy";

/// An `allow-access-from` rule.
///
/// ```
/// use flashpolicy_core::AccessRule;
///
/// let rule = AccessRule::new("*.example.com").to_ports("80,443").secure(false);
/// assert_eq!(rule.to_ports.as_deref(), Some("80,443"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRule {
    pub domain: String,
    /// Port list for socket policies, e.g. `80,8080,9000-10000`. Not interpreted.
    pub to_ports: Option<String>,
    pub secure: Option<bool>,
}

impl AccessRule {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            to_ports: None,
            secure: None,
        }
    }

    pub fn to_ports(mut self, ports: impl Into<String>) -> Self {
        self.to_ports = Some(ports.into());
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }
}

/// An `allow-http-request-headers-from` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderAccessRule {
    pub domain: String,
    /// Comma-separated header names, exactly as emitted.
    pub headers: String,
    pub secure: Option<bool>,
}

impl HeaderAccessRule {
    /// Join `headers` with commas. A single pre-joined string is kept as is.
    pub fn new<I, S>(domain: impl Into<String>, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let headers: Vec<String> = headers
            .into_iter()
            .map(|h| h.as_ref().to_string())
            .collect();

        Self {
            domain: domain.into(),
            headers: headers.join(","),
            secure: None,
        }
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    /// Individual header names, trimmed, skipping empty entries.
    pub fn header_names(&self) -> impl Iterator<Item = &str> {
        self.headers
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// One child of the `cross-domain-policy` root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyElement {
    AllowAccessFrom(AccessRule),
    AllowHttpRequestHeadersFrom(HeaderAccessRule),
    SiteControl(SiteControl),
}

impl PolicyElement {
    /// XML tag name of the element.
    pub fn tag_name(&self) -> &'static str {
        match self {
            PolicyElement::AllowAccessFrom(_) => "allow-access-from",
            PolicyElement::AllowHttpRequestHeadersFrom(_) => "allow-http-request-headers-from",
            PolicyElement::SiteControl(_) => "site-control",
        }
    }

    /// Attributes in emission order. Optional attributes appear only when set.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = Vec::with_capacity(3);
        match self {
            PolicyElement::AllowAccessFrom(rule) => {
                attrs.push(("domain", rule.domain.clone()));
                if let Some(ref ports) = rule.to_ports {
                    attrs.push(("to-ports", ports.clone()));
                }
                if let Some(secure) = rule.secure {
                    attrs.push(("secure", secure.to_string()));
                }
            }
            PolicyElement::AllowHttpRequestHeadersFrom(rule) => {
                attrs.push(("domain", rule.domain.clone()));
                attrs.push(("headers", rule.headers.clone()));
                if let Some(secure) = rule.secure {
                    attrs.push(("secure", secure.to_string()));
                }
            }
            PolicyElement::SiteControl(value) => {
                attrs.push(("permitted-cross-domain-policies", value.as_str().to_string()));
            }
        }
        attrs
    }
}

/// A cross-domain policy document.
///
/// The DOCTYPE and root element are fixed; only the ordered list of
/// children varies. Children are emitted in insertion order.
///
/// The document enforces no cardinality on `site-control` or
/// `allow-http-request-headers-from`: adding either twice yields a
/// document with duplicates. Keeping one of each is up to the caller.
///
/// ```
/// use flashpolicy_core::{PolicyDocument, SiteControl};
///
/// let mut policy = PolicyDocument::new();
/// policy
///     .site_control(SiteControl::MasterOnly)
///     .allow_access_from("media.example.com", Some("80,443"), None);
///
/// let xml = policy.to_xml_string().unwrap();
/// assert!(xml.contains(r#"<allow-access-from domain="media.example.com" to-ports="80,443"/>"#));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyDocument {
    elements: Vec<PolicyElement>,
}

impl PolicyDocument {
    /// An empty policy: DOCTYPE plus a childless root.
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// A policy granting every domain in `domains` access, in order, each
    /// rule carrying the same `to_ports` and `secure` values.
    pub fn simple<I, S>(domains: I, to_ports: Option<&str>, secure: Option<bool>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut policy = Self::new();
        for domain in domains {
            policy.allow_access_from(domain, to_ports, secure);
        }
        policy
    }

    /// The most restrictive policy: a single `site-control` of `none`.
    pub fn no_access() -> Self {
        let mut policy = Self::new();
        policy.site_control(SiteControl::None);
        policy
    }

    /// A `site-control` of `permitted` followed by an access rule per domain.
    pub fn metapolicy<I, S>(permitted: SiteControl, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut policy = Self::new();
        policy.site_control(permitted);
        for domain in domains {
            policy.allow_access_from(domain, None, None);
        }
        policy
    }

    pub fn doctype_name(&self) -> &'static str {
        DOCTYPE_NAME
    }

    pub fn doctype_system_id(&self) -> &'static str {
        DOCTYPE_SYSTEM_ID
    }

    pub fn root_name(&self) -> &'static str {
        ROOT_ELEMENT
    }

    pub fn elements(&self) -> &[PolicyElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn access_rules(&self) -> impl Iterator<Item = &AccessRule> {
        self.elements.iter().filter_map(|element| match element {
            PolicyElement::AllowAccessFrom(rule) => Some(rule),
            _ => None,
        })
    }

    pub fn header_rules(&self) -> impl Iterator<Item = &HeaderAccessRule> {
        self.elements.iter().filter_map(|element| match element {
            PolicyElement::AllowHttpRequestHeadersFrom(rule) => Some(rule),
            _ => None,
        })
    }

    pub fn site_controls(&self) -> impl Iterator<Item = SiteControl> + '_ {
        self.elements.iter().filter_map(|element| match element {
            PolicyElement::SiteControl(value) => Some(*value),
            _ => None,
        })
    }

    /// Append an `allow-access-from` element.
    pub fn allow_access_from(
        &mut self,
        domain: impl Into<String>,
        to_ports: Option<&str>,
        secure: Option<bool>,
    ) -> &mut Self {
        self.push(PolicyElement::AllowAccessFrom(AccessRule {
            domain: domain.into(),
            to_ports: to_ports.map(str::to_string),
            secure,
        }))
    }

    /// Append an `allow-http-request-headers-from` element.
    pub fn allow_http_request_headers_from<I, S>(
        &mut self,
        domain: impl Into<String>,
        headers: I,
        secure: Option<bool>,
    ) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rule = HeaderAccessRule::new(domain, headers);
        rule.secure = secure;
        self.push(PolicyElement::AllowHttpRequestHeadersFrom(rule))
    }

    /// Append a `site-control` element.
    pub fn site_control(&mut self, permitted: SiteControl) -> &mut Self {
        self.push(PolicyElement::SiteControl(permitted))
    }

    /// Append a `site-control` element from a raw string.
    ///
    /// Fails with [`PolicyError::InvalidArgument`](crate::PolicyError) if
    /// the value is not a known meta-policy; the document is left unchanged.
    pub fn try_site_control(&mut self, permitted: &str) -> Result<&mut Self> {
        let value = permitted.parse::<SiteControl>()?;
        Ok(self.site_control(value))
    }

    /// Append any element.
    pub fn push(&mut self, element: PolicyElement) -> &mut Self {
        self.elements.push(element);
        self
    }

    /// Serialize to UTF-8 XML bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        writer::write_document(self)
    }

    pub fn to_xml_string(&self) -> Result<String> {
        let bytes = self.to_bytes()?;
        String::from_utf8(bytes).map_err(|e| crate::PolicyError::Serialization(e.to_string()))
    }

    /// Read a serialized policy back into a document.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        parser::parse_document(xml)
    }
}

impl From<Vec<PolicyElement>> for PolicyDocument {
    fn from(elements: Vec<PolicyElement>) -> Self {
        Self { elements }
    }
}

impl FromStr for PolicyDocument {
    type Err = crate::PolicyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s.as_bytes())
    }
}
