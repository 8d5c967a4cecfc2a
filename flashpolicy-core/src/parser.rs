// Reading serialized policy documents

use crate::document::{DOCTYPE_NAME, ROOT_ELEMENT};
use crate::{
    AccessRule, HeaderAccessRule, PolicyDocument, PolicyElement, PolicyError, Result, SiteControl,
};
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

/// Parse a policy document produced by this crate or by hand.
///
/// The root must be `cross-domain-policy`. A DOCTYPE is optional, but when
/// present it must name `cross-domain-policy`. Children other than the
/// three supported elements, nested elements and non-whitespace text are
/// rejected.
pub(crate) fn parse_document(xml: &[u8]) -> Result<PolicyDocument> {
    let text = std::str::from_utf8(xml).map_err(|e| PolicyError::Parse(e.to_string()))?;
    let mut reader = Reader::from_str(text);

    let mut elements = Vec::new();
    let mut seen_root = false;
    let mut closed_root = false;
    // 0 = outside root, 1 = inside root, 2 = inside a child
    let mut depth = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| PolicyError::Parse(format!("at byte {}: {}", reader.buffer_position(), e)))?;

        match event {
            Event::DocType(doctype) => {
                let content = std::str::from_utf8(&doctype)
                    .map_err(|e| PolicyError::Parse(e.to_string()))?;
                let name = content.split_whitespace().next().unwrap_or_default();
                if name != DOCTYPE_NAME {
                    return Err(PolicyError::InvalidDocument(format!(
                        "unexpected DOCTYPE '{}'",
                        name
                    )));
                }
            }
            Event::Start(start) => {
                match depth {
                    0 => enter_root(&start, &mut seen_root, closed_root)?,
                    1 => elements.push(read_element(&start)?),
                    _ => {
                        return Err(PolicyError::InvalidDocument(format!(
                            "nested element <{}> is not allowed",
                            tag_name(&start)?
                        )));
                    }
                }
                depth += 1;
            }
            Event::Empty(start) => match depth {
                0 => {
                    enter_root(&start, &mut seen_root, closed_root)?;
                    closed_root = true;
                }
                1 => elements.push(read_element(&start)?),
                _ => {
                    return Err(PolicyError::InvalidDocument(format!(
                        "nested element <{}> is not allowed",
                        tag_name(&start)?
                    )));
                }
            },
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    closed_root = true;
                }
            }
            Event::Text(text) => {
                if !text.iter().all(u8::is_ascii_whitespace) {
                    return Err(PolicyError::InvalidDocument(
                        "unexpected text content".to_string(),
                    ));
                }
            }
            Event::CData(_) | Event::GeneralRef(_) => {
                return Err(PolicyError::InvalidDocument(
                    "unexpected text content".to_string(),
                ));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(PolicyError::InvalidDocument(format!(
            "missing <{}> root element",
            ROOT_ELEMENT
        )));
    }

    Ok(PolicyDocument::from(elements))
}

fn enter_root(start: &BytesStart<'_>, seen_root: &mut bool, closed_root: bool) -> Result<()> {
    let name = tag_name(start)?;
    if closed_root || *seen_root {
        return Err(PolicyError::InvalidDocument(format!(
            "unexpected element <{}> after the root element",
            name
        )));
    }
    if name != ROOT_ELEMENT {
        return Err(PolicyError::InvalidDocument(format!(
            "root element must be <{}>, found <{}>",
            ROOT_ELEMENT, name
        )));
    }
    *seen_root = true;
    Ok(())
}

fn tag_name(start: &BytesStart<'_>) -> Result<String> {
    std::str::from_utf8(start.name().as_ref())
        .map(str::to_string)
        .map_err(|e| PolicyError::Parse(e.to_string()))
}

fn read_attributes(start: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| PolicyError::Parse(e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| PolicyError::Parse(e.to_string()))?
            .to_string();
        let raw = std::str::from_utf8(&attr.value).map_err(|e| PolicyError::Parse(e.to_string()))?;
        let value = unescape(raw).map_err(|e| PolicyError::Parse(e.to_string()))?;
        attrs.push((key, value.into_owned()));
    }
    Ok(attrs)
}

fn parse_secure(value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(PolicyError::InvalidDocument(format!(
            "secure must be 'true' or 'false', found '{}'",
            other
        ))),
    }
}

fn read_element(start: &BytesStart<'_>) -> Result<PolicyElement> {
    let name = tag_name(start)?;
    let attrs = read_attributes(start)?;

    let unknown = |key: &str| {
        PolicyError::InvalidDocument(format!("unknown attribute '{}' on <{}>", key, name))
    };
    let missing = |key: &str| {
        PolicyError::InvalidDocument(format!("<{}> requires a '{}' attribute", name, key))
    };

    match name.as_str() {
        "allow-access-from" => {
            let mut domain = None;
            let mut to_ports = None;
            let mut secure = None;
            for (key, value) in attrs {
                match key.as_str() {
                    "domain" => domain = Some(value),
                    "to-ports" => to_ports = Some(value),
                    "secure" => secure = Some(parse_secure(&value)?),
                    other => return Err(unknown(other)),
                }
            }
            Ok(PolicyElement::AllowAccessFrom(AccessRule {
                domain: domain.ok_or_else(|| missing("domain"))?,
                to_ports,
                secure,
            }))
        }
        "allow-http-request-headers-from" => {
            let mut domain = None;
            let mut headers = None;
            let mut secure = None;
            for (key, value) in attrs {
                match key.as_str() {
                    "domain" => domain = Some(value),
                    "headers" => headers = Some(value),
                    "secure" => secure = Some(parse_secure(&value)?),
                    other => return Err(unknown(other)),
                }
            }
            Ok(PolicyElement::AllowHttpRequestHeadersFrom(HeaderAccessRule {
                domain: domain.ok_or_else(|| missing("domain"))?,
                headers: headers.ok_or_else(|| missing("headers"))?,
                secure,
            }))
        }
        "site-control" => {
            let mut permitted = None;
            for (key, value) in attrs {
                match key.as_str() {
                    "permitted-cross-domain-policies" => permitted = Some(value),
                    other => return Err(unknown(other)),
                }
            }
            let permitted = permitted.ok_or_else(|| missing("permitted-cross-domain-policies"))?;
            Ok(PolicyElement::SiteControl(permitted.parse::<SiteControl>()?))
        }
        other => Err(PolicyError::InvalidDocument(format!(
            "unsupported element <{}>",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hand_written_policy() {
        let xml = r#"<?xml version="1.0"?>
<!DOCTYPE cross-domain-policy SYSTEM "http://www.adobe.com/xml/dtds/cross-domain-policy.dtd">
<cross-domain-policy>
    <site-control permitted-cross-domain-policies="master-only"/>
    <allow-access-from domain="*.example.com" to-ports="80,443"/>
    <allow-http-request-headers-from domain="*.example.com" headers="SOAPAction"></allow-http-request-headers-from>
</cross-domain-policy>
"#;
        let policy = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(policy.len(), 3);
        assert_eq!(policy.site_controls().collect::<Vec<_>>(), vec![SiteControl::MasterOnly]);
        let rule = policy.access_rules().next().unwrap();
        assert_eq!(rule.to_ports.as_deref(), Some("80,443"));
        assert_eq!(rule.secure, None);
        assert_eq!(policy.header_rules().next().unwrap().headers, "SOAPAction");
    }

    #[test]
    fn test_parse_without_doctype() {
        let policy = parse_document(b"<cross-domain-policy/>").unwrap();
        assert!(policy.is_empty());
    }

    #[test]
    fn test_parse_unescapes_attributes() {
        let xml = br#"<cross-domain-policy><allow-access-from domain="a&amp;b.com"/></cross-domain-policy>"#;
        let policy = parse_document(xml).unwrap();
        assert_eq!(policy.access_rules().next().unwrap().domain, "a&b.com");
    }

    #[test]
    fn test_rejects_wrong_root() {
        let err = parse_document(b"<policy/>").unwrap_err();
        assert!(matches!(err, PolicyError::InvalidDocument(_)));
    }

    #[test]
    fn test_rejects_wrong_doctype() {
        let xml = b"<!DOCTYPE html><cross-domain-policy/>";
        assert!(matches!(parse_document(xml), Err(PolicyError::InvalidDocument(_))));
    }

    #[test]
    fn test_rejects_missing_root() {
        assert!(matches!(parse_document(b""), Err(PolicyError::InvalidDocument(_))));
    }

    #[test]
    fn test_rejects_bad_site_control() {
        let xml = br#"<cross-domain-policy><site-control permitted-cross-domain-policies="sometimes"/></cross-domain-policy>"#;
        assert!(matches!(parse_document(xml), Err(PolicyError::InvalidArgument(_))));
    }

    #[test]
    fn test_rejects_bad_secure_flag() {
        let xml = br#"<cross-domain-policy><allow-access-from domain="a.com" secure="yes"/></cross-domain-policy>"#;
        assert!(matches!(parse_document(xml), Err(PolicyError::InvalidDocument(_))));
    }

    #[test]
    fn test_rejects_missing_domain() {
        let xml = br#"<cross-domain-policy><allow-access-from to-ports="80"/></cross-domain-policy>"#;
        let err = parse_document(xml).unwrap_err();
        assert!(err.to_string().contains("domain"));
    }

    #[test]
    fn test_rejects_unsupported_element() {
        let xml = br#"<cross-domain-policy><allow-access-from-identity/></cross-domain-policy>"#;
        assert!(matches!(parse_document(xml), Err(PolicyError::InvalidDocument(_))));
    }

    #[test]
    fn test_rejects_nested_elements() {
        let xml = br#"<cross-domain-policy><allow-access-from domain="a.com"><x/></allow-access-from></cross-domain-policy>"#;
        assert!(matches!(parse_document(xml), Err(PolicyError::InvalidDocument(_))));
    }

    #[test]
    fn test_rejects_text_content() {
        let xml = b"<cross-domain-policy>hello</cross-domain-policy>";
        assert!(matches!(parse_document(xml), Err(PolicyError::InvalidDocument(_))));
    }

    #[test]
    fn test_rejects_entity_text() {
        let xml = b"<cross-domain-policy>&amp;</cross-domain-policy>";
        assert!(matches!(parse_document(xml), Err(PolicyError::InvalidDocument(_))));
    }

    #[test]
    fn test_rejects_cdata() {
        let xml = b"<cross-domain-policy><![CDATA[allow everything]]></cross-domain-policy>";
        assert!(matches!(parse_document(xml), Err(PolicyError::InvalidDocument(_))));
    }

    #[test]
    fn test_rejects_malformed_xml() {
        let xml = b"<cross-domain-policy><allow-access-from domain=\"a.com\"/></policy>";
        assert!(parse_document(xml).is_err());
    }
}
