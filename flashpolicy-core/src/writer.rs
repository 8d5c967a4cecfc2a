// XML serialization of policy documents

use crate::document::{DOCTYPE_NAME, DOCTYPE_SYSTEM_ID, ROOT_ELEMENT};
use crate::{PolicyDocument, PolicyElement, PolicyError, Result};
use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use std::borrow::Cow;

const INDENT_SIZE: usize = 2;

/// Render `policy` as UTF-8 XML, two-space indented.
///
/// Output never depends on anything but the document's children, so two
/// calls on the same document produce identical bytes.
pub(crate) fn write_document(policy: &PolicyDocument) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE);

    write_event(&mut writer, Event::Decl(BytesDecl::new("1.0", None, None)))?;

    let doctype = format!("{} SYSTEM \"{}\"", DOCTYPE_NAME, DOCTYPE_SYSTEM_ID);
    write_event(&mut writer, Event::DocType(BytesText::from_escaped(doctype)))?;

    if policy.is_empty() {
        write_event(&mut writer, Event::Empty(BytesStart::new(ROOT_ELEMENT)))?;
    } else {
        write_event(&mut writer, Event::Start(BytesStart::new(ROOT_ELEMENT)))?;
        for element in policy.elements() {
            write_event(&mut writer, Event::Empty(element_start(element)))?;
        }
        write_event(&mut writer, Event::End(BytesEnd::new(ROOT_ELEMENT)))?;
    }

    Ok(writer.into_inner())
}

fn element_start(element: &PolicyElement) -> BytesStart<'static> {
    let mut start = BytesStart::new(element.tag_name());
    for (name, value) in element.attributes() {
        start.push_attribute(Attribute {
            key: QName(name.as_bytes()),
            value: Cow::Owned(escape_attribute(&value).into_bytes()),
        });
    }
    start
}

/// Markup characters become entities; tab, CR and LF become character
/// references so attribute-value normalization keeps them.
fn escape_attribute(value: &str) -> String {
    let escaped = escape(value);
    let mut out = String::with_capacity(escaped.len());
    for ch in escaped.chars() {
        match ch {
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            other => out.push(other),
        }
    }
    out
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| PolicyError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccessRule, SiteControl};

    fn render(policy: &PolicyDocument) -> String {
        String::from_utf8(write_document(policy).unwrap()).unwrap()
    }

    #[test]
    fn test_empty_policy_output() {
        let xml = render(&PolicyDocument::new());
        assert_eq!(
            xml,
            "<?xml version=\"1.0\"?>\n\
             <!DOCTYPE cross-domain-policy SYSTEM \"http://www.adobe.com/xml/dtds/cross-domain-policy.dtd\">\n\
             <cross-domain-policy/>"
        );
    }

    #[test]
    fn test_full_policy_output() {
        let mut policy = PolicyDocument::new();
        policy
            .push(PolicyElement::AllowAccessFrom(
                AccessRule::new("media.example.com").to_ports("80").secure(false),
            ))
            .allow_http_request_headers_from("api.example.com", ["SOAPAction"], None)
            .site_control(SiteControl::MasterOnly);

        let xml = render(&policy);
        assert_eq!(
            xml,
            "<?xml version=\"1.0\"?>\n\
             <!DOCTYPE cross-domain-policy SYSTEM \"http://www.adobe.com/xml/dtds/cross-domain-policy.dtd\">\n\
             <cross-domain-policy>\n  \
             <allow-access-from domain=\"media.example.com\" to-ports=\"80\" secure=\"false\"/>\n  \
             <allow-http-request-headers-from domain=\"api.example.com\" headers=\"SOAPAction\"/>\n  \
             <site-control permitted-cross-domain-policies=\"master-only\"/>\n\
             </cross-domain-policy>"
        );
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let mut policy = PolicyDocument::new();
        policy.allow_access_from("a&b<c>\"d\".com", None, None);

        let xml = render(&policy);
        assert!(xml.contains("a&amp;b&lt;c&gt;&quot;d&quot;.com"));
        assert!(!xml.contains("a&b"));
    }

    #[test]
    fn test_attribute_whitespace_uses_character_references() {
        let mut policy = PolicyDocument::new();
        policy.allow_http_request_headers_from("a.com", ["X-One,\tX-Two\r\nX-Three"], None);

        let xml = render(&policy);
        assert!(xml.contains(r#"headers="X-One,&#9;X-Two&#13;&#10;X-Three""#));

        let parsed = PolicyDocument::parse(xml.as_bytes()).unwrap();
        assert_eq!(parsed, policy);
    }

    #[test]
    fn test_serialization_is_repeatable() {
        let policy = PolicyDocument::simple(["a.com", "b.com"], Some("443"), Some(true));
        assert_eq!(write_document(&policy).unwrap(), write_document(&policy).unwrap());
    }
}
