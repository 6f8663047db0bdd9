//! XML adapter - roxmltree documents to generic nodes
//!
//! roxmltree resolves namespaces but does not keep prefixes; tags and
//! attribute names are rebuilt from the prefix bound to their namespace at
//! that node, so `xs:element` stays `xs:element` and `xml:lang` stays
//! `xml:lang`.

use crate::node::Node;
use crate::{Error, Result};
use roxmltree::{Document, ParsingOptions};
use std::path::Path;

/// Namespace of the `xml:` prefix, bound implicitly
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Parse XML text into a node tree rooted at the document element
pub fn parse_document(text: &str) -> Result<Node> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let document = Document::parse_with_options(text, options).map_err(|e| Error::Xml(e.to_string()))?;
    Ok(convert(document.root_element()))
}

/// Read and parse an XML file
pub fn parse_file(path: &Path) -> Result<Node> {
    let text = std::fs::read_to_string(path)?;
    parse_document(&text).map_err(|err| match err {
        Error::Xml(message) => Error::Xml(format!("{}: {}", path.display(), message)),
        other => other,
    })
}

fn convert(node: roxmltree::Node<'_, '_>) -> Node {
    let tag = qualified(node, node.tag_name().namespace(), node.tag_name().name());
    let mut converted = Node::new(tag);

    for attribute in node.attributes() {
        let name = qualified(node, attribute.namespace(), attribute.name());
        converted.attributes.insert(name, attribute.value().to_string());
    }

    let text: String = node
        .children()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .collect();
    let text = text.trim();
    if !text.is_empty() {
        converted.text = Some(text.to_string());
    }

    converted.children = node
        .children()
        .filter(|child| child.is_element())
        .map(convert)
        .collect();
    converted
}

fn qualified(node: roxmltree::Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    match namespace.and_then(|uri| prefix_for(node, uri)) {
        Some(prefix) => format!("{}:{}", prefix, local),
        None => local.to_string(),
    }
}

/// Prefix bound to `uri` at `node`; `None` for the default namespace
fn prefix_for(node: roxmltree::Node<'_, '_>, uri: &str) -> Option<String> {
    if uri == XML_NAMESPACE {
        return Some("xml".to_string());
    }
    node.namespaces()
        .find(|ns| ns.uri() == uri)
        .and_then(|ns| ns.name())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOKS: &str = r#"<?xml version="1.0"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:books">
  <xs:element name="book">
    <xs:annotation>
      <xs:documentation xml:lang="en">A  book</xs:documentation>
    </xs:annotation>
  </xs:element>
</xs:schema>"#;

    #[test]
    fn test_prefixed_tags_are_kept() {
        let root = parse_document(BOOKS).unwrap();
        assert_eq!(root.tag, "xs:schema");
        assert_eq!(root.attr("targetNamespace"), Some("urn:books"));
        assert_eq!(root.children.len(), 1);

        let book = &root.children[0];
        assert_eq!(book.tag, "xs:element");
        assert_eq!(book.attr("name"), Some("book"));
        assert_eq!(book.text, None);

        let documentation = &book.children[0].children[0];
        assert_eq!(documentation.tag, "xs:documentation");
        assert_eq!(documentation.attr("xml:lang"), Some("en"));
        assert_eq!(documentation.text.as_deref(), Some("A  book"));
    }

    #[test]
    fn test_default_namespace_is_unprefixed() {
        let text = r#"<schema xmlns="http://www.w3.org/2001/XMLSchema"><element name="a"/></schema>"#;
        let root = parse_document(text).unwrap();
        assert_eq!(root.tag, "schema");
        assert_eq!(root.children[0].tag, "element");
    }

    #[test]
    fn test_malformed_xml() {
        let err = parse_document("<xs:schema xmlns:xs=\"urn:x\">").unwrap_err();
        assert!(matches!(err, Error::Xml(_)));
    }
}
