//! Generic document node
//!
//! The parser never sees raw markup. Whatever reads the XML hands over a tree
//! of `Node`s: a tag name as written in the document, the attributes, the
//! element children in document order, and the text content.

use std::collections::BTreeMap;

/// One element of the input document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Qualified tag name as written (`xs:element`)
    pub tag: String,
    /// Attribute name → raw value
    pub attributes: BTreeMap<String, String>,
    /// Element children in document order
    pub children: Vec<Node>,
    /// Concatenated text content, if any
    pub text: Option<String>,
}

impl Node {
    /// Create a node with no attributes or children
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Add an attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Append a child
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Set the text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let node = Node::new("xs:sequence")
            .with_attr("minOccurs", "0")
            .with_child(Node::new("xs:element").with_attr("name", "a"))
            .with_child(Node::new("xs:element").with_attr("name", "b"));

        assert_eq!(node.tag, "xs:sequence");
        assert_eq!(node.attr("minOccurs"), Some("0"));
        assert_eq!(node.attr("maxOccurs"), None);
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.children[1].attr("name"), Some("b"));
    }
}
