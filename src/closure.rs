//! Document closure - one forest for a set of schema documents
//!
//! Every document is parsed on its own, with its own registry. Merging
//! appends the arenas behind each other and joins the registries, so a name
//! defined by two documents of the closure is reported once, at merge time.

use crate::graph::SchemaForest;
use crate::resolver::{resolve, ResolvedSchemaGraph};
use crate::{Error, Result};

/// Independently parsed schema documents
#[derive(Debug, Default)]
pub struct SchemaSet {
    forests: Vec<SchemaForest>,
}

impl SchemaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parsed document
    pub fn add(&mut self, forest: SchemaForest) {
        self.forests.push(forest);
    }

    pub fn len(&self) -> usize {
        self.forests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forests.is_empty()
    }

    /// Names of the documents, in the order they were added
    pub fn documents(&self) -> impl Iterator<Item = &str> {
        self.forests
            .iter()
            .flat_map(|forest| forest.documents().iter().map(String::as_str))
    }

    /// Merge all documents into one forest.
    ///
    /// Fails with `DuplicateDefinition` when two documents define the same
    /// name in the same symbol space. Definitions inside `redefine` replace
    /// the entry they redefine.
    pub fn merge(self) -> Result<SchemaForest> {
        let mut merged = SchemaForest::new();
        for forest in self.forests {
            merged.absorb(forest)?;
        }
        merged.registry_mut().apply_overrides();

        tracing::debug!(
            "Merged {} documents: {} elements, {} definitions",
            merged.documents().len(),
            merged.len(),
            merged.registry().len()
        );
        Ok(merged)
    }

    /// Merge, then resolve every placeholder of the closure
    pub fn resolve(self) -> Result<(ResolvedSchemaGraph, Vec<Error>)> {
        Ok(resolve(self.merge()?))
    }
}

impl FromIterator<SchemaForest> for SchemaSet {
    fn from_iter<I: IntoIterator<Item = SchemaForest>>(iter: I) -> Self {
        Self {
            forests: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Variant;
    use crate::kind::{DefinitionKind, ElementKind};
    use crate::node::Node;
    use crate::parser::Parser;
    use crate::reference::LinkAttribute;

    fn parse(name: &str, children: impl IntoIterator<Item = Node>) -> SchemaForest {
        let root = Node::new("xs:schema").with_children(children);
        Parser::default().parse_document(name, &root).unwrap()
    }

    #[test]
    fn test_duplicate_across_documents() {
        let first = parse("a.xsd", [Node::new("xs:element").with_attr("name", "Bar")]);
        let second = parse("b.xsd", [Node::new("xs:element").with_attr("name", "Bar")]);

        let set: SchemaSet = [first, second].into_iter().collect();
        let err = set.merge().unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateDefinition { kind: DefinitionKind::Element, ref name } if name == "Bar"
        ));
    }

    #[test]
    fn test_cross_document_reference() {
        let types = parse(
            "types.xsd",
            [Node::new("xs:simpleType").with_attr("name", "Isbn").with_child(
                Node::new("xs:restriction").with_attr("base", "xs:string"),
            )],
        );
        let main = parse(
            "main.xsd",
            [
                Node::new("xs:include").with_attr("schemaLocation", "types.xsd"),
                Node::new("xs:element").with_attr("name", "isbn").with_attr("type", "Isbn"),
            ],
        );

        let mut set = SchemaSet::new();
        set.add(main);
        set.add(types);
        assert_eq!(set.documents().collect::<Vec<_>>(), vec!["main.xsd", "types.xsd"]);

        let (graph, errors) = set.resolve().unwrap();
        assert!(errors.is_empty());

        let forest = graph.forest();
        let isbn = forest.global(DefinitionKind::Element, "isbn").unwrap();
        let target = forest.link_target(isbn.id, LinkAttribute::Type).unwrap().unwrap();
        assert_eq!(forest.location(target), "types.xsd:/schema/simpleType[Isbn]");
        assert_eq!(forest.pending_documents().len(), 1);
    }

    #[test]
    fn test_redefine_replaces_original() {
        let original = parse(
            "base.xsd",
            [Node::new("xs:complexType").with_attr("name", "Address").with_child(
                Node::new("xs:sequence")
                    .with_child(Node::new("xs:element").with_attr("name", "street").with_attr("type", "xs:string")),
            )],
        );
        let redefining = parse(
            "extended.xsd",
            [
                Node::new("xs:redefine").with_attr("schemaLocation", "base.xsd").with_child(
                    Node::new("xs:complexType").with_attr("name", "Address").with_child(
                        Node::new("xs:complexContent").with_child(
                            Node::new("xs:extension").with_attr("base", "Address").with_child(
                                Node::new("xs:sequence").with_child(
                                    Node::new("xs:element").with_attr("name", "country").with_attr("type", "xs:string"),
                                ),
                            ),
                        ),
                    ),
                ),
                Node::new("xs:element").with_attr("name", "home").with_attr("type", "Address"),
            ],
        );

        let set: SchemaSet = [original, redefining].into_iter().collect();
        let (graph, errors) = set.resolve().unwrap();
        assert!(errors.is_empty());

        let forest = graph.forest();
        let address = forest.global(DefinitionKind::Type, "Address").unwrap();
        assert_eq!(forest.location(address.id), "extended.xsd:/schema/redefine/complexType[Address]");

        // The extension inside the redefinition points at the original
        let extension = forest
            .iter()
            .find(|e| matches!(e.variant, Variant::Extension { .. }))
            .unwrap();
        let base = forest.link_target(extension.id, LinkAttribute::Base).unwrap().unwrap();
        assert_eq!(forest.location(base), "base.xsd:/schema/complexType[Address]");

        let home = forest.global(DefinitionKind::Element, "home").unwrap();
        assert_eq!(forest.link_target(home.id, LinkAttribute::Type).unwrap(), Some(address.id));
        assert_eq!(forest.get(base).map(|e| e.kind), Some(ElementKind::ComplexType));
    }

    #[test]
    fn test_empty_set_merges_to_empty_forest() {
        let forest = SchemaSet::new().merge().unwrap();
        assert!(forest.is_empty());
        assert!(forest.registry().is_empty());
    }
}
