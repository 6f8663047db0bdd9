//! Schema forest - in-memory representation of parsed schemas
//!
//! An arena of `SchemaElement`s addressed by `ElementId`. Parent links are
//! plain indices into the same arena, so the cyclic schema graph (children,
//! parents, resolved references) never holds a second ownership claim.

use crate::element::{DocumentId, DocumentRef, ElementId, SchemaElement};
use crate::kind::{DefinitionKind, ElementKind};
use crate::reference::{Link, LinkAttribute, QName, Reference};
use crate::registry::Registry;
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;

/// A schema document dependency recorded while parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingDocument {
    /// Document containing the `import`/`include`/`redefine`
    pub document: DocumentId,
    pub element: ElementId,
    pub reference: DocumentRef,
}

/// A symbolic reference as listed by `dependencies`
#[derive(Debug, Clone, Serialize)]
pub struct Dependency {
    pub site: ElementId,
    pub attribute: LinkAttribute,
    pub name: QName,
    pub kind: DefinitionKind,
    pub resolved: bool,
    pub location: String,
}

/// Parsed schema documents and their registry.
#[derive(Debug, Default)]
pub struct SchemaForest {
    elements: Vec<SchemaElement>,
    /// Top-level elements, one per document
    roots: Vec<ElementId>,
    /// Document names, indexed by `DocumentId`
    documents: Vec<String>,
    pending: Vec<PendingDocument>,
    registry: Registry,
}

impl SchemaForest {
    /// Create an empty forest
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document name, returning its id
    pub fn add_document(&mut self, name: impl Into<String>) -> DocumentId {
        self.documents.push(name.into());
        DocumentId(self.documents.len() as u32 - 1)
    }

    /// Add a top-level element
    pub fn add_root(&mut self, element: SchemaElement) -> ElementId {
        let id = self.push(element, None);
        self.roots.push(id);
        id
    }

    /// Add `element` as the last child of `parent`.
    ///
    /// Callers go through `grammar::attach`, which checks legality first.
    pub(crate) fn insert_child(&mut self, parent: ElementId, element: SchemaElement) -> ElementId {
        let id = self.push(element, Some(parent));
        self.elements[parent.index()].children.push(id);
        id
    }

    fn push(&mut self, mut element: SchemaElement, parent: Option<ElementId>) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        element.id = id;
        element.parent = parent;
        element.children.clear();
        self.elements.push(element);
        id
    }

    /// Get an element by id
    pub fn get(&self, id: ElementId) -> Option<&SchemaElement> {
        self.elements.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: ElementId) -> Option<&mut SchemaElement> {
        self.elements.get_mut(id.index())
    }

    /// Structural children of an element
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    /// Children of one kind, e.g. the choices inside a sequence
    pub fn children_of_kind(&self, id: ElementId, kind: ElementKind) -> Vec<&SchemaElement> {
        self.children(id)
            .iter()
            .filter_map(|child| self.get(*child))
            .filter(|child| child.kind == kind)
            .collect()
    }

    /// Parent of an element
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).and_then(|e| e.parent)
    }

    /// Ancestors from the parent up to the document root
    pub fn ancestors(&self, id: ElementId) -> Vec<ElementId> {
        let mut chain = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            chain.push(parent);
            current = self.parent(parent);
        }
        chain
    }

    /// Readable path of an element: `/schema/complexType[Foo]/sequence`
    pub fn path(&self, id: ElementId) -> String {
        let mut labels: Vec<String> = self
            .ancestors(id)
            .iter()
            .rev()
            .filter_map(|a| self.get(*a))
            .map(SchemaElement::label)
            .collect();
        if let Some(element) = self.get(id) {
            labels.push(element.label());
        }
        format!("/{}", labels.join("/"))
    }

    /// Path prefixed with the document name
    pub fn location(&self, id: ElementId) -> String {
        match self.get(id).and_then(|e| self.document_name(e.document)) {
            Some(document) => format!("{}:{}", document, self.path(id)),
            None => self.path(id),
        }
    }

    /// Top-level elements
    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn document_name(&self, id: DocumentId) -> Option<&str> {
        self.documents.get(id.0 as usize).map(String::as_str)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Schema documents this forest depends on
    pub fn pending_documents(&self) -> &[PendingDocument] {
        &self.pending
    }

    pub(crate) fn record_pending(&mut self, pending: PendingDocument) {
        self.pending.push(pending);
    }

    /// Global definition by kind and local name
    pub fn global(&self, kind: DefinitionKind, name: &str) -> Option<&SchemaElement> {
        self.registry.lookup(kind, name).and_then(|id| self.get(id))
    }

    /// All global definitions of one kind
    pub fn globals(&self, kind: DefinitionKind) -> Vec<&SchemaElement> {
        self.registry
            .definitions(kind)
            .filter_map(|(_, id)| self.get(id))
            .collect()
    }

    /// The definition an element stands for: the target of its `ref`, or
    /// the element itself when it declares its body inline.
    pub fn target(&self, id: ElementId) -> Result<ElementId> {
        let element = self
            .get(id)
            .ok_or_else(|| Error::Internal(format!("missing element {}", id)))?;
        match element.reference() {
            Some(link) => self.follow(id, link),
            None => Ok(id),
        }
    }

    /// Target of the placeholder created from `attribute`, if the element has one
    pub fn link_target(&self, id: ElementId, attribute: LinkAttribute) -> Result<Option<ElementId>> {
        let Some(element) = self.get(id) else {
            return Ok(None);
        };
        element.link(attribute).map(|link| self.follow(id, link)).transpose()
    }

    fn follow(&self, site: ElementId, link: &Link) -> Result<ElementId> {
        link.reference.element().map_err(|err| match err {
            Error::UnresolvedReference { name, kind, .. } => Error::UnresolvedReference {
                name,
                kind,
                location: Some(self.location(site)),
            },
            other => other,
        })
    }

    /// Every placeholder in the forest, without forcing resolution
    pub fn dependencies(&self) -> Vec<Dependency> {
        self.elements
            .iter()
            .flat_map(|element| {
                element.links.iter().map(move |link| Dependency {
                    site: element.id,
                    attribute: link.attribute,
                    name: link.reference.name().clone(),
                    kind: link.reference.kind(),
                    resolved: link.reference.is_resolved(),
                    location: self.location(element.id),
                })
            })
            .collect()
    }

    /// All elements in arena order
    pub fn iter(&self) -> impl Iterator<Item = &SchemaElement> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append another forest, shifting all of its ids.
    ///
    /// Registries are merged with duplicate detection; on error this forest
    /// is left unchanged.
    pub(crate) fn absorb(&mut self, other: SchemaForest) -> Result<()> {
        let offset = self.elements.len() as u32;
        let document_offset = self.documents.len() as u32;

        let mut registry = self.registry.clone();
        registry.merge(other.registry, offset)?;
        self.registry = registry;

        for mut element in other.elements {
            element.id = element.id.offset(offset);
            element.parent = element.parent.map(|p| p.offset(offset));
            element.document = DocumentId(element.document.0 + document_offset);
            for child in element.children.iter_mut() {
                *child = child.offset(offset);
            }
            for link in element.links.iter_mut() {
                if let Reference::Resolved { target, .. } = &mut link.reference {
                    *target = target.offset(offset);
                }
            }
            self.elements.push(element);
        }
        self.roots.extend(other.roots.into_iter().map(|r| r.offset(offset)));
        self.documents.extend(other.documents);
        self.pending.extend(other.pending.into_iter().map(|p| PendingDocument {
            document: DocumentId(p.document.0 + document_offset),
            element: p.element.offset(offset),
            reference: p.reference,
        }));
        Ok(())
    }

    /// Get statistics about the forest
    pub fn stats(&self) -> GraphStats {
        let references: Vec<&Link> = self.elements.iter().flat_map(|e| e.links.iter()).collect();
        let resolved_references = references.iter().filter(|l| l.reference.is_resolved()).count();

        GraphStats {
            documents: self.documents.len(),
            elements: self.elements.len(),
            definitions: self.registry.len(),
            references: references.len(),
            resolved_references,
            pending_documents: self.pending.len(),
        }
    }
}

/// Statistics about a schema forest
#[derive(Debug, Clone, Serialize)]
pub struct GraphStats {
    pub documents: usize,
    pub elements: usize,
    pub definitions: usize,
    pub references: usize,
    pub resolved_references: usize,
    pub pending_documents: usize,
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Schema Graph Statistics:")?;
        writeln!(f, "  Documents: {}", self.documents)?;
        writeln!(f, "  Elements: {}", self.elements)?;
        writeln!(f, "  Global definitions: {}", self.definitions)?;
        writeln!(f, "  References: {} (resolved: {}, unresolved: {})",
            self.references, self.resolved_references, self.references - self.resolved_references)?;
        writeln!(f, "  Pending documents: {}", self.pending_documents)
    }
}
