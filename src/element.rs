//! Schema elements - the variant model
//!
//! Every parsed construct becomes one `SchemaElement` in the forest arena.
//! The element keeps its tag identity, all raw attributes (recognized or
//! not), its children and a parent index for navigation. What the constructor
//! validated and understood lives in the `Variant` payload; named references
//! to other definitions live in `links`.

use crate::kind::ElementKind;
use crate::occurs::Occurs;
use crate::reference::{Link, LinkAttribute, QName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Index of an element in its forest arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u32);

impl ElementId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Shift the id when an arena is appended behind `offset` elements
    pub(crate) fn offset(self, offset: u32) -> Self {
        Self(self.0 + offset)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of the document an element was parsed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub u32);

/// `elementFormDefault` / `attributeFormDefault` / `form`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Form {
    Qualified,
    #[default]
    Unqualified,
}

/// `use` of an attribute declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeUse {
    #[default]
    Optional,
    Required,
    Prohibited,
}

/// `processContents` of a wildcard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessContents {
    #[default]
    Strict,
    Lax,
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SchemaDecl {
    pub target_namespace: Option<String>,
    pub version: Option<String>,
    pub element_form_default: Form,
    pub attribute_form_default: Form,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementDecl {
    /// `None` for a `ref` use-site
    pub name: Option<String>,
    /// `None` for global declarations, which cannot repeat
    pub occurs: Option<Occurs>,
    pub type_name: Option<QName>,
    pub nillable: bool,
    pub is_abstract: bool,
    pub default: Option<String>,
    pub fixed: Option<String>,
    pub form: Option<Form>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupDecl {
    pub name: Option<String>,
    pub occurs: Option<Occurs>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wildcard {
    /// Only element wildcards (`any`) repeat
    pub occurs: Option<Occurs>,
    pub namespace: String,
    pub process_contents: ProcessContents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplexTypeDecl {
    pub name: Option<String>,
    pub mixed: bool,
    pub is_abstract: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeDecl {
    pub name: Option<String>,
    pub type_name: Option<QName>,
    pub attribute_use: AttributeUse,
    pub default: Option<String>,
    pub fixed: Option<String>,
    pub form: Option<Form>,
}

/// Content of `documentation` / `appinfo`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Documentation {
    pub source: Option<String>,
    pub lang: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facet {
    /// Local name of the facet (`enumeration`, `maxLength`, ...)
    pub facet: String,
    pub value: String,
    pub fixed: bool,
}

/// A dependency on another schema document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRef {
    pub kind: ElementKind,
    pub namespace: Option<String>,
    pub schema_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotationDecl {
    pub name: String,
    pub public: Option<String>,
    pub system: Option<String>,
}

/// Validated, structurally modeled payload of an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "variant", rename_all = "camelCase")]
pub enum Variant {
    Schema(SchemaDecl),
    Element(ElementDecl),
    Choice(Occurs),
    Sequence(Occurs),
    All(Occurs),
    Group(GroupDecl),
    Any(Wildcard),
    AnyAttribute(Wildcard),
    ComplexType(ComplexTypeDecl),
    SimpleType { name: Option<String> },
    Attribute(AttributeDecl),
    AttributeGroup { name: Option<String> },
    Annotation,
    Documentation(Documentation),
    AppInfo(Documentation),
    Restriction { base: Option<QName> },
    Extension { base: QName },
    SimpleContent,
    ComplexContent { mixed: Option<bool> },
    List { item_type: Option<QName> },
    Union { member_types: Vec<QName> },
    Facet(Facet),
    Import(DocumentRef),
    Include(DocumentRef),
    Redefine(DocumentRef),
    Notation(NotationDecl),
    IdentityConstraint { name: String, refer: Option<QName> },
    XPath { xpath: String },
}

/// One parsed schema construct.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaElement {
    pub id: ElementId,
    pub kind: ElementKind,
    /// Tag as written in the document
    pub tag: String,
    /// Every attribute of the source node, verbatim
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<ElementId>,
    /// Navigation only; the arena owns the element
    pub parent: Option<ElementId>,
    pub variant: Variant,
    /// Named references, unresolved until the resolver runs
    pub links: Vec<Link>,
    pub document: DocumentId,
}

impl SchemaElement {
    /// Create a detached element; the forest assigns id and parent
    pub fn new(kind: ElementKind, tag: impl Into<String>, variant: Variant) -> Self {
        Self {
            id: ElementId(0),
            kind,
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            parent: None,
            variant,
            links: Vec::new(),
            document: DocumentId(0),
        }
    }

    /// Set the raw attributes
    pub fn with_attributes(mut self, attributes: BTreeMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Set the reference placeholders
    pub fn with_links(mut self, links: Vec<Link>) -> Self {
        self.links = links;
        self
    }

    /// Name of a named construct
    pub fn name(&self) -> Option<&str> {
        match &self.variant {
            Variant::Element(decl) => decl.name.as_deref(),
            Variant::Group(decl) => decl.name.as_deref(),
            Variant::ComplexType(decl) => decl.name.as_deref(),
            Variant::SimpleType { name } | Variant::AttributeGroup { name } => name.as_deref(),
            Variant::Attribute(decl) => decl.name.as_deref(),
            Variant::Notation(decl) => Some(&decl.name),
            Variant::IdentityConstraint { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Occurrence constraint, for constructs that may repeat
    pub fn occurs(&self) -> Option<Occurs> {
        match &self.variant {
            Variant::Choice(occurs) | Variant::Sequence(occurs) | Variant::All(occurs) => {
                Some(*occurs)
            }
            Variant::Element(decl) => decl.occurs,
            Variant::Group(decl) => decl.occurs,
            Variant::Any(wildcard) => wildcard.occurs,
            _ => None,
        }
    }

    /// Raw attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The `ref="..."` placeholder of a use-site
    pub fn reference(&self) -> Option<&Link> {
        self.link(LinkAttribute::Ref)
    }

    /// First placeholder created from `attribute`
    pub fn link(&self, attribute: LinkAttribute) -> Option<&Link> {
        self.links.iter().find(|link| link.attribute == attribute)
    }

    /// True for a `ref` use-site without its own body
    pub fn is_reference(&self) -> bool {
        self.reference().is_some()
    }

    /// Short label for paths and diagnostics: `complexType[Foo]`
    pub fn label(&self) -> String {
        let local = match &self.variant {
            Variant::Facet(facet) => facet.facet.as_str(),
            _ => self.kind.as_str(),
        };
        match (self.name(), self.reference()) {
            (Some(name), _) => format!("{}[{}]", local, name),
            (None, Some(link)) => format!("{}[ref={}]", local, link.reference.name()),
            (None, None) => local.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::DefinitionKind;
    use crate::occurs::MaxOccurs;

    fn element_decl(name: Option<&str>, occurs: Option<Occurs>) -> ElementDecl {
        ElementDecl {
            name: name.map(str::to_string),
            occurs,
            type_name: None,
            nillable: false,
            is_abstract: false,
            default: None,
            fixed: None,
            form: None,
        }
    }

    #[test]
    fn test_name_and_occurs() {
        let occurs = Occurs::new(0, MaxOccurs::Unbounded);
        let element = SchemaElement::new(
            ElementKind::Element,
            "xs:element",
            Variant::Element(element_decl(Some("book"), Some(occurs))),
        );
        assert_eq!(element.name(), Some("book"));
        assert_eq!(element.occurs(), Some(occurs));
        assert_eq!(element.label(), "element[book]");

        let choice = SchemaElement::new(ElementKind::Choice, "xs:choice", Variant::Choice(Occurs::default()));
        assert_eq!(choice.name(), None);
        assert_eq!(choice.occurs(), Some(Occurs::default()));
        assert_eq!(choice.label(), "choice");
    }

    #[test]
    fn test_reference_label() {
        let element = SchemaElement::new(
            ElementKind::Element,
            "xs:element",
            Variant::Element(element_decl(None, Some(Occurs::default()))),
        )
        .with_links(vec![Link::new(LinkAttribute::Ref, QName::parse("tns:Foo"), DefinitionKind::Element)]);

        assert!(element.is_reference());
        assert_eq!(element.label(), "element[ref=tns:Foo]");
    }
}
