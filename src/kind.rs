//! Element kinds - the closed set of XSD constructs
//!
//! Every tag the parser understands maps onto one `ElementKind`. The kind is
//! the tag identity of a parsed element: it selects the grammar rule set that
//! decides which children are legal, and the constructor that validates the
//! element's attributes.
//!
//! Named top-level definitions additionally live in one of the XSD symbol
//! spaces, modeled by `DefinitionKind`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of a schema construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    /// `xs:schema` - the document root
    Schema,
    Element,
    Choice,
    Sequence,
    /// Named model group definition or group reference
    Group,
    All,
    /// Element wildcard
    Any,
    ComplexType,
    SimpleType,
    Attribute,
    AttributeGroup,
    Annotation,
    Documentation,
    AppInfo,
    Restriction,
    Extension,
    SimpleContent,
    ComplexContent,
    /// Attribute wildcard
    AnyAttribute,
    List,
    Union,
    /// Any of the constraining facets (`enumeration`, `pattern`, ...)
    Facet,
    Import,
    Include,
    Redefine,
    Notation,
    Unique,
    Key,
    KeyRef,
    Selector,
    Field,
}

/// Local names of the constraining facets, all parsed as `ElementKind::Facet`.
pub const FACET_NAMES: &[&str] = &[
    "enumeration",
    "pattern",
    "length",
    "minLength",
    "maxLength",
    "minInclusive",
    "maxInclusive",
    "minExclusive",
    "maxExclusive",
    "totalDigits",
    "fractionDigits",
    "whiteSpace",
];

impl ElementKind {
    /// Get the XSD local name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Schema => "schema",
            ElementKind::Element => "element",
            ElementKind::Choice => "choice",
            ElementKind::Sequence => "sequence",
            ElementKind::Group => "group",
            ElementKind::All => "all",
            ElementKind::Any => "any",
            ElementKind::ComplexType => "complexType",
            ElementKind::SimpleType => "simpleType",
            ElementKind::Attribute => "attribute",
            ElementKind::AttributeGroup => "attributeGroup",
            ElementKind::Annotation => "annotation",
            ElementKind::Documentation => "documentation",
            ElementKind::AppInfo => "appinfo",
            ElementKind::Restriction => "restriction",
            ElementKind::Extension => "extension",
            ElementKind::SimpleContent => "simpleContent",
            ElementKind::ComplexContent => "complexContent",
            ElementKind::AnyAttribute => "anyAttribute",
            ElementKind::List => "list",
            ElementKind::Union => "union",
            ElementKind::Facet => "facet",
            ElementKind::Import => "import",
            ElementKind::Include => "include",
            ElementKind::Redefine => "redefine",
            ElementKind::Notation => "notation",
            ElementKind::Unique => "unique",
            ElementKind::Key => "key",
            ElementKind::KeyRef => "keyref",
            ElementKind::Selector => "selector",
            ElementKind::Field => "field",
        }
    }

    /// Get all element kinds
    pub fn all() -> &'static [ElementKind] {
        &[
            ElementKind::Schema,
            ElementKind::Element,
            ElementKind::Choice,
            ElementKind::Sequence,
            ElementKind::Group,
            ElementKind::All,
            ElementKind::Any,
            ElementKind::ComplexType,
            ElementKind::SimpleType,
            ElementKind::Attribute,
            ElementKind::AttributeGroup,
            ElementKind::Annotation,
            ElementKind::Documentation,
            ElementKind::AppInfo,
            ElementKind::Restriction,
            ElementKind::Extension,
            ElementKind::SimpleContent,
            ElementKind::ComplexContent,
            ElementKind::AnyAttribute,
            ElementKind::List,
            ElementKind::Union,
            ElementKind::Facet,
            ElementKind::Import,
            ElementKind::Include,
            ElementKind::Redefine,
            ElementKind::Notation,
            ElementKind::Unique,
            ElementKind::Key,
            ElementKind::KeyRef,
            ElementKind::Selector,
            ElementKind::Field,
        ]
    }

    /// Map an XSD local name (no prefix) to its kind
    pub fn from_local_name(local: &str) -> Option<Self> {
        if FACET_NAMES.contains(&local) {
            return Some(ElementKind::Facet);
        }
        ElementKind::all()
            .iter()
            .copied()
            .find(|kind| *kind != ElementKind::Facet && kind.as_str() == local)
    }

    /// Match a tag as written in the document (`xs:choice`, `xsd:choice`,
    /// `choice`) against the accepted prefixes.
    ///
    /// An empty string in `prefixes` accepts unprefixed tags.
    pub fn from_tag(tag: &str, prefixes: &[String]) -> Option<Self> {
        let (prefix, local) = split_prefix(tag);
        let accepted = prefixes.iter().any(|p| p == prefix.unwrap_or(""));
        if !accepted {
            return None;
        }
        Self::from_local_name(local)
    }

    /// Documentation and appinfo hold free-form content, not schema constructs
    pub fn is_free_content(&self) -> bool {
        matches!(self, ElementKind::Documentation | ElementKind::AppInfo)
    }
}

impl FromStr for ElementKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (_, local) = split_prefix(s);
        match local {
            "appInfo" => Ok(ElementKind::AppInfo),
            "keyRef" => Ok(ElementKind::KeyRef),
            "facet" => Ok(ElementKind::Facet),
            _ => Self::from_local_name(local).ok_or_else(|| Error::UnknownElement {
                tag: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// XSD symbol spaces for named top-level definitions.
///
/// Simple and complex types share one symbol space, so both register as
/// `Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DefinitionKind {
    Element,
    Type,
    Group,
    AttributeGroup,
    Attribute,
    Notation,
    /// `key`, `unique` and `keyref` names; unique across the schema
    IdentityConstraint,
}

impl DefinitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefinitionKind::Element => "element",
            DefinitionKind::Type => "type",
            DefinitionKind::Group => "group",
            DefinitionKind::AttributeGroup => "attributeGroup",
            DefinitionKind::Attribute => "attribute",
            DefinitionKind::Notation => "notation",
            DefinitionKind::IdentityConstraint => "identityConstraint",
        }
    }

    pub fn all() -> &'static [DefinitionKind] {
        &[
            DefinitionKind::Element,
            DefinitionKind::Type,
            DefinitionKind::Group,
            DefinitionKind::AttributeGroup,
            DefinitionKind::Attribute,
            DefinitionKind::Notation,
            DefinitionKind::IdentityConstraint,
        ]
    }

    /// The symbol space a named element of `kind` defines, if any
    pub fn for_element(kind: ElementKind) -> Option<Self> {
        match kind {
            ElementKind::Element => Some(DefinitionKind::Element),
            ElementKind::ComplexType | ElementKind::SimpleType => Some(DefinitionKind::Type),
            ElementKind::Group => Some(DefinitionKind::Group),
            ElementKind::AttributeGroup => Some(DefinitionKind::AttributeGroup),
            ElementKind::Attribute => Some(DefinitionKind::Attribute),
            ElementKind::Notation => Some(DefinitionKind::Notation),
            ElementKind::Unique | ElementKind::Key | ElementKind::KeyRef => {
                Some(DefinitionKind::IdentityConstraint)
            }
            _ => None,
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Split `prefix:local` into its parts
pub fn split_prefix(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_prefixes() -> Vec<String> {
        vec!["xs".to_string(), "xsd".to_string(), String::new()]
    }

    #[test]
    fn test_element_kind_roundtrip() {
        for kind in ElementKind::all() {
            let parsed: ElementKind = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn test_tag_prefixes() {
        let prefixes = default_prefixes();
        assert_eq!(ElementKind::from_tag("xs:choice", &prefixes), Some(ElementKind::Choice));
        assert_eq!(ElementKind::from_tag("xsd:choice", &prefixes), Some(ElementKind::Choice));
        assert_eq!(ElementKind::from_tag("choice", &prefixes), Some(ElementKind::Choice));
        assert_eq!(ElementKind::from_tag("foo:choice", &prefixes), None);
        assert_eq!(ElementKind::from_tag("xs:assert", &prefixes), None);
    }

    #[test]
    fn test_unprefixed_tags_can_be_disabled() {
        let prefixes = vec!["xs".to_string()];
        assert_eq!(ElementKind::from_tag("sequence", &prefixes), None);
        assert_eq!(ElementKind::from_tag("xs:sequence", &prefixes), Some(ElementKind::Sequence));
    }

    #[test]
    fn test_facets_share_a_kind() {
        for name in FACET_NAMES {
            assert_eq!(ElementKind::from_local_name(name), Some(ElementKind::Facet));
        }
    }

    #[test]
    fn test_definition_kind_symbol_spaces() {
        assert_eq!(DefinitionKind::for_element(ElementKind::SimpleType), Some(DefinitionKind::Type));
        assert_eq!(DefinitionKind::for_element(ElementKind::ComplexType), Some(DefinitionKind::Type));
        assert_eq!(DefinitionKind::for_element(ElementKind::Choice), None);
    }
}
