//! Reference placeholders
//!
//! A construct may point at a named top-level definition instead of declaring
//! one inline (`<xs:element ref="Foo"/>`, `type="FooType"`, `base="..."`).
//! The parser cannot follow such a name yet - the target may live in a
//! document that has not been parsed - so it records a placeholder that the
//! resolver later turns into a link.

use crate::element::ElementId;
use crate::kind::{split_prefix, DefinitionKind};
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Qualified name as written in the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct QName {
    pub prefix: Option<String>,
    pub local: String,
}

impl QName {
    pub fn parse(raw: &str) -> Self {
        let (prefix, local) = split_prefix(raw.trim());
        Self {
            prefix: prefix.map(str::to_string),
            local: local.to_string(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

/// A named reference: unresolved until the resolver finds its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Reference {
    Unresolved {
        name: QName,
        kind: DefinitionKind,
    },
    Resolved {
        name: QName,
        kind: DefinitionKind,
        /// Registry definition; shared, not owned by the referencing element
        target: ElementId,
    },
}

impl Reference {
    pub fn unresolved(name: QName, kind: DefinitionKind) -> Self {
        Reference::Unresolved { name, kind }
    }

    /// The symbolic name. Never forces resolution.
    pub fn name(&self) -> &QName {
        match self {
            Reference::Unresolved { name, .. } | Reference::Resolved { name, .. } => name,
        }
    }

    /// The symbol space the name is looked up in
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Reference::Unresolved { kind, .. } | Reference::Resolved { kind, .. } => *kind,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Reference::Resolved { .. })
    }

    /// The referenced definition.
    ///
    /// Fails with `UnresolvedReference` until the resolver has linked it.
    pub fn element(&self) -> Result<ElementId> {
        match self {
            Reference::Resolved { target, .. } => Ok(*target),
            Reference::Unresolved { name, kind } => Err(Error::UnresolvedReference {
                name: name.to_string(),
                kind: *kind,
                location: None,
            }),
        }
    }

    /// Link the placeholder to `target`. A resolved placeholder is left as is.
    pub(crate) fn resolve(&mut self, target: ElementId) -> bool {
        match self {
            Reference::Unresolved { name, kind } => {
                *self = Reference::Resolved {
                    name: name.clone(),
                    kind: *kind,
                    target,
                };
                true
            }
            Reference::Resolved { .. } => false,
        }
    }
}

/// Attribute a placeholder was created from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkAttribute {
    Ref,
    Type,
    Base,
    ItemType,
    MemberTypes,
    SubstitutionGroup,
    Refer,
}

impl LinkAttribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkAttribute::Ref => "ref",
            LinkAttribute::Type => "type",
            LinkAttribute::Base => "base",
            LinkAttribute::ItemType => "itemType",
            LinkAttribute::MemberTypes => "memberTypes",
            LinkAttribute::SubstitutionGroup => "substitutionGroup",
            LinkAttribute::Refer => "refer",
        }
    }
}

impl fmt::Display for LinkAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A placeholder together with the attribute it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub attribute: LinkAttribute,
    pub reference: Reference,
}

impl Link {
    pub fn new(attribute: LinkAttribute, name: QName, kind: DefinitionKind) -> Self {
        Self {
            attribute,
            reference: Reference::unresolved(name, kind),
        }
    }
}
