//! Grammar rules - which kinds may nest inside which
//!
//! The legal child set is purely a function of the two kinds involved, so it
//! is one static table. `attach` is the only way a child enters a parent's
//! child list and it consults the table every time: an illegal tree can never
//! be built.

use crate::element::{ElementId, SchemaElement};
use crate::graph::SchemaForest;
use crate::kind::ElementKind;
use crate::{Error, Result};

use ElementKind::*;

/// Model group particles allowed inside `choice` and `sequence`
const PARTICLES: &[ElementKind] = &[Element, Group, Choice, Sequence, Any];

/// Content model and attribute declarations of a complex type derivation
const DERIVATION_CONTENT: &[ElementKind] = &[
    Group,
    All,
    Choice,
    Sequence,
    Attribute,
    AttributeGroup,
    AnyAttribute,
];

/// Legal children of `kind`, Annotation excluded.
pub fn legal_children(kind: ElementKind) -> &'static [ElementKind] {
    match kind {
        Schema => &[
            Include,
            Import,
            Redefine,
            SimpleType,
            ComplexType,
            Group,
            AttributeGroup,
            Element,
            Attribute,
            Notation,
        ],
        Element => &[SimpleType, ComplexType, Unique, Key, KeyRef],
        Choice | Sequence => PARTICLES,
        All => &[Element],
        Group => &[All, Choice, Sequence],
        ComplexType => &[
            SimpleContent,
            ComplexContent,
            Group,
            All,
            Choice,
            Sequence,
            Attribute,
            AttributeGroup,
            AnyAttribute,
        ],
        SimpleType => &[Restriction, List, Union],
        Attribute | List | Union => &[SimpleType],
        AttributeGroup => &[Attribute, AttributeGroup, AnyAttribute],
        Restriction => &[
            SimpleType,
            Facet,
            Group,
            All,
            Choice,
            Sequence,
            Attribute,
            AttributeGroup,
            AnyAttribute,
        ],
        Extension => DERIVATION_CONTENT,
        SimpleContent | ComplexContent => &[Restriction, Extension],
        Redefine => &[SimpleType, ComplexType, Group, AttributeGroup],
        Unique | Key | KeyRef => &[Selector, Field],
        Annotation => &[Documentation, AppInfo],
        Any | AnyAttribute | Import | Include | Facet | Notation | Selector | Field => &[],
        Documentation | AppInfo => &[],
    }
}

/// Annotation is legal everywhere except inside annotations themselves
fn accepts_annotation(kind: ElementKind) -> bool {
    !matches!(kind, Annotation | Documentation | AppInfo)
}

/// True if `child` may appear directly inside `parent`
pub fn is_legal_child(parent: ElementKind, child: ElementKind) -> bool {
    if child == Annotation {
        return accepts_annotation(parent);
    }
    legal_children(parent).contains(&child)
}

/// Attach `child` under `parent`.
///
/// Fails with `IllegalChild` when the parent's grammar rule excludes the
/// child's kind; the parent is left untouched in that case.
pub fn attach(forest: &mut SchemaForest, parent: ElementId, child: SchemaElement) -> Result<ElementId> {
    let parent_kind = forest
        .get(parent)
        .map(|element| element.kind)
        .ok_or_else(|| Error::Internal(format!("attach to missing element {}", parent)))?;

    if !is_legal_child(parent_kind, child.kind) {
        return Err(Error::IllegalChild {
            parent: parent_kind,
            child: child.kind,
        });
    }

    Ok(forest.insert_child(parent, child))
}
