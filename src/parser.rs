//! Parser core - generic nodes to a schema forest
//!
//! Walks the node tree depth-first. Each tag is mapped to its kind, the
//! kind's constructor validates and extracts the attributes, and the new
//! element is attached under its parent through `grammar::attach`. Named
//! top-level definitions are registered as they are met; `ref`, `type` and
//! `base` names become unresolved placeholders for the resolver.

use crate::builtins::{self, XML_PREFIX};
use crate::element::{
    AttributeDecl, AttributeUse, ComplexTypeDecl, Documentation, DocumentRef, ElementDecl,
    ElementId, Facet, Form, GroupDecl, NotationDecl, ProcessContents, SchemaDecl, SchemaElement,
    Variant, Wildcard,
};
use crate::grammar::attach;
use crate::graph::{PendingDocument, SchemaForest};
use crate::kind::{DefinitionKind, ElementKind};
use crate::node::Node;
use crate::occurs::{MaxOccurs, Occurs, MAX_OCCURS, MIN_OCCURS};
use crate::reference::{Link, LinkAttribute, QName};
use crate::{Error, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static NCNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}_][\p{L}\p{M}\p{N}_.\-\x{B7}]*$").expect("valid NCName pattern")
});

/// Parser settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Abort on unknown tags instead of skipping them
    pub strict: bool,
    /// Tag prefixes treated as the XSD namespace; `""` accepts unprefixed tags
    pub prefixes: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict: true,
            prefixes: vec!["xs".to_string(), "xsd".to_string(), String::new()],
        }
    }
}

impl ParseOptions {
    /// Default options, skipping unknown tags
    pub fn lenient() -> Self {
        Self {
            strict: false,
            ..Self::default()
        }
    }

    /// A prefix bound to the XSD namespace (built-in types live there)
    pub fn is_xsd_prefix(&self, prefix: &str) -> bool {
        !prefix.is_empty() && self.prefixes.iter().any(|p| p == prefix)
    }
}

/// Where a node is being constructed
#[derive(Debug, Clone, Copy)]
struct Context {
    parent: Option<ElementKind>,
    /// The document root is unprefixed, so XSD is its default namespace
    xsd_is_default: bool,
}

impl Context {
    /// Direct children of `schema` (and of `redefine`) are global
    fn is_global(&self) -> bool {
        matches!(self.parent, Some(ElementKind::Schema) | Some(ElementKind::Redefine))
    }
}

/// Schema parser
#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: ParseOptions,
}

impl Parser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a schema document rooted at `root`
    pub fn parse(&self, root: &Node) -> Result<SchemaForest> {
        self.parse_document("<schema>", root)
    }

    /// Parse a schema document, naming it for diagnostics
    pub fn parse_document(&self, name: &str, root: &Node) -> Result<SchemaForest> {
        if ElementKind::from_tag(&root.tag, &self.options.prefixes) != Some(ElementKind::Schema) {
            return Err(Error::NotASchema { tag: root.tag.clone() });
        }

        let mut forest = SchemaForest::new();
        let document = forest.add_document(name);
        let ctx = Context {
            parent: None,
            xsd_is_default: is_unprefixed(&root.tag),
        };
        let (mut schema, _) = self.construct(ElementKind::Schema, root, ctx)?;
        schema.document = document;
        let id = forest.add_root(schema);
        self.parse_children(&mut forest, id, root)?;

        tracing::info!(
            "Parsed {}: {} elements, {} definitions, {} pending documents",
            name,
            forest.len(),
            forest.registry().len(),
            forest.pending_documents().len()
        );
        Ok(forest)
    }

    /// Parse a standalone construct (a `choice`, a local `element`, ...)
    /// as the root of its own forest.
    ///
    /// The fragment root is not registered. Constructs below it register
    /// as they would in a document: identity constraints always, globals
    /// when the fragment is itself a `schema`.
    pub fn parse_fragment(&self, node: &Node) -> Result<SchemaForest> {
        let kind = self.kind_of(node)?.ok_or_else(|| Error::UnknownElement {
            tag: node.tag.clone(),
        })?;

        let mut forest = SchemaForest::new();
        let document = forest.add_document("<fragment>");
        let ctx = Context {
            parent: None,
            xsd_is_default: is_unprefixed(&node.tag),
        };
        let (mut element, is_reference) = self.construct(kind, node, ctx)?;
        element.document = document;
        let id = forest.add_root(element);
        self.parse_body(&mut forest, id, kind, is_reference, node)?;
        Ok(forest)
    }

    fn kind_of(&self, node: &Node) -> Result<Option<ElementKind>> {
        match ElementKind::from_tag(&node.tag, &self.options.prefixes) {
            Some(kind) => Ok(Some(kind)),
            None if self.options.strict => Err(Error::UnknownElement { tag: node.tag.clone() }),
            None => Ok(None),
        }
    }

    fn parse_children(&self, forest: &mut SchemaForest, parent: ElementId, node: &Node) -> Result<()> {
        for child in &node.children {
            self.parse_child_or_ref(forest, parent, child)?;
        }
        Ok(())
    }

    /// Parse `node` and attach it under `parent`.
    ///
    /// A node carrying `ref` becomes a use-site with an unresolved
    /// placeholder and no body. Returns `None` when an unknown tag is
    /// skipped in lenient mode.
    pub fn parse_child_or_ref(
        &self,
        forest: &mut SchemaForest,
        parent: ElementId,
        node: &Node,
    ) -> Result<Option<ElementId>> {
        let Some(kind) = self.kind_of(node)? else {
            tracing::warn!("Skipping unknown element {} at {}", node.tag, forest.location(parent));
            return Ok(None);
        };
        let (parent_kind, document) = forest
            .get(parent)
            .map(|p| (p.kind, p.document))
            .ok_or_else(|| Error::Internal(format!("missing parent {}", parent)))?;
        let root = forest.ancestors(parent).last().copied().unwrap_or(parent);
        let ctx = Context {
            parent: Some(parent_kind),
            xsd_is_default: forest.get(root).is_some_and(|r| is_unprefixed(&r.tag)),
        };

        let (mut element, is_reference) = self.construct(kind, node, ctx)?;
        element.document = document;
        let id = attach(forest, parent, element)?;

        self.register(forest, id, parent_kind)?;
        self.parse_body(forest, id, kind, is_reference, node)?;
        Ok(Some(id))
    }

    fn parse_body(
        &self,
        forest: &mut SchemaForest,
        id: ElementId,
        kind: ElementKind,
        is_reference: bool,
        node: &Node,
    ) -> Result<()> {
        if kind.is_free_content() {
            return Ok(());
        }
        if is_reference {
            // A use-site may only be annotated
            for child in &node.children {
                match self.kind_of(child)? {
                    Some(ElementKind::Annotation) => {
                        self.parse_child_or_ref(forest, id, child)?;
                    }
                    Some(other) => {
                        return Err(Error::InvalidAttribute {
                            tag: node.tag.clone(),
                            attribute: LinkAttribute::Ref.to_string(),
                            value: node.attr("ref").unwrap_or_default().to_string(),
                            reason: format!("a reference cannot declare an inline {}", other),
                        });
                    }
                    None => {
                        tracing::warn!("Skipping unknown element {} at {}", child.tag, forest.location(id));
                    }
                }
            }
            return Ok(());
        }
        self.parse_children(forest, id, node)
    }

    /// Register named definitions and record document dependencies
    fn register(&self, forest: &mut SchemaForest, id: ElementId, parent_kind: ElementKind) -> Result<()> {
        let Some(element) = forest.get(id) else {
            return Ok(());
        };
        let document = element.document;
        let pending = match &element.variant {
            Variant::Import(reference) | Variant::Include(reference) | Variant::Redefine(reference) => {
                Some(reference.clone())
            }
            _ => None,
        };
        let definition = DefinitionKind::for_element(element.kind)
            .zip(element.name().map(str::to_string));

        if let Some(reference) = pending {
            forest.record_pending(PendingDocument {
                document,
                element: id,
                reference,
            });
        }

        let Some((kind, name)) = definition else {
            return Ok(());
        };
        match (kind, parent_kind) {
            (DefinitionKind::IdentityConstraint, _) | (_, ElementKind::Schema) => {
                forest.registry_mut().register(kind, name, id)
            }
            (_, ElementKind::Redefine) => forest.registry_mut().register_override(kind, name, id),
            _ => Ok(()),
        }
    }

    /// Build the element for `node`: validate attributes, create placeholders.
    ///
    /// Also reports whether `node` is a `ref` use-site. A predefined
    /// `xml:` attribute reference is one even though it gets no placeholder.
    fn construct(&self, kind: ElementKind, node: &Node, ctx: Context) -> Result<(SchemaElement, bool)> {
        let tag = node.tag.as_str();
        let attrs = &node.attributes;
        let global = ctx.is_global();
        let mut links = Vec::new();
        let mut has_ref = false;

        let variant = match kind {
            ElementKind::Schema => Variant::Schema(SchemaDecl {
                target_namespace: attrs.get("targetNamespace").cloned(),
                version: attrs.get("version").cloned(),
                element_form_default: self.form(tag, attrs, "elementFormDefault")?.unwrap_or_default(),
                attribute_form_default: self.form(tag, attrs, "attributeFormDefault")?.unwrap_or_default(),
            }),

            ElementKind::Element => {
                has_ref = self.reference(tag, attrs, DefinitionKind::Element, global, &mut links)?;
                let name = self.declared_name(tag, attrs, has_ref)?;
                let occurs = self.occurs(kind, tag, attrs, global)?;
                let type_name = self.type_link(tag, attrs, LinkAttribute::Type, &mut links, ctx)?;
                if let Some(raw) = attrs.get("substitutionGroup") {
                    let group = self.qname(tag, "substitutionGroup", raw)?;
                    links.push(Link::new(LinkAttribute::SubstitutionGroup, group, DefinitionKind::Element));
                }
                let (default, fixed) = self.value_constraint(tag, attrs)?;
                Variant::Element(ElementDecl {
                    name,
                    occurs,
                    type_name,
                    nillable: self.boolean(tag, attrs, "nillable")?.unwrap_or(false),
                    is_abstract: self.boolean(tag, attrs, "abstract")?.unwrap_or(false),
                    default,
                    fixed,
                    form: self.form(tag, attrs, "form")?,
                })
            }

            ElementKind::Choice => Variant::Choice(self.particle_occurs(kind, tag, attrs, global)?),
            ElementKind::Sequence => Variant::Sequence(self.particle_occurs(kind, tag, attrs, global)?),
            ElementKind::All => {
                let occurs = self.particle_occurs(kind, tag, attrs, global)?;
                if occurs.min > 1 {
                    return Err(invalid(tag, MIN_OCCURS, attrs, "all allows minOccurs 0 or 1 only"));
                }
                if occurs.max != MaxOccurs::Bounded(1) {
                    return Err(invalid(tag, MAX_OCCURS, attrs, "all allows maxOccurs 1 only"));
                }
                Variant::All(occurs)
            }

            ElementKind::Group => {
                has_ref = self.reference(tag, attrs, DefinitionKind::Group, global, &mut links)?;
                if !global && !has_ref {
                    return Err(invalid(tag, "ref", attrs, "a local group must reference a named group"));
                }
                let name = self.declared_name(tag, attrs, has_ref)?;
                Variant::Group(GroupDecl {
                    name,
                    occurs: self.occurs(kind, tag, attrs, global)?,
                })
            }

            ElementKind::Any => Variant::Any(Wildcard {
                occurs: Some(self.particle_occurs(kind, tag, attrs, global)?),
                namespace: attrs.get("namespace").cloned().unwrap_or_else(|| "##any".to_string()),
                process_contents: self.process_contents(tag, attrs)?,
            }),
            ElementKind::AnyAttribute => Variant::AnyAttribute(Wildcard {
                occurs: None,
                namespace: attrs.get("namespace").cloned().unwrap_or_else(|| "##any".to_string()),
                process_contents: self.process_contents(tag, attrs)?,
            }),

            ElementKind::ComplexType => Variant::ComplexType(ComplexTypeDecl {
                name: self.type_name(tag, attrs, global)?,
                mixed: self.boolean(tag, attrs, "mixed")?.unwrap_or(false),
                is_abstract: self.boolean(tag, attrs, "abstract")?.unwrap_or(false),
            }),
            ElementKind::SimpleType => Variant::SimpleType {
                name: self.type_name(tag, attrs, global)?,
            },

            ElementKind::Attribute => {
                has_ref = self.reference(tag, attrs, DefinitionKind::Attribute, global, &mut links)?;
                let name = self.declared_name(tag, attrs, has_ref)?;
                let type_name = self.type_link(tag, attrs, LinkAttribute::Type, &mut links, ctx)?;
                let attribute_use = self
                    .one_of(
                        tag,
                        attrs,
                        "use",
                        &[
                            ("optional", AttributeUse::Optional),
                            ("required", AttributeUse::Required),
                            ("prohibited", AttributeUse::Prohibited),
                        ],
                    )?
                    .unwrap_or_default();
                if global && attrs.contains_key("use") {
                    return Err(invalid(tag, "use", attrs, "use is not allowed on a top-level attribute"));
                }
                let (default, fixed) = self.value_constraint(tag, attrs)?;
                Variant::Attribute(AttributeDecl {
                    name,
                    type_name,
                    attribute_use,
                    default,
                    fixed,
                    form: self.form(tag, attrs, "form")?,
                })
            }

            ElementKind::AttributeGroup => {
                has_ref = self.reference(tag, attrs, DefinitionKind::AttributeGroup, global, &mut links)?;
                if !global && !has_ref {
                    return Err(invalid(tag, "ref", attrs, "a local attributeGroup must reference a named group"));
                }
                let name = self.declared_name(tag, attrs, has_ref)?;
                Variant::AttributeGroup { name }
            }

            ElementKind::Annotation => Variant::Annotation,
            ElementKind::Documentation => Variant::Documentation(self.documentation(node)),
            ElementKind::AppInfo => Variant::AppInfo(self.documentation(node)),

            ElementKind::Restriction => Variant::Restriction {
                base: self.type_link(tag, attrs, LinkAttribute::Base, &mut links, ctx)?,
            },
            ElementKind::Extension => {
                let base = self
                    .type_link(tag, attrs, LinkAttribute::Base, &mut links, ctx)?
                    .ok_or_else(|| invalid(tag, "base", attrs, "extension requires a base type"))?;
                Variant::Extension { base }
            }
            ElementKind::SimpleContent => Variant::SimpleContent,
            ElementKind::ComplexContent => Variant::ComplexContent {
                mixed: self.boolean(tag, attrs, "mixed")?,
            },
            ElementKind::List => Variant::List {
                item_type: self.type_link(tag, attrs, LinkAttribute::ItemType, &mut links, ctx)?,
            },
            ElementKind::Union => {
                let mut member_types = Vec::new();
                for raw in attrs.get("memberTypes").map(String::as_str).unwrap_or("").split_whitespace() {
                    let name = self.qname(tag, "memberTypes", raw)?;
                    if !self.is_builtin_type(tag, "memberTypes", &name, ctx)? {
                        links.push(Link::new(LinkAttribute::MemberTypes, name.clone(), DefinitionKind::Type));
                    }
                    member_types.push(name);
                }
                Variant::Union { member_types }
            }

            ElementKind::Facet => {
                let (_, local) = crate::kind::split_prefix(tag);
                let value = attrs
                    .get("value")
                    .cloned()
                    .ok_or_else(|| invalid(tag, "value", attrs, "facets require a value"))?;
                Variant::Facet(Facet {
                    facet: local.to_string(),
                    value,
                    fixed: self.boolean(tag, attrs, "fixed")?.unwrap_or(false),
                })
            }

            ElementKind::Import => Variant::Import(DocumentRef {
                kind,
                namespace: attrs.get("namespace").cloned(),
                schema_location: attrs.get("schemaLocation").cloned(),
            }),
            ElementKind::Include | ElementKind::Redefine => {
                let location = attrs
                    .get("schemaLocation")
                    .cloned()
                    .ok_or_else(|| invalid(tag, "schemaLocation", attrs, "schemaLocation is required"))?;
                let reference = DocumentRef {
                    kind,
                    namespace: None,
                    schema_location: Some(location),
                };
                if kind == ElementKind::Include {
                    Variant::Include(reference)
                } else {
                    Variant::Redefine(reference)
                }
            }

            ElementKind::Notation => Variant::Notation(NotationDecl {
                name: self.required_name(tag, attrs)?,
                public: attrs.get("public").cloned(),
                system: attrs.get("system").cloned(),
            }),

            ElementKind::Unique | ElementKind::Key | ElementKind::KeyRef => {
                let name = self.required_name(tag, attrs)?;
                let refer = if kind == ElementKind::KeyRef {
                    let raw = attrs
                        .get("refer")
                        .ok_or_else(|| invalid(tag, "refer", attrs, "keyref requires refer"))?;
                    let target = self.qname(tag, "refer", raw)?;
                    links.push(Link::new(LinkAttribute::Refer, target.clone(), DefinitionKind::IdentityConstraint));
                    Some(target)
                } else {
                    None
                };
                Variant::IdentityConstraint { name, refer }
            }
            ElementKind::Selector | ElementKind::Field => Variant::XPath {
                xpath: attrs
                    .get("xpath")
                    .cloned()
                    .ok_or_else(|| invalid(tag, "xpath", attrs, "xpath is required"))?,
            },
        };

        let element = SchemaElement::new(kind, tag, variant)
            .with_attributes(attrs.clone())
            .with_links(links);
        Ok((element, has_ref))
    }

    /// Handle `ref`: push a placeholder, return whether one was present
    fn reference(
        &self,
        tag: &str,
        attrs: &BTreeMap<String, String>,
        kind: DefinitionKind,
        global: bool,
        links: &mut Vec<Link>,
    ) -> Result<bool> {
        let Some(raw) = attrs.get("ref") else {
            return Ok(false);
        };
        if global {
            return Err(invalid(tag, "ref", attrs, "a top-level declaration cannot be a reference"));
        }
        if attrs.contains_key("name") {
            return Err(invalid(tag, "ref", attrs, "ref and name are mutually exclusive"));
        }
        if let Some(conflict) = declaration_only(kind).iter().find(|a| attrs.contains_key(**a)) {
            return Err(invalid(
                tag,
                conflict,
                attrs,
                &format!("{} belongs to the referenced declaration, not to a ref", conflict),
            ));
        }
        let name = self.qname(tag, "ref", raw)?;
        let predefined = kind == DefinitionKind::Attribute
            && name.prefix.as_deref() == Some(XML_PREFIX)
            && builtins::is_xml_attribute(&name.local);
        if !predefined {
            links.push(Link::new(LinkAttribute::Ref, name, kind));
        }
        Ok(true)
    }

    /// `name` of an element/attribute/group declaration: a declaration
    /// without `ref` must be named
    fn declared_name(&self, tag: &str, attrs: &BTreeMap<String, String>, has_ref: bool) -> Result<Option<String>> {
        if has_ref {
            return Ok(None);
        }
        self.required_name(tag, attrs).map(Some)
    }

    /// `name` of a type definition: required at the top, forbidden inline
    fn type_name(&self, tag: &str, attrs: &BTreeMap<String, String>, global: bool) -> Result<Option<String>> {
        if global {
            return self.required_name(tag, attrs).map(Some);
        }
        if attrs.contains_key("name") {
            return Err(invalid(tag, "name", attrs, "an anonymous type definition cannot be named"));
        }
        Ok(None)
    }

    fn required_name(&self, tag: &str, attrs: &BTreeMap<String, String>) -> Result<String> {
        let raw = attrs
            .get("name")
            .ok_or_else(|| invalid(tag, "name", attrs, "name is required"))?;
        if !NCNAME.is_match(raw) {
            return Err(invalid(tag, "name", attrs, "not a valid NCName"));
        }
        Ok(raw.clone())
    }

    fn qname(&self, tag: &str, attribute: &str, raw: &str) -> Result<QName> {
        let name = QName::parse(raw);
        let prefix_ok = name.prefix.as_deref().is_none_or(|p| NCNAME.is_match(p));
        if !prefix_ok || !NCNAME.is_match(&name.local) {
            return Err(Error::InvalidAttribute {
                tag: tag.to_string(),
                attribute: attribute.to_string(),
                value: raw.to_string(),
                reason: "not a valid QName".to_string(),
            });
        }
        Ok(name)
    }

    /// `type`/`base`/`itemType`: placeholder unless built-in
    fn type_link(
        &self,
        tag: &str,
        attrs: &BTreeMap<String, String>,
        attribute: LinkAttribute,
        links: &mut Vec<Link>,
        ctx: Context,
    ) -> Result<Option<QName>> {
        let Some(raw) = attrs.get(attribute.as_str()) else {
            return Ok(None);
        };
        let name = self.qname(tag, attribute.as_str(), raw)?;
        if !self.is_builtin_type(tag, attribute.as_str(), &name, ctx)? {
            links.push(Link::new(attribute, name.clone(), DefinitionKind::Type));
        }
        Ok(Some(name))
    }

    /// Prefixed with an XSD prefix, or unprefixed where XSD is the default
    /// namespace of the document
    fn is_builtin_type(&self, tag: &str, attribute: &str, name: &QName, ctx: Context) -> Result<bool> {
        match name.prefix.as_deref() {
            None => Ok(ctx.xsd_is_default && builtins::is_builtin_type(&name.local)),
            Some(prefix) if self.options.is_xsd_prefix(prefix) => {
                if builtins::is_builtin_type(&name.local) {
                    Ok(true)
                } else {
                    Err(Error::InvalidAttribute {
                        tag: tag.to_string(),
                        attribute: attribute.to_string(),
                        value: name.to_string(),
                        reason: "unknown built-in type".to_string(),
                    })
                }
            }
            _ => Ok(false),
        }
    }

    /// Occurrence constraint; rejected on top-level declarations
    fn occurs(
        &self,
        kind: ElementKind,
        tag: &str,
        attrs: &BTreeMap<String, String>,
        global: bool,
    ) -> Result<Option<Occurs>> {
        if global {
            for attribute in [MIN_OCCURS, MAX_OCCURS] {
                if attrs.contains_key(attribute) {
                    return Err(invalid(
                        tag,
                        attribute,
                        attrs,
                        &format!("{} is not allowed on a top-level {}", attribute, kind),
                    ));
                }
            }
            return Ok(None);
        }
        Occurs::from_attributes(tag, attrs).map(Some)
    }

    /// Occurrence constraint of a construct that always carries one
    fn particle_occurs(
        &self,
        kind: ElementKind,
        tag: &str,
        attrs: &BTreeMap<String, String>,
        global: bool,
    ) -> Result<Occurs> {
        Ok(self.occurs(kind, tag, attrs, global)?.unwrap_or_default())
    }

    fn boolean(&self, tag: &str, attrs: &BTreeMap<String, String>, attribute: &str) -> Result<Option<bool>> {
        self.one_of(
            tag,
            attrs,
            attribute,
            &[("true", true), ("1", true), ("false", false), ("0", false)],
        )
    }

    fn form(&self, tag: &str, attrs: &BTreeMap<String, String>, attribute: &str) -> Result<Option<Form>> {
        self.one_of(
            tag,
            attrs,
            attribute,
            &[("qualified", Form::Qualified), ("unqualified", Form::Unqualified)],
        )
    }

    fn process_contents(&self, tag: &str, attrs: &BTreeMap<String, String>) -> Result<ProcessContents> {
        Ok(self
            .one_of(
                tag,
                attrs,
                "processContents",
                &[
                    ("strict", ProcessContents::Strict),
                    ("lax", ProcessContents::Lax),
                    ("skip", ProcessContents::Skip),
                ],
            )?
            .unwrap_or_default())
    }

    /// Enumerated attribute value
    fn one_of<T: Copy>(
        &self,
        tag: &str,
        attrs: &BTreeMap<String, String>,
        attribute: &str,
        allowed: &[(&str, T)],
    ) -> Result<Option<T>> {
        let Some(raw) = attrs.get(attribute) else {
            return Ok(None);
        };
        let value = raw.trim();
        allowed
            .iter()
            .find(|(token, _)| *token == value)
            .map(|(_, v)| Some(*v))
            .ok_or_else(|| {
                let tokens: Vec<&str> = allowed.iter().map(|(token, _)| *token).collect();
                invalid(tag, attribute, attrs, &format!("expected one of {}", tokens.join(", ")))
            })
    }

    fn value_constraint(
        &self,
        tag: &str,
        attrs: &BTreeMap<String, String>,
    ) -> Result<(Option<String>, Option<String>)> {
        let default = attrs.get("default").cloned();
        let fixed = attrs.get("fixed").cloned();
        if default.is_some() && fixed.is_some() {
            return Err(invalid(tag, "fixed", attrs, "default and fixed are mutually exclusive"));
        }
        Ok((default, fixed))
    }

    fn documentation(&self, node: &Node) -> Documentation {
        let mut text = String::new();
        collect_text(node, &mut text);
        Documentation {
            source: node.attr("source").map(str::to_string),
            lang: node.attr("xml:lang").map(str::to_string),
            text: (!text.is_empty()).then_some(text),
        }
    }
}

/// Text of a node and its descendants; markup inside documentation is dropped
fn collect_text(node: &Node, out: &mut String) {
    if let Some(text) = &node.text {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(text);
    }
    for child in &node.children {
        collect_text(child, out);
    }
}

/// Attributes of a declaration that a `ref` use-site cannot carry.
/// Attribute uses keep `default`/`fixed`/`use`.
fn declaration_only(kind: DefinitionKind) -> &'static [&'static str] {
    match kind {
        DefinitionKind::Element => &[
            "type",
            "nillable",
            "default",
            "fixed",
            "form",
            "block",
            "final",
            "abstract",
            "substitutionGroup",
        ],
        DefinitionKind::Attribute => &["type", "form"],
        _ => &[],
    }
}

fn is_unprefixed(tag: &str) -> bool {
    crate::kind::split_prefix(tag).0.is_none()
}

fn invalid(tag: &str, attribute: &str, attrs: &BTreeMap<String, String>, reason: &str) -> Error {
    Error::InvalidAttribute {
        tag: tag.to_string(),
        attribute: attribute.to_string(),
        value: attrs.get(attribute).cloned().unwrap_or_default(),
        reason: reason.to_string(),
    }
}
