use xsdgraph::element::{ElementDecl, Variant};
use xsdgraph::grammar::attach;
use xsdgraph::reference::LinkAttribute;
use xsdgraph::{
    resolve, DefinitionKind, ElementKind, Error, MaxOccurs, Node, Occurs, Parser, SchemaElement, SchemaForest,
    SchemaSet,
};

fn schema(children: impl IntoIterator<Item = Node>) -> Node {
    Node::new("xs:schema").with_children(children)
}

#[test]
fn test_choice_with_unbounded_occurs() {
    let node = Node::new("xs:choice")
        .with_attr("minOccurs", "0")
        .with_attr("maxOccurs", "unbounded");

    let forest = Parser::default().parse_fragment(&node).unwrap();
    let choice = forest.get(forest.roots()[0]).unwrap();

    assert_eq!(choice.occurs(), Some(Occurs::new(0, MaxOccurs::Unbounded)));
    assert!(forest.children(choice.id).is_empty());
}

#[test]
fn test_malformed_max_occurs_names_tag_and_value() {
    let root = schema([Node::new("xs:complexType")
        .with_attr("name", "T")
        .with_child(Node::new("xs:sequence").with_attr("maxOccurs", "abc"))]);

    match Parser::default().parse(&root) {
        Err(Error::MalformedOccurs { tag, value, .. }) => {
            assert_eq!(tag, "xs:sequence");
            assert_eq!(value, "abc");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_dangling_reference_stays_unresolved() {
    let root = schema([Node::new("xs:complexType").with_attr("name", "T").with_child(
        Node::new("xs:sequence").with_child(Node::new("xs:element").with_attr("ref", "Foo")),
    )]);
    let forest = Parser::default().parse(&root).unwrap();
    let (graph, errors) = resolve(forest);

    assert_eq!(errors.len(), 1);
    assert!(matches!(&errors[0], Error::UnresolvedReference { name, .. } if name == "Foo"));

    let forest = graph.forest();
    let site = forest.iter().find(|e| e.is_reference()).unwrap();
    assert!(!site.reference().unwrap().reference.is_resolved());
    assert!(matches!(forest.target(site.id), Err(Error::UnresolvedReference { .. })));
}

#[test]
fn test_duplicate_top_level_element_across_documents() {
    let first = Parser::default()
        .parse_document("a.xsd", &schema([Node::new("xs:element").with_attr("name", "Bar")]))
        .unwrap();
    let second = Parser::default()
        .parse_document("b.xsd", &schema([Node::new("xs:element").with_attr("name", "Bar")]))
        .unwrap();

    let mut set = SchemaSet::new();
    set.add(first);
    set.add(second);
    match set.merge() {
        Err(Error::DuplicateDefinition { kind, name }) => {
            assert_eq!(kind, DefinitionKind::Element);
            assert_eq!(name, "Bar");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_attribute_inside_choice_is_rejected() {
    let mut forest = SchemaForest::new();
    let choice = forest.add_root(SchemaElement::new(
        ElementKind::Choice,
        "xs:choice",
        Variant::Choice(Occurs::default()),
    ));
    let element = SchemaElement::new(
        ElementKind::Element,
        "xs:element",
        Variant::Element(ElementDecl {
            name: Some("ok".to_string()),
            occurs: Some(Occurs::default()),
            type_name: None,
            nillable: false,
            is_abstract: false,
            default: None,
            fixed: None,
            form: None,
        }),
    );
    attach(&mut forest, choice, element).unwrap();
    let before = forest.children(choice).len();

    let attribute = SchemaElement::new(ElementKind::Attribute, "xs:attribute", Variant::Annotation);
    let err = attach(&mut forest, choice, attribute).unwrap_err();

    assert!(matches!(
        err,
        Error::IllegalChild { parent: ElementKind::Choice, child: ElementKind::Attribute }
    ));
    assert_eq!(forest.children(choice).len(), before);
    assert_eq!(forest.len(), 2);
}

#[test]
fn test_document_resolves_without_errors() {
    let text = r#"<?xml version="1.0" encoding="UTF-8"?>
<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            xmlns:po="urn:purchase-order"
            targetNamespace="urn:purchase-order"
            elementFormDefault="qualified">
  <xsd:annotation>
    <xsd:documentation xml:lang="en">Purchase order schema</xsd:documentation>
  </xsd:annotation>

  <xsd:element name="purchaseOrder" type="po:PurchaseOrderType"/>
  <xsd:element name="comment" type="xsd:string"/>

  <xsd:complexType name="PurchaseOrderType">
    <xsd:sequence>
      <xsd:element name="shipTo" type="po:USAddress"/>
      <xsd:element ref="po:comment" minOccurs="0"/>
      <xsd:element name="items" type="po:Items"/>
    </xsd:sequence>
    <xsd:attribute name="orderDate" type="xsd:date"/>
  </xsd:complexType>

  <xsd:complexType name="USAddress">
    <xsd:sequence>
      <xsd:element name="name" type="xsd:string"/>
      <xsd:element name="zip" type="xsd:decimal"/>
    </xsd:sequence>
    <xsd:attribute name="country" type="xsd:NMTOKEN" fixed="US"/>
  </xsd:complexType>

  <xsd:complexType name="Items">
    <xsd:sequence>
      <xsd:element name="item" minOccurs="0" maxOccurs="unbounded">
        <xsd:complexType>
          <xsd:sequence>
            <xsd:element name="quantity">
              <xsd:simpleType>
                <xsd:restriction base="xsd:positiveInteger">
                  <xsd:maxExclusive value="100"/>
                </xsd:restriction>
              </xsd:simpleType>
            </xsd:element>
          </xsd:sequence>
          <xsd:attribute name="partNum" type="po:SKU" use="required"/>
        </xsd:complexType>
      </xsd:element>
    </xsd:sequence>
  </xsd:complexType>

  <xsd:simpleType name="SKU">
    <xsd:restriction base="xsd:string">
      <xsd:pattern value="\d{3}-[A-Z]{2}"/>
    </xsd:restriction>
  </xsd:simpleType>
</xsd:schema>"#;

    let root = xsdgraph::xml::parse_document(text).unwrap();
    let forest = Parser::default().parse_document("po.xsd", &root).unwrap();
    let (graph, errors) = resolve(forest);

    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert!(graph.is_complete());
    assert_eq!(graph.stats().resolved, 5);

    let forest = graph.forest();
    let order = forest.global(DefinitionKind::Element, "purchaseOrder").unwrap();
    let order_type = forest.link_target(order.id, LinkAttribute::Type).unwrap().unwrap();
    assert_eq!(forest.path(order_type), "/schema/complexType[PurchaseOrderType]");

    let comment = forest.iter().find(|e| e.is_reference()).unwrap();
    assert_eq!(comment.occurs(), Some(Occurs::new(0, MaxOccurs::Bounded(1))));
    assert_eq!(
        forest.target(comment.id).ok().and_then(|id| forest.get(id)).and_then(|e| e.name()),
        Some("comment")
    );
}
