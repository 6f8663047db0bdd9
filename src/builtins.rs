//! Built-in datatypes of XML Schema
//!
//! Names in the XSD namespace never go through the registry: they are
//! predefined and always resolve.

/// XSD 1.0 built-in type names (Part 2 §3), including the ur-types.
pub const BUILTIN_TYPES: &[&str] = &[
    "anyType",
    "anySimpleType",
    "string",
    "normalizedString",
    "token",
    "language",
    "Name",
    "NCName",
    "ID",
    "IDREF",
    "IDREFS",
    "ENTITY",
    "ENTITIES",
    "NMTOKEN",
    "NMTOKENS",
    "NOTATION",
    "QName",
    "boolean",
    "decimal",
    "integer",
    "nonPositiveInteger",
    "negativeInteger",
    "long",
    "int",
    "short",
    "byte",
    "nonNegativeInteger",
    "positiveInteger",
    "unsignedLong",
    "unsignedInt",
    "unsignedShort",
    "unsignedByte",
    "float",
    "double",
    "duration",
    "dateTime",
    "time",
    "date",
    "gYearMonth",
    "gYear",
    "gMonthDay",
    "gDay",
    "gMonth",
    "hexBinary",
    "base64Binary",
    "anyURI",
];

/// Attributes predefined in the `xml:` namespace
pub const XML_ATTRIBUTES: &[&str] = &["lang", "space", "base", "id"];

/// Prefix reserved for the XML namespace
pub const XML_PREFIX: &str = "xml";

pub fn is_builtin_type(local: &str) -> bool {
    BUILTIN_TYPES.contains(&local)
}

pub fn is_xml_attribute(local: &str) -> bool {
    XML_ATTRIBUTES.contains(&local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        assert!(is_builtin_type("string"));
        assert!(is_builtin_type("anyURI"));
        assert!(!is_builtin_type("String"));
        assert!(!is_builtin_type("BookType"));
        assert!(is_xml_attribute("lang"));
    }
}
