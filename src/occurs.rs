//! Occurrence constraints - `minOccurs` / `maxOccurs`
//!
//! Both attributes default to `1`. `maxOccurs` additionally accepts the
//! literal `unbounded`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const MIN_OCCURS: &str = "minOccurs";
pub const MAX_OCCURS: &str = "maxOccurs";
pub const UNBOUNDED: &str = "unbounded";

/// Upper bound of an occurrence constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaxOccurs {
    Bounded(u64),
    Unbounded,
}

impl fmt::Display for MaxOccurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxOccurs::Bounded(n) => write!(f, "{}", n),
            MaxOccurs::Unbounded => write!(f, "{}", UNBOUNDED),
        }
    }
}

/// The `(minOccurs, maxOccurs)` pair of a repeatable construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occurs {
    pub min: u64,
    pub max: MaxOccurs,
}

impl Default for Occurs {
    fn default() -> Self {
        Self {
            min: 1,
            max: MaxOccurs::Bounded(1),
        }
    }
}

impl Occurs {
    pub fn new(min: u64, max: MaxOccurs) -> Self {
        Self { min, max }
    }

    /// Read both occurrence attributes of the construct `tag`.
    ///
    /// Missing attributes take the default `1`. A bounded maximum below the
    /// minimum is rejected.
    pub fn from_attributes(tag: &str, attributes: &BTreeMap<String, String>) -> Result<Self> {
        let min_raw = attributes.get(MIN_OCCURS).map(String::as_str).unwrap_or("1");
        let max_raw = attributes.get(MAX_OCCURS).map(String::as_str).unwrap_or("1");

        let min = validate_non_negative_integer(tag, MIN_OCCURS, min_raw)?;
        let max = validate_max_occurs(tag, max_raw)?;

        if let MaxOccurs::Bounded(bound) = max {
            if bound < min {
                return Err(Error::InvalidAttribute {
                    tag: tag.to_string(),
                    attribute: MAX_OCCURS.to_string(),
                    value: max_raw.to_string(),
                    reason: format!("maxOccurs must not be less than minOccurs ({})", min),
                });
            }
        }

        Ok(Self { min, max })
    }

    /// True if the construct may be absent
    pub fn is_optional(&self) -> bool {
        self.min == 0
    }

    /// True if the construct may appear more than once
    pub fn is_repeated(&self) -> bool {
        match self.max {
            MaxOccurs::Bounded(n) => n > 1,
            MaxOccurs::Unbounded => true,
        }
    }
}

impl fmt::Display for Occurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{}]", self.min, self.max)
    }
}

/// Parse `raw` as a base-10 non-negative integer.
///
/// Leading and trailing XML whitespace is collapsed; a sign, an empty
/// value or any other character is malformed.
pub fn validate_non_negative_integer(tag: &str, attribute: &str, raw: &str) -> Result<u64> {
    let malformed = || Error::MalformedOccurs {
        tag: tag.to_string(),
        attribute: attribute.to_string(),
        value: raw.to_string(),
    };

    let trimmed = collapse(raw);
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    trimmed.parse::<u64>().map_err(|_| malformed())
}

/// Parse a `maxOccurs` value: `unbounded` or a non-negative integer.
///
/// The `unbounded` token gets the same whitespace collapse as numbers.
pub fn validate_max_occurs(tag: &str, raw: &str) -> Result<MaxOccurs> {
    if collapse(raw) == UNBOUNDED {
        return Ok(MaxOccurs::Unbounded);
    }
    validate_non_negative_integer(tag, MAX_OCCURS, raw).map(MaxOccurs::Bounded)
}

fn collapse(raw: &str) -> &str {
    raw.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_non_negative_integers_parse_exactly() {
        for value in [0u64, 1, 7, 42, 1000, u32::MAX as u64, u64::MAX] {
            let raw = value.to_string();
            assert_eq!(validate_non_negative_integer("xs:choice", MIN_OCCURS, &raw).unwrap(), value);
        }
    }

    #[test]
    fn test_malformed_values() {
        for raw in ["", "-1", "+1", "abc", "1.5", "1e3", "０", "18446744073709551616"] {
            let err = validate_non_negative_integer("xs:sequence", MIN_OCCURS, raw).unwrap_err();
            match err {
                Error::MalformedOccurs { tag, attribute, value } => {
                    assert_eq!(tag, "xs:sequence");
                    assert_eq!(attribute, MIN_OCCURS);
                    assert_eq!(value, raw);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_unbounded_is_sentinel() {
        assert_eq!(validate_max_occurs("xs:choice", "unbounded").unwrap(), MaxOccurs::Unbounded);
        assert!(validate_max_occurs("xs:choice", "Unbounded").is_err());
        assert!(validate_max_occurs("xs:choice", "UNBOUNDED").is_err());
        assert_eq!(validate_max_occurs("xs:choice", "3").unwrap(), MaxOccurs::Bounded(3));
    }

    #[test]
    fn test_surrounding_whitespace_is_collapsed() {
        assert_eq!(validate_max_occurs("xs:choice", " 5 ").unwrap(), MaxOccurs::Bounded(5));
        assert_eq!(validate_max_occurs("xs:choice", " unbounded ").unwrap(), MaxOccurs::Unbounded);
        assert_eq!(validate_max_occurs("xs:choice", "\tunbounded\n").unwrap(), MaxOccurs::Unbounded);
        assert!(validate_max_occurs("xs:choice", "un bounded").is_err());
    }

    #[test]
    fn test_max_occurs_error_names_attribute() {
        let err = validate_max_occurs("xs:choice", "abc").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedOccurs { ref attribute, ref value, .. } if attribute == MAX_OCCURS && value == "abc"
        ));
    }

    #[test]
    fn test_defaults() {
        let occurs = Occurs::from_attributes("xs:element", &BTreeMap::new()).unwrap();
        assert_eq!(occurs, Occurs::default());
        assert_eq!(occurs.to_string(), "[1..1]");
    }

    #[test]
    fn test_max_below_min_is_invalid() {
        let err = Occurs::from_attributes("xs:element", &attrs(&[("minOccurs", "3"), ("maxOccurs", "2")]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidAttribute { .. }));

        let occurs =
            Occurs::from_attributes("xs:element", &attrs(&[("minOccurs", "3"), ("maxOccurs", "unbounded")]))
                .unwrap();
        assert!(occurs.is_repeated());
        assert!(!occurs.is_optional());
    }
}
