//! Registry of named top-level definitions
//!
//! Maps `(definition kind, local name)` to the element defining it. Written
//! while a document is parsed, merged across the documents of a closure, and
//! read-only while references are resolved.

use crate::element::ElementId;
use crate::kind::DefinitionKind;
use crate::{Error, Result};
use std::collections::BTreeMap;

pub type RegistryKey = (DefinitionKind, String);

#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: BTreeMap<RegistryKey, ElementId>,
    /// Definitions inside `redefine`, applied over the merged entries
    overrides: BTreeMap<RegistryKey, ElementId>,
    /// Definitions replaced by an override, still reachable from the override
    redefined: BTreeMap<RegistryKey, ElementId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition. Names are unique within a kind.
    pub fn register(&mut self, kind: DefinitionKind, name: impl Into<String>, id: ElementId) -> Result<()> {
        let name = name.into();
        let key = (kind, name);
        if self.entries.contains_key(&key) {
            return Err(Error::DuplicateDefinition { kind, name: key.1 });
        }
        tracing::debug!("Registered {} {} as {}", kind, key.1, id);
        self.entries.insert(key, id);
        Ok(())
    }

    /// Register a definition found inside `redefine`
    pub fn register_override(&mut self, kind: DefinitionKind, name: impl Into<String>, id: ElementId) -> Result<()> {
        let name = name.into();
        let key = (kind, name);
        if self.overrides.contains_key(&key) {
            return Err(Error::DuplicateDefinition { kind, name: key.1 });
        }
        self.overrides.insert(key, id);
        Ok(())
    }

    /// Look up a definition
    pub fn lookup(&self, kind: DefinitionKind, name: &str) -> Option<ElementId> {
        self.entries.get(&(kind, name.to_string())).copied()
    }

    /// The definition an override replaced, if any
    pub fn redefined(&self, kind: DefinitionKind, name: &str) -> Option<ElementId> {
        self.redefined.get(&(kind, name.to_string())).copied()
    }

    /// Merge `other` into this registry, shifting its ids by `offset`.
    ///
    /// Fails on the first name defined in both. Overrides are collected and
    /// only take effect in `apply_overrides`.
    pub fn merge(&mut self, other: Registry, offset: u32) -> Result<()> {
        for ((kind, name), id) in other.entries {
            self.register(kind, name, id.offset(offset))?;
        }
        for ((kind, name), id) in other.overrides {
            self.register_override(kind, name, id.offset(offset))?;
        }
        for (key, id) in other.redefined {
            self.redefined.insert(key, id.offset(offset));
        }
        Ok(())
    }

    /// Replace redefined entries by their overrides
    pub fn apply_overrides(&mut self) {
        let overrides = std::mem::take(&mut self.overrides);
        for (key, id) in overrides {
            if let Some(original) = self.entries.insert(key.clone(), id) {
                tracing::debug!("{} {} redefined ({} -> {})", key.0, key.1, original, id);
                self.redefined.insert(key, original);
            }
        }
    }

    /// All entries of one kind, in name order
    pub fn definitions(&self, kind: DefinitionKind) -> impl Iterator<Item = (&str, ElementId)> {
        self.entries
            .iter()
            .filter(move |((k, _), _)| *k == kind)
            .map(|((_, name), id)| (name.as_str(), *id))
    }

    /// All entries
    pub fn iter(&self) -> impl Iterator<Item = (&RegistryKey, &ElementId)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = Registry::new();
        registry.register(DefinitionKind::Element, "Book", ElementId(1)).unwrap();
        registry.register(DefinitionKind::Type, "Book", ElementId(2)).unwrap();

        assert_eq!(registry.lookup(DefinitionKind::Element, "Book"), Some(ElementId(1)));
        assert_eq!(registry.lookup(DefinitionKind::Type, "Book"), Some(ElementId(2)));
        assert_eq!(registry.lookup(DefinitionKind::Group, "Book"), None);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_in_same_kind() {
        let mut registry = Registry::new();
        registry.register(DefinitionKind::Element, "Bar", ElementId(1)).unwrap();
        let err = registry.register(DefinitionKind::Element, "Bar", ElementId(2)).unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateDefinition { kind: DefinitionKind::Element, ref name } if name == "Bar"
        ));
        assert_eq!(registry.lookup(DefinitionKind::Element, "Bar"), Some(ElementId(1)));
    }

    #[test]
    fn test_merge_offsets_and_detects_duplicates() {
        let mut first = Registry::new();
        first.register(DefinitionKind::Element, "Bar", ElementId(1)).unwrap();

        let mut second = Registry::new();
        second.register(DefinitionKind::Type, "BarType", ElementId(1)).unwrap();

        first.merge(second, 10).unwrap();
        assert_eq!(first.lookup(DefinitionKind::Type, "BarType"), Some(ElementId(11)));

        let mut third = Registry::new();
        third.register(DefinitionKind::Element, "Bar", ElementId(0)).unwrap();
        assert!(matches!(
            first.merge(third, 20),
            Err(Error::DuplicateDefinition { ref name, .. }) if name == "Bar"
        ));
    }

    #[test]
    fn test_overrides_replace_entries() {
        let mut registry = Registry::new();
        registry.register(DefinitionKind::Type, "Address", ElementId(4)).unwrap();
        registry.register_override(DefinitionKind::Type, "Address", ElementId(9)).unwrap();

        assert_eq!(registry.lookup(DefinitionKind::Type, "Address"), Some(ElementId(4)));
        registry.apply_overrides();
        assert_eq!(registry.lookup(DefinitionKind::Type, "Address"), Some(ElementId(9)));
        assert_eq!(registry.redefined(DefinitionKind::Type, "Address"), Some(ElementId(4)));
    }
}
