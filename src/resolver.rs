//! Resolution engine
//!
//! Links every unresolved placeholder in a forest to its registry
//! definition. Misses are collected, not fatal: one pass reports every
//! dangling name in the closure.

use crate::element::ElementId;
use crate::graph::SchemaForest;
use crate::kind::DefinitionKind;
use crate::Error;
use serde::Serialize;
use std::fmt;

/// Outcome counts of one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    /// Placeholders linked by this pass
    pub resolved: usize,
    pub unresolved: usize,
    /// Placeholders already linked by an earlier pass
    pub skipped: usize,
    pub total: usize,
}

impl fmt::Display for ResolutionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Resolution Stats:")?;
        writeln!(f, "  Total References: {}", self.total)?;
        writeln!(f, "  ✅ Resolved: {}", self.resolved)?;
        writeln!(f, "  ⏭  Already resolved: {}", self.skipped)?;
        writeln!(f, "  ❌ Unresolved: {}", self.unresolved)
    }
}

/// A forest after resolution
#[derive(Debug)]
pub struct ResolvedSchemaGraph {
    forest: SchemaForest,
    stats: ResolutionStats,
}

impl ResolvedSchemaGraph {
    pub fn forest(&self) -> &SchemaForest {
        &self.forest
    }

    pub fn into_forest(self) -> SchemaForest {
        self.forest
    }

    pub fn stats(&self) -> ResolutionStats {
        self.stats
    }

    /// True when every placeholder points at a definition
    pub fn is_complete(&self) -> bool {
        self.forest.iter().all(|e| e.links.iter().all(|l| l.reference.is_resolved()))
    }
}

/// Resolve all placeholders of `forest` against its registry.
///
/// Pending redefine overrides are applied first. Every miss yields an
/// `UnresolvedReference` carrying the location of the referencing construct;
/// hits become `Resolved` exactly once, so running this again on the result
/// changes nothing.
pub fn resolve(mut forest: SchemaForest) -> (ResolvedSchemaGraph, Vec<Error>) {
    forest.registry_mut().apply_overrides();

    let mut stats = ResolutionStats::default();
    let mut errors = Vec::new();
    let mut hits: Vec<(ElementId, usize, ElementId)> = Vec::new();

    for element in forest.iter() {
        for (index, link) in element.links.iter().enumerate() {
            stats.total += 1;
            if link.reference.is_resolved() {
                stats.skipped += 1;
                continue;
            }

            let name = link.reference.name();
            let kind = link.reference.kind();
            match lookup(&forest, element.id, kind, &name.local) {
                Some(target) => {
                    tracing::debug!("Resolved {} {} at {} -> {}", kind, name, element.id, target);
                    hits.push((element.id, index, target));
                }
                None => {
                    let location = forest.location(element.id);
                    tracing::debug!("Unresolved {} {} at {}", kind, name, location);
                    stats.unresolved += 1;
                    errors.push(Error::UnresolvedReference {
                        name: name.to_string(),
                        kind,
                        location: Some(location),
                    });
                }
            }
        }
    }

    for (site, index, target) in hits {
        let link = forest.get_mut(site).and_then(|element| element.links.get_mut(index));
        if let Some(link) = link {
            if link.reference.resolve(target) {
                stats.resolved += 1;
            }
        }
    }

    if stats.unresolved > 0 {
        tracing::warn!("{} of {} references are unresolved", stats.unresolved, stats.total);
    }

    (ResolvedSchemaGraph { forest, stats }, errors)
}

/// Registry lookup. A name used inside its own redefinition denotes the
/// definition it redefines.
fn lookup(forest: &SchemaForest, site: ElementId, kind: DefinitionKind, local: &str) -> Option<ElementId> {
    let registry = forest.registry();
    let target = registry.lookup(kind, local)?;
    if target == site || forest.ancestors(site).contains(&target) {
        if let Some(original) = registry.redefined(kind, local) {
            return Some(original);
        }
    }
    Some(target)
}
