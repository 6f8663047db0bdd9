//! Schema loader - the file-system document closure
//!
//! Parses a root schema file, then every file named by its `include`,
//! `redefine` and (optionally) `import` declarations, transitively.
//! `schemaLocation` is relative to the including document. Each file is
//! loaded once; cycles end at the first already-visited path.

use crate::closure::SchemaSet;
use crate::kind::ElementKind;
use crate::parser::Parser;
use crate::xml;
use crate::{Error, Result};
use std::collections::{BTreeSet, VecDeque};
use std::path::{Path, PathBuf};

/// Namespaces whose components are predefined; their imports are not followed
const PREDEFINED_NAMESPACES: &[&str] = &[
    "http://www.w3.org/2001/XMLSchema",
    "http://www.w3.org/XML/1998/namespace",
];

#[derive(Debug, Clone)]
pub struct Loader {
    parser: Parser,
    follow_imports: bool,
}

impl Loader {
    pub fn new(parser: Parser) -> Self {
        Self {
            parser,
            follow_imports: true,
        }
    }

    /// Follow `import` declarations as well as `include`/`redefine`
    pub fn with_follow_imports(mut self, follow: bool) -> Self {
        self.follow_imports = follow;
        self
    }

    /// Load `path` and its closure
    pub fn load(&self, path: &Path) -> Result<SchemaSet> {
        let mut set = SchemaSet::new();
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::from([path.to_path_buf()]);

        while let Some(path) = queue.pop_front() {
            let canonical = canonicalize(&path)?;
            if !visited.insert(canonical.clone()) {
                tracing::debug!("Skipping already loaded {}", path.display());
                continue;
            }

            let node = xml::parse_file(&canonical)?;
            let forest = self.parser.parse_document(&path.display().to_string(), &node)?;
            let base = canonical.parent().map(Path::to_path_buf).unwrap_or_default();

            for pending in forest.pending_documents() {
                let reference = &pending.reference;
                let Some(location) = reference.schema_location.as_deref() else {
                    continue;
                };
                if reference.kind == ElementKind::Import {
                    if !self.follow_imports {
                        continue;
                    }
                    let predefined = reference
                        .namespace
                        .as_deref()
                        .is_some_and(|ns| PREDEFINED_NAMESPACES.contains(&ns));
                    if predefined {
                        continue;
                    }
                }
                if location.contains("://") {
                    tracing::warn!("Not following remote schema location {} in {}", location, path.display());
                    continue;
                }
                queue.push_back(base.join(location));
            }

            set.add(forest);
        }

        tracing::info!("Loaded {} schema documents from {}", set.len(), path.display());
        Ok(set)
    }
}

fn canonicalize(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .map_err(|err| Error::Io(std::io::Error::new(err.kind(), format!("{}: {}", path.display(), err))))
}
