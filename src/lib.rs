//! # xsdgraph - XML Schema object model
//!
//! Parses XSD documents into a typed, navigable schema graph.
//!
//! xsdgraph provides:
//! - A closed variant model for every XSD construct, with grammar rules
//!   enforced whenever a child is attached
//! - A registry of named top-level definitions per document, merged across
//!   the include/import closure
//! - A resolution pass linking `ref`/`type`/`base` names to their definitions,
//!   collecting every dangling reference instead of stopping at the first
//! - Occurrence constraint (`minOccurs`/`maxOccurs`) validation

pub mod kind;
pub mod occurs;
pub mod node;
pub mod element;
pub mod reference;
pub mod grammar;
pub mod registry;
pub mod graph;
pub mod builtins;
pub mod parser;
pub mod resolver;
pub mod closure;
pub mod xml;
pub mod loader;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use kind::{DefinitionKind, ElementKind};
pub use occurs::{MaxOccurs, Occurs};
pub use node::Node;
pub use element::{ElementId, SchemaElement, Variant};
pub use reference::{QName, Reference};
pub use registry::Registry;
pub use graph::SchemaForest;
pub use parser::{ParseOptions, Parser};
pub use resolver::{resolve, ResolvedSchemaGraph};
pub use closure::SchemaSet;

/// Result type alias for xsdgraph operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for xsdgraph operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed {attribute} on {tag}: {value:?} is not a non-negative integer")]
    MalformedOccurs {
        tag: String,
        attribute: String,
        value: String,
    },

    #[error("Invalid attribute {attribute}={value:?} on {tag}: {reason}")]
    InvalidAttribute {
        tag: String,
        attribute: String,
        value: String,
        reason: String,
    },

    #[error("Illegal child: {child} is not allowed inside {parent}")]
    IllegalChild {
        parent: ElementKind,
        child: ElementKind,
    },

    #[error("Unknown element: {tag}")]
    UnknownElement { tag: String },

    #[error("Duplicate definition of {kind} {name:?}")]
    DuplicateDefinition { kind: DefinitionKind, name: String },

    #[error("Unresolved reference to {kind} {name:?}{}", at_location(.location))]
    UnresolvedReference {
        name: String,
        kind: DefinitionKind,
        location: Option<String>,
    },

    #[error("Root element {tag} is not a schema")]
    NotASchema { tag: String },

    #[error("XML error: {0}")]
    Xml(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn at_location(location: &Option<String>) -> String {
    location
        .as_ref()
        .map(|l| format!(" at {}", l))
        .unwrap_or_default()
}

impl Error {
    /// Structural errors abort parsing of the enclosing document
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Error::MalformedOccurs { .. }
                | Error::InvalidAttribute { .. }
                | Error::IllegalChild { .. }
                | Error::UnknownElement { .. }
                | Error::DuplicateDefinition { .. }
                | Error::NotASchema { .. }
        )
    }
}
