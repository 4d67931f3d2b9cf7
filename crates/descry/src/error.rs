//! Error types for Descry operations.
//!
//! This module provides the main error type [`DescryError`] and the
//! [`InvariantViolation`] raised when a construction routine or a deferred
//! callback would leave the description tree inconsistent.
//!
//! Lookup failures (an unknown domain type name in a query) are not errors:
//! they are logged as warnings and the affected query degrades to a partial
//! result.

use std::io;

use thiserror::Error;

use descry_core::element::{ContainmentKind, ElementKind};

use crate::structure::ElementId;

/// A programming error in a construction routine or a callback.
///
/// Violations are reported at the call site and are fatal for the build.
#[derive(Debug, Error)]
pub enum InvariantViolation {
    #[error("element {element} does not belong to this tree")]
    ForeignElement { element: ElementId },

    #[error("elements can only be created as child or border child, not as {containment}")]
    ReusedContainmentOnCreate { containment: ContainmentKind },

    #[error("{kind} elements cannot be placed in a description tree")]
    NotATreeElement { kind: ElementKind },

    #[error("{parent} cannot hold a {kind} as {containment}")]
    InvalidContainment {
        parent: String,
        kind: ElementKind,
        containment: ContainmentKind,
    },

    #[error("the diagram root cannot be reused")]
    ReuseOfRoot,

    #[error("reuse owner {owner} is not a node")]
    OwnerNotNode { owner: String },

    #[error("{element} is not an edge")]
    NotAnEdge { element: String },

    #[error("cannot register a callback on {element}: the resolution pass already visited it")]
    RegisteredAfterVisit { element: String },

    #[error("{count} callback(s) were registered on elements the resolution pass never reached")]
    UnreachedCallbacks { count: usize },
}

/// The main error type for Descry operations.
#[derive(Debug, Error)]
pub enum DescryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),

    /// A deferred callback failed during the resolution pass.
    ///
    /// Resolution is aborted and never retried.
    #[error("Callback registered on {element} failed: {source}")]
    Callback {
        element: String,
        #[source]
        source: Box<DescryError>,
    },

    #[error("Export error: {0}")]
    Export(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown diagram definition: {0}")]
    UnknownDefinition(String),
}

impl DescryError {
    /// Wraps an error raised by a callback registered on `element`.
    pub fn callback(element: impl Into<String>, source: DescryError) -> Self {
        Self::Callback {
            element: element.into(),
            source: Box::new(source),
        }
    }

    /// Returns the innermost error, unwrapping nested callback failures.
    pub fn root_cause(&self) -> &DescryError {
        match self {
            Self::Callback { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
