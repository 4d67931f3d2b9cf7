//! Element value types for description graphs.
//!
//! An [`Element`] carries what a diagram, node or edge description *is*: its
//! kind, name, domain type and the opaque expression properties the external
//! editor evaluates. Where an element sits in the graph is tracked by the
//! tree that owns it.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::domain::DomainType;

/// The kind of a description element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Diagram,
    Node,
    Edge,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Diagram => "diagram",
            Self::Node => "node",
            Self::Edge => "edge",
        };
        write!(f, "{name}")
    }
}

/// How an element is contained in its owner.
///
/// `Child` and `BorderChild` are structural: each element has exactly one
/// structural parent. The reused kinds are non-owning references to an
/// element structurally owned elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainmentKind {
    Child,
    BorderChild,
    ReusedChild,
    ReusedBorderChild,
}

impl ContainmentKind {
    /// All containment kinds, in traversal order.
    pub const ALL: [ContainmentKind; 4] = [
        Self::Child,
        Self::BorderChild,
        Self::ReusedChild,
        Self::ReusedBorderChild,
    ];

    /// Returns `true` for the non-owning kinds.
    pub fn is_reused(&self) -> bool {
        matches!(self, Self::ReusedChild | Self::ReusedBorderChild)
    }

    /// Maps a containment kind to its reused counterpart.
    pub fn reused(&self) -> Self {
        match self {
            Self::Child | Self::ReusedChild => Self::ReusedChild,
            Self::BorderChild | Self::ReusedBorderChild => Self::ReusedBorderChild,
        }
    }

    /// Position of this kind in [`ContainmentKind::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Self::Child => 0,
            Self::BorderChild => 1,
            Self::ReusedChild => 2,
            Self::ReusedBorderChild => 3,
        }
    }
}

impl fmt::Display for ContainmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Child => "child",
            Self::BorderChild => "border child",
            Self::ReusedChild => "reused child",
            Self::ReusedBorderChild => "reused border child",
        };
        write!(f, "{name}")
    }
}

/// Structural role of an element, consulted by the domain-type matcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementRole {
    /// An ordinary description.
    #[default]
    Regular,
    /// A compartment inside a node (e.g. the attribute list of a class).
    Compartment,
    /// An item displayed inside a list compartment.
    ListItem,
    /// The pseudo-element holding shared descriptions.
    SharedRoot,
}

impl ElementRole {
    /// Returns `true` for compartments and list items.
    pub fn is_compartment_part(&self) -> bool {
        matches!(self, Self::Compartment | Self::ListItem)
    }
}

/// A description element: diagram, node or edge.
#[derive(Debug, Clone, Serialize)]
pub struct Element {
    kind: ElementKind,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain_type: Option<DomainType>,
    role: ElementRole,
    #[serde(skip_serializing_if = "is_true")]
    searchable: bool,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    properties: IndexMap<String, String>,
}

fn is_true(value: &bool) -> bool {
    *value
}

impl Element {
    /// Creates a searchable element with the [`ElementRole::Regular`] role.
    pub fn new(kind: ElementKind, name: impl Into<String>, domain_type: Option<DomainType>) -> Self {
        Self {
            kind,
            name: name.into(),
            domain_type,
            role: ElementRole::Regular,
            searchable: true,
            properties: IndexMap::new(),
        }
    }

    /// Sets the role (builder style).
    pub fn with_role(mut self, role: ElementRole) -> Self {
        self.role = role;
        self
    }

    /// Adds an opaque property (builder style).
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain_type(&self) -> Option<DomainType> {
        self.domain_type
    }

    pub fn role(&self) -> ElementRole {
        self.role
    }

    /// Whether the domain-type matcher may return this element.
    pub fn is_searchable(&self) -> bool {
        self.searchable
    }

    /// Marks the element as a synthetic element hidden from type searches.
    pub fn set_searchable(&mut self, searchable: bool) {
        self.searchable = searchable;
    }

    /// Returns an opaque property, e.g. a label expression.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.domain_type {
            Some(domain_type) => write!(f, "{} '{}' ({domain_type})", self.kind, self.name),
            None => write!(f, "{} '{}'", self.kind, self.name),
        }
    }
}
