//! The description tree under construction.
//!
//! [`ElementTree`] is an arena of diagram, node and edge descriptions rooted
//! at one diagram element. Elements are connected by the four
//! [`ContainmentKind`](descry_core::element::ContainmentKind)s; structural
//! containment forms a tree while reused containment adds non-owning
//! references on top of it.

mod tree;

pub use tree::{ElementId, ElementTree};
