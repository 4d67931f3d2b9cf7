//! Bundled diagram definitions.
//!
//! A [`DiagramDefinition`] names a diagram and lists the construction
//! routines that describe it. Routines run in list order, but none of them
//! may rely on that order: whatever needs elements created by another routine
//! is registered as a callback on the [`Assembly`] and resolved afterwards.

mod class;
mod composite_structure;

pub use class::ClassDiagram;
pub use composite_structure::CompositeStructureDiagram;

use descry_core::{
    element::ContainmentKind,
    palette::{Tool, ToolKind},
};

use crate::{
    assembly::Assembly,
    error::DescryError,
    structure::ElementId,
};

/// A construction routine contributing part of a diagram description.
pub type Routine = Box<dyn Fn(&mut Assembly<'_>) -> Result<(), DescryError>>;

/// The description of one kind of diagram.
pub trait DiagramDefinition {
    /// Name of the diagram description, also used for its root element.
    fn name(&self) -> &str;

    /// Domain type name the diagram is created on.
    fn domain_type(&self) -> &str;

    /// The construction routines, in the order they run.
    fn routines(&self) -> Vec<Routine>;
}

/// Names accepted by [`by_name`].
pub const AVAILABLE: [&str; 2] = ["class", "composite-structure"];

/// Looks up a bundled definition by its short name.
///
/// # Errors
/// Returns [`DescryError::UnknownDefinition`] for names not listed in
/// [`AVAILABLE`].
pub fn by_name(name: &str) -> Result<Box<dyn DiagramDefinition>, DescryError> {
    match name {
        "class" => Ok(Box::new(ClassDiagram)),
        "composite-structure" => Ok(Box::new(CompositeStructureDiagram)),
        other => Err(DescryError::UnknownDefinition(other.to_string())),
    }
}

/// Builds a creation tool targeting `type_name`.
///
/// The target type is left empty when the catalog does not know the name.
fn creation_tool(assembly: &Assembly<'_>, name: &str, kind: ToolKind, type_name: &str) -> Tool {
    let tool = Tool::new(name, kind);
    match assembly.domain_type(type_name) {
        Some(domain_type) => tool.with_target_type(domain_type),
        None => tool,
    }
}

/// Adds a typed node below `parent` as a child.
fn add_child(
    assembly: &mut Assembly<'_>,
    parent: ElementId,
    name: &str,
    type_name: &str,
) -> Result<ElementId, DescryError> {
    let element = assembly.node(name, type_name);
    assembly.add_node(parent, ContainmentKind::Child, element)
}
