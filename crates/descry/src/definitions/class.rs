//! Class diagram description.

use log::debug;

use descry_core::{
    element::{ContainmentKind, Element, ElementKind, ElementRole},
    palette::ToolKind,
    uml::{
        ASSOCIATION, CLASS, CLASSIFIER, COMMENT, GENERALIZATION, INTERFACE, NAMED_ELEMENT,
        OPERATION, PACKAGE, PROPERTY, USAGE,
    },
};

use crate::{
    assembly::Assembly, error::DescryError, matcher::TypeQuery, structure::ElementId,
};

use super::{DiagramDefinition, Routine, add_child, creation_tool};

const NODES: &str = "Nodes";
const EDGES: &str = "Edges";
const ANNOTATIONS: &str = "Annotations";

const LABEL: &str = "label";
/// Label expression of list items, evaluated by the editor.
const ITEM_LABEL: &str = "aql:self.name + ' : ' + self.type.name";

/// Packages, classes and interfaces with their relationships.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassDiagram;

impl DiagramDefinition for ClassDiagram {
    fn name(&self) -> &str {
        "Class Diagram"
    }

    fn domain_type(&self) -> &str {
        PACKAGE
    }

    fn routines(&self) -> Vec<Routine> {
        vec![
            Box::new(packages) as Routine,
            Box::new(classifiers) as Routine,
            Box::new(annotations) as Routine,
            Box::new(relationships) as Routine,
        ]
    }
}

fn packages(assembly: &mut Assembly<'_>) -> Result<(), DescryError> {
    let diagram = assembly.diagram();
    let package = add_child(assembly, diagram, "Package", PACKAGE)?;

    let tool = creation_tool(assembly, "Package", ToolKind::NodeCreation, PACKAGE);
    assembly.add_tool(diagram, tool.clone(), Some(NODES))?;
    // Packages nest recursively, the package description included.
    assembly.share_in_owners(package, TypeQuery::new(&[PACKAGE]), Some(tool), Some(NODES))
}

fn classifiers(assembly: &mut Assembly<'_>) -> Result<(), DescryError> {
    let diagram = assembly.diagram();

    let class = add_child(assembly, diagram, "Class", CLASS)?;
    add_compartment(assembly, class, "Attributes", "Property", PROPERTY)?;
    add_compartment(assembly, class, "Operations", "Operation", OPERATION)?;
    let tool = creation_tool(assembly, "Class", ToolKind::NodeCreation, CLASS);
    assembly.add_tool(diagram, tool.clone(), Some(NODES))?;
    assembly.share_in_owners(class, TypeQuery::new(&[PACKAGE]), Some(tool), Some(NODES))?;

    let interface = add_child(assembly, diagram, "Interface", INTERFACE)?;
    add_compartment(assembly, interface, "Operations", "Operation", OPERATION)?;
    let tool = creation_tool(assembly, "Interface", ToolKind::NodeCreation, INTERFACE);
    assembly.add_tool(diagram, tool.clone(), Some(NODES))?;
    assembly.share_in_owners(interface, TypeQuery::new(&[PACKAGE]), Some(tool), Some(NODES))
}

/// Adds a compartment holding one kind of list item, with its creation tool.
fn add_compartment(
    assembly: &mut Assembly<'_>,
    owner: ElementId,
    name: &str,
    item_name: &str,
    item_type: &str,
) -> Result<ElementId, DescryError> {
    let compartment = Element::new(ElementKind::Node, name, None).with_role(ElementRole::Compartment);
    let compartment = assembly.add_node(owner, ContainmentKind::Child, compartment)?;

    let item = assembly
        .node(item_name, item_type)
        .with_role(ElementRole::ListItem)
        .with_property(LABEL, ITEM_LABEL);
    assembly.add_node(compartment, ContainmentKind::Child, item)?;

    let tool = creation_tool(assembly, item_name, ToolKind::NodeCreation, item_type);
    assembly.add_tool(compartment, tool, None)?;
    Ok(compartment)
}

fn annotations(assembly: &mut Assembly<'_>) -> Result<(), DescryError> {
    let diagram = assembly.diagram();
    let shared_root = assembly.shared_root();
    let comment = add_child(assembly, shared_root, "Comment", COMMENT)?;

    let tool = creation_tool(assembly, "Comment", ToolKind::NodeCreation, COMMENT);
    assembly.add_tool(diagram, tool.clone(), Some(ANNOTATIONS))?;
    assembly.share_in_owners(
        comment,
        TypeQuery::new(&[PACKAGE, CLASS]),
        Some(tool),
        Some(ANNOTATIONS),
    )
}

fn relationships(assembly: &mut Assembly<'_>) -> Result<(), DescryError> {
    let diagram = assembly.diagram();
    let edges = [
        (GENERALIZATION, TypeQuery::new(&[CLASSIFIER]), TypeQuery::new(&[CLASSIFIER])),
        (ASSOCIATION, TypeQuery::new(&[CLASS]), TypeQuery::new(&[CLASS])),
        (
            USAGE,
            TypeQuery::new(&[NAMED_ELEMENT]),
            TypeQuery::new(&[NAMED_ELEMENT]),
        ),
    ];

    for (type_name, sources, targets) in edges {
        let element = assembly.edge(type_name, type_name);
        let edge = assembly.add_edge(diagram, element)?;
        assembly.connect(edge, sources, targets)?;

        let tool = creation_tool(assembly, type_name, ToolKind::EdgeCreation, type_name);
        assembly.add_tool(diagram, tool, Some(EDGES))?;
        debug!(edge = type_name; "Relationship described");
    }
    Ok(())
}
