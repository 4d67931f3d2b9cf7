//! Composite structure diagram description.

use descry_core::{
    element::ContainmentKind,
    palette::ToolKind,
    uml::{
        CLASS, COMMENT, CONNECTABLE_ELEMENT, CONNECTOR, DEPENDENCY, NAMED_ELEMENT, PORT, PROPERTY,
        STRUCTURED_CLASSIFIER,
    },
};

use crate::{assembly::Assembly, error::DescryError, matcher::TypeQuery};

use super::{DiagramDefinition, Routine, add_child, creation_tool};

const NODES: &str = "Nodes";
const PORTS: &str = "Ports";
const EDGES: &str = "Edges";

/// Structured classes with their parts, ports and connectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeStructureDiagram;

impl DiagramDefinition for CompositeStructureDiagram {
    fn name(&self) -> &str {
        "Composite Structure Diagram"
    }

    fn domain_type(&self) -> &str {
        CLASS
    }

    fn routines(&self) -> Vec<Routine> {
        vec![
            Box::new(connectors) as Routine,
            Box::new(ports) as Routine,
            Box::new(structure) as Routine,
            Box::new(annotations) as Routine,
        ]
    }
}

/// Nodes that can own parts and ports.
fn part_owners() -> TypeQuery {
    TypeQuery::new(&[PROPERTY, STRUCTURED_CLASSIFIER]).excluding(&[PORT])
}

fn structure(assembly: &mut Assembly<'_>) -> Result<(), DescryError> {
    let diagram = assembly.diagram();
    let class = add_child(assembly, diagram, "Class", CLASS)?;
    let part = add_child(assembly, class, "Part", PROPERTY)?;

    let tool = creation_tool(assembly, "Class", ToolKind::NodeCreation, CLASS);
    assembly.add_tool(diagram, tool, Some(NODES))?;

    let tool = creation_tool(assembly, "Part", ToolKind::NodeCreation, PROPERTY);
    assembly.share_in_owners(part, part_owners(), Some(tool), Some(NODES))
}

fn ports(assembly: &mut Assembly<'_>) -> Result<(), DescryError> {
    let shared_root = assembly.shared_root();
    let element = assembly.node("Port", PORT);
    let port = assembly.add_node(shared_root, ContainmentKind::BorderChild, element)?;

    let tool = creation_tool(assembly, "Port", ToolKind::NodeCreation, PORT);
    assembly.share_in_owners(port, part_owners(), Some(tool), Some(PORTS))
}

fn annotations(assembly: &mut Assembly<'_>) -> Result<(), DescryError> {
    let diagram = assembly.diagram();
    let shared_root = assembly.shared_root();
    let comment = add_child(assembly, shared_root, "Comment", COMMENT)?;

    let tool = creation_tool(assembly, "Comment", ToolKind::NodeCreation, COMMENT);
    assembly.add_tool(diagram, tool.clone(), None)?;
    assembly.share_in_owners(comment, TypeQuery::new(&[STRUCTURED_CLASSIFIER]), Some(tool), None)
}

fn connectors(assembly: &mut Assembly<'_>) -> Result<(), DescryError> {
    let diagram = assembly.diagram();

    let element = assembly.edge("Connector", CONNECTOR);
    let connector = assembly.add_edge(diagram, element)?;
    let ends = TypeQuery::new(&[CONNECTABLE_ELEMENT]);
    assembly.connect(connector, ends.clone(), ends)?;

    let element = assembly.edge("Dependency", DEPENDENCY);
    let dependency = assembly.add_edge(diagram, element)?;
    let ends = TypeQuery::new(&[NAMED_ELEMENT]).excluding(&[PORT]);
    assembly.connect(dependency, ends.clone(), ends)?;

    for (name, type_name) in [("Connector", CONNECTOR), ("Dependency", DEPENDENCY)] {
        let tool = creation_tool(assembly, name, ToolKind::EdgeCreation, type_name);
        assembly.add_tool(diagram, tool, Some(EDGES))?;
    }
    Ok(())
}
