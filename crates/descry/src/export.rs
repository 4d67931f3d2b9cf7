//! Frozen diagram descriptions and their JSON export.
//!
//! Once resolved and sorted, an [`ElementTree`] is frozen into a
//! [`DiagramDescription`]: an immutable, nested document that the external
//! editor loads at start-up. Each element gets a numeric `id`; reused links
//! and edge ends are exported as references to those ids, never as copies.

use log::{debug, info};
use serde::Serialize;

use descry_core::{
    element::{ContainmentKind, Element},
    palette::Palette,
};

use crate::{
    error::DescryError,
    structure::{ElementId, ElementTree},
};

/// One frozen description element with its nested contents.
#[derive(Debug, Clone, Serialize)]
pub struct ElementDescription {
    id: usize,
    #[serde(flatten)]
    element: Element,
    palette: Palette,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<ElementDescription>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    border_children: Vec<ElementDescription>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    reused_children: Vec<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    reused_border_children: Vec<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sources: Vec<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    targets: Vec<usize>,
}

impl ElementDescription {
    fn freeze(tree: &ElementTree, id: ElementId) -> Self {
        let frozen = |kind: ContainmentKind| -> Vec<ElementDescription> {
            tree.children(id, kind)
                .iter()
                .map(|&child| Self::freeze(tree, child))
                .collect()
        };
        let references = |ids: &[ElementId]| -> Vec<usize> { ids.iter().map(ElementId::index).collect() };

        Self {
            id: id.index(),
            element: tree.element(id).clone(),
            palette: tree.palette(id).clone(),
            children: frozen(ContainmentKind::Child),
            border_children: frozen(ContainmentKind::BorderChild),
            reused_children: references(tree.children(id, ContainmentKind::ReusedChild)),
            reused_border_children: references(
                tree.children(id, ContainmentKind::ReusedBorderChild),
            ),
            sources: references(tree.edge_sources(id)),
            targets: references(tree.edge_targets(id)),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn children(&self) -> &[ElementDescription] {
        &self.children
    }

    pub fn border_children(&self) -> &[ElementDescription] {
        &self.border_children
    }

    /// Ids of descriptions reused as children.
    pub fn reused_children(&self) -> &[usize] {
        &self.reused_children
    }

    /// Ids of descriptions reused as border children.
    pub fn reused_border_children(&self) -> &[usize] {
        &self.reused_border_children
    }

    /// Ids of an edge's source descriptions.
    pub fn sources(&self) -> &[usize] {
        &self.sources
    }

    /// Ids of an edge's target descriptions.
    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a ElementDescription>) {
        out.push(self);
        for child in self.children.iter().chain(&self.border_children) {
            child.collect(out);
        }
    }
}

/// A fully resolved and sorted diagram description.
///
/// Read-only: nothing can change a description once it is frozen.
#[derive(Debug, Clone, Serialize)]
pub struct DiagramDescription {
    element_count: usize,
    diagram: ElementDescription,
}

impl DiagramDescription {
    /// Freezes a resolved and sorted tree.
    pub fn freeze(tree: &ElementTree) -> Self {
        let diagram = ElementDescription::freeze(tree, tree.root());
        debug!(elements = tree.len(); "Description frozen");
        Self {
            element_count: tree.len(),
            diagram,
        }
    }

    /// The diagram root.
    pub fn diagram(&self) -> &ElementDescription {
        &self.diagram
    }

    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Every description in structural pre-order.
    pub fn elements(&self) -> Vec<&ElementDescription> {
        let mut out = Vec::with_capacity(self.element_count);
        self.diagram.collect(&mut out);
        out
    }

    /// Looks a description up by id.
    pub fn get(&self, id: usize) -> Option<&ElementDescription> {
        self.elements().into_iter().find(|d| d.id == id)
    }

    /// All descriptions with the given name.
    pub fn find_by_name(&self, name: &str) -> Vec<&ElementDescription> {
        self.elements()
            .into_iter()
            .filter(|d| d.element.name() == name)
            .collect()
    }

    /// Serializes the description to JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String, DescryError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        info!(bytes = json.len(), pretty; "Description exported");
        Ok(json)
    }
}
