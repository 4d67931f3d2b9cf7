//! Arena storage for description elements and their containment links.
//!
//! # Architecture
//!
//! - [`ElementId`]: Copyable handle tagged with the tree that issued it
//! - `Slot`: An element plus its structural parent, containment lists,
//!   palette and (for edges) source/target descriptions
//! - [`ElementTree`]: The arena, rooted at a diagram element
//!
//! Every element except the root has exactly one structural parent, reached
//! through a `Child` or `BorderChild` link. Reused links are only added by
//! the reuse binder and are never followed by traversals.

use std::{
    fmt,
    sync::atomic::{AtomicU32, Ordering},
};

use log::trace;

use descry_core::{
    domain::DomainType,
    element::{ContainmentKind, Element, ElementKind},
    palette::Palette,
};

use crate::error::InvariantViolation;

/// Source of unique tree tags, so handles from another tree are detected.
static NEXT_TREE_TAG: AtomicU32 = AtomicU32::new(0);

// =============================================================================
// Element handles
// =============================================================================

/// Handle to an element of an [`ElementTree`].
///
/// Handles are only meaningful for the tree that created them; every tree
/// operation rejects handles issued by another tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId {
    tree: u32,
    index: u32,
}

impl ElementId {
    /// Position of the element in its tree, in creation order.
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.tree, self.index)
    }
}

// =============================================================================
// Internal storage
// =============================================================================

#[derive(Debug)]
struct Slot {
    element: Element,
    parent: Option<(ElementId, ContainmentKind)>,
    contents: [Vec<ElementId>; 4],
    palette: Palette,
    sources: Vec<ElementId>,
    targets: Vec<ElementId>,
}

impl Slot {
    fn new(element: Element, parent: Option<(ElementId, ContainmentKind)>) -> Self {
        let palette = match element.kind() {
            ElementKind::Edge => Palette::without_sections(),
            _ => Palette::new(),
        };
        Self {
            element,
            parent,
            contents: Default::default(),
            palette,
            sources: Vec::new(),
            targets: Vec::new(),
        }
    }
}

// =============================================================================
// The tree
// =============================================================================

/// The in-memory description graph under construction.
///
/// The tree has a single writer for its whole lifetime and is frozen into a
/// [`DiagramDescription`](crate::DiagramDescription) once built.
#[derive(Debug)]
pub struct ElementTree {
    tag: u32,
    slots: Vec<Slot>,
}

impl ElementTree {
    /// Creates a tree whose root is a diagram description.
    pub fn new(name: impl Into<String>, domain_type: Option<DomainType>) -> Self {
        let tag = NEXT_TREE_TAG.fetch_add(1, Ordering::Relaxed);
        let root = Element::new(ElementKind::Diagram, name, domain_type);
        ElementTree {
            tag,
            slots: vec![Slot::new(root, None)],
        }
    }

    /// Returns the diagram root.
    pub fn root(&self) -> ElementId {
        self.id_at(0)
    }

    /// Returns the total number of elements, root included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// A tree always holds at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Checks whether `id` was issued by this tree.
    pub fn contains(&self, id: ElementId) -> bool {
        id.tree == self.tag && id.index() < self.slots.len()
    }

    /// Returns `Ok` if `id` belongs to this tree.
    pub fn check(&self, id: ElementId) -> Result<(), InvariantViolation> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(InvariantViolation::ForeignElement { element: id })
        }
    }

    /// Returns the element for the given handle, if it belongs to this tree.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.contains(id).then(|| &self.slots[id.index()].element)
    }

    /// Returns the element for the given handle.
    ///
    /// # Panics
    /// Panics if the handle was not issued by this tree.
    pub fn element(&self, id: ElementId) -> &Element {
        &self.slot(id).element
    }

    /// Mutable access to an element's attributes.
    ///
    /// # Panics
    /// Panics if the handle was not issued by this tree.
    pub fn element_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.slot_mut(id).element
    }

    /// Returns the elements held by `id` under the given containment kind.
    pub fn children(&self, id: ElementId, kind: ContainmentKind) -> &[ElementId] {
        &self.slot(id).contents[kind.index()]
    }

    /// Returns the structural parent, or `None` for the root.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.slot(id).parent.map(|(parent, _)| parent)
    }

    /// Returns how `id` is structurally contained in its parent.
    pub fn containment(&self, id: ElementId) -> Option<ContainmentKind> {
        self.slot(id).parent.map(|(_, kind)| kind)
    }

    pub fn palette(&self, id: ElementId) -> &Palette {
        &self.slot(id).palette
    }

    pub fn palette_mut(&mut self, id: ElementId) -> &mut Palette {
        &mut self.slot_mut(id).palette
    }

    /// Source descriptions of an edge.
    pub fn edge_sources(&self, id: ElementId) -> &[ElementId] {
        &self.slot(id).sources
    }

    /// Target descriptions of an edge.
    pub fn edge_targets(&self, id: ElementId) -> &[ElementId] {
        &self.slot(id).targets
    }

    /// Returns a readable path of element names from the root, for messages.
    pub fn path(&self, id: ElementId) -> String {
        if !self.contains(id) {
            return id.to_string();
        }
        let mut names = vec![self.element(id).name()];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            names.push(self.element(parent).name());
            current = parent;
        }
        names.reverse();
        names.join("/")
    }

    /// Adds a new node description under `parent`.
    ///
    /// # Errors
    /// - `containment` is a reused kind
    /// - the parent cannot hold nodes under `containment`
    pub fn add_node(
        &mut self,
        parent: ElementId,
        containment: ContainmentKind,
        element: Element,
    ) -> Result<ElementId, InvariantViolation> {
        self.create(parent, containment, element, ElementKind::Node)
    }

    /// Adds a new edge description under `parent`, always as a child.
    pub fn add_edge(
        &mut self,
        parent: ElementId,
        element: Element,
    ) -> Result<ElementId, InvariantViolation> {
        self.create(parent, ContainmentKind::Child, element, ElementKind::Edge)
    }

    fn create(
        &mut self,
        parent: ElementId,
        containment: ContainmentKind,
        element: Element,
        expected: ElementKind,
    ) -> Result<ElementId, InvariantViolation> {
        self.check(parent)?;
        if containment.is_reused() {
            return Err(InvariantViolation::ReusedContainmentOnCreate { containment });
        }
        if element.kind() != expected {
            return Err(InvariantViolation::NotATreeElement {
                kind: element.kind(),
            });
        }

        let parent_kind = self.element(parent).kind();
        let allowed = matches!(
            (parent_kind, expected, containment),
            (
                ElementKind::Diagram | ElementKind::Node,
                ElementKind::Node | ElementKind::Edge,
                ContainmentKind::Child
            ) | (ElementKind::Node, ElementKind::Node, ContainmentKind::BorderChild)
        );
        if !allowed {
            return Err(InvariantViolation::InvalidContainment {
                parent: self.path(parent),
                kind: expected,
                containment,
            });
        }

        let id = self.id_at(self.slots.len());
        trace!(element:% = element, parent:% = self.path(parent); "Creating element");
        self.slots.push(Slot::new(element, Some((parent, containment))));
        self.attach(parent, id, containment)?;
        Ok(id)
    }

    /// Appends `child` to `parent`'s contents under `kind`.
    ///
    /// Structural kinds are recorded when an element is created; reused kinds
    /// are added by the reuse binder.
    pub(crate) fn attach(
        &mut self,
        parent: ElementId,
        child: ElementId,
        kind: ContainmentKind,
    ) -> Result<(), InvariantViolation> {
        self.check(parent)?;
        self.check(child)?;
        self.slot_mut(parent).contents[kind.index()].push(child);
        Ok(())
    }

    /// Appends source descriptions to an edge.
    pub fn add_edge_sources(
        &mut self,
        edge: ElementId,
        sources: &[ElementId],
    ) -> Result<(), InvariantViolation> {
        self.check_edge_ends(edge, sources)?;
        extend_unique(&mut self.slot_mut(edge).sources, sources);
        Ok(())
    }

    /// Appends target descriptions to an edge.
    pub fn add_edge_targets(
        &mut self,
        edge: ElementId,
        targets: &[ElementId],
    ) -> Result<(), InvariantViolation> {
        self.check_edge_ends(edge, targets)?;
        extend_unique(&mut self.slot_mut(edge).targets, targets);
        Ok(())
    }

    fn check_edge_ends(&self, edge: ElementId, ends: &[ElementId]) -> Result<(), InvariantViolation> {
        self.check(edge)?;
        if self.element(edge).kind() != ElementKind::Edge {
            return Err(InvariantViolation::NotAnEdge {
                element: self.path(edge),
            });
        }
        ends.iter().try_for_each(|&end| self.check(end))
    }

    /// Structural pre-order traversal from the root.
    ///
    /// Children are visited before border children; reused links are not
    /// followed, so every element appears exactly once.
    pub fn preorder(&self) -> Vec<ElementId> {
        let mut order = Vec::with_capacity(self.slots.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            self.push_structural_children(id, &mut stack);
        }
        order
    }

    /// Structural post-order traversal: every element after its contents.
    pub fn postorder(&self) -> Vec<ElementId> {
        let mut order = self.preorder_mirrored();
        order.reverse();
        order
    }

    /// Pre-order visiting the last structural child first; reversing it
    /// yields a post-order with children in declaration order.
    fn preorder_mirrored(&self) -> Vec<ElementId> {
        let mut order = Vec::with_capacity(self.slots.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            let slot = self.slot(id);
            stack.extend(slot.contents[ContainmentKind::Child.index()].iter().copied());
            stack.extend(slot.contents[ContainmentKind::BorderChild.index()].iter().copied());
        }
        order
    }

    /// Pushes the structural children of `id` so that popping yields them in
    /// declaration order, children before border children.
    pub(crate) fn push_structural_children(&self, id: ElementId, stack: &mut Vec<ElementId>) {
        let slot = self.slot(id);
        stack.extend(
            slot.contents[ContainmentKind::BorderChild.index()]
                .iter()
                .rev()
                .copied(),
        );
        stack.extend(slot.contents[ContainmentKind::Child.index()].iter().rev().copied());
    }

    fn id_at(&self, index: usize) -> ElementId {
        ElementId {
            tree: self.tag,
            index: index as u32,
        }
    }

    fn slot(&self, id: ElementId) -> &Slot {
        assert!(self.contains(id), "Element {id} does not belong to this tree");
        &self.slots[id.index()]
    }

    fn slot_mut(&mut self, id: ElementId) -> &mut Slot {
        assert!(self.contains(id), "Element {id} does not belong to this tree");
        &mut self.slots[id.index()]
    }
}

fn extend_unique(list: &mut Vec<ElementId>, items: &[ElementId]) {
    for item in items {
        if !list.contains(item) {
            list.push(*item);
        }
    }
}
