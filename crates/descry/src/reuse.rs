//! Reuse/sharing binder.
//!
//! A shared description is owned by exactly one node and appears under other
//! owners through reused containment links, never as a copy. Owners that can
//! display a shared description also receive a copy of its creation tool, so
//! the two operations here are normally invoked together from one callback
//! (see [`Assembly::share_in_owners`](crate::Assembly::share_in_owners)).

use log::trace;

use descry_core::{element::ElementKind, palette::Tool};

use crate::{
    error::InvariantViolation,
    structure::{ElementId, ElementTree},
};

/// Adds a reused link from every owner to `element`.
///
/// The reused kind mirrors the element's own containment: a border child is
/// reused as a border child, anything else as a child. The element's direct
/// structural parent is skipped, as are owners already holding the link, so
/// repeated calls never duplicate links.
///
/// Returns the number of links added.
///
/// # Errors
/// Fails without modifying the tree when `element` is the root, or when an
/// owner is not a node or belongs to another tree.
///
/// An element may be listed among its own owners: the resulting reused link
/// describes recursive nesting (a package inside a package).
pub fn reuse_in_owners(
    tree: &mut ElementTree,
    element: ElementId,
    owners: &[ElementId],
) -> Result<usize, InvariantViolation> {
    tree.check(element)?;
    let (Some(parent), Some(containment)) = (tree.parent(element), tree.containment(element)) else {
        return Err(InvariantViolation::ReuseOfRoot);
    };
    let reused_kind = containment.reused();

    for &owner in owners {
        tree.check(owner)?;
        if tree.element(owner).kind() != ElementKind::Node {
            return Err(InvariantViolation::OwnerNotNode {
                owner: tree.path(owner),
            });
        }
    }

    let mut added = 0;
    for &owner in owners {
        if owner == parent || tree.children(owner, reused_kind).contains(&element) {
            continue;
        }
        tree.attach(owner, element, reused_kind)?;
        trace!(
            owner:% = tree.path(owner),
            element:% = tree.path(element),
            containment:% = reused_kind;
            "Reusing description"
        );
        added += 1;
    }
    Ok(added)
}

/// Copies `tool` into the palette of every owner.
///
/// With a section name the copy goes into that section, which is created if
/// missing; palettes without section support take it at the top level.
pub fn attach_tool_in_owners(
    tree: &mut ElementTree,
    owners: &[ElementId],
    tool: &Tool,
    section: Option<&str>,
) -> Result<(), InvariantViolation> {
    for &owner in owners {
        tree.check(owner)?;
    }

    for &owner in owners {
        let palette = tree.palette_mut(owner);
        match section {
            Some(section) => palette.add_tool_in_section(section, tool.clone()),
            None => palette.add_tool(tool.clone()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use descry_core::{
        domain::DomainType,
        element::{ContainmentKind, Element},
        palette::ToolKind,
    };

    use super::*;

    fn node(name: &str) -> Element {
        Element::new(ElementKind::Node, name, Some(DomainType::new(name)))
    }

    struct Fixture {
        tree: ElementTree,
        container: ElementId,
        port: ElementId,
        comment: ElementId,
        class: ElementId,
        part: ElementId,
    }

    fn fixture() -> Fixture {
        let mut tree = ElementTree::new("Diagram", None);
        let root = tree.root();
        let container = tree.add_node(root, ContainmentKind::Child, node("Shared")).unwrap();
        let port = tree
            .add_node(container, ContainmentKind::BorderChild, node("Port"))
            .unwrap();
        let comment = tree
            .add_node(container, ContainmentKind::Child, node("Comment"))
            .unwrap();
        let class = tree.add_node(root, ContainmentKind::Child, node("Class")).unwrap();
        let part = tree.add_node(class, ContainmentKind::Child, node("Property")).unwrap();
        Fixture {
            tree,
            container,
            port,
            comment,
            class,
            part,
        }
    }

    #[test]
    fn test_reused_kind_mirrors_containment() {
        let Fixture {
            mut tree,
            port,
            comment,
            class,
            ..
        } = fixture();

        reuse_in_owners(&mut tree, port, &[class]).unwrap();
        reuse_in_owners(&mut tree, comment, &[class]).unwrap();

        assert_eq!(tree.children(class, ContainmentKind::ReusedBorderChild), [port]);
        assert_eq!(tree.children(class, ContainmentKind::ReusedChild), [comment]);
    }

    #[test]
    fn test_parent_owner_is_skipped() {
        let Fixture {
            mut tree,
            container,
            port,
            class,
            ..
        } = fixture();

        let added = reuse_in_owners(&mut tree, port, &[container, class]).unwrap();

        assert_eq!(added, 1);
        assert!(tree.children(container, ContainmentKind::ReusedBorderChild).is_empty());
        assert_eq!(tree.children(container, ContainmentKind::BorderChild), [port]);
    }

    #[test]
    fn test_repeated_reuse_does_not_duplicate() {
        let Fixture {
            mut tree,
            port,
            class,
            part,
            ..
        } = fixture();

        assert_eq!(reuse_in_owners(&mut tree, port, &[class, part]).unwrap(), 2);
        assert_eq!(reuse_in_owners(&mut tree, port, &[class, part]).unwrap(), 0);
        assert_eq!(tree.children(part, ContainmentKind::ReusedBorderChild), [port]);
    }

    #[test]
    fn test_invalid_owner_leaves_tree_untouched() {
        let Fixture {
            mut tree,
            port,
            class,
            ..
        } = fixture();

        let edge = tree
            .add_edge(tree.root(), Element::new(ElementKind::Edge, "Link", None))
            .unwrap();
        let err = reuse_in_owners(&mut tree, port, &[class, edge]).unwrap_err();
        assert!(matches!(err, InvariantViolation::OwnerNotNode { .. }));
        assert!(tree.children(class, ContainmentKind::ReusedBorderChild).is_empty());

        let root = tree.root();
        let err = reuse_in_owners(&mut tree, root, &[class]).unwrap_err();
        assert!(matches!(err, InvariantViolation::ReuseOfRoot));
    }

    #[test]
    fn test_recursive_reuse_in_itself() {
        let Fixture {
            mut tree, class, ..
        } = fixture();

        assert_eq!(reuse_in_owners(&mut tree, class, &[class]).unwrap(), 1);
        assert_eq!(tree.children(class, ContainmentKind::ReusedChild), [class]);
        assert_eq!(tree.preorder().len(), tree.len());
    }

    #[test]
    fn test_tool_copies_are_independent() {
        let Fixture {
            mut tree,
            class,
            part,
            ..
        } = fixture();
        let tool = Tool::new("New Port", ToolKind::NodeCreation);

        attach_tool_in_owners(&mut tree, &[class, part], &tool, None).unwrap();
        tree.palette_mut(class).add_tool(Tool::new("Other", ToolKind::Generic));

        assert_eq!(tree.palette(class).tools().len(), 2);
        assert_eq!(tree.palette(part).tools().len(), 1);
        assert_eq!(tree.palette(part).tools()[0], tool);
    }

    #[test]
    fn test_tool_section_placement_and_fallback() {
        let Fixture {
            mut tree, class, ..
        } = fixture();
        let edge = tree
            .add_edge(tree.root(), Element::new(ElementKind::Edge, "Link", None))
            .unwrap();
        let tool = Tool::new("New Port", ToolKind::NodeCreation);

        attach_tool_in_owners(&mut tree, &[class, edge], &tool, Some("Ports")).unwrap();

        let class_palette = tree.palette(class);
        assert!(class_palette.tools().is_empty());
        assert_eq!(class_palette.section("Ports").map(|s| s.tools().len()), Some(1));
        assert_eq!(tree.palette(edge).tools().len(), 1);
    }
}
