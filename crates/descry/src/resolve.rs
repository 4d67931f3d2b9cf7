//! Deferred callback queue and the resolution pass.
//!
//! Construction routines run in arbitrary order, so a routine often needs
//! an element another routine has not created yet. Instead of looking it up
//! immediately, the routine registers a callback on one of its own elements.
//! Once every routine has finished, [`resolve_all`] walks the tree once and
//! runs each element's callbacks in registration order.
//!
//! The pass is a single traversal, not a fixpoint:
//! - callbacks see the complete tree and may create new elements;
//! - callbacks may register further callbacks only on elements the pass has
//!   not visited yet;
//! - the first failing callback aborts the pass.

use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use log::{debug, info, trace};

use descry_core::{domain::DomainCatalog, palette::Tool};

use crate::{
    error::{DescryError, InvariantViolation},
    matcher::{self, MatchOptions, TypeQuery},
    reuse,
    structure::{ElementId, ElementTree},
};

/// A deferred closure bound to one element.
pub type Callback = Box<dyn FnOnce(&mut Resolver<'_>) -> Result<(), DescryError>>;

/// Pending callbacks, keyed by the element they are bound to.
#[derive(Default)]
pub struct CallbackQueue {
    pending: HashMap<ElementId, Vec<Callback>>,
}

impl CallbackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a callback to the pending list of `element`.
    ///
    /// # Errors
    /// Returns [`InvariantViolation::ForeignElement`] if `element` is not part
    /// of `tree`.
    pub fn register<F>(
        &mut self,
        tree: &ElementTree,
        element: ElementId,
        callback: F,
    ) -> Result<(), InvariantViolation>
    where
        F: FnOnce(&mut Resolver<'_>) -> Result<(), DescryError> + 'static,
    {
        tree.check(element)?;
        self.pending
            .entry(element)
            .or_default()
            .push(Box::new(callback));
        Ok(())
    }

    /// Number of callbacks not yet executed.
    pub fn len(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.values().all(Vec::is_empty)
    }

    /// Number of callbacks pending on one element.
    pub fn pending_on(&self, element: ElementId) -> usize {
        self.pending.get(&element).map_or(0, Vec::len)
    }

    fn take(&mut self, element: ElementId) -> Vec<Callback> {
        self.pending.remove(&element).unwrap_or_default()
    }
}

impl fmt::Debug for CallbackQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackQueue")
            .field("elements", &self.pending.len())
            .field("callbacks", &self.len())
            .finish()
    }
}

/// Access to the tree handed to callbacks during the resolution pass.
pub struct Resolver<'a> {
    tree: &'a mut ElementTree,
    catalog: &'a dyn DomainCatalog,
    queue: &'a mut CallbackQueue,
    visited: &'a HashSet<ElementId>,
    options: MatchOptions,
    element: ElementId,
}

impl<'a> Resolver<'a> {
    /// The element the running callback is bound to.
    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn tree(&self) -> &ElementTree {
        self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ElementTree {
        self.tree
    }

    pub fn catalog(&self) -> &dyn DomainCatalog {
        self.catalog
    }

    /// Registers a callback on an element the pass has not reached yet.
    ///
    /// # Errors
    /// Returns [`InvariantViolation::RegisteredAfterVisit`] if the element
    /// was already visited, including the element currently being resolved.
    pub fn register<F>(&mut self, element: ElementId, callback: F) -> Result<(), InvariantViolation>
    where
        F: FnOnce(&mut Resolver<'_>) -> Result<(), DescryError> + 'static,
    {
        if self.visited.contains(&element) {
            return Err(InvariantViolation::RegisteredAfterVisit {
                element: self.tree.path(element),
            });
        }
        self.queue.register(self.tree, element, callback)
    }

    /// Runs a name-based matcher query against the current tree.
    pub fn query_nodes(&self, query: &TypeQuery) -> Vec<ElementId> {
        matcher::query_nodes(self.tree, self.catalog, query, self.options)
    }

    /// See [`reuse::reuse_in_owners`].
    pub fn reuse_in_owners(
        &mut self,
        element: ElementId,
        owners: &[ElementId],
    ) -> Result<usize, InvariantViolation> {
        reuse::reuse_in_owners(self.tree, element, owners)
    }

    /// See [`reuse::attach_tool_in_owners`].
    pub fn attach_tool_in_owners(
        &mut self,
        owners: &[ElementId],
        tool: &Tool,
        section: Option<&str>,
    ) -> Result<(), InvariantViolation> {
        reuse::attach_tool_in_owners(self.tree, owners, tool, section)
    }
}

/// Executes every pending callback once, in tree order.
///
/// Elements are visited in structural pre-order. An element's contents are
/// read after its callbacks ran, so elements those callbacks create below
/// it are visited as well. Returns the number of callbacks executed.
///
/// # Errors
/// - [`DescryError::Callback`] for the first failing callback; the pass stops
/// - [`InvariantViolation::UnreachedCallbacks`] if callbacks remain on
///   elements the traversal never reached (created by a callback under an
///   already visited element)
pub fn resolve_all(
    tree: &mut ElementTree,
    queue: &mut CallbackQueue,
    catalog: &dyn DomainCatalog,
    options: MatchOptions,
) -> Result<usize, DescryError> {
    if queue.is_empty() {
        debug!("No pending callbacks, skipping resolution");
        return Ok(0);
    }
    info!(pending = queue.len(); "Resolving deferred callbacks");

    let mut visited = HashSet::new();
    let mut stack = vec![tree.root()];
    let mut executed = 0;

    while let Some(id) = stack.pop() {
        visited.insert(id);

        let callbacks = queue.take(id);
        if !callbacks.is_empty() {
            trace!(element:% = tree.path(id), count = callbacks.len(); "Running callbacks");
        }
        for callback in callbacks {
            let result = {
                let mut resolver = Resolver {
                    tree: &mut *tree,
                    catalog,
                    queue: &mut *queue,
                    visited: &visited,
                    options,
                    element: id,
                };
                callback(&mut resolver)
            };
            if let Err(err) = result {
                return Err(DescryError::callback(tree.path(id), err));
            }
            executed += 1;
        }

        tree.push_structural_children(id, &mut stack);
    }

    if !queue.is_empty() {
        return Err(InvariantViolation::UnreachedCallbacks { count: queue.len() }.into());
    }

    info!(executed; "Deferred callbacks resolved");
    Ok(executed)
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use descry_core::{
        domain::DomainType,
        element::{ContainmentKind, Element, ElementKind},
        uml,
    };

    use super::*;

    fn node(name: &str) -> Element {
        Element::new(ElementKind::Node, name, Some(DomainType::new(name)))
    }

    #[test]
    fn test_callbacks_run_in_tree_then_registration_order() {
        let mut tree = ElementTree::new("Diagram", None);
        let a = tree.add_node(tree.root(), ContainmentKind::Child, node("A")).unwrap();
        let b = tree.add_node(tree.root(), ContainmentKind::Child, node("B")).unwrap();
        let catalog = uml::catalog();
        let mut queue = CallbackQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (element, label) in [(b, "b1"), (a, "a1"), (b, "b2"), (a, "a2")] {
            let log = Rc::clone(&log);
            queue
                .register(&tree, element, move |_| {
                    log.borrow_mut().push(label);
                    Ok(())
                })
                .unwrap();
        }
        assert_eq!(queue.pending_on(a), 2);
        assert_eq!(queue.pending_on(tree.root()), 0);

        let executed = resolve_all(&mut tree, &mut queue, &catalog, MatchOptions::default()).unwrap();

        assert_eq!(executed, 4);
        assert_eq!(*log.borrow(), ["a1", "a2", "b1", "b2"]);
        assert!(queue.is_empty());
        assert_eq!(queue.pending_on(b), 0);
    }

    #[test]
    fn test_second_pass_is_noop() {
        let mut tree = ElementTree::new("Diagram", None);
        let a = tree.add_node(tree.root(), ContainmentKind::Child, node("A")).unwrap();
        let catalog = uml::catalog();
        let mut queue = CallbackQueue::new();
        queue
            .register(&tree, a, |resolver| {
                let root = resolver.tree().root();
                resolver.tree_mut().add_node(root, ContainmentKind::Child, node("Created"))?;
                Ok(())
            })
            .unwrap();

        assert_eq!(resolve_all(&mut tree, &mut queue, &catalog, MatchOptions::default()).unwrap(), 1);
        let len_after_first = tree.len();
        assert_eq!(resolve_all(&mut tree, &mut queue, &catalog, MatchOptions::default()).unwrap(), 0);
        assert_eq!(tree.len(), len_after_first);
    }

    #[test]
    fn test_callback_failure_aborts_pass() {
        let mut tree = ElementTree::new("Diagram", None);
        let a = tree.add_node(tree.root(), ContainmentKind::Child, node("A")).unwrap();
        let b = tree.add_node(tree.root(), ContainmentKind::Child, node("B")).unwrap();
        let catalog = uml::catalog();
        let mut queue = CallbackQueue::new();
        let ran_b = Rc::new(RefCell::new(false));

        queue
            .register(&tree, a, |_| Err(DescryError::Config("bad routine".into())))
            .unwrap();
        let flag = Rc::clone(&ran_b);
        queue
            .register(&tree, b, move |_| {
                *flag.borrow_mut() = true;
                Ok(())
            })
            .unwrap();

        let err = resolve_all(&mut tree, &mut queue, &catalog, MatchOptions::default()).unwrap_err();

        match err {
            DescryError::Callback { element, .. } => assert_eq!(element, "Diagram/A"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!*ran_b.borrow());
    }

    #[test]
    fn test_register_on_foreign_element_rejected() {
        let tree = ElementTree::new("Diagram", None);
        let other = ElementTree::new("Other", None);
        let mut queue = CallbackQueue::new();

        let err = queue.register(&tree, other.root(), |_| Ok(())).unwrap_err();
        assert!(matches!(err, InvariantViolation::ForeignElement { .. }));
    }

    #[test]
    fn test_register_on_visited_element_rejected() {
        let mut tree = ElementTree::new("Diagram", None);
        let a = tree.add_node(tree.root(), ContainmentKind::Child, node("A")).unwrap();
        let catalog = uml::catalog();
        let mut queue = CallbackQueue::new();
        queue
            .register(&tree, a, |resolver| {
                let root = resolver.tree().root();
                resolver.register(root, |_| Ok(()))?;
                Ok(())
            })
            .unwrap();

        let err = resolve_all(&mut tree, &mut queue, &catalog, MatchOptions::default()).unwrap_err();

        assert!(matches!(
            err.root_cause(),
            DescryError::Invariant(InvariantViolation::RegisteredAfterVisit { .. })
        ));
    }

    #[test]
    fn test_register_on_unvisited_element_runs_in_same_pass() {
        let mut tree = ElementTree::new("Diagram", None);
        let a = tree.add_node(tree.root(), ContainmentKind::Child, node("A")).unwrap();
        let b = tree.add_node(tree.root(), ContainmentKind::Child, node("B")).unwrap();
        let catalog = uml::catalog();
        let mut queue = CallbackQueue::new();
        let ran = Rc::new(RefCell::new(false));

        let flag = Rc::clone(&ran);
        queue
            .register(&tree, a, move |resolver| {
                resolver.register(b, move |_| {
                    *flag.borrow_mut() = true;
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap();

        assert_eq!(resolve_all(&mut tree, &mut queue, &catalog, MatchOptions::default()).unwrap(), 2);
        assert!(*ran.borrow());
    }

    #[test]
    fn test_elements_created_below_current_element_are_visited() {
        let mut tree = ElementTree::new("Diagram", None);
        let a = tree.add_node(tree.root(), ContainmentKind::Child, node("A")).unwrap();
        let catalog = uml::catalog();
        let mut queue = CallbackQueue::new();
        let ran = Rc::new(RefCell::new(false));

        let flag = Rc::clone(&ran);
        queue
            .register(&tree, a, move |resolver| {
                let owner = resolver.element();
                let created = resolver
                    .tree_mut()
                    .add_node(owner, ContainmentKind::Child, node("Nested"))?;
                resolver.register(created, move |_| {
                    *flag.borrow_mut() = true;
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap();

        resolve_all(&mut tree, &mut queue, &catalog, MatchOptions::default()).unwrap();
        assert!(*ran.borrow());
    }

    #[test]
    fn test_callbacks_on_unreached_elements_reported() {
        let mut tree = ElementTree::new("Diagram", None);
        let a = tree.add_node(tree.root(), ContainmentKind::Child, node("A")).unwrap();
        let b = tree.add_node(tree.root(), ContainmentKind::Child, node("B")).unwrap();
        let catalog = uml::catalog();
        let mut queue = CallbackQueue::new();

        queue
            .register(&tree, b, move |resolver| {
                let late = resolver
                    .tree_mut()
                    .add_node(a, ContainmentKind::Child, node("Late"))?;
                resolver.register(late, |_| Ok(()))?;
                Ok(())
            })
            .unwrap();

        let err = resolve_all(&mut tree, &mut queue, &catalog, MatchOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            DescryError::Invariant(InvariantViolation::UnreachedCallbacks { count: 1 })
        ));
    }
}
