//! The state shared by construction routines while a description is built.
//!
//! An [`Assembly`] owns the element tree and the deferred callback queue and
//! carries the well-known elements every routine needs: the diagram root and
//! the shared-descriptions root.
//! Construction routines receive `&mut Assembly`, create their elements and
//! register callbacks for anything that depends on other routines.

use log::{debug, warn};

use descry_core::{
    domain::{DomainCatalog, DomainType},
    element::{ContainmentKind, Element, ElementKind, ElementRole},
    palette::Tool,
};

use crate::{
    config::AssemblyConfig,
    error::DescryError,
    matcher::{MatchOptions, TypeQuery},
    palette_sort,
    resolve::{self, CallbackQueue, Resolver},
    reuse,
    structure::{ElementId, ElementTree},
};

/// A description tree under construction, with its pending callbacks.
pub struct Assembly<'c> {
    tree: ElementTree,
    queue: CallbackQueue,
    catalog: &'c dyn DomainCatalog,
    diagram: ElementId,
    shared_root: ElementId,
    options: MatchOptions,
}

impl<'c> Assembly<'c> {
    /// Creates the diagram root and the shared-descriptions root.
    ///
    /// # Arguments
    ///
    /// * `catalog` - Domain types available to the routines
    /// * `diagram_name` - Name of the diagram description
    /// * `diagram_type` - Domain type the diagram is created on, if any
    /// * `config` - Assembly settings
    pub fn new(
        catalog: &'c dyn DomainCatalog,
        diagram_name: &str,
        diagram_type: Option<DomainType>,
        config: &AssemblyConfig,
    ) -> Result<Self, DescryError> {
        let mut tree = ElementTree::new(diagram_name, diagram_type);
        let diagram = tree.root();
        let shared = Element::new(ElementKind::Node, config.shared_root_name(), None)
            .with_role(ElementRole::SharedRoot);
        let shared_root = tree.add_node(diagram, ContainmentKind::Child, shared)?;

        Ok(Self {
            tree,
            queue: CallbackQueue::new(),
            catalog,
            diagram,
            shared_root,
            options: config.match_options(),
        })
    }

    pub fn diagram(&self) -> ElementId {
        self.diagram
    }

    /// The pseudo-node owning shared descriptions.
    ///
    /// It is hidden from the domain-type matcher; descriptions placed below
    /// it appear elsewhere only through reused links.
    pub fn shared_root(&self) -> ElementId {
        self.shared_root
    }

    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ElementTree {
        &mut self.tree
    }

    pub fn catalog(&self) -> &'c dyn DomainCatalog {
        self.catalog
    }

    pub fn match_options(&self) -> MatchOptions {
        self.options
    }

    /// Resolves a domain type name through the catalog.
    ///
    /// Unknown names are logged and yield `None`; the element using them is
    /// created untyped and never matches a type query.
    pub fn domain_type(&self, name: &str) -> Option<DomainType> {
        let domain_type = self.catalog.lookup(name);
        if domain_type.is_none() {
            warn!(type_name = name; "Unknown domain type, element left untyped");
        }
        domain_type
    }

    /// Builds a node element typed by `type_name`.
    pub fn node(&self, name: &str, type_name: &str) -> Element {
        Element::new(ElementKind::Node, name, self.domain_type(type_name))
    }

    /// Builds an edge element typed by `type_name`.
    pub fn edge(&self, name: &str, type_name: &str) -> Element {
        Element::new(ElementKind::Edge, name, self.domain_type(type_name))
    }

    /// Adds a node description as child or border child of `parent`.
    pub fn add_node(
        &mut self,
        parent: ElementId,
        containment: ContainmentKind,
        element: Element,
    ) -> Result<ElementId, DescryError> {
        Ok(self.tree.add_node(parent, containment, element)?)
    }

    /// Adds an edge description below `parent`.
    pub fn add_edge(&mut self, parent: ElementId, element: Element) -> Result<ElementId, DescryError> {
        Ok(self.tree.add_edge(parent, element)?)
    }

    /// Adds a tool to the palette of `owner`, optionally inside a section.
    pub fn add_tool(
        &mut self,
        owner: ElementId,
        tool: Tool,
        section: Option<&str>,
    ) -> Result<(), DescryError> {
        Ok(reuse::attach_tool_in_owners(&mut self.tree, &[owner], &tool, section)?)
    }

    /// Defers work on `element` until the whole tree is built.
    pub fn register<F>(&mut self, element: ElementId, callback: F) -> Result<(), DescryError>
    where
        F: FnOnce(&mut Resolver<'_>) -> Result<(), DescryError> + 'static,
    {
        Ok(self.queue.register(&self.tree, element, callback)?)
    }

    /// Shares `element` with every node matching `query`.
    ///
    /// Registers a single callback that, once the tree is complete, finds the
    /// owners with the matcher, adds reused links from them to `element` and,
    /// when a tool is given, copies it into each owner's palette. Doing both
    /// from one callback keeps "can display" and "can create" in sync.
    pub fn share_in_owners(
        &mut self,
        element: ElementId,
        query: TypeQuery,
        tool: Option<Tool>,
        section: Option<&str>,
    ) -> Result<(), DescryError> {
        let section = section.map(str::to_string);
        self.register(element, move |resolver| {
            let owners = resolver.query_nodes(&query);
            let added = resolver.reuse_in_owners(element, &owners)?;
            if let Some(tool) = &tool {
                resolver.attach_tool_in_owners(&owners, tool, section.as_deref())?;
            }
            debug!(
                element:% = resolver.tree().path(element),
                owners = owners.len(),
                added;
                "Shared description"
            );
            Ok(())
        })
    }

    /// Resolves the source and target descriptions of `edge` from queries.
    pub fn connect(
        &mut self,
        edge: ElementId,
        sources: TypeQuery,
        targets: TypeQuery,
    ) -> Result<(), DescryError> {
        self.register(edge, move |resolver| {
            let source_nodes = resolver.query_nodes(&sources);
            let target_nodes = resolver.query_nodes(&targets);
            let tree = resolver.tree_mut();
            tree.add_edge_sources(edge, &source_nodes)?;
            tree.add_edge_targets(edge, &target_nodes)?;
            Ok(())
        })
    }

    /// Number of callbacks waiting for the resolution pass.
    pub fn pending_callbacks(&self) -> usize {
        self.queue.len()
    }

    /// Runs the resolution pass. See [`resolve::resolve_all`].
    pub fn resolve(&mut self) -> Result<usize, DescryError> {
        resolve::resolve_all(&mut self.tree, &mut self.queue, self.catalog, self.options)
    }

    /// Runs the palette sort pass. See [`palette_sort::sort_palettes`].
    pub fn sort_palettes(&mut self) -> usize {
        palette_sort::sort_palettes(&mut self.tree)
    }

    /// Gives up the assembly, returning the tree.
    pub fn into_tree(self) -> ElementTree {
        self.tree
    }
}

#[cfg(test)]
mod tests {
    use descry_core::{
        palette::ToolKind,
        uml::{self, CLASS, COMMENT, PACKAGE},
    };

    use super::*;

    #[test]
    fn test_new_assembly_has_hidden_shared_root() {
        let catalog = uml::catalog();
        let assembly =
            Assembly::new(&catalog, "Class Diagram", None, &AssemblyConfig::default()).unwrap();

        let tree = assembly.tree();
        let shared = tree.element(assembly.shared_root());
        assert_eq!(shared.role(), ElementRole::SharedRoot);
        assert_eq!(shared.name(), "Shared Descriptions");
        assert_eq!(tree.parent(assembly.shared_root()), Some(assembly.diagram()));
    }

    #[test]
    fn test_unknown_type_name_leaves_element_untyped() {
        let catalog = uml::catalog();
        let assembly = Assembly::new(&catalog, "d", None, &AssemblyConfig::default()).unwrap();
        assert!(assembly.node("Ghost", "NoSuchMetaclass").domain_type().is_none());
        assert!(assembly.node("Class", CLASS).domain_type().is_some());
    }

    #[test]
    fn test_share_in_owners_links_and_tools_together() {
        let catalog = uml::catalog();
        let mut assembly = Assembly::new(&catalog, "d", None, &AssemblyConfig::default()).unwrap();
        let shared_root = assembly.shared_root();
        let diagram = assembly.diagram();

        let comment_element = assembly.node("Comment", COMMENT);
        let comment = assembly
            .add_node(shared_root, ContainmentKind::Child, comment_element)
            .unwrap();
        assembly
            .share_in_owners(
                comment,
                TypeQuery::new(&[PACKAGE]),
                Some(Tool::new("New Comment", ToolKind::NodeCreation)),
                Some("Annotations"),
            )
            .unwrap();
        let package_element = assembly.node("Package", PACKAGE);
        let package = assembly
            .add_node(diagram, ContainmentKind::Child, package_element)
            .unwrap();

        assert_eq!(assembly.pending_callbacks(), 1);
        assembly.resolve().unwrap();
        assert_eq!(assembly.pending_callbacks(), 0);

        let tree = assembly.tree();
        assert_eq!(tree.children(package, ContainmentKind::ReusedChild), [comment]);
        let section = tree.palette(package).section("Annotations").unwrap();
        assert_eq!(section.tools()[0].name(), Some("New Comment"));
    }

    #[test]
    fn test_connect_resolves_edge_ends() {
        let catalog = uml::catalog();
        let mut assembly = Assembly::new(&catalog, "d", None, &AssemblyConfig::default()).unwrap();
        let diagram = assembly.diagram();

        let edge_element = assembly.edge("Generalization", uml::GENERALIZATION);
        let edge = assembly.add_edge(diagram, edge_element).unwrap();
        assembly
            .connect(edge, TypeQuery::new(&[CLASS]), TypeQuery::new(&[uml::CLASSIFIER]))
            .unwrap();
        let class_element = assembly.node("Class", CLASS);
        let class = assembly
            .add_node(diagram, ContainmentKind::Child, class_element)
            .unwrap();
        let interface_element = assembly.node("Interface", uml::INTERFACE);
        let interface = assembly
            .add_node(diagram, ContainmentKind::Child, interface_element)
            .unwrap();

        assembly.resolve().unwrap();

        assert_eq!(assembly.tree().edge_sources(edge), [class]);
        assert_eq!(assembly.tree().edge_targets(edge), [class, interface]);
    }
}
