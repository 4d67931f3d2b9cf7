//! Domain-type element matcher.
//!
//! Finds the node descriptions whose domain type equals or specializes one of
//! an allowed list of types, minus those matching a forbidden list. Results
//! follow the structural pre-order of the tree, so they are stable for a
//! given tree regardless of the order in which elements were created.
//!
//! Besides type matching, some elements are never returned:
//! - compartments and list items, unless [`MatchOptions::include_compartments`]
//! - the shared-descriptions root
//! - elements marked as not searchable
//!
//! These exclusions win over type matching, even for an exact type hit.

use std::collections::HashSet;

use log::{debug, warn};

use descry_core::{
    domain::{DomainCatalog, DomainType},
    element::{Element, ElementKind, ElementRole},
};

use crate::structure::{ElementId, ElementTree};

/// Switches for the exclusion rules of the matcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Also return compartments and list items.
    pub include_compartments: bool,
}

/// A matcher query expressed with type names.
///
/// Names are resolved through the catalog when the query runs; names the
/// catalog does not know are logged and skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeQuery {
    allowed: Vec<String>,
    forbidden: Vec<String>,
}

impl TypeQuery {
    /// Creates a query matching any of the `allowed` type names.
    pub fn new(allowed: &[&str]) -> Self {
        Self {
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
            forbidden: Vec::new(),
        }
    }

    /// Excludes elements matching any of the `forbidden` type names (builder style).
    pub fn excluding(mut self, forbidden: &[&str]) -> Self {
        self.forbidden = forbidden.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    pub fn forbidden(&self) -> &[String] {
        &self.forbidden
    }

    /// Resolves the type names, returning `(allowed, forbidden)`.
    pub fn resolve(&self, catalog: &dyn DomainCatalog) -> (Vec<DomainType>, Vec<DomainType>) {
        (
            resolve_names(catalog, &self.allowed),
            resolve_names(catalog, &self.forbidden),
        )
    }
}

fn resolve_names(catalog: &dyn DomainCatalog, names: &[String]) -> Vec<DomainType> {
    names
        .iter()
        .filter_map(|name| {
            let resolved = catalog.lookup(name);
            if resolved.is_none() {
                warn!(type_name = name.as_str(); "Unknown domain type in query, skipping");
            }
            resolved
        })
        .collect()
}

/// Runs a name-based query. See [`matching_nodes`].
pub fn query_nodes(
    tree: &ElementTree,
    catalog: &dyn DomainCatalog,
    query: &TypeQuery,
    options: MatchOptions,
) -> Vec<ElementId> {
    let (allowed, forbidden) = query.resolve(catalog);
    matching_nodes(tree, catalog, &allowed, &forbidden, options)
}

/// Returns every searchable node whose domain type equals or specializes a
/// type in `allowed`, and does not equal or specialize a type in `forbidden`.
pub fn matching_nodes(
    tree: &ElementTree,
    catalog: &dyn DomainCatalog,
    allowed: &[DomainType],
    forbidden: &[DomainType],
    options: MatchOptions,
) -> Vec<ElementId> {
    // Forbidden matching runs with an empty forbidden list of its own, so it
    // never excludes anything and cannot recurse further.
    let forbidden_set: HashSet<ElementId> = if forbidden.is_empty() {
        HashSet::new()
    } else {
        match_by_type(tree, catalog, forbidden, options)
            .into_iter()
            .collect()
    };

    let result: Vec<ElementId> = match_by_type(tree, catalog, allowed, options)
        .into_iter()
        .filter(|id| !forbidden_set.contains(id))
        .collect();

    debug!(
        allowed_count = allowed.len(),
        forbidden_count = forbidden.len(),
        match_count = result.len();
        "Matched node descriptions"
    );
    result
}

fn match_by_type(
    tree: &ElementTree,
    catalog: &dyn DomainCatalog,
    types: &[DomainType],
    options: MatchOptions,
) -> Vec<ElementId> {
    if types.is_empty() {
        return Vec::new();
    }
    tree.preorder()
        .into_iter()
        .filter(|&id| {
            let element = tree.element(id);
            is_candidate(element, options) && has_matching_type(element, catalog, types)
        })
        .collect()
}

fn is_candidate(element: &Element, options: MatchOptions) -> bool {
    if element.kind() != ElementKind::Node || !element.is_searchable() {
        return false;
    }
    match element.role() {
        ElementRole::SharedRoot => false,
        role if role.is_compartment_part() => options.include_compartments,
        _ => true,
    }
}

fn has_matching_type(element: &Element, catalog: &dyn DomainCatalog, types: &[DomainType]) -> bool {
    element.domain_type().is_some_and(|domain_type| {
        types
            .iter()
            .any(|&candidate| catalog.is_supertype_of(candidate, domain_type))
    })
}
