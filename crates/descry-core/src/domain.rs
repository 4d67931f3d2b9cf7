//! Domain types and the catalog that relates them.
//!
//! A [`DomainType`] classifies what modeling concept an element describes
//! (a UML `Class`, `Port`, `Property`, ...). Types are interned so they are
//! cheap to copy and compare. The supertype relation between types is owned
//! by a [`DomainCatalog`], which the assembly engine only ever reads.
//!
//! # Examples
//!
//! ```
//! use descry_core::domain::{DomainCatalog, TypeHierarchy};
//!
//! let catalog = TypeHierarchy::builder()
//!     .with_type("Element", &[])
//!     .with_type("Classifier", &["Element"])
//!     .with_type("Class", &["Classifier"])
//!     .build();
//!
//! let element = catalog.lookup("Element").unwrap();
//! let class = catalog.lookup("Class").unwrap();
//! assert!(catalog.is_supertype_of(element, class));
//! assert!(!catalog.is_supertype_of(class, element));
//! ```

use std::{
    collections::HashSet,
    fmt,
    sync::{Mutex, OnceLock},
};

use indexmap::IndexMap;
use log::trace;
use serde::{Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global interner backing every [`DomainType`].
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> std::sync::MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Interned identifier of a modeling concept.
///
/// Two `DomainType` values are equal exactly when they were created from the
/// same name. Whether a type is *known* is decided by a [`DomainCatalog`],
/// not by the type itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomainType(DefaultSymbol);

impl DomainType {
    /// Creates (or reuses) the domain type with the given name.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Returns the domain type for `name` only if that name was interned before.
    pub fn existing(name: &str) -> Option<Self> {
        interner().get(name).map(Self)
    }

    /// Returns the type name.
    pub fn name(&self) -> String {
        interner()
            .resolve(self.0)
            .expect("Symbol should exist in interner")
            .to_string()
    }
}

impl fmt::Display for DomainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let name = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{name}")
    }
}

impl From<&str> for DomainType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl Serialize for DomainType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

/// Read-only universe of domain types.
///
/// Implementations are supplied by the surrounding platform; the assembly
/// engine never mutates a catalog.
pub trait DomainCatalog {
    /// Resolves a type name to a known domain type.
    fn lookup(&self, name: &str) -> Option<DomainType>;

    /// Returns `true` when `supertype` equals `subtype` or is one of its
    /// (transitive) supertypes.
    fn is_supertype_of(&self, supertype: DomainType, subtype: DomainType) -> bool;
}

/// In-memory [`DomainCatalog`] storing the direct supertypes of every type.
#[derive(Debug, Clone, Default)]
pub struct TypeHierarchy {
    supertypes: IndexMap<DomainType, Vec<DomainType>>,
}

impl TypeHierarchy {
    /// Starts a new hierarchy builder.
    pub fn builder() -> TypeHierarchyBuilder {
        TypeHierarchyBuilder::default()
    }

    /// Number of declared types.
    pub fn len(&self) -> usize {
        self.supertypes.len()
    }

    /// Returns `true` if no type has been declared.
    pub fn is_empty(&self) -> bool {
        self.supertypes.is_empty()
    }

    /// Returns the direct supertypes of `domain_type`.
    pub fn direct_supertypes(&self, domain_type: DomainType) -> &[DomainType] {
        self.supertypes
            .get(&domain_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl DomainCatalog for TypeHierarchy {
    fn lookup(&self, name: &str) -> Option<DomainType> {
        DomainType::existing(name).filter(|ty| self.supertypes.contains_key(ty))
    }

    fn is_supertype_of(&self, supertype: DomainType, subtype: DomainType) -> bool {
        if supertype == subtype {
            return true;
        }

        let mut visited = HashSet::new();
        let mut stack = vec![subtype];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            for &parent in self.direct_supertypes(current) {
                if parent == supertype {
                    return true;
                }
                stack.push(parent);
            }
        }
        false
    }
}

/// Builder for [`TypeHierarchy`].
#[derive(Debug, Default)]
pub struct TypeHierarchyBuilder {
    supertypes: IndexMap<DomainType, Vec<DomainType>>,
}

impl TypeHierarchyBuilder {
    /// Declares `name` with the given direct supertypes.
    ///
    /// Supertypes that were not declared yet are declared implicitly without
    /// supertypes of their own. Declaring a type twice merges its supertypes.
    pub fn with_type(mut self, name: &str, supertypes: &[&str]) -> Self {
        let domain_type = DomainType::new(name);
        let parents: Vec<DomainType> = supertypes.iter().map(|s| DomainType::new(s)).collect();
        for parent in &parents {
            if !self.supertypes.contains_key(parent) {
                trace!(domain_type:% = parent; "Implicitly declaring supertype");
                self.supertypes.insert(*parent, Vec::new());
            }
        }
        let entry = self.supertypes.entry(domain_type).or_default();
        for parent in parents {
            if !entry.contains(&parent) {
                entry.push(parent);
            }
        }
        self
    }

    /// Finishes the hierarchy.
    pub fn build(self) -> TypeHierarchy {
        TypeHierarchy {
            supertypes: self.supertypes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TypeHierarchy {
        TypeHierarchy::builder()
            .with_type("Element", &[])
            .with_type("NamedElement", &["Element"])
            .with_type("Classifier", &["NamedElement"])
            .with_type("StructuredClassifier", &["Classifier"])
            .with_type("Class", &["StructuredClassifier"])
            .with_type("Property", &["NamedElement"])
            .with_type("Port", &["Property"])
            .build()
    }

    #[test]
    fn test_domain_type_interning() {
        let a = DomainType::new("Interned");
        let b = DomainType::new("Interned");
        assert_eq!(a, b);
        assert_eq!(a.name(), "Interned");
        assert_eq!(a.to_string(), "Interned");
    }

    #[test]
    fn test_existing_does_not_intern() {
        assert!(DomainType::existing("NeverInternedTypeName").is_none());
        let ty = DomainType::new("NowInterned");
        assert_eq!(DomainType::existing("NowInterned"), Some(ty));
    }

    #[test]
    fn test_lookup_only_declared_types() {
        let catalog = sample();
        assert!(catalog.lookup("Class").is_some());
        DomainType::new("Undeclared");
        assert!(catalog.lookup("Undeclared").is_none());
    }

    #[test]
    fn test_supertype_reflexive_and_transitive() {
        let catalog = sample();
        let element = DomainType::new("Element");
        let class = DomainType::new("Class");
        let port = DomainType::new("Port");
        let property = DomainType::new("Property");

        assert!(catalog.is_supertype_of(class, class));
        assert!(catalog.is_supertype_of(element, class));
        assert!(catalog.is_supertype_of(property, port));
        assert!(!catalog.is_supertype_of(port, property));
        assert!(!catalog.is_supertype_of(class, port));
    }

    #[test]
    fn test_implicit_supertype_declaration() {
        let catalog = TypeHierarchy::builder()
            .with_type("Leaf", &["ImplicitRoot"])
            .build();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.lookup("ImplicitRoot").is_some());
    }

    #[test]
    fn test_cyclic_declaration_terminates() {
        let catalog = TypeHierarchy::builder()
            .with_type("CycleA", &["CycleB"])
            .with_type("CycleB", &["CycleA"])
            .build();
        let a = DomainType::new("CycleA");
        let b = DomainType::new("CycleB");
        let other = DomainType::new("CycleOther");
        assert!(catalog.is_supertype_of(a, b));
        assert!(!catalog.is_supertype_of(other, a));
    }

    #[test]
    fn test_redeclaration_merges_supertypes() {
        let catalog = TypeHierarchy::builder()
            .with_type("Merged", &["BaseOne"])
            .with_type("Merged", &["BaseTwo", "BaseOne"])
            .build();
        let merged = DomainType::new("Merged");
        assert_eq!(catalog.direct_supertypes(merged).len(), 2);
    }
}
