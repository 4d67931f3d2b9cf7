//! Built-in UML metaclass catalog.
//!
//! Provides string constants for the UML metaclasses used by the bundled
//! diagram definitions and a [`catalog`] function building their hierarchy.
//!
//! # Categories
//!
//! - **Structure**: Package, Class, Component, Interface, DataType, Enumeration
//! - **Features**: Property, Port, Operation, EnumerationLiteral
//! - **Annotations**: Comment, Constraint
//! - **Relationships**: Generalization, Association, Dependency, Usage,
//!   InterfaceRealization, Connector

use crate::domain::TypeHierarchy;

pub const ELEMENT: &str = "Element";
pub const NAMED_ELEMENT: &str = "NamedElement";
pub const PACKAGEABLE_ELEMENT: &str = "PackageableElement";
pub const NAMESPACE: &str = "Namespace";
pub const TYPE: &str = "Type";
pub const TYPED_ELEMENT: &str = "TypedElement";
pub const FEATURE: &str = "Feature";
pub const STRUCTURAL_FEATURE: &str = "StructuralFeature";
pub const BEHAVIORAL_FEATURE: &str = "BehavioralFeature";
pub const CONNECTABLE_ELEMENT: &str = "ConnectableElement";

pub const PACKAGE: &str = "Package";
pub const CLASSIFIER: &str = "Classifier";
pub const STRUCTURED_CLASSIFIER: &str = "StructuredClassifier";
pub const ENCAPSULATED_CLASSIFIER: &str = "EncapsulatedClassifier";
pub const BEHAVIORED_CLASSIFIER: &str = "BehavioredClassifier";
pub const CLASS: &str = "Class";
pub const COMPONENT: &str = "Component";
pub const INTERFACE: &str = "Interface";
pub const DATA_TYPE: &str = "DataType";
pub const PRIMITIVE_TYPE: &str = "PrimitiveType";
pub const ENUMERATION: &str = "Enumeration";

pub const PROPERTY: &str = "Property";
pub const PORT: &str = "Port";
pub const OPERATION: &str = "Operation";
pub const ENUMERATION_LITERAL: &str = "EnumerationLiteral";

pub const COMMENT: &str = "Comment";
pub const CONSTRAINT: &str = "Constraint";

pub const RELATIONSHIP: &str = "Relationship";
pub const DIRECTED_RELATIONSHIP: &str = "DirectedRelationship";
pub const GENERALIZATION: &str = "Generalization";
pub const ASSOCIATION: &str = "Association";
pub const DEPENDENCY: &str = "Dependency";
pub const USAGE: &str = "Usage";
pub const INTERFACE_REALIZATION: &str = "InterfaceRealization";
pub const CONNECTOR: &str = "Connector";

/// Builds the UML metaclass hierarchy used by the bundled definitions.
///
/// Only the generalizations relevant to diagram descriptions are modelled;
/// multiple inheritance is kept where UML defines it (e.g. `Port` is both a
/// `Property` and, through it, a `ConnectableElement`).
pub fn catalog() -> TypeHierarchy {
    TypeHierarchy::builder()
        .with_type(ELEMENT, &[])
        .with_type(NAMED_ELEMENT, &[ELEMENT])
        .with_type(PACKAGEABLE_ELEMENT, &[NAMED_ELEMENT])
        .with_type(NAMESPACE, &[NAMED_ELEMENT])
        .with_type(TYPE, &[PACKAGEABLE_ELEMENT])
        .with_type(TYPED_ELEMENT, &[NAMED_ELEMENT])
        .with_type(FEATURE, &[NAMED_ELEMENT])
        .with_type(STRUCTURAL_FEATURE, &[FEATURE, TYPED_ELEMENT])
        .with_type(BEHAVIORAL_FEATURE, &[FEATURE, NAMESPACE])
        .with_type(CONNECTABLE_ELEMENT, &[TYPED_ELEMENT])
        .with_type(PACKAGE, &[NAMESPACE, PACKAGEABLE_ELEMENT])
        .with_type(CLASSIFIER, &[NAMESPACE, TYPE])
        .with_type(STRUCTURED_CLASSIFIER, &[CLASSIFIER])
        .with_type(ENCAPSULATED_CLASSIFIER, &[STRUCTURED_CLASSIFIER])
        .with_type(BEHAVIORED_CLASSIFIER, &[CLASSIFIER])
        .with_type(CLASS, &[ENCAPSULATED_CLASSIFIER, BEHAVIORED_CLASSIFIER])
        .with_type(COMPONENT, &[CLASS])
        .with_type(INTERFACE, &[CLASSIFIER])
        .with_type(DATA_TYPE, &[CLASSIFIER])
        .with_type(PRIMITIVE_TYPE, &[DATA_TYPE])
        .with_type(ENUMERATION, &[DATA_TYPE])
        .with_type(PROPERTY, &[STRUCTURAL_FEATURE, CONNECTABLE_ELEMENT])
        .with_type(PORT, &[PROPERTY])
        .with_type(OPERATION, &[BEHAVIORAL_FEATURE])
        .with_type(ENUMERATION_LITERAL, &[NAMED_ELEMENT])
        .with_type(COMMENT, &[ELEMENT])
        .with_type(CONSTRAINT, &[PACKAGEABLE_ELEMENT])
        .with_type(RELATIONSHIP, &[ELEMENT])
        .with_type(DIRECTED_RELATIONSHIP, &[RELATIONSHIP])
        .with_type(GENERALIZATION, &[DIRECTED_RELATIONSHIP])
        .with_type(ASSOCIATION, &[RELATIONSHIP, CLASSIFIER])
        .with_type(DEPENDENCY, &[DIRECTED_RELATIONSHIP, PACKAGEABLE_ELEMENT])
        .with_type(USAGE, &[DEPENDENCY])
        .with_type(INTERFACE_REALIZATION, &[DEPENDENCY])
        .with_type(CONNECTOR, &[FEATURE])
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainCatalog;

    #[test]
    fn test_catalog_declares_all_constants() {
        let catalog = catalog();
        for name in [CLASS, PORT, PROPERTY, COMMENT, CONNECTOR, USAGE] {
            assert!(catalog.lookup(name).is_some(), "{name} should be declared");
        }
    }

    #[test]
    fn test_port_is_property_but_not_classifier() {
        let catalog = catalog();
        let port = catalog.lookup(PORT).unwrap();
        let property = catalog.lookup(PROPERTY).unwrap();
        let structured = catalog.lookup(STRUCTURED_CLASSIFIER).unwrap();
        let connectable = catalog.lookup(CONNECTABLE_ELEMENT).unwrap();

        assert!(catalog.is_supertype_of(property, port));
        assert!(catalog.is_supertype_of(connectable, port));
        assert!(!catalog.is_supertype_of(structured, port));
    }

    #[test]
    fn test_component_is_structured_classifier() {
        let catalog = catalog();
        let component = catalog.lookup(COMPONENT).unwrap();
        let structured = catalog.lookup(STRUCTURED_CLASSIFIER).unwrap();
        assert!(catalog.is_supertype_of(structured, component));
    }
}
