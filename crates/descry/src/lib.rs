//! Descry - A description-graph assembly engine for UML diagram editors.
//!
//! Construction routines describe what a diagram editor can display and
//! create: nodes, edges, their containment and the tools offered in each
//! palette. Routines are written independently and run in any order; anything
//! that depends on elements created elsewhere is deferred as a callback and
//! resolved once the whole tree exists.

pub mod config;
pub mod definitions;
pub mod matcher;
pub mod palette_sort;
pub mod resolve;
pub mod reuse;

mod assembly;
mod error;
mod export;
mod structure;

pub use descry_core::{domain, element, palette, uml};

pub use assembly::Assembly;
pub use definitions::{DiagramDefinition, Routine};
pub use error::{DescryError, InvariantViolation};
pub use export::{DiagramDescription, ElementDescription};
pub use structure::{ElementId, ElementTree};

use log::{debug, info, trace};

use config::AppConfig;
use domain::DomainCatalog;

/// Builder for assembling and exporting diagram descriptions.
///
/// This runs a [`DiagramDefinition`] through the whole pipeline: the
/// construction routines, the resolution pass, the palette sort pass and
/// finally freezing the tree into a read-only [`DiagramDescription`].
///
/// # Examples
///
/// ```rust
/// use descry::{DescriptionBuilder, config::AppConfig, definitions, uml};
///
/// let catalog = uml::catalog();
/// let definition = definitions::by_name("class").expect("Unknown definition");
///
/// // With custom config
/// let builder = DescriptionBuilder::new(AppConfig::default());
///
/// // Assemble the description
/// let description = builder
///     .build(&catalog, definition.as_ref())
///     .expect("Failed to build");
///
/// // Export it as JSON
/// let json = builder.export_json(&description).expect("Failed to export");
/// assert!(json.contains("\"diagram\""));
///
/// // Or use default config
/// let builder = DescriptionBuilder::default();
/// ```
#[derive(Default)]
pub struct DescriptionBuilder {
    config: AppConfig,
}

impl DescriptionBuilder {
    /// Create a new description builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including assembly and export settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Build the description of a diagram.
    ///
    /// Routines run in the order the definition lists them; their callbacks
    /// are then resolved in a single pre-order pass and every palette is
    /// sorted by tool name.
    ///
    /// # Arguments
    ///
    /// * `catalog` - Domain types the routines and queries refer to
    /// * `definition` - The diagram definition to assemble
    ///
    /// # Errors
    ///
    /// Returns `DescryError` when a routine breaks a tree invariant or a
    /// deferred callback fails. Nothing is retried.
    pub fn build(
        &self,
        catalog: &dyn DomainCatalog,
        definition: &dyn DiagramDefinition,
    ) -> Result<DiagramDescription, DescryError> {
        info!(definition = definition.name(); "Assembling diagram description");

        let diagram_type = catalog.lookup(definition.domain_type());
        let mut assembly = Assembly::new(
            catalog,
            definition.name(),
            diagram_type,
            self.config.assembly(),
        )?;

        let routines = definition.routines();
        for (index, routine) in routines.iter().enumerate() {
            routine(&mut assembly)?;
            debug!(
                routine = index,
                elements = assembly.tree().len(),
                pending = assembly.pending_callbacks();
                "Routine finished"
            );
        }
        info!(
            routines = routines.len(),
            elements = assembly.tree().len(),
            pending = assembly.pending_callbacks();
            "Construction routines finished"
        );

        let executed = assembly.resolve()?;
        info!(executed, elements = assembly.tree().len(); "Callbacks resolved");

        let sorted = assembly.sort_palettes();
        info!(sorted; "Palettes sorted");

        let description = DiagramDescription::freeze(assembly.tree());
        trace!(description:?; "Frozen description");

        Ok(description)
    }

    /// Export a description to a JSON string.
    ///
    /// The output is pretty-printed unless the export configuration asks for
    /// compact output.
    ///
    /// # Errors
    ///
    /// Returns `DescryError::Export` if serialization fails.
    pub fn export_json(&self, description: &DiagramDescription) -> Result<String, DescryError> {
        description.to_json(self.config.export().pretty())
    }
}
