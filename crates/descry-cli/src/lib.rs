//! CLI logic for the Descry description generator.
//!
//! This module contains the core CLI logic: it builds the selected diagram
//! definition and writes the exported description.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use descry::{
    DescriptionBuilder, DescryError,
    config::{AppConfig, ExportConfig},
    definitions, uml,
};

/// Run the Descry CLI application
///
/// This function assembles the selected diagram definition against the
/// bundled UML catalog and writes the resulting JSON document to the output
/// file. With `--list` it prints the available definitions instead.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `DescryError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Unknown diagram definitions
/// - Invariant violations and callback failures while assembling
/// - Export errors
pub fn run(args: &Args) -> Result<(), DescryError> {
    if args.list {
        for name in definitions::AVAILABLE {
            println!("{name}");
        }
        return Ok(());
    }

    let Some(name) = args.diagram.as_deref() else {
        return Err(DescryError::UnknownDefinition("(none)".to_string()));
    };
    info!(diagram = name, output_path = args.output; "Generating description");

    let mut app_config = config::load_config(args.config.as_ref())?;
    if args.compact {
        app_config = AppConfig::new(app_config.assembly().clone(), ExportConfig::new(false));
    }

    let definition = definitions::by_name(name)?;
    let catalog = uml::catalog();

    let builder = DescriptionBuilder::new(app_config);
    let description = builder.build(&catalog, definition.as_ref())?;
    let json = builder.export_json(&description)?;

    fs::write(&args.output, json)?;

    info!(
        output_file = args.output,
        elements = description.element_count();
        "Description exported successfully"
    );

    Ok(())
}
