//! Command-line argument definitions for the Descry CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the diagram definition, the output path,
//! the configuration file and the logging verbosity.

use clap::Parser;

/// Command-line arguments for the Descry description generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Name of the diagram definition to build
    #[arg(help = "Diagram definition to build (see --list)", required_unless_present = "list")]
    pub diagram: Option<String>,

    /// Path to the output JSON file
    #[arg(short, long, default_value = "descry.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Write compact JSON regardless of the configuration
    #[arg(long)]
    pub compact: bool,

    /// Print the available diagram definitions and exit
    #[arg(long)]
    pub list: bool,
}
