//! Configuration types for building diagram descriptions.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources; every field has a default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining assembly and export settings.
//! - [`AssemblyConfig`] - Controls how the description tree is assembled.
//! - [`ExportConfig`] - Controls the exported document.
//!
//! # Example
//!
//! ```
//! # use descry::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(!config.assembly().include_compartments());
//! assert!(config.export().pretty());
//! ```

use serde::Deserialize;

use crate::matcher::MatchOptions;

/// Top-level configuration combining assembly and export settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Assembly configuration section.
    #[serde(default)]
    assembly: AssemblyConfig,

    /// Export configuration section.
    #[serde(default)]
    export: ExportConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(assembly: AssemblyConfig, export: ExportConfig) -> Self {
        Self { assembly, export }
    }

    pub fn assembly(&self) -> &AssemblyConfig {
        &self.assembly
    }

    pub fn export(&self) -> &ExportConfig {
        &self.export
    }
}

/// Settings for the assembly engine.
#[derive(Debug, Clone, Deserialize)]
pub struct AssemblyConfig {
    /// Let the domain-type matcher return compartments and list items.
    #[serde(default)]
    include_compartments: bool,

    /// Name of the pseudo-element holding shared descriptions.
    #[serde(default = "default_shared_root_name")]
    shared_root_name: String,
}

fn default_shared_root_name() -> String {
    "Shared Descriptions".to_string()
}

impl AssemblyConfig {
    pub fn new(include_compartments: bool, shared_root_name: impl Into<String>) -> Self {
        Self {
            include_compartments,
            shared_root_name: shared_root_name.into(),
        }
    }

    pub fn include_compartments(&self) -> bool {
        self.include_compartments
    }

    pub fn shared_root_name(&self) -> &str {
        &self.shared_root_name
    }

    /// Matcher options derived from this configuration.
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            include_compartments: self.include_compartments,
        }
    }
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            include_compartments: false,
            shared_root_name: default_shared_root_name(),
        }
    }
}

/// Settings for the exported description document.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Pretty-print the JSON document.
    #[serde(default = "default_pretty")]
    pretty: bool,
}

fn default_pretty() -> bool {
    true
}

impl ExportConfig {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn pretty(&self) -> bool {
        self.pretty
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}
