//! Error adapter for converting DescryError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use descry::{DescryError, definitions};

/// Adapter giving a [`DescryError`] a diagnostic code and help text.
pub struct ErrorAdapter<'a>(pub &'a DescryError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            DescryError::Io(_) => "descry::io",
            DescryError::Invariant(_) => "descry::invariant",
            DescryError::Callback { .. } => "descry::callback",
            DescryError::Export(_) => "descry::export",
            DescryError::Config(_) => "descry::config",
            DescryError::UnknownDefinition(_) => "descry::definition",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            DescryError::UnknownDefinition(_) => Some(Box::new(format!(
                "available definitions: {}",
                definitions::AVAILABLE.join(", ")
            ))),
            DescryError::Invariant(_) | DescryError::Callback { .. } => Some(Box::new(
                "a construction routine left the description tree inconsistent",
            )),
            _ => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Convert a [`DescryError`] into a list of reportable errors.
///
/// Callback failures are reported once; their nested causes are rendered by
/// miette through the error source chain.
pub fn to_reportables(err: &DescryError) -> Vec<ErrorAdapter<'_>> {
    vec![ErrorAdapter(err)]
}
