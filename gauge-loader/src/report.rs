//! Load outcome: fatal errors and non-fatal diagnostics

use std::path::PathBuf;

use gauge_core::{Diagnostic, Severity};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Loading could not produce a registry at all
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed definitions in {origin}: {error}")]
    Json {
        origin: String,
        #[source]
        error: serde_json::Error,
    },
}

/// Problems found while loading that did not stop it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    diagnostics: Vec<Diagnostic>,
}

impl LoadReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }

    /// Diagnostics carrying the given code
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Emit every diagnostic through `tracing`
    pub fn log(&self) {
        for diagnostic in &self.diagnostics {
            match diagnostic.severity {
                Severity::Warning => warn!(code = %diagnostic.code, "{}", diagnostic),
                Severity::Error => error!(code = %diagnostic.code, "{}", diagnostic),
            }
        }
    }
}

impl Extend<Diagnostic> for LoadReport {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.diagnostics.extend(iter);
    }
}
