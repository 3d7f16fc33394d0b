//! Structured diagnostics
//!
//! Problems found while loading definitions never abort loading on their own.
//! They are collected as values so the caller can decide whether a partially
//! populated registry is acceptable.

use serde::{Deserialize, Serialize};

/// Standard diagnostic codes (machine-readable)
pub mod codes {
    // Definition loading
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const DUPLICATE_UNIT: &str = "DUPLICATE_UNIT";
    pub const DUPLICATE_QUANTITY: &str = "DUPLICATE_QUANTITY";
    pub const INVALID_COEFFICIENT: &str = "INVALID_COEFFICIENT";
    pub const INVALID_BASE_UNIT: &str = "INVALID_BASE_UNIT";
    pub const INVALID_RECORD: &str = "INVALID_RECORD";
    // Alias loading
    pub const MALFORMED_ALIAS: &str = "MALFORMED_ALIAS";
    pub const ALIASES_UNAVAILABLE: &str = "ALIASES_UNAVAILABLE";
}

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Loading continued, the affected record was skipped or defaulted
    Warning,
    /// The record could not be used at all
    Error,
}

/// Where a diagnostic was raised
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticContext {
    /// File or embedded source name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Line number in the source (1-based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,

    /// Name of the unit or quantity record involved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
}

/// Structured diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Machine-readable code, one of [`codes`]
    pub code: String,

    /// Human-readable message
    pub message: String,

    /// Suggestion for fixing the problem
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<DiagnosticContext>,

    pub severity: Severity,
}

impl Diagnostic {
    /// Create a new diagnostic with `Error` severity
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            context: None,
            severity: Severity::Error,
        }
    }

    /// Create a new diagnostic with `Warning` severity
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, message).with_severity(Severity::Warning)
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set source context
    pub fn in_source(mut self, source: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(DiagnosticContext::default);
        ctx.source = Some(source.into());
        self
    }

    /// Builder: set line context
    pub fn at_line(mut self, line: usize) -> Self {
        let ctx = self.context.get_or_insert_with(DiagnosticContext::default);
        ctx.line = Some(line);
        self
    }

    /// Builder: set record context
    pub fn for_record(mut self, record: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(DiagnosticContext::default);
        ctx.record = Some(record.into());
        self
    }

    /// Builder: add note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(DiagnosticContext::default);
        ctx.notes.push(note.into());
        self
    }

    /// Builder: set severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    pub fn unknown_unit(name: &str) -> Self {
        Self::warning(codes::UNKNOWN_UNIT, format!("Unknown unit: {}", name))
            .with_suggestion(format!("Define '{}' in the units list or check spelling", name))
    }

    pub fn duplicate_unit(name: &str) -> Self {
        Self::warning(codes::DUPLICATE_UNIT, format!("Unit defined more than once: {}", name))
            .with_suggestion("The first definition is used")
    }

    pub fn duplicate_quantity(name: &str) -> Self {
        Self::warning(codes::DUPLICATE_QUANTITY, format!("Quantity defined more than once: {}", name))
            .with_suggestion("The first definition is used")
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            match (&ctx.source, ctx.line) {
                (Some(source), Some(line)) => write!(f, " at {}:{}", source, line)?,
                (Some(source), None) => write!(f, " in {}", source)?,
                (None, Some(line)) => write!(f, " at line {}", line)?,
                (None, None) => {}
            }
        }
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}
