//! Diagnostics collected while reading a diagram.
//!
//! Every pipeline stage reports duplicate names, unknown types, unresolved
//! relations and similar issues into a [`Diagnostics`] collector instead of
//! writing to the console. Commands decide how to print them.

use schemars::JsonSchema;
use serde::Serialize;
use std::fmt;

/// Maximum number of diagnostics to keep
const MAX_DIAGNOSTICS: usize = 1000;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Info => write!(f, "INFO"),
        }
    }
}

/// Where in the diagram an issue was found
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Identifier of the diagram node (cell id)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
}

impl Location {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }
}

/// A single issue reported by the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Diagnostic {
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Error,
            message: message.into(),
            location: None,
        }
    }

    pub fn warning(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            message: message.into(),
            location: None,
        }
    }

    pub fn info(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Info,
            message: message.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.severity, self.code, self.message)?;
        if let Some(node) = self.location.as_ref().and_then(|l| l.node.as_ref()) {
            write!(f, " (node {})", node)?;
        }
        Ok(())
    }
}

/// Collects diagnostics across pipeline stages
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
    truncated: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if self.items.len() < MAX_DIAGNOSTICS {
            self.items.push(diagnostic);
        } else {
            self.truncated = true;
        }
    }

    pub fn error(&mut self, code: &'static str, message: impl Into<String>, location: Location) {
        self.push(Diagnostic::error(code, message).with_location(location));
    }

    pub fn warning(&mut self, code: &'static str, message: impl Into<String>, location: Location) {
        self.push(Diagnostic::warning(code, message).with_location(location));
    }

    pub fn info(&mut self, code: &'static str, message: impl Into<String>, location: Location) {
        self.push(Diagnostic::info(code, message).with_location(location));
    }

    /// All collected diagnostics, in report order
    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Diagnostic> {
        self.items
    }

    /// Diagnostics carrying the given code
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.items.iter().filter(move |d| d.code == code)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.items.iter().filter(|d| d.severity == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.count(Severity::Warning) > 0
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Print every diagnostic to stderr, one per line
    pub fn print_summary(&self) {
        for diagnostic in &self.items {
            eprintln!("{}", diagnostic);
        }

        if self.truncated {
            eprintln!("... (additional diagnostics truncated)");
        }
    }
}
