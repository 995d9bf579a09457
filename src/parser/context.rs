//! Shared compilation context
//!
//! The parser reports every problem here instead of returning rich errors:
//! a failed parse procedure records a [`Diagnostic`] and yields nothing, and
//! its callers unwind by yielding nothing in turn. The context also hands out
//! [`NodeId`]s so ids stay unique across every unit it parses.

use super::ast::{NodeId, NodeMeta, SourceLocation};
use super::token::{Token, TokenKind};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub file_name: String,
    pub location: Option<SourceLocation>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.file_name.is_empty() {
            write!(f, "{}:", self.file_name)?;
        }
        match self.location {
            Some(loc) => write!(f, "{}:{}: ", loc.line, loc.column)?,
            None if !self.file_name.is_empty() => f.write_str(" ")?,
            None => {}
        }
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Observer notified as diagnostics are recorded.
pub trait CompilationListener {
    fn on_start(&mut self, _file_name: &str) {}

    fn on_error(&mut self, diagnostic: &Diagnostic);

    fn on_warning(&mut self, diagnostic: &Diagnostic);

    fn on_finish(&mut self, _file_name: &str) {}
}

pub struct CompilationContext {
    file_name: String,
    diagnostics: Vec<Diagnostic>,
    listener: Option<Box<dyn CompilationListener>>,
    next_id: NodeId,
}

impl CompilationContext {
    pub fn new() -> Self {
        Self {
            file_name: String::new(),
            diagnostics: Vec::new(),
            listener: None,
            next_id: 0,
        }
    }

    pub fn with_listener(listener: Box<dyn CompilationListener>) -> Self {
        Self {
            listener: Some(listener),
            ..Self::new()
        }
    }

    /// Start a new input; later diagnostics are tagged with `file_name`.
    pub fn begin(&mut self, file_name: &str) {
        self.file_name = file_name.to_string();
        if let Some(listener) = self.listener.as_mut() {
            listener.on_start(file_name);
        }
    }

    pub fn end(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_finish(&self.file_name);
        }
    }

    pub fn next_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Fresh, unattached node identity.
    pub fn node(&mut self, location: SourceLocation) -> NodeMeta {
        NodeMeta::new(self.next_id(), location)
    }

    /// Record "expected one of `expected` but found `found`".
    pub fn throw_expected(&mut self, found: &Token, expected: &[TokenKind]) {
        let wanted = expected
            .iter()
            .map(|kind| format!("'{}'", kind.spelling()))
            .collect::<Vec<_>>()
            .join(" or ");
        let message = format!("Syntax error, expected {} but found '{}'", wanted, found);
        self.on_error(Some(found.location), message);
    }

    pub fn on_error(&mut self, location: Option<SourceLocation>, message: impl Into<String>) {
        self.record(Severity::Error, location, message.into());
    }

    pub fn on_warning(&mut self, location: Option<SourceLocation>, message: impl Into<String>) {
        self.record(Severity::Warning, location, message.into());
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    fn record(&mut self, severity: Severity, location: Option<SourceLocation>, message: String) {
        let diagnostic = Diagnostic {
            severity,
            file_name: self.file_name.clone(),
            location,
            message,
        };
        debug!(%diagnostic, "diagnostic recorded");
        if let Some(listener) = self.listener.as_mut() {
            match severity {
                Severity::Error => listener.on_error(&diagnostic),
                Severity::Warning => listener.on_warning(&diagnostic),
            }
        }
        self.diagnostics.push(diagnostic);
    }
}

impl Default for CompilationContext {
    fn default() -> Self {
        Self::new()
    }
}
