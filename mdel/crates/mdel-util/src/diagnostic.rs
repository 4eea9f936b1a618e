//! Diagnostic collection and reporting.
//!
//! Fatal conditions (lex failures, unbalanced forms, include cycles)
//! travel as `Result` values. Everything the pipeline can recover from -
//! a malformed `define_*` form turned into a `Bad` node, an attribute
//! reference left as-is because no active iterator satisfies it - is
//! recorded here instead, and the driver renders the collection once the
//! run is over.

use std::cell::RefCell;
use std::fmt;

use crate::Span;

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// A condition that should fail the run once output is flushed.
    Error,
    /// A recoverable condition; the run continues.
    Warning,
    /// Additional context attached to another diagnostic.
    Note,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Note => write!(f, "note"),
        }
    }
}

/// A single diagnostic message with severity and location.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// Severity level.
    pub level: Level,
    /// Main message.
    pub message: String,
    /// Source location, [`Span::DUMMY`] when none applies.
    pub span: Span,
    /// Additional notes for context.
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    pub fn new(level: Level, message: impl Into<String>, span: Span) -> Self {
        Self {
            level,
            message: message.into(),
            span,
            notes: Vec::new(),
        }
    }

    /// Creates an error diagnostic.
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Error, message, span)
    }

    /// Creates a warning diagnostic.
    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Warning, message, span)
    }

    /// Attaches a note to the diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span.is_dummy() {
            write!(f, "{}: {}", self.level, self.message)?;
        } else {
            write!(f, "{}: {} ({})", self.level, self.message, self.span)?;
        }
        for note in &self.notes {
            write!(f, "\n  note: {}", note)?;
        }
        Ok(())
    }
}

/// Collector for diagnostics emitted across the pipeline.
///
/// Interior mutability keeps the handler shareable by reference through
/// the lexer, elaborator, and driver without threading `&mut` everywhere.
///
/// # Example
///
/// ```
/// use mdel_util::{Handler, Span};
///
/// let handler = Handler::new();
/// handler.warn("choice condition wrapped in extra parentheses", Span::DUMMY);
/// assert_eq!(handler.warning_count(), 1);
/// assert!(!handler.has_errors());
/// ```
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
    panic_on_error: bool,
}

impl Handler {
    /// Creates a new handler.
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
            panic_on_error: false,
        }
    }

    /// Creates a handler that panics on error-level diagnostics.
    ///
    /// Used by tests that assert a code path emits no errors.
    pub fn new_panicking() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
            panic_on_error: true,
        }
    }

    /// Records a pre-built diagnostic.
    pub fn emit(&self, diagnostic: Diagnostic) {
        if self.panic_on_error && diagnostic.level == Level::Error {
            panic!("diagnostic error: {}", diagnostic.message);
        }
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Records an error.
    pub fn error(&self, message: impl Into<String>, span: Span) {
        self.emit(Diagnostic::error(message, span));
    }

    /// Records a warning.
    pub fn warn(&self, message: impl Into<String>, span: Span) {
        self.emit(Diagnostic::warning(message, span));
    }

    /// Returns true if any error-level diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    /// Number of error-level diagnostics recorded.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .count()
    }

    /// Number of warning-level diagnostics recorded.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Warning)
            .count()
    }

    /// Drains the collected diagnostics for rendering.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.borrow_mut())
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_level() {
        let handler = Handler::new();
        handler.warn("first", Span::DUMMY);
        handler.warn("second", Span::DUMMY);
        handler.error("third", Span::DUMMY);

        assert!(handler.has_errors());
        assert_eq!(handler.error_count(), 1);
        assert_eq!(handler.warning_count(), 2);
    }

    #[test]
    fn test_take_drains() {
        let handler = Handler::new();
        handler.warn("once", Span::DUMMY);

        assert_eq!(handler.take().len(), 1);
        assert_eq!(handler.take().len(), 0);
    }

    #[test]
    #[should_panic(expected = "diagnostic error")]
    fn test_panicking_handler() {
        let handler = Handler::new_panicking();
        handler.error("boom", Span::DUMMY);
    }

    #[test]
    fn test_display_with_notes() {
        let diag = Diagnostic::warning("iterator redefined", Span::new(4, 9, 2, 1))
            .with_note("previous definition is discarded");
        let rendered = diag.to_string();
        assert!(rendered.starts_with("warning: iterator redefined (2:1)"));
        assert!(rendered.contains("note: previous definition is discarded"));
    }
}
