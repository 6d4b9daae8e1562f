use plx_ir::Span;
use std::fmt;

use crate::ErrorCode;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The source line a diagnostic points into.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct SourceExcerpt {
    /// 1-based.
    pub line: u32,
    /// 1-based, in characters.
    pub column: u32,
    /// The line without its line ending.
    pub text: String,
}

/// One reported problem.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "a diagnostic does nothing until it is queued or emitted"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    /// Shown next to the caret.
    pub label: String,
    pub excerpt: Option<SourceExcerpt>,
    pub notes: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    fn new(code: ErrorCode, severity: Severity, span: Span) -> Self {
        Diagnostic {
            code,
            severity,
            message: code.description().to_string(),
            span,
            label: String::new(),
            excerpt: None,
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    #[cold]
    pub fn error(code: ErrorCode, span: Span) -> Self {
        Self::new(code, Severity::Error, span)
    }

    #[cold]
    pub fn warning(code: ErrorCode, span: Span) -> Self {
        Self::new(code, Severity::Warning, span)
    }

    /// Replace the default message (the code's description).
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_excerpt(mut self, line: u32, column: u32, text: impl Into<String>) -> Self {
        self.excerpt = Some(SourceExcerpt {
            line,
            column,
            text: text.into(),
        });
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// `(line, column)` for ordering; unlocated diagnostics sort first.
    pub fn position(&self) -> (u32, u32) {
        self.excerpt
            .as_ref()
            .map_or((0, 0), |ex| (ex.line, ex.column))
    }
}

/// One-line form: `error[E0007] 12..13: unmatched closing ')'`, then notes
/// and help on their own lines.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}] {}: {}", self.severity, self.code, self.span, self.message)?;
        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }
        for suggestion in &self.suggestions {
            write!(f, "\n  = help: {suggestion}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
