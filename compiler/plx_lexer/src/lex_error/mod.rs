//! Lexer error types.
//!
//! Errors follow the WHERE+WHAT+WHY+HOW shape:
//! - WHERE: `span`, plus the line, column and excerpt filled in by the sink
//! - WHAT: `kind` describing what went wrong
//! - WHY: `context` naming the construct the lexer was inside
//! - HOW: `suggestions` providing actionable fixes
//!
//! Every error also carries a [`LexSeverity`]. Fatal errors end the session,
//! recoverable errors substitute a placeholder and continue, advisories are
//! warnings.

use plx_diagnostic::{Diagnostic, ErrorCode};
use plx_ir::Span;
use plx_lexer_core::BufferError;

use crate::delimited::DelimError;
use crate::numeric::Radix;

/// How an error affects the session.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LexSeverity {
    /// Lexing cannot continue; `next_token` returns the error from now on.
    Fatal,
    /// A placeholder was substituted and lexing continued.
    Recoverable,
    /// Warning only.
    Advisory,
}

/// A lexer error with full context for diagnostic rendering.
#[derive(Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
#[error("{kind}")]
pub struct LexError {
    /// WHERE the error occurred.
    pub span: Span,
    /// WHAT went wrong.
    pub kind: LexErrorKind,
    pub severity: LexSeverity,
    /// WHY we were checking.
    pub context: LexErrorContext,
    /// 1-based line of the error (0 until located by the session).
    pub line: u32,
    /// 1-based column of the error (0 until located by the session).
    pub column: u32,
    /// The source line the error points into.
    pub excerpt: String,
    /// HOW to fix.
    pub suggestions: Vec<String>,
}

/// What kind of lexer error occurred.
#[derive(Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum LexErrorKind {
    // === Fatal ===
    #[error("can't find string terminator \"{close}\" anywhere before EOF")]
    UnterminatedDelimited { close: char, start_line: u32 },
    #[error("can't find heredoc terminator \"{terminator}\" anywhere before EOF")]
    UnterminatedHeredoc { terminator: String, start_line: u32 },
    #[error("format not terminated")]
    UnterminatedFormat { start_line: u32 },
    #[error("malformed UTF-8 character at byte {position}")]
    InvalidEncoding { position: u32 },
    #[error("cannot read source: {message}")]
    StreamFailure { message: String },
    #[error("invalid range \"{low}-{high}\" in transliteration operator")]
    InvalidTransRange { low: char, high: char },
    #[error("indentation on line {line} of here-doc doesn't match delimiter")]
    HeredocIndent { line: u32 },
    #[error("sub-lexer left at bracket depth {found}, entered at {expected}")]
    SublexMismatch { expected: usize, found: usize },
    #[error("too many errors ({limit}), stopping")]
    TooManyErrors { limit: usize },

    // === Recoverable ===
    #[error("unknown charname '{name}'")]
    UnknownCharName { name: String },
    #[error("code point {text} is out of range")]
    CodePointOutOfRange { text: String },
    #[error("no digits found for {} literal", .radix.name())]
    NoDigits { radix: Radix },
    #[error("illegal {} digit '{digit}'", .radix.name())]
    IllegalDigit { radix: Radix, digit: char },
    #[error("unmatched closing '{found}'")]
    MismatchedClose { found: char, expected: Option<char> },
    #[error("missing closing '{close}' for '{open}'")]
    UnclosedBracket { open: char, close: char },
    #[error("unrecognized character {}", .found.escape_unicode())]
    UnrecognizedChar { found: char },

    // === Advisory ===
    #[error("integer overflow in {} number", .radix.name())]
    IntegerOverflow { radix: Radix },
    #[error("misplaced _ in number")]
    MisplacedUnderscore,
    #[error("bareword \"{word}\" not allowed while strict barewords in use")]
    StrictBareword { word: String },
    #[error("unrecognized escape \\{escape} passed through")]
    UnrecognizedEscape { escape: char },
    #[error("{what} is deprecated")]
    Deprecated { what: &'static str },
}

impl LexErrorKind {
    /// The severity this kind of error always has.
    pub fn severity(&self) -> LexSeverity {
        match self {
            LexErrorKind::UnterminatedDelimited { .. }
            | LexErrorKind::UnterminatedHeredoc { .. }
            | LexErrorKind::UnterminatedFormat { .. }
            | LexErrorKind::InvalidEncoding { .. }
            | LexErrorKind::StreamFailure { .. }
            | LexErrorKind::InvalidTransRange { .. }
            | LexErrorKind::HeredocIndent { .. }
            | LexErrorKind::SublexMismatch { .. }
            | LexErrorKind::TooManyErrors { .. } => LexSeverity::Fatal,
            LexErrorKind::UnknownCharName { .. }
            | LexErrorKind::CodePointOutOfRange { .. }
            | LexErrorKind::NoDigits { .. }
            | LexErrorKind::IllegalDigit { .. }
            | LexErrorKind::MismatchedClose { .. }
            | LexErrorKind::UnclosedBracket { .. }
            | LexErrorKind::UnrecognizedChar { .. } => LexSeverity::Recoverable,
            LexErrorKind::IntegerOverflow { .. }
            | LexErrorKind::MisplacedUnderscore
            | LexErrorKind::StrictBareword { .. }
            | LexErrorKind::UnrecognizedEscape { .. }
            | LexErrorKind::Deprecated { .. } => LexSeverity::Advisory,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            LexErrorKind::UnterminatedDelimited { .. } => ErrorCode::E0001,
            LexErrorKind::InvalidEncoding { .. } => ErrorCode::E0002,
            LexErrorKind::NoDigits { .. } | LexErrorKind::IllegalDigit { .. } => ErrorCode::E0003,
            LexErrorKind::UnterminatedHeredoc { .. } => ErrorCode::E0004,
            LexErrorKind::UnknownCharName { .. } | LexErrorKind::CodePointOutOfRange { .. } => {
                ErrorCode::E0005
            }
            LexErrorKind::InvalidTransRange { .. } => ErrorCode::E0006,
            LexErrorKind::MismatchedClose { .. } => ErrorCode::E0007,
            LexErrorKind::UnclosedBracket { .. } => ErrorCode::E0008,
            LexErrorKind::IntegerOverflow { .. } => ErrorCode::E0009,
            LexErrorKind::MisplacedUnderscore => ErrorCode::E0010,
            LexErrorKind::StrictBareword { .. } => ErrorCode::E0011,
            LexErrorKind::UnrecognizedEscape { .. } => ErrorCode::E0012,
            LexErrorKind::HeredocIndent { .. } => ErrorCode::E0013,
            LexErrorKind::UnterminatedFormat { .. } => ErrorCode::E0014,
            LexErrorKind::Deprecated { .. } => ErrorCode::E0015,
            LexErrorKind::StreamFailure { .. } => ErrorCode::E0016,
            LexErrorKind::UnrecognizedChar { .. } => ErrorCode::E0017,
            LexErrorKind::SublexMismatch { .. } => ErrorCode::E9001,
            LexErrorKind::TooManyErrors { .. } => ErrorCode::E9002,
        }
    }
}

/// Lexing context at the point of error: the WHY.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum LexErrorContext {
    /// Scanning code outside any literal.
    #[default]
    TopLevel,
    /// Inside delimited text that began on `start_line`.
    InsideDelimited { start_line: u32 },
    /// Inside a heredoc body introduced on `start_line`.
    InsideHeredoc { start_line: u32 },
    /// Inside a numeric literal.
    NumberLiteral,
    /// Inside an escape sequence.
    Escape,
    /// Inside an interpolated string.
    Interpolation,
    /// Inside a format declared on `start_line`.
    InsideFormat { start_line: u32 },
}

impl LexError {
    #[cold]
    pub fn new(span: Span, kind: LexErrorKind) -> Self {
        LexError {
            span,
            severity: kind.severity(),
            kind,
            context: LexErrorContext::TopLevel,
            line: 0,
            column: 0,
            excerpt: String::new(),
            suggestions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: LexErrorContext) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Fill in WHERE details the constructor could not know.
    #[must_use]
    pub fn with_location(mut self, line: u32, column: u32, excerpt: impl Into<String>) -> Self {
        self.line = line;
        self.column = column;
        self.excerpt = excerpt.into();
        self
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == LexSeverity::Fatal
    }

    // === Factories ===

    #[cold]
    pub fn unterminated_delimited(span: Span, close: char, start_line: u32) -> Self {
        Self::new(span, LexErrorKind::UnterminatedDelimited { close, start_line })
            .with_context(LexErrorContext::InsideDelimited { start_line })
            .with_suggestion(format!("add the closing `{close}`"))
    }

    #[cold]
    pub fn unterminated_heredoc(span: Span, terminator: &str, start_line: u32) -> Self {
        Self::new(
            span,
            LexErrorKind::UnterminatedHeredoc {
                terminator: terminator.to_string(),
                start_line,
            },
        )
        .with_context(LexErrorContext::InsideHeredoc { start_line })
        .with_suggestion(format!(
            "end the here-doc with a line containing only `{terminator}`"
        ))
    }

    #[cold]
    pub fn unterminated_format(span: Span, start_line: u32) -> Self {
        Self::new(span, LexErrorKind::UnterminatedFormat { start_line })
            .with_context(LexErrorContext::InsideFormat { start_line })
            .with_suggestion("end the format with a line containing a single `.`")
    }

    #[cold]
    pub fn heredoc_indent(span: Span, line: u32, start_line: u32) -> Self {
        Self::new(span, LexErrorKind::HeredocIndent { line })
            .with_context(LexErrorContext::InsideHeredoc { start_line })
            .with_suggestion("indent every body line at least as far as the terminator")
    }

    #[cold]
    pub fn invalid_trans_range(span: Span, low: char, high: char) -> Self {
        Self::new(span, LexErrorKind::InvalidTransRange { low, high })
            .with_suggestion(format!("write the range as `{high}-{low}`"))
    }

    #[cold]
    pub fn no_digits(span: Span, radix: Radix) -> Self {
        Self::new(span, LexErrorKind::NoDigits { radix })
            .with_context(LexErrorContext::NumberLiteral)
    }

    #[cold]
    pub fn illegal_digit(span: Span, radix: Radix, digit: char) -> Self {
        Self::new(span, LexErrorKind::IllegalDigit { radix, digit })
            .with_context(LexErrorContext::NumberLiteral)
    }

    #[cold]
    pub fn integer_overflow(span: Span, radix: Radix) -> Self {
        Self::new(span, LexErrorKind::IntegerOverflow { radix })
            .with_context(LexErrorContext::NumberLiteral)
            .with_suggestion("the value is kept as a floating-point number")
    }

    #[cold]
    pub fn misplaced_underscore(span: Span) -> Self {
        Self::new(span, LexErrorKind::MisplacedUnderscore)
            .with_context(LexErrorContext::NumberLiteral)
    }

    #[cold]
    pub fn mismatched_close(span: Span, found: char, expected: Option<char>) -> Self {
        let err = Self::new(span, LexErrorKind::MismatchedClose { found, expected });
        match expected {
            Some(close) => err.with_suggestion(format!("expected `{close}` here")),
            None => err.with_suggestion(format!("remove the extra `{found}`")),
        }
    }

    #[cold]
    pub fn unclosed_bracket(span: Span, open: char, close: char) -> Self {
        Self::new(span, LexErrorKind::UnclosedBracket { open, close })
            .with_suggestion(format!("add the closing `{close}`"))
    }

    #[cold]
    pub fn strict_bareword(span: Span, word: &str) -> Self {
        Self::new(
            span,
            LexErrorKind::StrictBareword {
                word: word.to_string(),
            },
        )
        .with_suggestion(format!("quote it: '{word}'"))
    }

    #[cold]
    pub fn too_many_errors(span: Span, limit: usize) -> Self {
        Self::new(span, LexErrorKind::TooManyErrors { limit })
    }
}

impl LexError {
    /// Render into a [`Diagnostic`] for the shared queue.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = self.kind.code();
        let diag = match self.severity {
            LexSeverity::Advisory => Diagnostic::warning(code, self.span),
            LexSeverity::Fatal | LexSeverity::Recoverable => Diagnostic::error(code, self.span),
        };
        let mut diag = diag
            .with_message(self.kind.to_string())
            .with_label(label_for(&self.kind));
        if self.line > 0 {
            diag = diag.with_excerpt(self.line, self.column, self.excerpt.clone());
        }
        match self.context {
            LexErrorContext::InsideDelimited { start_line } => {
                diag = diag.with_note(format!("the text starts on line {start_line}"));
            }
            LexErrorContext::InsideHeredoc { start_line } => {
                diag = diag.with_note(format!("the here-doc is introduced on line {start_line}"));
            }
            LexErrorContext::InsideFormat { start_line } => {
                diag = diag.with_note(format!("the format starts on line {start_line}"));
            }
            _ => {}
        }
        for suggestion in &self.suggestions {
            diag = diag.with_suggestion(suggestion.clone());
        }
        diag
    }
}

impl From<BufferError> for LexError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::InvalidUtf8 { position } => LexError::new(
                Span::point(position),
                LexErrorKind::InvalidEncoding { position },
            )
            .with_suggestion("declare the source as Latin-1 or fix the encoding"),
            BufferError::Stream(err) => LexError::new(
                Span::DUMMY,
                LexErrorKind::StreamFailure {
                    message: err.to_string(),
                },
            ),
        }
    }
}

impl From<DelimError> for LexError {
    fn from(err: DelimError) -> Self {
        match err {
            DelimError::Unterminated {
                close,
                start_line,
                open_pos,
            } => LexError::unterminated_delimited(Span::point(open_pos), close, start_line),
            DelimError::Buffer(err) => err.into(),
        }
    }
}

fn label_for(kind: &LexErrorKind) -> &'static str {
    match kind {
        LexErrorKind::UnterminatedDelimited { .. } => "text starts here",
        LexErrorKind::UnterminatedHeredoc { .. } => "here-doc introduced here",
        LexErrorKind::UnterminatedFormat { .. } => "format starts here",
        LexErrorKind::NoDigits { .. } => "radix prefix without digits",
        LexErrorKind::IllegalDigit { .. } => "digit out of range",
        LexErrorKind::MismatchedClose { .. } => "unexpected closing bracket",
        LexErrorKind::UnclosedBracket { .. } => "opened here",
        LexErrorKind::StrictBareword { .. } => "bareword",
        LexErrorKind::IntegerOverflow { .. } => "does not fit in an integer",
        _ => "here",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
