//! Error codes for lexer diagnostics.
//!
//! Each code is a unique identifier (e.g., `E0001`); the first digit names the
//! phase. Only the lexer phase (`E0xxx`) and internal codes (`E9xxx`) exist.

use std::fmt;

/// Error codes for all diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E0xxx: Lexer errors and warnings
/// - E9xxx: Internal errors and limits
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// Unterminated delimited text (string, quote-like operator, pattern)
    E0001,
    /// Malformed source encoding
    E0002,
    /// Invalid number literal
    E0003,
    /// Unterminated heredoc
    E0004,
    /// Invalid escape sequence
    E0005,
    /// Invalid transliteration range
    E0006,
    /// Mismatched closing bracket
    E0007,
    /// Unclosed bracket at end of input
    E0008,
    /// Integer overflow in numeric literal (warning)
    E0009,
    /// Misplaced `_` in numeric literal (warning)
    E0010,
    /// Bareword used as a string under strict barewords (warning)
    E0011,
    /// Unrecognized escape passed through (warning)
    E0012,
    /// Heredoc indentation does not match terminator
    E0013,
    /// Unterminated format
    E0014,
    /// Deprecated syntax (warning)
    E0015,
    /// Source stream read failure
    E0016,
    /// Character that cannot start any token
    E0017,

    /// Internal lexer invariant violated
    E9001,
    /// Too many errors, stopping
    E9002,
}

impl ErrorCode {
    /// All variants, kept in sync with `as_str()`.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E0001,
        ErrorCode::E0002,
        ErrorCode::E0003,
        ErrorCode::E0004,
        ErrorCode::E0005,
        ErrorCode::E0006,
        ErrorCode::E0007,
        ErrorCode::E0008,
        ErrorCode::E0009,
        ErrorCode::E0010,
        ErrorCode::E0011,
        ErrorCode::E0012,
        ErrorCode::E0013,
        ErrorCode::E0014,
        ErrorCode::E0015,
        ErrorCode::E0016,
        ErrorCode::E0017,
        ErrorCode::E9001,
        ErrorCode::E9002,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            ErrorCode::E0007 => "E0007",
            ErrorCode::E0008 => "E0008",
            ErrorCode::E0009 => "E0009",
            ErrorCode::E0010 => "E0010",
            ErrorCode::E0011 => "E0011",
            ErrorCode::E0012 => "E0012",
            ErrorCode::E0013 => "E0013",
            ErrorCode::E0014 => "E0014",
            ErrorCode::E0015 => "E0015",
            ErrorCode::E0016 => "E0016",
            ErrorCode::E0017 => "E0017",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// Check if this is a lexer-phase code.
    pub fn is_lexer_error(&self) -> bool {
        self.as_str().starts_with("E0")
    }

    /// Check if this is an internal code.
    pub fn is_internal(&self) -> bool {
        self.as_str().starts_with("E9")
    }

    /// Phase name shown by `plx explain`.
    pub fn phase(&self) -> &'static str {
        if self.is_internal() {
            "internal"
        } else if self.is_lexer_error() {
            "lexer"
        } else {
            "unknown"
        }
    }

    /// Short description used by `plx explain`.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "unterminated delimited text",
            ErrorCode::E0002 => "malformed source encoding",
            ErrorCode::E0003 => "invalid number literal",
            ErrorCode::E0004 => "unterminated heredoc",
            ErrorCode::E0005 => "invalid escape sequence",
            ErrorCode::E0006 => "invalid transliteration range",
            ErrorCode::E0007 => "mismatched closing bracket",
            ErrorCode::E0008 => "unclosed bracket",
            ErrorCode::E0009 => "integer overflow in number",
            ErrorCode::E0010 => "misplaced underscore in number",
            ErrorCode::E0011 => "bareword not allowed under strict barewords",
            ErrorCode::E0012 => "unrecognized escape",
            ErrorCode::E0013 => "heredoc indentation mismatch",
            ErrorCode::E0014 => "unterminated format",
            ErrorCode::E0015 => "deprecated syntax",
            ErrorCode::E0016 => "source read failure",
            ErrorCode::E0017 => "unrecognized character",
            ErrorCode::E9001 => "internal lexer error",
            ErrorCode::E9002 => "too many errors",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse a code like `"E0004"`, ignoring case.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}
