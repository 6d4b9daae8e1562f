//! Lexer for PLX, a Perl-like language with sigils.
//!
//! Tokenizing PLX needs more context than a regular grammar offers: `/`
//! divides or starts a pattern, `{` opens a block, a hash or a subscript,
//! and a bareword may be a call, a class name or a string. The
//! [`LexerSession`] keeps the state that decides these cases:
//!
//! - an [`ExpectationStack`] of what the parser wants next, one frame per
//!   open bracket;
//! - a pending queue, so one source construct can yield several tokens;
//! - a stack of nested buffers for interpolated strings and heredoc bodies.
//!
//! The scanners that do not need session state (numbers, escapes,
//! delimited text, heredoc tags) are plain functions in their own modules.
//!
//! # Example
//!
//! ```
//! use plx_ir::{SharedInterner, TokenKind};
//! use plx_lexer::{LexerOptions, LexerSession};
//!
//! let mut lexer = LexerSession::new("my $x = 1;", LexerOptions::default(), SharedInterner::new());
//! let kinds: Vec<TokenKind> = lexer
//!     .collect_tokens()
//!     .unwrap_or_default()
//!     .iter()
//!     .map(|t| t.kind)
//!     .collect();
//! assert_eq!(kinds.len(), 5);
//! ```

pub mod delimited;
pub mod escape;
pub mod expect_stack;
pub mod heredoc;
pub mod ident;
pub mod keywords;
pub mod lex_error;
pub mod numeric;
mod options;
pub mod pending;
mod session;

pub use expect_stack::{Expect, ExpectationStack, Mismatch};
pub use keywords::{
    builtin_table, register_keyword, KeywordFlags, KeywordInfo, KeywordKind, KeywordSnapshot,
    KeywordTable, Marker, QuoteOp,
};
pub use lex_error::{LexError, LexErrorContext, LexErrorKind, LexSeverity};
pub use numeric::{NumberLiteral, NumberScan};
pub use options::LexerOptions;
pub use session::{LexerMode, LexerSession, LookaheadLimit};
