//! Per-session lexer configuration.

use plx_diagnostic::DiagnosticConfig;
use plx_lexer_core::DEFAULT_CHUNK;

/// Options fixed for the lifetime of a [`LexerSession`](crate::LexerSession).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexerOptions {
    /// Source is UTF-8. When unset, every byte is one Latin-1 code point.
    pub utf8: bool,
    /// Recoverable errors tolerated before the session stops (0 = unlimited).
    pub error_limit: usize,
    /// Warn about barewords used as values.
    pub strict_barewords: bool,
    /// Keep the backslash in `\<delim>` inside delimited text.
    pub keep_bracketed_quoted: bool,
    /// Bytes requested from the stream per refill.
    pub chunk_size: usize,
    /// Token budget for speculative lookahead.
    pub max_lookahead: usize,
    /// Reported by `__FILE__`.
    pub file_name: String,
    /// Queue a diagnostic only once per code and span.
    pub deduplicate_diagnostics: bool,
}

impl Default for LexerOptions {
    fn default() -> Self {
        LexerOptions {
            utf8: true,
            error_limit: 10,
            strict_barewords: false,
            keep_bracketed_quoted: false,
            chunk_size: DEFAULT_CHUNK,
            max_lookahead: 64,
            file_name: "-".to_string(),
            deduplicate_diagnostics: true,
        }
    }
}

impl LexerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_utf8(mut self, utf8: bool) -> Self {
        self.utf8 = utf8;
        self
    }

    #[must_use]
    pub fn with_error_limit(mut self, limit: usize) -> Self {
        self.error_limit = limit;
        self
    }

    #[must_use]
    pub fn with_strict_barewords(mut self, strict: bool) -> Self {
        self.strict_barewords = strict;
        self
    }

    #[must_use]
    pub fn with_keep_bracketed_quoted(mut self, keep: bool) -> Self {
        self.keep_bracketed_quoted = keep;
        self
    }

    /// Refill chunk size; clamped to at least one byte.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    #[must_use]
    pub fn with_max_lookahead(mut self, max: usize) -> Self {
        self.max_lookahead = max;
        self
    }

    #[must_use]
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    #[must_use]
    pub fn with_deduplicated_diagnostics(mut self, dedup: bool) -> Self {
        self.deduplicate_diagnostics = dedup;
        self
    }

    /// Queue settings for the session's diagnostics.
    ///
    /// The queue itself never drops errors: the session enforces
    /// `error_limit` so the error that stops it is still queued.
    pub fn diagnostic_config(&self) -> DiagnosticConfig {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: self.deduplicate_diagnostics,
        }
    }
}
