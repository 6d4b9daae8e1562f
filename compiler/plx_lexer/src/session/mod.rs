//! Lexer session.
//!
//! A [`LexerSession`] owns everything one lexing run needs: the source
//! window, the expectation stack, the queue of decided tokens, the stack of
//! sub-lexer contexts and the session options. There is no global state
//! apart from the keyword registry, which is snapshotted at creation.
//!
//! # Dispatch
//!
//! [`LexerSession::next_token`] drains the pending queue first, then runs the
//! handler for the current [`LexerMode`] until one yields a token:
//!
//! ```text
//! Normal ──"..."──▶ InterpolationConcat ──$x──▶ InterpolationStart
//!                      ▲     │  \U                    │
//!                      │     ▼                        ▼
//!                      │  InterpolationCaseMod   InterpolationEndMaybe ──[ { ->──▶ Normal
//!                      └─────────────────────────────┘
//!                   end of text ──▶ InterpolationEnd ──▶ parent context
//! ```
//!
//! Handlers live in sibling modules: `dispatch` (normal mode), `words`
//! (identifiers and barewords), `quotes` (quote-like operators, heredocs),
//! `interpolate` (the interpolation states) and `format`.

mod dispatch;
mod format;
mod interpolate;
mod quotes;
mod words;

use std::fmt;

use plx_diagnostic::{Diagnostic, DiagnosticQueue};
use plx_ir::{CaseMod, Name, SharedInterner, Span, Token, TokenKind, TokenValue, TreeBuilder};
use plx_lexer_core::{SourceBuffer, SourceStream};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::escape::EscapeIssue;
use crate::expect_stack::{Expect, ExpectationStack};
use crate::keywords::KeywordSnapshot;
use crate::lex_error::{LexError, LexErrorContext, LexSeverity};
use crate::options::LexerOptions;
use crate::pending::PendingQueue;

/// Lexer state. Exactly one is active.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LexerMode {
    /// Ordinary code.
    Normal,
    /// At `$` or `@` inside interpolated text.
    InterpolationStart,
    /// Between interpolated expressions: the next literal run.
    InterpolationConcat,
    /// At `\U`, `\L`, `\u`, `\l`, `\Q`, `\F` or `\E`.
    InterpolationCaseMod,
    /// After an interpolated variable: a subscript may continue it.
    InterpolationEndMaybe,
    /// End of the interpolated text.
    InterpolationEnd,
    /// Picture lines of a `format`.
    FormLine,
}

/// Bounds for [`LexerSession::lookahead`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookaheadLimit {
    pub max_tokens: usize,
    /// Most brackets the lookahead may open before giving up.
    pub max_brackets: Option<u64>,
    /// Kinds that end the lookahead successfully when met at the starting
    /// bracket depth.
    pub terminators: Vec<TokenKind>,
}

impl LookaheadLimit {
    pub fn new(max_tokens: usize) -> Self {
        LookaheadLimit {
            max_tokens,
            max_brackets: None,
            terminators: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_max_brackets(mut self, max: u64) -> Self {
        self.max_brackets = Some(max);
        self
    }

    #[must_use]
    pub fn with_terminator(mut self, kind: TokenKind) -> Self {
        self.terminators.push(kind);
        self
    }
}

/// Outcome of one handler call.
enum Step {
    Token(Token),
    /// State changed; run the dispatch again.
    Continue,
}

type Tokens = SmallVec<[Token; 4]>;

/// Start of a token: absolute offset and line.
#[derive(Copy, Clone, Debug)]
struct Mark {
    pos: u32,
    line: u32,
}

/// Progress through one interpolated string.
#[derive(Clone, Debug)]
struct InterpState {
    /// `Stringify` or `Readpipe`.
    wrapper: TokenKind,
    /// A part was emitted; the next one needs a `Dot`.
    need_concat: bool,
    /// Open case modifiers, innermost last.
    case_mods: SmallVec<[CaseMod; 4]>,
    /// `join($", ` is open for an interpolated array.
    join_open: bool,
    /// Bracket depth the current interpolated expression started at.
    expr_depth: Option<usize>,
}

impl InterpState {
    fn new(wrapper: TokenKind) -> Self {
        InterpState {
            wrapper,
            need_concat: false,
            case_mods: SmallVec::new(),
            join_open: false,
            expr_depth: None,
        }
    }
}

/// Saved parent state while a nested buffer is lexed.
#[derive(Debug)]
struct SubLexContext {
    buf: SourceBuffer,
    mode: LexerMode,
    /// Bracket depth when the nested text was entered.
    expect_depth: usize,
    interp: Option<InterpState>,
}

#[derive(Copy, Clone, Debug)]
struct FormatState {
    start_line: u32,
    /// Bracket depth of the declaration.
    depth: usize,
    /// Lexing the argument line that follows a picture line.
    in_args: bool,
}

/// A re-entrant lexing run over one source unit.
pub struct LexerSession<'b> {
    buf: SourceBuffer,
    mode: LexerMode,
    expect: ExpectationStack,
    pending: PendingQueue,
    sublex: Vec<SubLexContext>,
    interp: Option<InterpState>,
    keywords: KeywordSnapshot,
    /// `my sub` declarations with the bracket depth they are visible from.
    lexical_subs: Vec<(Name, usize)>,
    known_subs: FxHashSet<Name>,
    known_packages: FxHashSet<Name>,
    package: Name,
    format: Option<FormatState>,
    interner: SharedInterner,
    builder: Option<&'b mut dyn TreeBuilder>,
    options: LexerOptions,
    diagnostics: DiagnosticQueue,
    errors: Vec<LexError>,
    recoverable: usize,
    fatal: Option<LexError>,
    last_kind: Option<TokenKind>,
    /// Expectation after the block of the last block keyword.
    block_resume: Option<Expect>,
    /// The last `sub` had a name.
    sub_named: bool,
    declarator_pending: bool,
    /// `__END__` or `__DATA__` was seen.
    ended: bool,
}

impl fmt::Debug for LexerSession<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LexerSession")
            .field("mode", &self.mode)
            .field("expect", &self.expect.current())
            .field("depth", &self.expect.depth())
            .field("sublex", &self.sublex.len())
            .field("pending", &self.pending.len())
            .field("buf", &self.buf)
            .finish_non_exhaustive()
    }
}

impl<'b> LexerSession<'b> {
    /// Session over a complete source text.
    ///
    /// With `options.utf8` unset the bytes of `source` are read as Latin-1.
    pub fn new(source: &str, options: LexerOptions, interner: SharedInterner) -> Self {
        let buf = if options.utf8 {
            SourceBuffer::from_text(source)
        } else {
            SourceBuffer::from_latin1(source.as_bytes())
        };
        Self::with_buffer(buf, options, interner)
    }

    /// Session fed on demand from `stream`.
    pub fn from_stream(
        stream: Box<dyn SourceStream>,
        options: LexerOptions,
        interner: SharedInterner,
    ) -> Self {
        let buf = SourceBuffer::with_stream(stream, options.utf8, options.chunk_size);
        Self::with_buffer(buf, options, interner)
    }

    fn with_buffer(buf: SourceBuffer, options: LexerOptions, interner: SharedInterner) -> Self {
        let package = interner.intern("main");
        let diagnostics = DiagnosticQueue::with_config(options.diagnostic_config());
        LexerSession {
            buf,
            mode: LexerMode::Normal,
            expect: ExpectationStack::new(),
            pending: PendingQueue::new(),
            sublex: Vec::new(),
            interp: None,
            keywords: KeywordSnapshot::take(),
            lexical_subs: Vec::new(),
            known_subs: FxHashSet::default(),
            known_packages: FxHashSet::default(),
            package,
            format: None,
            interner,
            builder: None,
            options,
            diagnostics,
            errors: Vec::new(),
            recoverable: 0,
            fatal: None,
            last_kind: None,
            block_resume: None,
            sub_named: false,
            declarator_pending: false,
            ended: false,
        }
    }

    /// Attach a tree builder; constant and bareword tokens then carry
    /// handles instead of raw payloads.
    #[must_use]
    pub fn with_builder(mut self, builder: &'b mut dyn TreeBuilder) -> Self {
        self.builder = Some(builder);
        self
    }

    // ─── Parser interface ───

    /// Produce the next token.
    ///
    /// After a fatal error every call returns that error again.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if let Some(err) = &self.fatal {
            return Err(err.clone());
        }
        if let Some(tok) = self.pending.pop_front() {
            return Ok(self.deliver(tok));
        }
        loop {
            let step = match self.mode {
                LexerMode::Normal => self.lex_normal(),
                LexerMode::InterpolationStart => self.interp_start(),
                LexerMode::InterpolationConcat => self.interp_concat(),
                LexerMode::InterpolationCaseMod => self.interp_case_mod(),
                LexerMode::InterpolationEndMaybe => self.interp_end_maybe(),
                LexerMode::InterpolationEnd => self.interp_end(),
                LexerMode::FormLine => self.lex_form_line(),
            };
            match step {
                Ok(Step::Token(tok)) => return Ok(self.deliver(tok)),
                Ok(Step::Continue) => {
                    if let Some(tok) = self.pending.pop_front() {
                        return Ok(self.deliver(tok));
                    }
                }
                Err(err) => return Err(self.fail(err)),
            }
        }
    }

    /// Push a token back; it is returned by the next `next_token` call.
    pub fn unread_token(&mut self, token: Token) {
        self.pending.push_front(token);
    }

    /// The parser finished a statement.
    ///
    /// Resets the expectation. Inside a format argument line the rest of the
    /// line is skipped and `FormArgsEnd` is queued.
    pub fn statement_boundary(&mut self) -> Result<(), LexError> {
        self.expect.set(Expect::Statement);
        self.block_resume = None;
        if self.format.is_some_and(|f| f.in_args) {
            let mark = self.mark();
            if let Some(end) = self.buf.line_end_from(self.buf.cursor())? {
                self.buf.advance_to(end);
            }
            let tok = self.make(mark, TokenKind::FormArgsEnd, TokenValue::None);
            self.pending.push_back(tok);
            self.end_format_args();
        }
        Ok(())
    }

    /// Override the current expectation.
    pub fn set_expect(&mut self, expect: Expect) {
        self.expect.set(expect);
    }

    /// Make `name` resolve to `LexSubCall` in the current bracket scope.
    pub fn declare_lexical_sub(&mut self, name: &str) {
        let name = self.interner.intern(name);
        self.lexical_subs.push((name, self.expect.depth()));
    }

    /// Lex ahead without consuming.
    ///
    /// Returns the tokens up to and including the first terminator met at
    /// the starting bracket depth, or `None` when the token budget runs out,
    /// too many brackets open, a closing bracket leaves the starting depth
    /// or input ends first.
    /// Every token lexed is queued again either way.
    pub fn lookahead(&mut self, limit: &LookaheadLimit) -> Result<Option<Vec<Token>>, LexError> {
        let budget = limit.max_tokens.min(self.options.max_lookahead);
        let mut seen: Vec<Token> = Vec::new();
        let mut depth = 0i64;
        let opened_before = self.expect.total_opened();
        let found = loop {
            if seen.len() >= budget {
                break false;
            }
            let opened = self.expect.total_opened() - opened_before;
            if limit.max_brackets.is_some_and(|max| opened > max) {
                break false;
            }
            let tok = match self.next_token() {
                Ok(tok) => tok,
                Err(err) => {
                    self.requeue(seen);
                    return Err(err);
                }
            };
            let kind = tok.kind;
            seen.push(tok);
            match kind {
                TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
                | TokenKind::HashBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => depth -= 1,
                _ => {}
            }
            if kind == TokenKind::Eof || depth < 0 {
                break false;
            }
            if depth == 0 && limit.terminators.contains(&kind) {
                break true;
            }
        };
        tracing::trace!(tokens = seen.len(), found, "lookahead");
        let result = found.then(|| seen.clone());
        self.requeue(seen);
        Ok(result)
    }

    fn requeue(&mut self, tokens: Vec<Token>) {
        for tok in tokens.into_iter().rev() {
            self.pending.push_front(tok);
        }
    }

    /// Lex to the end of input. The `Eof` token is not included.
    pub fn collect_tokens(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            if tok.is_eof() {
                return Ok(tokens);
            }
            tokens.push(tok);
        }
    }

    /// Take the diagnostics reported so far, sorted by position.
    pub fn diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.flush()
    }

    /// Every error reported so far, fatal ones included.
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    pub fn mode(&self) -> LexerMode {
        self.mode
    }

    pub fn expect(&self) -> Expect {
        self.expect.current()
    }

    /// Open brackets.
    pub fn depth(&self) -> usize {
        self.expect.depth()
    }

    /// Line of the cursor in the buffer being lexed.
    pub fn line(&self) -> u32 {
        self.buf.line()
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    // ─── Token construction ───

    fn mark(&self) -> Mark {
        Mark {
            pos: self.buf.position(),
            line: self.buf.line(),
        }
    }

    /// Token from `mark` to the cursor.
    fn make(&mut self, mark: Mark, kind: TokenKind, value: TokenValue) -> Token {
        let end = self.buf.position().max(mark.pos);
        self.last_kind = Some(kind);
        Token::new(kind, value, Span::new(mark.pos, end), mark.line)
    }

    /// Zero-width token standing for structure rather than source text.
    fn synthetic(&mut self, mark: Mark, kind: TokenKind) -> Token {
        self.synthetic_with(mark, kind, TokenValue::None)
    }

    fn synthetic_with(&mut self, mark: Mark, kind: TokenKind, value: TokenValue) -> Token {
        self.last_kind = Some(kind);
        Token::new(kind, value, Span::point(mark.pos), mark.line)
    }

    /// Token over window offsets `from..to` of the current line.
    fn token_at(&mut self, from: usize, to: usize, kind: TokenKind, value: TokenValue) -> Token {
        let span = Span::new(self.buf.position_of(from), self.buf.position_of(to));
        self.last_kind = Some(kind);
        Token::new(kind, value, span, self.buf.line())
    }

    /// Token from `mark` to the cursor, then `next` is expected.
    fn emit(&mut self, mark: Mark, kind: TokenKind, value: TokenValue, next: Expect) -> Step {
        self.expect.set(next);
        Step::Token(self.make(mark, kind, value))
    }

    /// Return the first token and queue the rest.
    fn emit_all(&mut self, tokens: Tokens) -> Step {
        let mut iter = tokens.into_iter();
        let Some(first) = iter.next() else {
            return Step::Continue;
        };
        for tok in iter {
            self.pending.push_back(tok);
        }
        Step::Token(first)
    }

    fn ident(&self, text: &str) -> TokenValue {
        TokenValue::Ident(self.interner.intern(text))
    }

    /// Swap payloads for builder handles and hand the token out.
    fn deliver(&mut self, mut tok: Token) -> Token {
        if let Some(builder) = self.builder.as_deref_mut() {
            let handle = match (tok.kind, &tok.value) {
                (TokenKind::Str | TokenKind::Const, TokenValue::Str(_)) => {
                    Some(builder.make_literal(&tok.value))
                }
                (
                    TokenKind::Word
                    | TokenKind::FuncCall
                    | TokenKind::MethodCall
                    | TokenKind::LexSubCall,
                    &TokenValue::Ident(name),
                ) => Some(builder.make_identifier_ref(name)),
                _ => None,
            };
            if let Some(handle) = handle {
                tok.value = TokenValue::Handle(handle);
            }
        }
        tok
    }

    fn set_mode(&mut self, mode: LexerMode) {
        if self.mode != mode {
            tracing::trace!(from = ?self.mode, to = ?mode, "mode");
            self.mode = mode;
        }
    }

    // ─── Errors ───

    /// Fill in line, column and excerpt from the cursor.
    fn locate(&self, err: LexError) -> LexError {
        self.locate_at(err, self.buf.cursor())
    }

    /// Fill in line, column and excerpt for window offset `off` on the
    /// current line.
    fn locate_at(&self, err: LexError, off: usize) -> LexError {
        if err.line > 0 {
            return err;
        }
        let (line, column, excerpt) = (
            self.buf.line(),
            self.buf.column_of(off),
            self.buf.current_line_text(),
        );
        err.with_location(line, column, excerpt)
    }

    /// Record a non-fatal error.
    ///
    /// Fails with `TooManyErrors` once the recoverable error count reaches
    /// the configured limit.
    fn report(&mut self, err: LexError) -> Result<(), LexError> {
        let err = self.locate(err);
        tracing::debug!(
            code = %err.kind.code(),
            line = err.line,
            severity = ?err.severity,
            "{}",
            err.kind
        );
        self.diagnostics.push(err.to_diagnostic());
        let span = err.span;
        let recoverable = err.severity == LexSeverity::Recoverable;
        self.errors.push(err);
        if recoverable {
            self.recoverable += 1;
            let limit = self.options.error_limit;
            if limit > 0 && self.recoverable >= limit {
                return Err(LexError::too_many_errors(span, limit));
            }
        }
        Ok(())
    }

    /// Record a fatal error; the session is finished.
    fn fail(&mut self, err: LexError) -> LexError {
        let err = self.locate(err);
        tracing::debug!(code = %err.kind.code(), line = err.line, "lexing stopped: {}", err.kind);
        self.diagnostics.push(err.to_diagnostic());
        self.errors.push(err.clone());
        self.fatal = Some(err.clone());
        err
    }

    fn report_escape_issues(&mut self, issues: Vec<EscapeIssue>, base: u32) -> Result<(), LexError> {
        for issue in issues {
            let span = Span::within(base, issue.at);
            self.report(LexError::new(span, issue.kind).with_context(LexErrorContext::Escape))?;
        }
        Ok(())
    }

    // ─── Sub-lexer ───

    /// Lex `text` (located at `base`, starting on `line`) as the body of an
    /// interpolated string wrapped in `wrapper ( ... )`.
    fn enter_sublex(
        &mut self,
        mark: Mark,
        text: &str,
        base: u32,
        line: u32,
        wrapper: TokenKind,
    ) -> Tokens {
        let nested = SourceBuffer::nested(text, base, line);
        let parent = std::mem::replace(&mut self.buf, nested);
        self.sublex.push(SubLexContext {
            buf: parent,
            mode: self.mode,
            expect_depth: self.expect.depth(),
            interp: self.interp.take(),
        });
        self.interp = Some(InterpState::new(wrapper));
        tracing::debug!(depth = self.sublex.len(), ?wrapper, line, "enter sub-lexer");
        self.set_mode(LexerMode::InterpolationConcat);
        let mut tokens = Tokens::new();
        tokens.push(self.synthetic(mark, wrapper));
        tokens.push(self.synthetic(mark, TokenKind::LParen));
        tokens
    }

    /// Restore the parent context.
    fn leave_sublex(&mut self) -> Result<(), LexError> {
        let Some(ctx) = self.sublex.pop() else {
            return Ok(());
        };
        let found = self.expect.depth();
        if found != ctx.expect_depth {
            return Err(LexError::new(
                Span::point(self.buf.position()),
                crate::lex_error::LexErrorKind::SublexMismatch {
                    expected: ctx.expect_depth,
                    found,
                },
            ));
        }
        self.buf = ctx.buf;
        self.interp = ctx.interp;
        self.set_mode(ctx.mode);
        self.expect.set(Expect::Operator);
        tracing::debug!(depth = self.sublex.len(), "leave sub-lexer");
        Ok(())
    }

    /// Bracket depth below which the current buffer may not close.
    fn sublex_base(&self) -> usize {
        self.sublex.last().map_or(0, |ctx| ctx.expect_depth)
    }

    // ─── Formats ───

    fn in_format_args(&self) -> bool {
        self.format
            .is_some_and(|f| f.in_args && f.depth == self.expect.depth())
    }

    fn end_format_args(&mut self) {
        if let Some(format) = self.format.as_mut() {
            format.in_args = false;
        }
        self.set_mode(LexerMode::FormLine);
    }
}
