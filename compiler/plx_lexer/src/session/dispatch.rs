//! Normal mode: trivia, numbers, variables, operators and brackets.
//!
//! Ambiguous punctuation is decided by the current expectation alone: where
//! a term is wanted `-5` is a negative number, `/` opens a pattern, `<`
//! opens a readline or heredoc and `%`, `&`, `*` are sigils.

use plx_ir::{AssignOp, Sigil, Span, Token, TokenKind, TokenValue};
use plx_lexer_core::char_class;
use smallvec::smallvec;

use super::{LexerMode, LexerSession, Mark, Step, Tokens};
use crate::expect_stack::{Expect, Mismatch};
use crate::ident;
use crate::lex_error::{LexError, LexErrorContext, LexErrorKind};
use crate::numeric::{self, NumberLiteral};

/// Letters of the file test operators (`-e`, `-d` ...).
const FILE_TESTS: &[u8] = b"rwxoRWXOezsfdlpSbcugktTBAMC";

/// Punctuation variables: `$_`-like names made of one symbol.
const SCALAR_PUNCT: &[u8] = b"&`'+!@/\\,;.0<>[]|?:\"-=~%^()";

fn is_punct_var(sigil: Sigil, b: u8) -> bool {
    match sigil {
        Sigil::Scalar => SCALAR_PUNCT.contains(&b),
        Sigil::Array => matches!(b, b'-' | b'+'),
        Sigil::Hash => matches!(b, b'-' | b'+' | b'!'),
        Sigil::Code | Sigil::Glob | Sigil::ArrayLen => false,
    }
}

impl LexerSession<'_> {
    pub(super) fn lex_normal(&mut self) -> Result<Step, LexError> {
        let declaring = std::mem::take(&mut self.declarator_pending);
        if self.ended {
            let here = Span::point(self.buf.position());
            return Ok(Step::Token(Token::bare(TokenKind::Eof, here, self.buf.line())));
        }
        let keep = self.buf.cursor();
        self.buf.discard_before(keep);
        if let Some(step) = self.skip_trivia()? {
            return Ok(step);
        }
        self.buf.ensure(4)?;
        if self.buf.is_eof() {
            return self.at_end();
        }

        let mark = self.mark();
        let cursor = self.buf.cursor();
        let b = self.buf.current();
        let c1 = self.buf.peek(1);
        let term = self.expect.current().wants_term();
        match b {
            b'0'..=b'9' => self.lex_number(mark, false),
            b'$' => self.lex_scalar(mark),
            b'@' => {
                let Some(tokens) = self.var_after_sigil(mark, Sigil::Array, 1)? else {
                    return self.unrecognized(mark);
                };
                Ok(self.emit_all(tokens))
            }
            b'%' | b'&' | b'*' if term => {
                let sigil = match b {
                    b'%' => Sigil::Hash,
                    b'&' => Sigil::Code,
                    _ => Sigil::Glob,
                };
                match self.var_after_sigil(mark, sigil, 1)? {
                    Some(tokens) => Ok(self.emit_all(tokens)),
                    None => self.lex_operator(mark, b),
                }
            }
            b'\'' => self.lex_single_quoted(mark),
            b'"' => self.lex_double_quoted(mark),
            b'`' => self.lex_backtick(mark),
            b'(' => {
                self.buf.advance(1);
                // Prototype or signature: the body block follows.
                let resume = if self.expect.current() == Expect::AttrBlock {
                    Expect::AttrBlock
                } else {
                    Expect::Operator
                };
                self.expect.push_with_resume('(', Expect::Term, resume);
                Ok(Step::Token(self.make(mark, TokenKind::LParen, TokenValue::None)))
            }
            b'[' => {
                self.buf.advance(1);
                self.expect.push('[', Expect::Term);
                Ok(Step::Token(self.make(mark, TokenKind::LBracket, TokenValue::None)))
            }
            b'{' => self.open_brace(mark),
            b')' => self.close_bracket(mark, ')', TokenKind::RParen),
            b']' => self.close_bracket(mark, ']', TokenKind::RBracket),
            b'}' => self.close_bracket(mark, '}', TokenKind::RBrace),
            b':' if c1 == b':' && ident::starts_ident(&mut self.buf, cursor + 2)? => {
                self.lex_word(mark, declaring)
            }
            _ if ident::starts_ident(&mut self.buf, cursor)? => {
                self.lex_word(mark, declaring)
            }
            _ => self.lex_operator(mark, b),
        }
    }

    // ─── Trivia ───

    /// Skip whitespace, comments and POD. Yields `FormArgsEnd` at the end of
    /// a format argument line.
    fn skip_trivia(&mut self) -> Result<Option<Step>, LexError> {
        loop {
            self.buf.ensure(2)?;
            let b = self.buf.current();
            if b == b'\n' && self.in_format_args() {
                let mark = self.mark();
                self.buf.advance(1);
                let tok = self.make(mark, TokenKind::FormArgsEnd, TokenValue::None);
                self.end_format_args();
                return Ok(Some(Step::Token(tok)));
            }
            if char_class::is_space(b) {
                self.buf.advance(1);
            } else if b == b'#' {
                // Stop before the newline so format argument lines see it.
                match self.buf.line_end_from(self.buf.cursor())? {
                    Some(end) if self.buf.byte_at(end - 1) == b'\n' => {
                        self.buf.advance_to(end - 1);
                    }
                    Some(end) => self.buf.advance_to(end),
                    None => return Ok(None),
                }
            } else if b == b'=' && self.at_pod_start() {
                self.skip_pod()?;
            } else {
                return Ok(None);
            }
        }
    }

    /// `=word` at the start of a statement line of the top-level buffer.
    fn at_pod_start(&self) -> bool {
        self.sublex.is_empty()
            && self.buf.cursor() == self.buf.line_start()
            && self.expect.current() == Expect::Statement
            && self.buf.peek(1).is_ascii_alphabetic()
    }

    /// Skip POD through the `=cut` line (or to end of input).
    fn skip_pod(&mut self) -> Result<(), LexError> {
        let mut lines = 0u32;
        loop {
            let start = self.buf.cursor();
            let Some(end) = self.buf.line_end_from(start)? else {
                break;
            };
            self.buf.ensure_offset(start + 4)?;
            let is_cut = self.buf.bytes(start, start + 4) == b"=cut"
                && !char_class::is_ident_continue_byte(self.buf.byte_at(start + 4));
            self.buf.advance_to(end);
            lines += 1;
            if is_cut {
                break;
            }
        }
        tracing::trace!(lines, "pod skipped");
        Ok(())
    }

    // ─── End of input ───

    fn at_end(&mut self) -> Result<Step, LexError> {
        if !self.sublex.is_empty() {
            self.set_mode(LexerMode::InterpolationEnd);
            return Ok(Step::Continue);
        }
        let here = Span::point(self.buf.position());
        if let Some(format) = self.format {
            return Err(LexError::unterminated_format(here, format.start_line));
        }
        for (open, close) in self.expect.truncate(0) {
            self.report(LexError::unclosed_bracket(here, open, close))?;
        }
        Ok(Step::Token(Token::bare(TokenKind::Eof, here, self.buf.line())))
    }

    fn unrecognized(&mut self, mark: Mark) -> Result<Step, LexError> {
        let (found, width) = self
            .buf
            .char_at(self.buf.cursor())
            .unwrap_or((char::REPLACEMENT_CHARACTER, 1));
        self.buf.advance(width);
        let span = Span::new(mark.pos, self.buf.position());
        self.report(LexError::new(span, LexErrorKind::UnrecognizedChar { found }))?;
        Ok(Step::Continue)
    }

    // ─── Numbers ───

    /// Refill until the window holds a byte failing `pred` at or after
    /// `from`, or the input ends.
    pub(super) fn ensure_run(&mut self, from: usize, pred: impl Fn(u8) -> bool) -> Result<(), LexError> {
        let mut pos = from;
        loop {
            while pos < self.buf.end() {
                if !pred(self.buf.byte_at(pos)) {
                    return Ok(());
                }
                pos += 1;
            }
            if self.buf.refill()? == 0 {
                return Ok(());
            }
        }
    }

    /// Numeric literal at the cursor; `negate` when a `-` was consumed.
    fn lex_number(&mut self, mark: Mark, negate: bool) -> Result<Step, LexError> {
        let start = self.buf.cursor();
        self.ensure_run(start, numeric::is_number_byte)?;
        let scan = numeric::scan_signed_number(self.buf.rest(), negate);
        for issue in scan.issues {
            let span = Span::new(
                self.buf.position_of(start + issue.at.start),
                self.buf.position_of(start + issue.at.end),
            );
            let err = LexError::new(span, issue.kind).with_context(LexErrorContext::NumberLiteral);
            let err = self.locate_at(err, start + issue.at.start);
            self.report(err)?;
        }
        self.buf.advance(scan.len);
        self.expect.set(Expect::Operator);
        let (kind, value) = match scan.literal {
            NumberLiteral::Int(v) => (TokenKind::Int, TokenValue::Int(v)),
            NumberLiteral::Float(f) => (TokenKind::Float, TokenValue::float(f)),
            NumberLiteral::VString(s) => {
                let lit = self.make(mark, TokenKind::VString, TokenValue::str(s));
                if negate {
                    let minus = self.synthetic(mark, TokenKind::Negate);
                    return Ok(self.emit_all(smallvec![minus, lit]));
                }
                return Ok(Step::Token(lit));
            }
        };
        Ok(Step::Token(self.make(mark, kind, value)))
    }

    // ─── Variables ───

    fn lex_scalar(&mut self, mark: Mark) -> Result<Step, LexError> {
        self.buf.ensure(3)?;
        if self.buf.peek(1) == b'#' {
            let after = self.buf.cursor() + 2;
            let next = self.buf.byte_at(after);
            if next == b'{' || next == b'$' || ident::starts_ident(&mut self.buf, after)? {
                if let Some(tokens) = self.var_after_sigil(mark, Sigil::ArrayLen, 2)? {
                    return Ok(self.emit_all(tokens));
                }
            }
            // `$#` on its own is a punctuation variable.
            self.buf.advance(2);
            let value = self.ident("#");
            return Ok(self.emit(mark, TokenKind::Var(Sigil::Scalar), value, Expect::Operator));
        }
        match self.var_after_sigil(mark, Sigil::Scalar, 1)? {
            Some(tokens) => Ok(self.emit_all(tokens)),
            None => self.unrecognized(mark),
        }
    }

    /// Variable whose sigil (`sigil_len` bytes) is at the cursor.
    ///
    /// Returns `None`, consuming nothing, when no variable follows.
    pub(super) fn var_after_sigil(
        &mut self,
        mark: Mark,
        sigil: Sigil,
        sigil_len: usize,
    ) -> Result<Option<Tokens>, LexError> {
        let at = self.buf.cursor() + sigil_len;
        self.buf.ensure_offset(at + 2)?;
        if ident::starts_ident(&mut self.buf, at)? || ident::at_package_sep(&mut self.buf, at)? {
            let end = ident::scan_word(&mut self.buf, at, true)?;
            let name = self.buf.text(at, end);
            self.buf.advance_to(end);
            return Ok(Some(smallvec![self.var_token(mark, sigil, &name)]));
        }
        let b = self.buf.byte_at(at);
        let b1 = self.buf.byte_at(at + 1);
        match b {
            b'{' => {
                if let Some((name, end)) = self.braced_name(at)? {
                    self.buf.advance_to(end);
                    return Ok(Some(smallvec![self.var_token(mark, sigil, &name)]));
                }
                self.buf.advance_to(at);
                let deref = self.make(mark, TokenKind::Deref(sigil), TokenValue::None);
                let brace_mark = self.mark();
                self.buf.advance(1);
                self.expect
                    .push_with_resume('{', Expect::Statement, Expect::Operator);
                let brace = self.make(brace_mark, TokenKind::LBrace, TokenValue::None);
                Ok(Some(smallvec![deref, brace]))
            }
            b'$' => {
                let derefs = matches!(b1, b'{' | b'$' | b':')
                    || ident::starts_ident(&mut self.buf, at + 1)?;
                if sigil != Sigil::Scalar || derefs {
                    self.buf.advance_to(at);
                    self.expect.set(Expect::Term);
                    return Ok(Some(smallvec![self.make(
                        mark,
                        TokenKind::Deref(sigil),
                        TokenValue::None
                    )]));
                }
                // `$$` alone: process id.
                self.buf.advance_to(at + 1);
                Ok(Some(smallvec![self.var_token(mark, sigil, "$")]))
            }
            b'0'..=b'9' if sigil == Sigil::Scalar => {
                let end = ident::scan_digits(&mut self.buf, at)?;
                let name = self.buf.text(at, end);
                self.buf.advance_to(end);
                Ok(Some(smallvec![self.var_token(mark, sigil, &name)]))
            }
            b'^' if b1.is_ascii_uppercase() || matches!(b1, b'[' | b']' | b'^' | b'_' | b'?' | b'\\') => {
                let name = format!("^{}", char::from(b1));
                self.buf.advance_to(at + 2);
                Ok(Some(smallvec![self.var_token(mark, sigil, &name)]))
            }
            _ if is_punct_var(sigil, b) => {
                self.buf.advance_to(at + 1);
                let name = char::from(b).to_string();
                Ok(Some(smallvec![self.var_token(mark, sigil, &name)]))
            }
            _ => Ok(None),
        }
    }

    fn var_token(&mut self, mark: Mark, sigil: Sigil, name: &str) -> Token {
        self.expect.set(Expect::Operator);
        let value = self.ident(name);
        self.make(mark, TokenKind::Var(sigil), value)
    }

    /// `{name}` or `{^NAME}` at `open`: the name and the offset past `}`.
    fn braced_name(&mut self, open: usize) -> Result<Option<(String, usize)>, LexError> {
        let mut pos = self.skip_hspace_from(open + 1)?;
        let caret = self.buf.byte_at(pos) == b'^';
        if caret {
            pos += 1;
        }
        if !ident::starts_ident(&mut self.buf, pos)? {
            return Ok(None);
        }
        let end = ident::scan_word(&mut self.buf, pos, true)?;
        let close = self.skip_hspace_from(end)?;
        if self.buf.byte_at(close) != b'}' {
            return Ok(None);
        }
        let word = self.buf.text(pos, end);
        let name = if caret { format!("^{word}") } else { word };
        Ok(Some((name, close + 1)))
    }

    /// First offset at or after `from` that is not a space or tab.
    pub(super) fn skip_hspace_from(&mut self, from: usize) -> Result<usize, LexError> {
        let mut pos = from;
        loop {
            self.buf.ensure_offset(pos)?;
            if !char_class::is_horizontal_space(self.buf.byte_at(pos)) {
                return Ok(pos);
            }
            pos += 1;
        }
    }

    /// First offset at or after `from` that is not whitespace.
    pub(super) fn skip_blank_from(&mut self, from: usize) -> Result<usize, LexError> {
        let mut pos = from;
        loop {
            self.buf.ensure_offset(pos)?;
            if pos >= self.buf.end() || !char_class::is_space(self.buf.byte_at(pos)) {
                return Ok(pos);
            }
            pos += 1;
        }
    }

    // ─── Brackets ───

    fn open_brace(&mut self, mark: Mark) -> Result<Step, LexError> {
        let (kind, inside, resume) = match self.expect.current() {
            Expect::Statement => (TokenKind::LBrace, Expect::Statement, Expect::Statement),
            Expect::Block => {
                let resume = self.block_resume.take().unwrap_or(Expect::Operator);
                (TokenKind::LBrace, Expect::Statement, resume)
            }
            Expect::AttrBlock => {
                let resume = if std::mem::take(&mut self.sub_named) {
                    Expect::Statement
                } else {
                    Expect::Operator
                };
                (TokenKind::LBrace, Expect::Statement, resume)
            }
            Expect::Ref => return self.subscript(mark),
            Expect::Operator => match self.last_kind {
                Some(
                    TokenKind::Var(_)
                    | TokenKind::Deref(_)
                    | TokenKind::RBracket
                    | TokenKind::RBrace
                    | TokenKind::Arrow,
                ) => return self.subscript(mark),
                Some(TokenKind::RParen) => {
                    (TokenKind::LBrace, Expect::Statement, Expect::Statement)
                }
                _ => (TokenKind::LBrace, Expect::Statement, Expect::Operator),
            },
            Expect::Term => (TokenKind::HashBrace, Expect::Term, Expect::Operator),
        };
        self.buf.advance(1);
        self.expect.push_with_resume('{', inside, resume);
        Ok(Step::Token(self.make(mark, kind, TokenValue::None)))
    }

    /// `{` opening a hash subscript; a lone bareword key is quoted.
    fn subscript(&mut self, mark: Mark) -> Result<Step, LexError> {
        self.buf.advance(1);
        self.expect.push('{', Expect::Term);
        let brace = self.make(mark, TokenKind::LBrace, TokenValue::None);
        let mut tokens: Tokens = smallvec![brace];
        if let Some(key) = self.subscript_key()? {
            tokens.push(key);
            self.expect.set(Expect::Operator);
        }
        Ok(self.emit_all(tokens))
    }

    /// `word}` or `-word}` after a subscript brace.
    fn subscript_key(&mut self) -> Result<Option<Token>, LexError> {
        let start = self.skip_hspace_from(self.buf.cursor())?;
        let word_at = if self.buf.byte_at(start) == b'-' {
            start + 1
        } else {
            start
        };
        if !ident::starts_ident(&mut self.buf, word_at)? {
            return Ok(None);
        }
        let end = ident::scan_word(&mut self.buf, word_at, false)?;
        let close = self.skip_hspace_from(end)?;
        if self.buf.byte_at(close) != b'}' {
            return Ok(None);
        }
        let key = self.buf.text(start, end);
        let tok = self.token_at(start, end, TokenKind::Const, TokenValue::str(key));
        self.buf.advance_to(end);
        Ok(Some(tok))
    }

    fn close_bracket(&mut self, mark: Mark, close: char, kind: TokenKind) -> Result<Step, LexError> {
        self.buf.advance(1);
        let popped = if self.expect.depth() > self.sublex_base() {
            self.expect.pop(close)
        } else {
            Err(Mismatch {
                found: close,
                expected: None,
            })
        };
        match popped {
            Ok(_) => {
                let depth = self.expect.depth();
                self.lexical_subs.retain(|&(_, scope)| scope <= depth);
                if self
                    .interp
                    .as_ref()
                    .is_some_and(|interp| interp.expr_depth == Some(depth))
                {
                    self.set_mode(LexerMode::InterpolationEndMaybe);
                }
            }
            Err(mismatch) => {
                let span = Span::new(mark.pos, self.buf.position());
                self.report(LexError::mismatched_close(span, mismatch.found, mismatch.expected))?;
                self.expect.set(Expect::Operator);
            }
        }
        Ok(Step::Token(self.make(mark, kind, TokenValue::None)))
    }

    // ─── Operators ───

    /// Consume `len` bytes as `kind`, then expect `next`.
    fn punct(&mut self, mark: Mark, len: usize, kind: TokenKind, next: Expect) -> Step {
        self.buf.advance(len);
        self.emit(mark, kind, TokenValue::None, next)
    }

    fn assign(&mut self, mark: Mark, len: usize, op: AssignOp) -> Step {
        self.punct(mark, len, TokenKind::AssignOp(op), Expect::Term)
    }

    fn lex_operator(&mut self, mark: Mark, b: u8) -> Result<Step, LexError> {
        let c1 = self.buf.peek(1);
        let c2 = self.buf.peek(2);
        let term = self.expect.current().wants_term();
        let step = match b {
            b'-' if term => {
                if c1.is_ascii_digit() || (c1 == b'.' && c2.is_ascii_digit()) {
                    self.buf.advance(1);
                    return self.lex_number(mark, true);
                }
                if FILE_TESTS.contains(&c1)
                    && !char_class::is_ident_continue_byte(c2)
                    && !matches!(c2, b'=' | b'>')
                {
                    self.buf.advance(2);
                    let test = char::from(c1).to_string();
                    return Ok(self.emit(mark, TokenKind::FileTest, TokenValue::str(test), Expect::Term));
                }
                if c1 == b'-' {
                    self.punct(mark, 2, TokenKind::Dec, Expect::Term)
                } else {
                    self.punct(mark, 1, TokenKind::Negate, Expect::Term)
                }
            }
            b'-' => match c1 {
                b'-' => self.punct(mark, 2, TokenKind::Dec, Expect::Operator),
                b'>' => self.punct(mark, 2, TokenKind::Arrow, Expect::Ref),
                b'=' => self.assign(mark, 2, AssignOp::Sub),
                _ => self.punct(mark, 1, TokenKind::Minus, Expect::Term),
            },
            b'+' if term => {
                if c1 == b'+' {
                    self.punct(mark, 2, TokenKind::Inc, Expect::Term)
                } else {
                    self.punct(mark, 1, TokenKind::UnaryPlus, Expect::Term)
                }
            }
            b'+' => match c1 {
                b'+' => self.punct(mark, 2, TokenKind::Inc, Expect::Operator),
                b'=' => self.assign(mark, 2, AssignOp::Add),
                _ => self.punct(mark, 1, TokenKind::Plus, Expect::Term),
            },
            b'*' => match (c1, c2) {
                (b'*', b'=') => self.assign(mark, 3, AssignOp::Pow),
                (b'*', _) => self.punct(mark, 2, TokenKind::Pow, Expect::Term),
                (b'=', _) => self.assign(mark, 2, AssignOp::Mul),
                _ => self.punct(mark, 1, TokenKind::Star, Expect::Term),
            },
            b'%' => match c1 {
                b'=' => self.assign(mark, 2, AssignOp::Mod),
                _ => self.punct(mark, 1, TokenKind::Percent, Expect::Term),
            },
            b'&' => match (c1, c2) {
                (b'&', b'=') => self.assign(mark, 3, AssignOp::AndAnd),
                (b'&', _) => self.punct(mark, 2, TokenKind::AndAnd, Expect::Term),
                (b'=', _) => self.assign(mark, 2, AssignOp::BitAnd),
                _ => self.punct(mark, 1, TokenKind::BitAnd, Expect::Term),
            },
            b'/' if term => return self.lex_slash_pattern(mark),
            b'/' => match (c1, c2) {
                (b'/', b'=') => self.assign(mark, 3, AssignOp::DefinedOr),
                (b'/', _) => self.punct(mark, 2, TokenKind::DefinedOr, Expect::Term),
                (b'=', _) => self.assign(mark, 2, AssignOp::Div),
                _ => self.punct(mark, 1, TokenKind::Slash, Expect::Term),
            },
            b'?' if term => {
                let span = Span::new(mark.pos, mark.pos.saturating_add(1));
                self.report(LexError::new(
                    span,
                    LexErrorKind::Deprecated {
                        what: "?PATTERN? without the m operator",
                    },
                ))?;
                return self.lex_slash_pattern(mark);
            }
            b'?' => self.punct(mark, 1, TokenKind::Question, Expect::Term),
            b'.' if term && c1.is_ascii_digit() => return self.lex_number(mark, false),
            b'.' => match (c1, c2) {
                (b'.', b'.') => self.punct(mark, 3, TokenKind::Ellipsis, Expect::Operator),
                (b'.', _) => self.punct(mark, 2, TokenKind::Range, Expect::Term),
                (b'=', _) => self.assign(mark, 2, AssignOp::Concat),
                _ => self.punct(mark, 1, TokenKind::Dot, Expect::Term),
            },
            b'<' if term => return self.lex_angle(mark),
            b'<' => match (c1, c2) {
                (b'=', b'>') => self.punct(mark, 3, TokenKind::NumCmp, Expect::Term),
                (b'<', b'=') => self.assign(mark, 3, AssignOp::ShiftLeft),
                (b'<', _) => self.punct(mark, 2, TokenKind::ShiftLeft, Expect::Term),
                (b'=', _) => self.punct(mark, 2, TokenKind::Le, Expect::Term),
                _ => self.punct(mark, 1, TokenKind::Lt, Expect::Term),
            },
            b'>' => match (c1, c2) {
                (b'>', b'=') => self.assign(mark, 3, AssignOp::ShiftRight),
                (b'>', _) => self.punct(mark, 2, TokenKind::ShiftRight, Expect::Term),
                (b'=', _) => self.punct(mark, 2, TokenKind::Ge, Expect::Term),
                _ => self.punct(mark, 1, TokenKind::Gt, Expect::Term),
            },
            b'=' => match c1 {
                b'=' => self.punct(mark, 2, TokenKind::NumEq, Expect::Term),
                b'>' => self.punct(mark, 2, TokenKind::FatComma, Expect::Term),
                b'~' => self.punct(mark, 2, TokenKind::Match, Expect::Term),
                _ => self.punct(mark, 1, TokenKind::Assign, Expect::Term),
            },
            b'!' => match c1 {
                b'=' => self.punct(mark, 2, TokenKind::NumNe, Expect::Term),
                b'~' => self.punct(mark, 2, TokenKind::NotMatch, Expect::Term),
                _ => self.punct(mark, 1, TokenKind::Not, Expect::Term),
            },
            b'~' => match c1 {
                b'~' => self.punct(mark, 2, TokenKind::SmartMatch, Expect::Term),
                _ => self.punct(mark, 1, TokenKind::BitNot, Expect::Term),
            },
            b'|' => match (c1, c2) {
                (b'|', b'=') => self.assign(mark, 3, AssignOp::OrOr),
                (b'|', _) => self.punct(mark, 2, TokenKind::OrOr, Expect::Term),
                (b'=', _) => self.assign(mark, 2, AssignOp::BitOr),
                _ => self.punct(mark, 1, TokenKind::BitOr, Expect::Term),
            },
            b'^' => match c1 {
                b'=' => self.assign(mark, 2, AssignOp::BitXor),
                _ => self.punct(mark, 1, TokenKind::BitXor, Expect::Term),
            },
            b',' => self.punct(mark, 1, TokenKind::Comma, Expect::Term),
            b';' => {
                self.block_resume = None;
                self.punct(mark, 1, TokenKind::Semicolon, Expect::Statement)
            }
            b':' => {
                // Sub attributes keep the body block expected.
                let next = if self.expect.current() == Expect::AttrBlock {
                    Expect::AttrBlock
                } else {
                    Expect::Term
                };
                self.punct(mark, 1, TokenKind::Colon, next)
            }
            b'\\' => self.punct(mark, 1, TokenKind::Backslash, Expect::Term),
            _ => return self.unrecognized(mark),
        };
        Ok(step)
    }
}
