//! Quote-like constructs: `'...'`, `"..."`, backticks, `q qq qw qx m qr s tr y`,
//! `/.../`, `<...>` and heredocs.
//!
//! Bodies are read by the delimited scanner. Interpolating bodies either
//! cook to a single `Str` or are handed to the sub-lexer.

use plx_ir::{Span, TokenKind, TokenValue};
use plx_lexer_core::char_class;
use smallvec::smallvec;

use super::{LexerSession, Mark, Step, Tokens};
use crate::delimited::{self, DelimScan, Delimited};
use crate::escape::{self, Stop};
use crate::expect_stack::Expect;
use crate::heredoc::{self, HeredocBody, HeredocError, HeredocQuote, HeredocSpec, HeredocTag};
use crate::keywords::QuoteOp;
use crate::lex_error::{LexError, LexErrorKind};

/// Absolute offset of the first body byte after the opening delimiter.
fn body_base(d: &Delimited) -> u32 {
    let width = u32::try_from(d.open.len_utf8()).unwrap_or(1);
    d.open_pos.saturating_add(width)
}

impl LexerSession<'_> {
    fn scan_delimited(&mut self, keep_bracketed_quoted: bool) -> Result<Delimited, LexError> {
        Ok(delimited::scan(&mut self.buf, false, keep_bracketed_quoted)?)
    }

    pub(super) fn lex_single_quoted(&mut self, mark: Mark) -> Result<Step, LexError> {
        let d = self.scan_delimited(self.options.keep_bracketed_quoted)?;
        let text = escape::single_quote(&d.text);
        Ok(self.emit(mark, TokenKind::Str, TokenValue::str(text), Expect::Operator))
    }

    pub(super) fn lex_double_quoted(&mut self, mark: Mark) -> Result<Step, LexError> {
        let d = self.scan_delimited(self.options.keep_bracketed_quoted)?;
        let tokens = self.interpolated(mark, &d.text, body_base(&d), d.start_line, TokenKind::Stringify)?;
        Ok(self.emit_all(tokens))
    }

    pub(super) fn lex_backtick(&mut self, mark: Mark) -> Result<Step, LexError> {
        let d = self.scan_delimited(self.options.keep_bracketed_quoted)?;
        let tokens = self.interpolated(mark, &d.text, body_base(&d), d.start_line, TokenKind::Readpipe)?;
        Ok(self.emit_all(tokens))
    }

    /// Interpolating text: one cooked `Str` when nothing interpolates,
    /// otherwise `wrapper ( ...parts... )` through the sub-lexer.
    ///
    /// `Readpipe` is always wrapped so the command stays recognizable.
    pub(super) fn interpolated(
        &mut self,
        mark: Mark,
        text: &str,
        base: u32,
        line: u32,
        wrapper: TokenKind,
    ) -> Result<Tokens, LexError> {
        let cooked = escape::cook_run(text, true);
        if cooked.stop != Stop::End {
            return Ok(self.enter_sublex(mark, text, base, line, wrapper));
        }
        self.report_escape_issues(cooked.issues, base)?;
        self.expect.set(Expect::Operator);
        let lit = self.make(mark, TokenKind::Str, TokenValue::str(cooked.text));
        if wrapper == TokenKind::Readpipe {
            let open = self.synthetic(mark, TokenKind::Readpipe);
            let lparen = self.synthetic(mark, TokenKind::LParen);
            let rparen = self.synthetic(mark, TokenKind::RParen);
            return Ok(smallvec![open, lparen, lit, rparen]);
        }
        Ok(smallvec![lit])
    }

    /// Quote-like operator whose keyword was just consumed.
    pub(super) fn lex_quote_op(&mut self, mark: Mark, op: QuoteOp) -> Result<Step, LexError> {
        let keep = self.options.keep_bracketed_quoted;
        match op {
            QuoteOp::Q => self.lex_single_quoted(mark),
            QuoteOp::Qq => self.lex_double_quoted(mark),
            QuoteOp::Qx => self.lex_backtick(mark),
            QuoteOp::Qw => {
                let d = self.scan_delimited(keep)?;
                let tokens = self.word_list(mark, &d.text);
                self.expect.set(Expect::Operator);
                Ok(self.emit_all(tokens))
            }
            QuoteOp::M | QuoteOp::Qr => {
                let d = self.scan_delimited(true)?;
                self.pattern_tokens(mark, d.text)
            }
            QuoteOp::S => self.lex_substitution(mark),
            QuoteOp::Tr => self.lex_transliteration(mark),
        }
    }

    /// `/.../` or `?...?` where a term is expected.
    pub(super) fn lex_slash_pattern(&mut self, mark: Mark) -> Result<Step, LexError> {
        let d = self.scan_delimited(true)?;
        self.pattern_tokens(mark, d.text)
    }

    /// `qw` list: `( Const , Const ... )`.
    fn word_list(&mut self, mark: Mark, text: &str) -> Tokens {
        let mut tokens = Tokens::new();
        tokens.push(self.make(mark, TokenKind::LParen, TokenValue::None));
        for (i, word) in text.split_whitespace().enumerate() {
            if i > 0 {
                tokens.push(self.make(mark, TokenKind::Comma, TokenValue::None));
            }
            let word = escape::single_quote(word);
            tokens.push(self.make(mark, TokenKind::Const, TokenValue::str(word)));
        }
        tokens.push(self.make(mark, TokenKind::RParen, TokenValue::None));
        tokens
    }

    /// Modifier letters directly after a pattern.
    fn pattern_flags(&mut self) -> Result<Option<String>, LexError> {
        let start = self.buf.cursor();
        self.ensure_run(start, |b| b.is_ascii_alphabetic())?;
        let mut end = start;
        while self.buf.byte_at(end).is_ascii_alphabetic() {
            end += 1;
        }
        if end == start {
            return Ok(None);
        }
        let flags = self.buf.text(start, end);
        self.buf.advance_to(end);
        Ok(Some(flags))
    }

    fn push_flags(&mut self, mark: Mark, tokens: &mut Tokens) -> Result<(), LexError> {
        if let Some(flags) = self.pattern_flags()? {
            tokens.push(self.make(mark, TokenKind::PatternFlags, TokenValue::str(flags)));
        }
        Ok(())
    }

    fn pattern_tokens(&mut self, mark: Mark, text: String) -> Result<Step, LexError> {
        let mut tokens: Tokens = smallvec![self.make(mark, TokenKind::Pattern, TokenValue::str(text))];
        self.push_flags(mark, &mut tokens)?;
        self.expect.set(Expect::Operator);
        Ok(self.emit_all(tokens))
    }

    /// The second part of `s///` or `tr///`.
    ///
    /// Unpaired delimiters share the middle one; paired ones open a new
    /// delimited body, possibly with whitespace in between. Returns the text
    /// and the absolute offset of its first byte.
    fn second_part(&mut self, first: &Delimited, keep: bool) -> Result<(String, u32), LexError> {
        if first.open == first.close {
            let base = self.buf.position();
            let mut desc = DelimScan::new(first.open, first.start_line, first.open_pos)
                .with_keep_bracketed_quoted(keep);
            return Ok((delimited::scan_body(&mut self.buf, &mut desc)?, base));
        }
        delimited::skip_space(&mut self.buf)?;
        let second = delimited::scan(&mut self.buf, false, keep)?;
        let base = body_base(&second);
        Ok((second.text, base))
    }

    fn lex_substitution(&mut self, mark: Mark) -> Result<Step, LexError> {
        let first = self.scan_delimited(true)?;
        let (replacement, _) = self.second_part(&first, true)?;
        let mut tokens: Tokens = smallvec![
            self.make(mark, TokenKind::Subst, TokenValue::str(first.text)),
            self.make(mark, TokenKind::SubstReplacement, TokenValue::str(replacement)),
        ];
        self.push_flags(mark, &mut tokens)?;
        self.expect.set(Expect::Operator);
        Ok(self.emit_all(tokens))
    }

    fn lex_transliteration(&mut self, mark: Mark) -> Result<Step, LexError> {
        let first = self.scan_delimited(true)?;
        let (second, second_base) = self.second_part(&first, true)?;
        let span = Span::new(mark.pos, self.buf.position());
        let mut sides = Vec::with_capacity(2);
        for (text, base) in [(&first.text, body_base(&first)), (&second, second_base)] {
            match escape::expand_tr(text) {
                Ok((expanded, issues)) => {
                    self.report_escape_issues(issues, base)?;
                    sides.push(expanded);
                }
                Err(LexErrorKind::InvalidTransRange { low, high }) => {
                    return Err(LexError::invalid_trans_range(span, low, high));
                }
                Err(kind) => return Err(LexError::new(span, kind)),
            }
        }
        let replacement = sides.pop().unwrap_or_default();
        let search = sides.pop().unwrap_or_default();
        let mut tokens: Tokens = smallvec![
            self.make(mark, TokenKind::Trans, TokenValue::str(search)),
            self.make(mark, TokenKind::TransReplacement, TokenValue::str(replacement)),
        ];
        self.push_flags(mark, &mut tokens)?;
        self.expect.set(Expect::Operator);
        Ok(self.emit_all(tokens))
    }

    // ─── `<` in term position ───

    /// `<<>>`, heredocs, `<FH>`, `<$fh>`, `<>` and `<glob*>`.
    pub(super) fn lex_angle(&mut self, mark: Mark) -> Result<Step, LexError> {
        let at = self.buf.cursor();
        self.buf.ensure(4)?;
        if self.buf.peek(1) == b'<' {
            if self.buf.bytes(at, at + 4) == b"<<>>" {
                self.buf.advance(4);
                return Ok(self.emit(mark, TokenKind::ReadLine, TokenValue::str("<>"), Expect::Operator));
            }
            let line = self.buf.line();
            if let Some(tag) = heredoc::parse_tag(&mut self.buf, at, line)? {
                return self.lex_heredoc(mark, tag);
            }
            self.buf.advance(2);
            return Ok(self.emit(mark, TokenKind::ShiftLeft, TokenValue::None, Expect::Term));
        }

        let line_end = self.buf.line_end_from(at)?.unwrap_or(at + 1);
        let close = self.buf.find_byte(at + 1, b'>').filter(|&c| c < line_end);
        let Some(close) = close else {
            self.buf.advance(1);
            return Ok(self.emit(mark, TokenKind::Lt, TokenValue::None, Expect::Term));
        };
        let content = self.buf.text(at + 1, close);
        let handle = content.strip_prefix('$').unwrap_or(&content);
        let is_handle = handle.is_empty()
            || (handle.starts_with(char_class::is_ident_start)
                && handle.chars().all(|c| c == ':' || char_class::is_ident_continue(c)));
        let kind = if is_handle {
            TokenKind::ReadLine
        } else {
            TokenKind::GlobPattern
        };
        self.buf.advance_to(close + 1);
        Ok(self.emit(mark, kind, TokenValue::str(content), Expect::Operator))
    }

    // ─── Heredocs ───

    fn lex_heredoc(&mut self, mark: Mark, tag: HeredocTag) -> Result<Step, LexError> {
        let span = Span::new(mark.pos, self.buf.position_of(tag.end));
        if tag.empty_tag {
            self.report(LexError::new(
                span,
                LexErrorKind::Deprecated {
                    what: "a here-doc without a terminator",
                },
            ))?;
        }
        let spec = tag.spec;
        let body = self
            .heredoc_body(tag.end, &spec)
            .map_err(|err| heredoc_error(err, span, &spec))?;
        self.buf.advance_to(tag.end);
        let tokens = match spec.quote {
            HeredocQuote::Single => {
                self.expect.set(Expect::Operator);
                smallvec![self.make(mark, TokenKind::Str, TokenValue::str(body.text))]
            }
            HeredocQuote::Bare | HeredocQuote::Double => {
                self.interpolated(mark, &body.text, body.base, body.line, TokenKind::Stringify)?
            }
            HeredocQuote::Backtick => {
                self.interpolated(mark, &body.text, body.base, body.line, TokenKind::Readpipe)?
            }
        };
        Ok(self.emit_all(tokens))
    }

    /// Find and cut out the body.
    ///
    /// Inside interpolated text with no line break left, the body lives in
    /// the nearest enclosing buffer that still has one (the top-level buffer
    /// last).
    fn heredoc_body(&mut self, after: usize, spec: &HeredocSpec) -> Result<HeredocBody, HeredocError> {
        let here_has_line = self.buf.find_byte(self.buf.cursor(), b'\n').is_some();
        if self.sublex.is_empty() || here_has_line {
            let body = heredoc::read_body(&mut self.buf, after, spec)?;
            tracing::trace!(strategy = if body.refilled { "stream" } else { "window" }, "heredoc");
            return Ok(body);
        }
        let ancestor = self
            .sublex
            .iter()
            .rposition(|ctx| ctx.buf.find_byte(ctx.buf.cursor(), b'\n').is_some())
            .unwrap_or(0);
        tracing::trace!(strategy = "ancestor", depth = ancestor, "heredoc");
        let Some(ctx) = self.sublex.get_mut(ancestor) else {
            return Err(HeredocError::Unterminated);
        };
        let from = ctx.buf.cursor();
        heredoc::read_body(&mut ctx.buf, from, spec)
    }
}

fn heredoc_error(err: HeredocError, span: Span, spec: &HeredocSpec) -> LexError {
    match err {
        HeredocError::Unterminated => {
            LexError::unterminated_heredoc(span, &spec.terminator, spec.origin_line)
        }
        HeredocError::Indent { line } => LexError::heredoc_indent(span, line, spec.origin_line),
        HeredocError::Buffer(err) => err.into(),
    }
}
