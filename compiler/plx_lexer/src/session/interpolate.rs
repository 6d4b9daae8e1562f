//! The interpolation states of the sub-lexer.
//!
//! Interpolated text becomes an expression: `"a $x b"` is lexed as
//! `Stringify ( "a " . $x . " b" )`, `"@a"` as `join ( $" , @a )` and
//! `"\Ux\E"` as `uc ( "x" )`.

use plx_ir::{CaseMod, Sigil, Span, TokenKind, TokenValue};
use plx_lexer_core::char_class;

use super::{InterpState, LexerMode, LexerSession, Mark, Step, Tokens};
use crate::escape::{self, Stop};
use crate::expect_stack::Expect;
use crate::lex_error::{LexError, LexErrorContext};

impl LexerSession<'_> {
    fn interp_state(&mut self) -> &mut InterpState {
        self.interp.get_or_insert_with(|| InterpState::new(TokenKind::Stringify))
    }

    /// `Dot` when a part was already emitted.
    fn concat_if_needed(&mut self, mark: Mark, tokens: &mut Tokens) {
        if self.interp_state().need_concat {
            tokens.push(self.synthetic(mark, TokenKind::Dot));
        }
    }

    /// Literal run up to the next interpolation, case modifier or the end.
    pub(super) fn interp_concat(&mut self) -> Result<Step, LexError> {
        let mark = self.mark();
        let from = self.buf.cursor();
        let text = self.buf.text(from, self.buf.end());
        let cooked = escape::cook_run(&text, true);
        self.report_escape_issues(cooked.issues, mark.pos)?;
        self.buf.advance(cooked.consumed);

        self.set_mode(match cooked.stop {
            Stop::End => LexerMode::InterpolationEnd,
            Stop::Interpolate => LexerMode::InterpolationStart,
            Stop::CaseMod => LexerMode::InterpolationCaseMod,
        });
        if cooked.text.is_empty() {
            return Ok(Step::Continue);
        }
        let mut tokens = Tokens::new();
        self.concat_if_needed(mark, &mut tokens);
        tokens.push(self.make(mark, TokenKind::Str, TokenValue::str(cooked.text)));
        self.interp_state().need_concat = true;
        Ok(self.emit_all(tokens))
    }

    /// `$name`, `@name`, `${ expr }`, `$$ref` ... at the cursor.
    pub(super) fn interp_start(&mut self) -> Result<Step, LexError> {
        let mark = self.mark();
        self.buf.ensure(3)?;
        let (sigil, sigil_len) = match (self.buf.current(), self.buf.peek(1)) {
            (b'@', _) => (Sigil::Array, 1),
            (b'$', b'#')
                if matches!(self.buf.peek(2), b'{' | b'$')
                    || char_class::is_ident_start_byte(self.buf.peek(2)) =>
            {
                (Sigil::ArrayLen, 2)
            }
            _ => (Sigil::Scalar, 1),
        };

        let mut tokens = Tokens::new();
        self.concat_if_needed(mark, &mut tokens);
        let join = sigil == Sigil::Array;
        if join {
            tokens.push(self.synthetic(mark, TokenKind::Join));
            tokens.push(self.synthetic(mark, TokenKind::LParen));
            let separator = self.ident("\"");
            tokens.push(self.synthetic_with(mark, TokenKind::Var(Sigil::Scalar), separator));
            tokens.push(self.synthetic(mark, TokenKind::Comma));
        }

        let depth = self.expect.depth();
        self.expect.set(Expect::Term);
        let Some(mut var) = self.var_after_sigil(mark, sigil, sigil_len)? else {
            // Not a variable after all: the sigil is literal text.
            let mut tokens = Tokens::new();
            self.concat_if_needed(mark, &mut tokens);
            let sigil_text = self.buf.text(self.buf.cursor(), self.buf.cursor() + 1);
            self.buf.advance(1);
            tokens.push(self.make(mark, TokenKind::Str, TokenValue::str(sigil_text)));
            self.interp_state().need_concat = true;
            self.set_mode(LexerMode::InterpolationConcat);
            return Ok(self.emit_all(tokens));
        };
        // `$$$x`: each `$` before the name is one more dereference.
        while var.last().is_some_and(|t| matches!(t.kind, TokenKind::Deref(_)))
            && self.buf.current() == b'$'
        {
            let inner = self.mark();
            match self.var_after_sigil(inner, Sigil::Scalar, 1)? {
                Some(more) => var.extend(more),
                None => break,
            }
        }
        if let Some(last) = var.last() {
            self.last_kind = Some(last.kind);
        }
        tokens.extend(var);

        let state = self.interp_state();
        state.join_open = join;
        state.expr_depth = Some(depth);
        self.expect.set(Expect::Operator);
        if self.expect.depth() > depth {
            // `${ expr }` or `@{ expr }`: lex the block as code.
            self.expect.set(Expect::Statement);
            self.set_mode(LexerMode::Normal);
        } else {
            self.set_mode(LexerMode::InterpolationEndMaybe);
        }
        Ok(self.emit_all(tokens))
    }

    /// `\U`, `\L`, `\u`, `\l`, `\Q`, `\F` or `\E` at the cursor.
    pub(super) fn interp_case_mod(&mut self) -> Result<Step, LexError> {
        let mark = self.mark();
        self.buf.ensure(2)?;
        let letter = self.buf.peek(1);
        self.buf.advance(2);
        self.set_mode(LexerMode::InterpolationConcat);

        let Some(modifier) = CaseMod::from_escape(letter) else {
            // `\E`: close the innermost modifier, if any.
            if self.interp_state().case_mods.pop().is_none() {
                return Ok(Step::Continue);
            }
            self.interp_state().need_concat = true;
            return Ok(Step::Token(self.synthetic(mark, TokenKind::RParen)));
        };
        let mut tokens = Tokens::new();
        self.concat_if_needed(mark, &mut tokens);
        let name = self.ident(modifier.function_name());
        tokens.push(self.make(mark, TokenKind::CaseMod(modifier), name));
        tokens.push(self.synthetic(mark, TokenKind::LParen));
        let state = self.interp_state();
        state.case_mods.push(modifier);
        state.need_concat = false;
        tracing::trace!(?modifier, open = state.case_mods.len(), "case modifier");
        Ok(self.emit_all(tokens))
    }

    /// After an interpolated variable: continue with a subscript or method
    /// arrow, or go back to literal text.
    pub(super) fn interp_end_maybe(&mut self) -> Result<Step, LexError> {
        self.buf.ensure(3)?;
        let (b, c1, c2) = (self.buf.current(), self.buf.peek(1), self.buf.peek(2));
        let continues = match b {
            b'[' => c1.is_ascii_digit() || matches!(c1, b'$' | b'-'),
            b'{' => self.buf.find_byte(self.buf.cursor(), b'}').is_some(),
            b'-' => c1 == b'>' && matches!(c2, b'[' | b'{'),
            _ => false,
        };
        if continues {
            self.expect.set(Expect::Operator);
            self.set_mode(LexerMode::Normal);
            return Ok(Step::Continue);
        }

        let mark = self.mark();
        let state = self.interp_state();
        let close_join = std::mem::take(&mut state.join_open);
        state.need_concat = true;
        state.expr_depth = None;
        self.set_mode(LexerMode::InterpolationConcat);
        if close_join {
            return Ok(Step::Token(self.synthetic(mark, TokenKind::RParen)));
        }
        Ok(Step::Continue)
    }

    /// End of the interpolated text: close everything still open and return
    /// to the enclosing buffer.
    pub(super) fn interp_end(&mut self) -> Result<Step, LexError> {
        let mark = self.mark();
        let base = self.sublex_base();
        for (open, close) in self.expect.truncate(base) {
            let err = LexError::unclosed_bracket(Span::point(mark.pos), open, close)
                .with_context(LexErrorContext::Interpolation);
            self.report(err)?;
        }
        let state = self.interp.take().unwrap_or_else(|| InterpState::new(TokenKind::Stringify));
        let mut tokens = Tokens::new();
        if state.join_open {
            tokens.push(self.synthetic(mark, TokenKind::RParen));
        }
        for _ in &state.case_mods {
            tokens.push(self.synthetic(mark, TokenKind::RParen));
        }
        tokens.push(self.synthetic(mark, TokenKind::RParen));
        tracing::trace!(wrapper = ?state.wrapper, closed = tokens.len(), "interpolation done");
        self.leave_sublex()?;
        Ok(self.emit_all(tokens))
    }
}
