//! `format NAME =` declarations.
//!
//! Picture lines are taken verbatim. A picture line holding a field (`@` or
//! `^`) is followed by an argument line lexed as code and ended by
//! `FormArgsEnd`; a line with a single `.` ends the format.

use plx_ir::{Span, TokenKind, TokenValue};

use super::{FormatState, LexerMode, LexerSession, Mark, Step, Tokens};
use crate::expect_stack::Expect;
use crate::ident;
use crate::lex_error::LexError;

impl LexerSession<'_> {
    /// `format [NAME] =` up to the end of its line.
    pub(super) fn lex_format_decl(&mut self, mark: Mark, end: usize) -> Result<Step, LexError> {
        self.buf.advance_to(end);
        let value = self.ident("format");
        let mut tokens = Tokens::new();
        tokens.push(self.make(mark, TokenKind::Keyword, value));

        let at = self.skip_hspace_from(self.buf.cursor())?;
        if ident::starts_ident(&mut self.buf, at)? {
            let name_end = ident::scan_word(&mut self.buf, at, true)?;
            let name = self.buf.text(at, name_end);
            let value = self.ident(&name);
            tokens.push(self.token_at(at, name_end, TokenKind::Word, value));
            self.buf.advance_to(name_end);
        }
        let eq = self.skip_hspace_from(self.buf.cursor())?;
        if self.buf.byte_at(eq) == b'=' {
            tokens.push(self.token_at(eq, eq + 1, TokenKind::Assign, TokenValue::None));
        }
        if let Some(line_end) = self.buf.line_end_from(eq)? {
            self.buf.advance_to(line_end);
        }

        self.format = Some(FormatState {
            start_line: mark.line,
            depth: self.expect.depth(),
            in_args: false,
        });
        tracing::debug!(line = mark.line, "format declared");
        self.expect.set(Expect::Statement);
        self.set_mode(LexerMode::FormLine);
        Ok(self.emit_all(tokens))
    }

    /// One line of a format body.
    pub(super) fn lex_form_line(&mut self) -> Result<Step, LexError> {
        let keep = self.buf.cursor();
        self.buf.discard_before(keep);
        let mark = self.mark();
        let start = self.buf.cursor();
        let start_line = self.format.map_or(mark.line, |f| f.start_line);
        let Some(end) = self.buf.line_end_from(start)? else {
            return Err(LexError::unterminated_format(Span::point(mark.pos), start_line));
        };
        let line = self.buf.text(start, end);
        let body = line.strip_suffix('\n').unwrap_or(&line);
        let body = body.strip_suffix('\r').unwrap_or(body);

        if body.trim_end_matches([' ', '\t']) == "." {
            self.buf.advance_to(end);
            self.format = None;
            self.set_mode(LexerMode::Normal);
            return Ok(self.emit(mark, TokenKind::FormEnd, TokenValue::None, Expect::Statement));
        }
        self.buf.advance_to(end);
        if body.starts_with('#') {
            return Ok(Step::Continue);
        }

        let picture = format!("{body}\n");
        let has_fields = body.contains(['@', '^']);
        let tok = self.make(mark, TokenKind::FormLine, TokenValue::str(picture));
        if has_fields {
            if let Some(format) = self.format.as_mut() {
                format.in_args = true;
            }
            self.expect.set(Expect::Term);
            self.set_mode(LexerMode::Normal);
        }
        Ok(Step::Token(tok))
    }
}
