//! Identifiers, keywords and barewords.
//!
//! Resolution order for a word: repetition operator, `word =>`, version
//! string, method name after `->`, label, lexical sub, keyword, and finally
//! the bareword heuristic that tells function calls from indirect-object
//! method calls (`new Foo(...)`).

use plx_ir::{AssignOp, Span, TokenKind, TokenValue};
use smallvec::smallvec;

use super::{LexerSession, Mark, Step, Tokens};
use crate::expect_stack::Expect;
use crate::ident;
use crate::keywords::{KeywordFlags, KeywordInfo, KeywordKind, Marker};
use crate::lex_error::LexError;
use crate::numeric;

/// `x`, `x3`: the repetition operator and an optional count.
fn is_repetition(word: &str) -> bool {
    word.strip_prefix('x')
        .is_some_and(|count| count.bytes().all(|b| b.is_ascii_digit()))
}

/// `v1`, `v65`: start of a version string.
fn is_vstring_word(word: &str) -> bool {
    word.strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

impl LexerSession<'_> {
    pub(super) fn lex_word(&mut self, mark: Mark, declaring: bool) -> Result<Step, LexError> {
        let start = self.buf.cursor();
        let end = ident::scan_word(&mut self.buf, start, true)?;
        let word = self.buf.text(start, end);
        let expect = self.expect.current();

        if expect == Expect::Operator && is_repetition(&word) {
            self.buf.advance(1);
            if word == "x" && self.buf.current() == b'=' && !matches!(self.buf.peek(1), b'=' | b'~') {
                self.buf.advance(1);
                return Ok(self.emit(mark, TokenKind::AssignOp(AssignOp::Repeat), TokenValue::None, Expect::Term));
            }
            return Ok(self.emit(mark, TokenKind::Repeat, TokenValue::None, Expect::Term));
        }

        if self.fat_comma_follows(end)? {
            self.buf.advance_to(end);
            return Ok(self.emit(mark, TokenKind::Const, TokenValue::str(word), Expect::Operator));
        }

        if expect.wants_term() && is_vstring_word(&word) {
            self.ensure_run(start, |b| b.is_ascii_digit() || matches!(b, b'v' | b'.' | b'_'))?;
            let scan = numeric::scan_vstring(self.buf.rest());
            if let numeric::NumberLiteral::VString(text) = scan.literal {
                self.buf.advance(scan.len);
                return Ok(self.emit(mark, TokenKind::VString, TokenValue::str(text), Expect::Operator));
            }
        }

        match expect {
            // Method name.
            Expect::Ref => {
                self.buf.advance_to(end);
                let value = self.ident(&word);
                return Ok(self.emit(mark, TokenKind::Word, value, Expect::Operator));
            }
            // Sub attribute.
            Expect::AttrBlock if !self.keywords.contains(&word) => {
                self.buf.advance_to(end);
                let value = self.ident(&word);
                return Ok(self.emit(mark, TokenKind::Word, value, Expect::AttrBlock));
            }
            Expect::Statement if !word.contains("::") && !self.keywords.contains(&word) => {
                let colon = self.skip_hspace_from(end)?;
                self.buf.ensure_offset(colon + 1)?;
                if self.buf.byte_at(colon) == b':' && self.buf.byte_at(colon + 1) != b':' {
                    let value = self.ident(&word);
                    let tok = self.token_at(start, end, TokenKind::Label, value);
                    self.buf.advance_to(colon + 1);
                    self.expect.set(Expect::Statement);
                    return Ok(Step::Token(tok));
                }
            }
            _ => {}
        }

        let name = self.interner.intern(&word);
        if self.lexical_subs.iter().any(|&(sub, _)| sub == name) {
            self.buf.advance_to(end);
            return Ok(self.emit(mark, TokenKind::LexSubCall, TokenValue::Ident(name), Expect::Term));
        }

        if let Some(info) = self.keywords.get(&word).copied() {
            if let Some(step) = self.keyword(mark, &word, info, end, declaring)? {
                return Ok(step);
            }
        }

        self.bareword(mark, &word, end)
    }

    /// Is `=>` the next thing after `off`?
    fn fat_comma_follows(&mut self, off: usize) -> Result<bool, LexError> {
        let pos = self.skip_blank_from(off)?;
        self.buf.ensure_offset(pos + 1)?;
        Ok(self.buf.byte_at(pos) == b'=' && self.buf.byte_at(pos + 1) == b'>')
    }

    /// Returns `None` when the keyword is read as a plain bareword here.
    fn keyword(
        &mut self,
        mark: Mark,
        word: &str,
        info: KeywordInfo,
        end: usize,
        declaring: bool,
    ) -> Result<Option<Step>, LexError> {
        let expect = self.expect.current();
        match info.kind {
            KeywordKind::Operator(kind) => {
                if expect != Expect::Operator && kind != TokenKind::LowNot {
                    return Ok(None);
                }
                self.buf.advance_to(end);
                Ok(Some(self.emit(mark, kind, TokenValue::None, info.next)))
            }
            KeywordKind::Quote(op) => {
                if !expect.wants_term() {
                    return Ok(None);
                }
                self.buf.advance_to(end);
                self.lex_quote_op(mark, op).map(Some)
            }
            KeywordKind::Marker(marker) => {
                self.buf.advance_to(end);
                let (kind, value) = match marker {
                    Marker::End | Marker::Data => {
                        self.ended = true;
                        tracing::debug!(line = mark.line, "end of code marker");
                        (TokenKind::Eof, TokenValue::None)
                    }
                    Marker::Line => (TokenKind::Int, TokenValue::Int(i64::from(mark.line))),
                    Marker::File => (TokenKind::Const, TokenValue::str(self.options.file_name.clone())),
                    Marker::Package => {
                        let package = self.interner.lookup(self.package);
                        (TokenKind::Const, TokenValue::str(package))
                    }
                };
                Ok(Some(self.emit(mark, kind, value, info.next)))
            }
            KeywordKind::Sub => self.lex_sub(mark, end, declaring).map(Some),
            KeywordKind::Format if expect == Expect::Statement => self.lex_format_decl(mark, end).map(Some),
            KeywordKind::Format => Ok(None),
            KeywordKind::Named => self.named_keyword(mark, word, info, end).map(Some),
        }
    }

    fn named_keyword(&mut self, mark: Mark, word: &str, info: KeywordInfo, end: usize) -> Result<Step, LexError> {
        self.buf.advance_to(end);
        let value = self.ident(word);
        let kw = self.make(mark, TokenKind::Keyword, value);
        self.expect.set(info.next);
        if info.next == Expect::Block {
            let resume = if info.flags.contains(KeywordFlags::BLOCK_ENDS_STATEMENT) {
                Expect::Statement
            } else if info.flags.contains(KeywordFlags::BLOCK_THEN_TERM) {
                Expect::Term
            } else {
                Expect::Operator
            };
            self.block_resume = Some(resume);
        }
        if info.flags.contains(KeywordFlags::DECLARATOR) {
            self.declarator_pending = true;
        }
        let mut tokens: Tokens = smallvec![kw];
        if info.flags.contains(KeywordFlags::TAKES_PACKAGE) {
            let at = self.skip_hspace_from(self.buf.cursor())?;
            if ident::starts_ident(&mut self.buf, at)? {
                let name_end = ident::scan_word(&mut self.buf, at, true)?;
                let text = self.buf.text(at, name_end);
                let name = self.interner.intern(text.trim_end_matches("::"));
                self.known_packages.insert(name);
                if word == "package" {
                    self.package = name;
                }
                tokens.push(self.token_at(at, name_end, TokenKind::Word, TokenValue::Ident(name)));
                self.buf.advance_to(name_end);
                self.expect.set(info.next);
            }
        }
        Ok(self.emit_all(tokens))
    }

    /// `sub NAME` or an anonymous `sub`.
    fn lex_sub(&mut self, mark: Mark, end: usize, declaring: bool) -> Result<Step, LexError> {
        self.buf.advance_to(end);
        let value = self.ident("sub");
        let mut tokens: Tokens = smallvec![self.make(mark, TokenKind::Keyword, value)];
        let at = self.skip_blank_from(self.buf.cursor())?;
        let named = ident::starts_ident(&mut self.buf, at)? || ident::at_package_sep(&mut self.buf, at)?;
        if named {
            let name_end = ident::scan_word(&mut self.buf, at, true)?;
            let text = self.buf.text(at, name_end);
            let name = self.interner.intern(&text);
            if declaring {
                self.lexical_subs.push((name, self.expect.depth()));
            } else {
                self.known_subs.insert(name);
            }
            self.buf.advance_to(at);
            tokens.push(self.token_at(at, name_end, TokenKind::Word, TokenValue::Ident(name)));
            self.buf.advance_to(name_end);
            tracing::trace!(sub = %text, lexical = declaring, "sub declared");
        }
        self.sub_named = named;
        self.expect.set(Expect::AttrBlock);
        Ok(self.emit_all(tokens))
    }

    /// Bareword heuristic.
    fn bareword(&mut self, mark: Mark, word: &str, end: usize) -> Result<Step, LexError> {
        self.buf.advance_to(end);

        // `Foo::` names a package.
        if let Some(package) = word.strip_suffix("::").filter(|p| !p.is_empty()) {
            let name = self.interner.intern(package);
            self.known_packages.insert(name);
            return Ok(self.emit(mark, TokenKind::Const, TokenValue::str(package), Expect::Operator));
        }

        let name = self.interner.intern(word);
        let known = self.known_subs.contains(&name);
        let next_at = self.skip_blank_from(end)?;
        let next = self.buf.byte_at(next_at);

        if next == b'(' {
            let kind = if known { TokenKind::FuncCall } else { TokenKind::Word };
            return Ok(self.emit(mark, kind, TokenValue::Ident(name), Expect::Operator));
        }

        if ident::starts_ident(&mut self.buf, next_at)? {
            let class_end = ident::scan_word(&mut self.buf, next_at, true)?;
            let class = self.buf.text(next_at, class_end);
            let class_name = self.interner.intern(class.trim_end_matches("::"));
            let not_method = self.keywords.contains(&class)
                || self.known_subs.contains(&class_name)
                || self.fat_comma_follows(class_end)?;
            let method = class.ends_with("::")
                || self.known_packages.contains(&class_name)
                || !known;
            if !not_method && method {
                let call = self.make(mark, TokenKind::MethodCall, TokenValue::Ident(name));
                self.buf.advance_to(next_at);
                let class_tok = self.token_at(next_at, class_end, TokenKind::Word, TokenValue::Ident(class_name));
                self.buf.advance_to(class_end);
                self.expect.set(Expect::Operator);
                return Ok(self.emit_all(smallvec![call, class_tok]));
            }
        }

        if !known && matches!(next, b'$' | b'{') {
            let after = if next == b'$' { Expect::Term } else { Expect::Block };
            return Ok(self.emit(mark, TokenKind::MethodCall, TokenValue::Ident(name), after));
        }

        if known {
            return Ok(self.emit(mark, TokenKind::FuncCall, TokenValue::Ident(name), Expect::Term));
        }

        let at_value_end = matches!(next, b';' | b',' | b')' | b'}' | b']')
            || (next_at >= self.buf.end() && self.buf.stream_exhausted());
        if self.options.strict_barewords && at_value_end {
            let span = Span::new(mark.pos, self.buf.position());
            self.report(LexError::strict_bareword(span, word))?;
        }
        Ok(self.emit(mark, TokenKind::Word, TokenValue::Ident(name), Expect::Operator))
    }
}
