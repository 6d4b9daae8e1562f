//! Bracket and expectation stack.
//!
//! The current expectation decides how ambiguous punctuation is read. Every
//! opening bracket pushes a frame recording its closer and the expectation to
//! resume once it closes.

use std::fmt;

/// What the parser wants next.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Expect {
    /// Start of a statement.
    Statement,
    /// A term (operand).
    Term,
    /// An operator.
    Operator,
    /// A block (`{` opens code, not a hash).
    Block,
    /// Attributes or the body block of a `sub`.
    AttrBlock,
    /// After `->`: a method name, subscript or postfix dereference.
    Ref,
}

impl Expect {
    /// Whether ambiguous punctuation should be read as the start of a term.
    #[inline]
    pub fn wants_term(self) -> bool {
        !matches!(self, Expect::Operator)
    }
}

impl fmt::Display for Expect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Expect::Statement => "statement",
            Expect::Term => "term",
            Expect::Operator => "operator",
            Expect::Block => "block",
            Expect::AttrBlock => "attribute block",
            Expect::Ref => "reference",
        };
        f.write_str(s)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct Frame {
    open: char,
    close: char,
    resume: Expect,
}

/// A closing bracket that does not match the innermost open one.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Mismatch {
    pub found: char,
    /// Closer of the innermost open bracket, if any.
    pub expected: Option<char>,
}

/// Expectation plus the stack of open brackets.
#[derive(Clone, Debug)]
pub struct ExpectationStack {
    current: Expect,
    frames: Vec<Frame>,
    total_opened: u64,
}

impl Default for ExpectationStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpectationStack {
    pub fn new() -> Self {
        ExpectationStack {
            current: Expect::Statement,
            frames: Vec::new(),
            total_opened: 0,
        }
    }

    #[inline]
    pub fn current(&self) -> Expect {
        self.current
    }

    #[inline]
    pub fn set(&mut self, expect: Expect) {
        self.current = expect;
    }

    /// Open `open`; `next` is expected inside, `Operator` after it closes.
    pub fn push(&mut self, open: char, next: Expect) {
        self.push_with_resume(open, next, Expect::Operator);
    }

    /// Open `open` with an explicit expectation for after the close.
    pub fn push_with_resume(&mut self, open: char, next: Expect, resume: Expect) {
        self.frames.push(Frame {
            open,
            close: plx_lexer_core::matching_close(open),
            resume,
        });
        self.total_opened += 1;
        self.current = next;
    }

    /// Close the innermost bracket with `close`.
    ///
    /// On a mismatch the stack is left untouched.
    pub fn pop(&mut self, close: char) -> Result<Expect, Mismatch> {
        match self.frames.last() {
            Some(frame) if frame.close == close => {
                let resume = frame.resume;
                self.frames.pop();
                self.current = resume;
                Ok(resume)
            }
            top => Err(Mismatch {
                found: close,
                expected: top.map(|f| f.close),
            }),
        }
    }

    /// Number of open brackets.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Brackets ever opened; never decreases.
    #[inline]
    pub fn total_opened(&self) -> u64 {
        self.total_opened
    }

    /// Drop frames above `depth`, innermost first, returning their
    /// `(open, close)` pairs.
    pub fn truncate(&mut self, depth: usize) -> Vec<(char, char)> {
        let mut dropped = Vec::new();
        while self.frames.len() > depth {
            if let Some(frame) = self.frames.pop() {
                dropped.push((frame.open, frame.close));
            }
        }
        dropped
    }
}

#[cfg(test)]
mod tests;
