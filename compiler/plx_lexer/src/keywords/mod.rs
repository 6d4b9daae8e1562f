//! Keyword registry.
//!
//! One process-wide, copy-on-write table. Writers (`register_keyword`) clone
//! the current table, insert, and swap the `Arc` under a single
//! `parking_lot::Mutex`. A session locks once at start to take a
//! [`KeywordSnapshot`] and never locks again, so keywords registered later
//! only affect sessions created afterwards.

use std::sync::Arc;

use bitflags::bitflags;
use parking_lot::Mutex;
use plx_ir::TokenKind;
use rustc_hash::FxHashMap;

use crate::expect_stack::Expect;

bitflags! {
    /// Extra behavior attached to a keyword.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct KeywordFlags: u8 {
        /// A `{` after the keyword opens a block that ends the statement.
        const BLOCK_ENDS_STATEMENT = 1 << 0;
        /// The bareword after the keyword names a package or module.
        const TAKES_PACKAGE = 1 << 1;
        /// Declares variables (`my`, `our`, `state`).
        const DECLARATOR = 1 << 2;
        /// A term follows the block (`map { ... } @list`).
        const BLOCK_THEN_TERM = 1 << 3;
    }
}

/// Quote-like operators.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum QuoteOp {
    /// `q//`
    Q,
    /// `qq//`
    Qq,
    /// `qw//`
    Qw,
    /// `qx//`
    Qx,
    /// `m//`
    M,
    /// `qr//`
    Qr,
    /// `s///`
    S,
    /// `tr///`, `y///`
    Tr,
}

/// Compile-time markers.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Marker {
    /// `__END__`
    End,
    /// `__DATA__`
    Data,
    /// `__LINE__`
    Line,
    /// `__FILE__`
    File,
    /// `__PACKAGE__`
    Package,
}

/// How the resolver treats a keyword.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum KeywordKind {
    /// Word operator (`eq`, `and`); only read as one where an operator fits,
    /// except for `not`.
    Operator(TokenKind),
    Quote(QuoteOp),
    Marker(Marker),
    /// `sub`: the next word names a sub.
    Sub,
    /// `format NAME =`
    Format,
    /// Named builtin or control word; emitted as `Keyword`.
    Named,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct KeywordInfo {
    pub kind: KeywordKind,
    /// Expectation after the keyword.
    pub next: Expect,
    pub flags: KeywordFlags,
}

impl KeywordInfo {
    pub const fn new(kind: KeywordKind, next: Expect) -> Self {
        KeywordInfo {
            kind,
            next,
            flags: KeywordFlags::empty(),
        }
    }

    #[must_use]
    pub const fn with_flags(mut self, flags: KeywordFlags) -> Self {
        self.flags = flags;
        self
    }

    /// A named keyword followed by a term.
    pub const fn named() -> Self {
        Self::new(KeywordKind::Named, Expect::Term)
    }
}

pub type KeywordTable = FxHashMap<Box<str>, KeywordInfo>;

static REGISTRY: Mutex<Option<Arc<KeywordTable>>> = Mutex::new(None);

const WORD_OPERATORS: &[(&str, TokenKind)] = &[
    ("lt", TokenKind::StrLt),
    ("gt", TokenKind::StrGt),
    ("le", TokenKind::StrLe),
    ("ge", TokenKind::StrGe),
    ("eq", TokenKind::StrEq),
    ("ne", TokenKind::StrNe),
    ("cmp", TokenKind::StrCmp),
    ("and", TokenKind::LowAnd),
    ("or", TokenKind::LowOr),
    ("xor", TokenKind::LowXor),
    ("not", TokenKind::LowNot),
];

const QUOTE_OPERATORS: &[(&str, QuoteOp)] = &[
    ("q", QuoteOp::Q),
    ("qq", QuoteOp::Qq),
    ("qw", QuoteOp::Qw),
    ("qx", QuoteOp::Qx),
    ("m", QuoteOp::M),
    ("qr", QuoteOp::Qr),
    ("s", QuoteOp::S),
    ("tr", QuoteOp::Tr),
    ("y", QuoteOp::Tr),
];

const MARKERS: &[(&str, Marker)] = &[
    ("__END__", Marker::End),
    ("__DATA__", Marker::Data),
    ("__LINE__", Marker::Line),
    ("__FILE__", Marker::File),
    ("__PACKAGE__", Marker::Package),
];

/// Named builtins and control words followed by a term.
const TERM_WORDS: &[&str] = &[
    "print", "say", "printf", "return", "if", "unless", "while", "until", "elsif", "for",
    "foreach", "last", "next", "redo", "goto", "push", "pop", "shift", "unshift", "splice",
    "keys", "values", "each", "delete", "exists", "defined", "ref", "scalar", "wantarray",
    "die", "warn", "open", "close", "binmode", "join", "split", "reverse", "sprintf", "length",
    "substr", "index", "rindex", "lc", "uc", "lcfirst", "ucfirst", "chomp", "chop", "chr",
    "ord", "abs", "int", "sqrt", "bless", "undef", "local", "wait", "exit", "unlink", "mkdir",
    "opendir", "readdir", "closedir", "sleep", "time", "caller", "lock",
];

/// Words whose `{` opens a block.
const BLOCK_WORDS: &[(&str, KeywordFlags)] = &[
    ("do", KeywordFlags::empty()),
    ("eval", KeywordFlags::empty()),
    ("map", KeywordFlags::BLOCK_THEN_TERM),
    ("grep", KeywordFlags::BLOCK_THEN_TERM),
    ("sort", KeywordFlags::BLOCK_THEN_TERM),
    ("else", KeywordFlags::BLOCK_ENDS_STATEMENT),
    ("continue", KeywordFlags::BLOCK_ENDS_STATEMENT),
    ("BEGIN", KeywordFlags::BLOCK_ENDS_STATEMENT),
    ("END", KeywordFlags::BLOCK_ENDS_STATEMENT),
    ("INIT", KeywordFlags::BLOCK_ENDS_STATEMENT),
    ("CHECK", KeywordFlags::BLOCK_ENDS_STATEMENT),
    ("UNITCHECK", KeywordFlags::BLOCK_ENDS_STATEMENT),
];

/// The built-in table every registry starts from.
pub fn builtin_table() -> KeywordTable {
    let mut table = KeywordTable::default();
    for &(word, kind) in WORD_OPERATORS {
        table.insert(
            word.into(),
            KeywordInfo::new(KeywordKind::Operator(kind), Expect::Term),
        );
    }
    for &(word, op) in QUOTE_OPERATORS {
        table.insert(
            word.into(),
            KeywordInfo::new(KeywordKind::Quote(op), Expect::Operator),
        );
    }
    for &(word, marker) in MARKERS {
        table.insert(
            word.into(),
            KeywordInfo::new(KeywordKind::Marker(marker), Expect::Operator),
        );
    }
    for &word in TERM_WORDS {
        table.insert(word.into(), KeywordInfo::named());
    }
    for &(word, flags) in BLOCK_WORDS {
        table.insert(
            word.into(),
            KeywordInfo::new(KeywordKind::Named, Expect::Block).with_flags(flags),
        );
    }
    for word in ["my", "our", "state"] {
        table.insert(
            word.into(),
            KeywordInfo::named().with_flags(KeywordFlags::DECLARATOR),
        );
    }
    for word in ["use", "no", "require"] {
        table.insert(
            word.into(),
            KeywordInfo::named().with_flags(KeywordFlags::TAKES_PACKAGE),
        );
    }
    table.insert(
        "package".into(),
        KeywordInfo::new(KeywordKind::Named, Expect::Block)
            .with_flags(KeywordFlags::TAKES_PACKAGE | KeywordFlags::BLOCK_ENDS_STATEMENT),
    );
    table.insert(
        "sub".into(),
        KeywordInfo::new(KeywordKind::Sub, Expect::AttrBlock),
    );
    table.insert(
        "format".into(),
        KeywordInfo::new(KeywordKind::Format, Expect::Term),
    );
    table
}

/// Add or replace a keyword for every session created afterwards.
pub fn register_keyword(word: &str, info: KeywordInfo) {
    let mut guard = REGISTRY.lock();
    let mut table = match guard.as_ref() {
        Some(current) => KeywordTable::clone(current),
        None => builtin_table(),
    };
    table.insert(word.into(), info);
    *guard = Some(Arc::new(table));
    tracing::debug!(word, ?info, "keyword registered");
}

/// Immutable view of the registry taken at session start.
#[derive(Clone, Debug)]
pub struct KeywordSnapshot(Arc<KeywordTable>);

impl KeywordSnapshot {
    /// Take the current registry contents.
    pub fn take() -> Self {
        let mut guard = REGISTRY.lock();
        let table = guard.get_or_insert_with(|| Arc::new(builtin_table()));
        KeywordSnapshot(Arc::clone(table))
    }

    #[inline]
    pub fn get(&self, word: &str) -> Option<&KeywordInfo> {
        self.0.get(word)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests;
