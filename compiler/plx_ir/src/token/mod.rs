//! Token types produced by the lexer.
//!
//! A [`Token`] pairs a [`TokenKind`] with a [`TokenValue`] payload. Kinds are
//! `Copy` and small; payloads carry the decided value (numbers, cooked text,
//! interned identifiers, or an opaque handle obtained from a tree builder).

use std::fmt;

use crate::{Handle, Name, Span};

/// Variable sigils.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Sigil {
    /// `$`
    Scalar,
    /// `@`
    Array,
    /// `%`
    Hash,
    /// `&`
    Code,
    /// `*`
    Glob,
    /// `$#`
    ArrayLen,
}

impl Sigil {
    pub fn as_str(self) -> &'static str {
        match self {
            Sigil::Scalar => "$",
            Sigil::Array => "@",
            Sigil::Hash => "%",
            Sigil::Code => "&",
            Sigil::Glob => "*",
            Sigil::ArrayLen => "$#",
        }
    }
}

/// Case modifiers that open a synthetic function call inside interpolated text.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum CaseMod {
    /// `\U`
    Upper,
    /// `\L`
    Lower,
    /// `\u`
    UpperFirst,
    /// `\l`
    LowerFirst,
    /// `\Q`
    Quote,
    /// `\F`
    Fold,
}

impl CaseMod {
    /// Map the letter after a backslash to a case modifier.
    pub fn from_escape(c: u8) -> Option<CaseMod> {
        match c {
            b'U' => Some(CaseMod::Upper),
            b'L' => Some(CaseMod::Lower),
            b'u' => Some(CaseMod::UpperFirst),
            b'l' => Some(CaseMod::LowerFirst),
            b'Q' => Some(CaseMod::Quote),
            b'F' => Some(CaseMod::Fold),
            _ => None,
        }
    }

    /// Name of the builtin the modifier stands for.
    pub fn function_name(self) -> &'static str {
        match self {
            CaseMod::Upper => "uc",
            CaseMod::Lower => "lc",
            CaseMod::UpperFirst => "ucfirst",
            CaseMod::LowerFirst => "lcfirst",
            CaseMod::Quote => "quotemeta",
            CaseMod::Fold => "fc",
        }
    }
}

/// Compound assignment operators (`+=`, `//=`, `x=` ...).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum AssignOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Concat,
    Repeat,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    AndAnd,
    OrOr,
    DefinedOr,
}

/// Token kinds.
///
/// Ambiguous punctuation has one kind per reading (`Minus` vs `Negate`,
/// `Star` vs `Var(Glob)`), the lexer picks based on what the parser expects.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    // === Literals ===
    Int,
    Float,
    /// String literal with no interpolation left in it.
    Str,
    /// `v1.2.3`
    VString,
    /// Bareword used as a string (`key =>`, `$h{key}`, `__FILE__`).
    Const,

    // === Words ===
    /// Bareword whose role is left to the parser.
    Word,
    /// Call of a known or parenthesized function.
    FuncCall,
    /// Call of a lexically declared sub (`my sub foo`).
    LexSubCall,
    /// Indirect-object method call (`new Foo`).
    MethodCall,
    Label,
    Keyword,
    /// `$x`, `@x`, `%x`, `&x`, `*x`, `$#x`.
    Var(Sigil),
    /// Sigil applied to a block or another variable (`${ ... }`, `@$x`).
    Deref(Sigil),
    /// File test operator (`-e`, `-d`).
    FileTest,

    // === Quote-like ===
    /// `<FH>`, `<$fh>`, `<>`
    ReadLine,
    /// `<*.c>`
    GlobPattern,
    Pattern,
    Subst,
    SubstReplacement,
    Trans,
    TransReplacement,
    PatternFlags,

    // === Interpolation scaffolding ===
    Stringify,
    Join,
    Readpipe,
    CaseMod(CaseMod),

    // === Formats ===
    FormLine,
    FormArgsEnd,
    FormEnd,

    // === Operators ===
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Pow,
    Dot,
    Repeat,
    Negate,
    UnaryPlus,
    Not,
    BitNot,
    SmartMatch,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    AndAnd,
    OrOr,
    DefinedOr,
    Lt,
    Gt,
    Le,
    Ge,
    NumEq,
    NumNe,
    NumCmp,
    StrLt,
    StrGt,
    StrLe,
    StrGe,
    StrEq,
    StrNe,
    StrCmp,
    LowAnd,
    LowOr,
    LowNot,
    LowXor,
    Assign,
    AssignOp(AssignOp),
    Match,
    NotMatch,
    Arrow,
    FatComma,
    Comma,
    Semicolon,
    Colon,
    Question,
    Range,
    Ellipsis,
    Inc,
    Dec,
    Backslash,

    // === Brackets ===
    LParen,
    RParen,
    LBracket,
    RBracket,
    /// `{` opening a block or a subscript.
    LBrace,
    /// `{` opening an anonymous hash.
    HashBrace,
    RBrace,

    Eof,
}

impl TokenKind {
    /// Whether this token completes a term (the parser expects an operator next).
    pub fn ends_term(self) -> bool {
        matches!(
            self,
            TokenKind::Int
                | TokenKind::Float
                | TokenKind::Str
                | TokenKind::VString
                | TokenKind::Const
                | TokenKind::Word
                | TokenKind::Var(_)
                | TokenKind::ReadLine
                | TokenKind::GlobPattern
                | TokenKind::Pattern
                | TokenKind::SubstReplacement
                | TokenKind::TransReplacement
                | TokenKind::PatternFlags
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
        )
    }
}

/// Float payload stored as bits so tokens stay `Eq + Hash`.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct FloatBits(u64);

impl FloatBits {
    #[inline]
    pub fn new(value: f64) -> Self {
        FloatBits(value.to_bits())
    }

    #[inline]
    pub fn get(self) -> f64 {
        f64::from_bits(self.0)
    }
}

impl fmt::Debug for FloatBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.get())
    }
}

/// Cooked string text.
///
/// `wide` is set once the text holds a code point at or above 256; until
/// then every character fits in a single byte of the narrow encoding.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct StrLit {
    pub text: String,
    pub wide: bool,
}

impl StrLit {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let wide = text.chars().any(|c| u32::from(c) >= 256);
        StrLit { text, wide }
    }
}

/// Token payload.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenValue {
    #[default]
    None,
    Int(i64),
    Float(FloatBits),
    Str(StrLit),
    Ident(Name),
    Handle(Handle),
}

impl TokenValue {
    /// Convenience constructor for float payloads.
    pub fn float(value: f64) -> Self {
        TokenValue::Float(FloatBits::new(value))
    }

    /// Convenience constructor for text payloads.
    pub fn str(text: impl Into<String>) -> Self {
        TokenValue::Str(StrLit::new(text))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TokenValue::Str(lit) => Some(&lit.text),
            _ => None,
        }
    }
}

/// A lexed token.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub span: Span,
    /// 1-based line the token starts on.
    pub line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, value: TokenValue, span: Span, line: u32) -> Self {
        Token {
            kind,
            value,
            span,
            line,
        }
    }

    /// Token without a payload.
    pub fn bare(kind: TokenKind, span: Span, line: u32) -> Self {
        Token::new(kind, TokenValue::None, span, line)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

#[cfg(test)]
mod tests;
