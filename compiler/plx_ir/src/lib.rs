//! PLX IR - shared lexer output types
//!
//! This crate contains the data structures every PLX layer agrees on:
//! - Spans for source locations
//! - Names for interned identifiers
//! - Tokens, token kinds and token payloads
//! - The tree-builder seam the lexer uses to obtain opaque node handles
//!
//! Types that contain floats store them as u64 bits so they stay `Eq + Hash`.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod builder;
mod interner;
mod name;
mod span;
mod token;

pub use builder::{ArenaNode, Handle, LiteralArena, TreeBuilder};
pub use interner::{InternError, SharedInterner, StringInterner, StringLookup};
pub use name::Name;
pub use span::Span;
pub use token::{AssignOp, CaseMod, FloatBits, Sigil, StrLit, Token, TokenKind, TokenValue};
