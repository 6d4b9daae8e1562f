//! Byte spans.
//!
//! Offsets are absolute positions in the compilation unit. Tokens lexed from
//! an interpolated string or a heredoc body still point into the enclosing
//! source, so a span never carries a buffer id.

use std::fmt;
use std::ops::Range;

/// Half-open byte range `start..end` of the source.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Span of tokens the lexer synthesizes without source text.
    pub const DUMMY: Span = Span::point(0);

    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Zero-length span at `offset`.
    #[inline]
    pub const fn point(offset: u32) -> Span {
        Span {
            start: offset,
            end: offset,
        }
    }

    /// Span of `range` inside a text whose first byte sits at `base`.
    ///
    /// Offsets that do not fit in `u32` saturate.
    pub fn within(base: u32, range: Range<usize>) -> Span {
        let at = |n: usize| base.saturating_add(u32::try_from(n).unwrap_or(u32::MAX));
        Span {
            start: at(range.start),
            end: at(range.end),
        }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    #[inline]
    pub fn contains(&self, offset: u32) -> bool {
        (self.start..self.end).contains(&offset)
    }

    /// From the start of `self` to the end of `last`.
    #[inline]
    #[must_use]
    pub fn to(self, last: Span) -> Span {
        Span {
            start: self.start.min(last.start),
            end: self.end.max(last.end),
        }
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::Span;
    crate::static_assert_size!(Span, 8);
}

#[cfg(test)]
mod tests;
