//! Interned identifiers.

use std::fmt;

/// Index of a string in a [`StringInterner`](crate::StringInterner).
///
/// Names from one interner compare equal exactly when their strings do.
/// Mixing names of different interners is a logic error.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// The empty string, interned by every interner at index 0.
    pub const EMPTY: Name = Name(0);

    #[inline]
    pub(crate) const fn from_index(index: u32) -> Self {
        Name(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_index_zero() {
        assert_eq!(Name::EMPTY.index(), 0);
        assert_eq!(Name::default(), Name::EMPTY);
        assert_eq!(format!("{:?}", Name::from_index(12)), "Name#12");
    }
}
