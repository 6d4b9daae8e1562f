//! String interner for identifiers, package names and variable names.
//!
//! Tokens carry a 4-byte [`Name`] instead of an owned string. One interner
//! can serve several lexer sessions (see [`SharedInterner`]), so the known
//! sub and package sets of different sessions agree on names.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// The interner ran out of `u32` indices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("string interner is full ({count} strings)")]
pub struct InternError {
    pub count: usize,
}

#[derive(Default)]
struct Table {
    index: FxHashMap<&'static str, Name>,
    strings: Vec<&'static str>,
}

impl Table {
    fn insert(&mut self, s: &str) -> Result<Name, InternError> {
        let count = self.strings.len();
        let name = u32::try_from(count)
            .map(Name::from_index)
            .map_err(|_| InternError { count })?;
        // Interned strings live as long as the process.
        let stored: &'static str = Box::leak(s.to_owned().into_boxed_str());
        self.strings.push(stored);
        self.index.insert(stored, name);
        Ok(name)
    }
}

/// Thread-safe string interner.
///
/// Reads take a shared lock; only the first sighting of a string takes the
/// write lock.
pub struct StringInterner {
    table: RwLock<Table>,
}

impl StringInterner {
    /// An interner holding the empty string and the names the lexer
    /// synthesizes for interpolation.
    pub fn new() -> Self {
        const PRELOADED: &[&str] = &[
            "", "_", "\"", "0", "@", "!", "/", "\\", ",", ";", "&", "a", "b", "uc", "lc",
            "ucfirst", "lcfirst", "quotemeta", "fc", "join", "main",
        ];
        let mut table = Table::default();
        for s in PRELOADED {
            // A fresh table has room for every preloaded string.
            let _ = table.insert(s);
        }
        StringInterner {
            table: RwLock::new(table),
        }
    }

    /// Intern `s`, failing only when the index space is exhausted.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        if let Some(&name) = self.table.read().index.get(s) {
            return Ok(name);
        }
        let mut table = self.table.write();
        // Another thread may have inserted it between the two locks.
        if let Some(&name) = table.index.get(s) {
            return Ok(name);
        }
        table.insert(s)
    }

    /// Intern `s`.
    ///
    /// # Panics
    /// Panics after more than `u32::MAX` distinct strings.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// The name of `s` if it was interned before.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.table.read().index.get(s).copied()
    }

    /// The string behind `name`; empty for a name this interner never issued.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table.read().strings.get(name.index()).copied().unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Always false: the empty string is interned on creation.
    pub fn is_empty(&self) -> bool {
        self.table.read().strings.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Read access to interned strings, for code that only resolves names.
pub trait StringLookup {
    fn lookup(&self, name: Name) -> &str;
}

impl StringLookup for StringInterner {
    fn lookup(&self, name: Name) -> &str {
        StringInterner::lookup(self, name)
    }
}

/// Cloneable handle to one [`StringInterner`].
#[derive(Clone, Default)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl StringLookup for SharedInterner {
    fn lookup(&self, name: Name) -> &str {
        self.0.lookup(name)
    }
}

#[cfg(test)]
mod tests;
