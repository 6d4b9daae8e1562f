//! Tree-builder seam.
//!
//! The lexer never constructs syntax-tree nodes. When a builder is attached
//! it asks for opaque [`Handle`]s and embeds them as token payloads; the
//! parser later resolves the handles against the same builder.

use crate::{Name, TokenValue};

/// Opaque node handle issued by a [`TreeBuilder`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Handle(u32);

impl Handle {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Handle(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Node construction capability consumed by the lexer.
pub trait TreeBuilder {
    /// Build a constant node for a literal payload.
    fn make_literal(&mut self, value: &TokenValue) -> Handle;

    /// Build a reference to a named entity (bareword, sub name).
    fn make_identifier_ref(&mut self, name: Name) -> Handle;
}

/// Node recorded by [`LiteralArena`].
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ArenaNode {
    Literal(TokenValue),
    IdentifierRef(Name),
}

/// Recording builder: stores every requested node and hands out indices.
#[derive(Clone, Debug, Default)]
pub struct LiteralArena {
    nodes: Vec<ArenaNode>,
}

impl LiteralArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: Handle) -> Option<&ArenaNode> {
        self.nodes.get(handle.raw() as usize)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: ArenaNode) -> Handle {
        let idx = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
        self.nodes.push(node);
        Handle::new(idx)
    }
}

impl TreeBuilder for LiteralArena {
    fn make_literal(&mut self, value: &TokenValue) -> Handle {
        self.push(ArenaNode::Literal(value.clone()))
    }

    fn make_identifier_ref(&mut self, name: Name) -> Handle {
        self.push(ArenaNode::IdentifierRef(name))
    }
}
