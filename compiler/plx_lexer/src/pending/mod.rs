//! Queue of tokens decided ahead of time.
//!
//! Handlers that produce several tokens at once (`Stringify (`, `qw` lists,
//! `MethodCall` + class name) return the first and park the rest here. The
//! queue is drained before the buffer is looked at again.

use std::collections::VecDeque;

use plx_ir::Token;

/// Tokens a single handler emits at most.
pub const PENDING_CAPACITY: usize = 8;

#[derive(Clone, Debug)]
pub struct PendingQueue {
    tokens: VecDeque<Token>,
}

impl Default for PendingQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingQueue {
    pub fn new() -> Self {
        PendingQueue {
            tokens: VecDeque::with_capacity(PENDING_CAPACITY),
        }
    }

    #[inline]
    pub fn push_back(&mut self, token: Token) {
        self.tokens.push_back(token);
    }

    /// Put a token back in front of everything queued.
    #[inline]
    pub fn push_front(&mut self, token: Token) {
        self.tokens.push_front(token);
    }

    #[inline]
    pub fn pop_front(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests;
