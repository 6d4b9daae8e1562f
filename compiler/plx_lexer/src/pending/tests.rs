use super::*;
use plx_ir::{Span, TokenKind};

fn tok(kind: TokenKind) -> Token {
    Token::bare(kind, Span::DUMMY, 1)
}

#[test]
fn fifo_order() {
    let mut queue = PendingQueue::new();
    queue.push_back(tok(TokenKind::LParen));
    queue.push_back(tok(TokenKind::RParen));
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.pop_front().map(|t| t.kind), Some(TokenKind::LParen));
    assert_eq!(queue.pop_front().map(|t| t.kind), Some(TokenKind::RParen));
    assert!(queue.pop_front().is_none());
}

#[test]
fn unread_goes_first() {
    let mut queue = PendingQueue::new();
    queue.push_back(tok(TokenKind::Comma));
    queue.push_front(tok(TokenKind::Semicolon));
    assert_eq!(queue.pop_front().map(|t| t.kind), Some(TokenKind::Semicolon));
    assert_eq!(queue.pop_front().map(|t| t.kind), Some(TokenKind::Comma));
}
