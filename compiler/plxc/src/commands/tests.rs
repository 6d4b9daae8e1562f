use super::*;
use plx_ir::{Span, TokenKind};
use pretty_assertions::assert_eq;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

#[test]
fn parses_flags_in_any_order() {
    let parsed = LexArgs::parse(&args(&["--strict", "x.plx", "--chunk=16", "--error-limit=3"])).unwrap();
    assert_eq!(
        parsed,
        LexArgs {
            path: "x.plx".into(),
            strict: true,
            latin1: false,
            error_limit: Some(3),
            chunk: Some(16),
        }
    );
}

#[test]
fn rejects_bad_arguments() {
    assert!(LexArgs::parse(&args(&[])).is_err());
    assert!(LexArgs::parse(&args(&["a", "b"])).is_err());
    assert!(LexArgs::parse(&args(&["a", "--chunk=lots"])).is_err());
    assert!(LexArgs::parse(&args(&["a", "--verbose"])).is_err());
}

#[test]
fn options_follow_arguments() {
    let parsed = LexArgs::parse(&args(&["--latin1", "--chunk=0", "f"])).unwrap();
    let options = parsed.options();
    assert!(!options.utf8);
    assert_eq!(options.chunk_size, 1);
    assert_eq!(options.file_name, "f");
    assert_eq!(options.error_limit, LexerOptions::default().error_limit);
}

#[test]
fn explains_known_codes() {
    assert_eq!(
        explain("e0004").unwrap(),
        "E0004 (lexer phase): unterminated heredoc"
    );
    assert_eq!(
        explain("E9002").unwrap(),
        "E9002 (internal phase): too many errors"
    );
    assert!(explain("X1").unwrap_err().contains("X1"));
}

#[test]
fn describes_tokens() {
    let interner = SharedInterner::new();
    let name = interner.intern("foo");
    let word = Token::new(TokenKind::Word, TokenValue::Ident(name), Span::new(0, 3), 1);
    assert_eq!(describe(&word, &interner), "   1:0..3 Word foo");
    let lit = Token::new(TokenKind::Str, TokenValue::str("a\n"), Span::new(4, 9), 2);
    assert_eq!(describe(&lit, &interner), "   2:4..9 Str \"a\\n\"");
}
