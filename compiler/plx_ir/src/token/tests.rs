use super::*;

#[test]
fn test_float_bits_round_trip() {
    let bits = FloatBits::new(2.5);
    assert_eq!(bits.get(), 2.5);
    assert_eq!(TokenValue::float(2.5), TokenValue::Float(bits));
}

#[test]
fn test_str_lit_widening_flag() {
    assert!(!StrLit::new("caf\u{e9}").wide);
    assert!(StrLit::new("\u{263a}").wide);
}

#[test]
fn test_value_as_str() {
    assert_eq!(TokenValue::str("abc").as_str(), Some("abc"));
    assert_eq!(TokenValue::Int(3).as_str(), None);
}

#[test]
fn test_ends_term() {
    assert!(TokenKind::Int.ends_term());
    assert!(TokenKind::Var(Sigil::Scalar).ends_term());
    assert!(TokenKind::RParen.ends_term());
    assert!(!TokenKind::Minus.ends_term());
    assert!(!TokenKind::LParen.ends_term());
}

#[test]
fn test_case_mod_escape_mapping() {
    assert_eq!(CaseMod::from_escape(b'U'), Some(CaseMod::Upper));
    assert_eq!(CaseMod::from_escape(b'E'), None);
    assert_eq!(CaseMod::Quote.function_name(), "quotemeta");
}

#[test]
fn test_bare_token() {
    let tok = Token::bare(TokenKind::Eof, Span::point(4), 2);
    assert!(tok.is_eof());
    assert_eq!(tok.value, TokenValue::None);
    assert_eq!(Sigil::ArrayLen.as_str(), "$#");
}
