use super::*;
use pretty_assertions::assert_eq;

#[test]
fn builtin_lookup() {
    let snap = KeywordSnapshot::take();
    assert_eq!(
        snap.get("eq").map(|k| k.kind),
        Some(KeywordKind::Operator(TokenKind::StrEq))
    );
    assert_eq!(
        snap.get("y").map(|k| k.kind),
        Some(KeywordKind::Quote(QuoteOp::Tr))
    );
    assert_eq!(snap.get("map").map(|k| k.next), Some(Expect::Block));
    assert!(snap
        .get("else")
        .is_some_and(|k| k.flags.contains(KeywordFlags::BLOCK_ENDS_STATEMENT)));
    assert!(snap.get("frobnicate").is_none());
}

#[test]
fn registration_is_copy_on_write() {
    let before = KeywordSnapshot::take();
    register_keyword(
        "plx_registry_added",
        KeywordInfo::new(KeywordKind::Named, Expect::Block),
    );
    let after = KeywordSnapshot::take();
    assert!(!before.contains("plx_registry_added"));
    assert_eq!(
        after.get("plx_registry_added").map(|k| k.next),
        Some(Expect::Block)
    );
    assert!(after.len() > before.len());
}

#[test]
fn builtin_table_has_no_empty_words() {
    let table = builtin_table();
    assert!(table.keys().all(|k| !k.is_empty()));
    assert!(table.contains_key("__PACKAGE__"));
}
