use super::*;
use crate::delimited;
use plx_lexer_core::SourceBuffer;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn cook(src: &str) -> String {
    let cooked = cook_run(src, true);
    assert_eq!(cooked.stop, Stop::End, "unexpected stop in {src:?}");
    cooked.text
}

#[test]
fn simple_escapes() {
    assert_eq!(cook(r"a\tb\n"), "a\tb\n");
    assert_eq!(cook(r"\r\f\b\a\e"), "\r\u{0C}\u{08}\u{07}\u{1B}");
    assert_eq!(cook(r"back\\slash"), "back\\slash");
    assert_eq!(cook(r#"\"q\""#), "\"q\"");
}

#[test]
fn numeric_escapes() {
    assert_eq!(cook(r"\x41\x{263A}\x"), "A\u{263A}\0");
    assert_eq!(cook(r"\101\0\o{101}"), "A\0A");
    assert_eq!(cook(r"\cA\c["), "\u{01}\u{1B}");
    assert_eq!(cook(r"\x{1_F600}"), "\u{1F600}");
}

#[test]
fn named_characters() {
    assert_eq!(cook(r"\N{U+263A}"), "\u{263A}");
    assert_eq!(cook(r"\N{SNOWMAN}"), "☃");
    assert_eq!(cook(r"\N{LATIN SMALL LETTER Q}\N{DIGIT SEVEN}"), "q7");
    assert_eq!(lookup_charname("latin capital letter z"), Some('Z'));
}

#[test]
fn unknown_name_is_nul_with_issue() {
    let cooked = cook_run(r"a\N{NO SUCH THING}b", true);
    assert_eq!(cooked.text, "a\0b");
    assert_eq!(cooked.issues.len(), 1);
    assert_eq!(cooked.issues[0].at, 1..18);
    assert_eq!(
        cooked.issues[0].kind,
        LexErrorKind::UnknownCharName {
            name: "NO SUCH THING".to_string()
        }
    );
}

#[test]
fn out_of_range_code_point() {
    let cooked = cook_run(r"\x{110000}z", true);
    assert_eq!(cooked.text, "\0z");
    assert!(matches!(
        cooked.issues[0].kind,
        LexErrorKind::CodePointOutOfRange { .. }
    ));
}

#[test]
fn unknown_escapes_pass_through() {
    let cooked = cook_run(r"\q\$\@", true);
    assert_eq!(cooked.text, "q$@");
    assert_eq!(
        cooked.issues.iter().map(|i| &i.kind).collect::<Vec<_>>(),
        vec![&LexErrorKind::UnrecognizedEscape { escape: 'q' }]
    );
}

#[test]
fn run_stops_at_triggers() {
    let cooked = cook_run("cost: $price each", true);
    assert_eq!(cooked.text, "cost: ");
    assert_eq!(cooked.stop, Stop::Interpolate);
    assert_eq!(cooked.consumed, 6);

    let cooked = cook_run(r"up \Uhere", true);
    assert_eq!(cooked.stop, Stop::CaseMod);
    assert_eq!(cooked.consumed, 3);
}

#[test]
fn lone_sigils_are_literal() {
    assert_eq!(cook("$ 5 @ home, 100%"), "$ 5 @ home, 100%");
    assert_eq!(cook("end$"), "end$");
    assert_eq!(cook_run("$x", false).text, "$x");
}

#[test]
fn trigger_shapes() {
    for src in ["$x", "${x}", "$::x", "$$", "$1", "$&", "@a", "@{a}", "@$r", "@::a"] {
        assert!(trigger_at(src, 0), "{src}");
    }
    for src in ["$", "$ ", "$:", "@1", "@&", "@-", "x$"] {
        assert!(!trigger_at(src, 0), "{src}");
    }
}

#[test]
fn single_quote_collapses_double_backslash() {
    assert_eq!(single_quote(r"a\\b\n"), r"a\b\n");
    assert_eq!(single_quote(r"\\\\"), r"\\");
    assert_eq!(single_quote("plain"), "plain");
}

#[test]
fn tr_ranges() {
    assert_eq!(expand_tr("a-e").unwrap().0, "abcde");
    assert_eq!(expand_tr("a-cx-z").unwrap().0, "abcxyz");
    assert_eq!(expand_tr("a\\-z").unwrap().0, "a-z");
    assert_eq!(expand_tr("-a-").unwrap().0, "-a-");
    assert_eq!(expand_tr("k-k").unwrap().0, "k");
    assert_eq!(expand_tr(r"\x41-\x43").unwrap().0, "ABC");
}

#[test]
fn tr_reversed_range_fails() {
    assert_eq!(
        expand_tr("z-a").unwrap_err(),
        LexErrorKind::InvalidTransRange {
            low: 'z',
            high: 'a'
        }
    );
}

fn quote_single(s: &str) -> String {
    let mut out = String::from("'");
    for c in s.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

proptest! {
    #[test]
    fn single_quoted_text_round_trips(s in "[a-z\\\\' ]{0,20}") {
        let source = quote_single(&s);
        let mut buf = SourceBuffer::from_text(&source);
        let body = delimited::scan(&mut buf, false, false).unwrap();
        prop_assert_eq!(single_quote(&body.text), s);
    }
}
