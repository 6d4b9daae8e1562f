use super::*;
use plx_lexer_core::StrStream;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn chunked(text: &str, chunk: usize) -> SourceBuffer {
    SourceBuffer::with_stream(Box::new(StrStream::new(text, chunk)), true, chunk)
}

#[test]
fn nested_parens() {
    let mut buf = SourceBuffer::from_text("(a(b)c) rest");
    let d = scan(&mut buf, false, false).unwrap();
    assert_eq!(d.text, "a(b)c");
    assert_eq!((d.open, d.close), ('(', ')'));
    assert_eq!(buf.rest(), b" rest");
}

#[test]
fn unpaired_delimiter_closes_with_itself() {
    let mut buf = SourceBuffer::from_text("!a(b!;");
    let d = scan(&mut buf, false, false).unwrap();
    assert_eq!(d.text, "a(b");
    assert_eq!(buf.current(), b';');
}

#[test]
fn escaped_delimiter_loses_backslash() {
    let mut buf = SourceBuffer::from_text("/a\\/b\\n/");
    assert_eq!(scan(&mut buf, false, false).unwrap().text, "a/b\\n");

    let mut buf = SourceBuffer::from_text("{a\\}b}");
    assert_eq!(scan(&mut buf, false, true).unwrap().text, "a\\}b");
}

#[test]
fn keep_delims_wraps_text() {
    let mut buf = SourceBuffer::from_text("[x[y]]");
    assert_eq!(scan(&mut buf, true, false).unwrap().text, "[x[y]]");
}

#[test]
fn leading_space_and_comment_skipped() {
    let mut buf = SourceBuffer::from_text("  # note\n  (body)");
    let d = scan(&mut buf, false, false).unwrap();
    assert_eq!(d.text, "body");
    assert_eq!(d.start_line, 2);
}

#[test]
fn hash_right_after_operator_is_a_delimiter() {
    let mut buf = SourceBuffer::from_text("#abc#");
    assert_eq!(scan(&mut buf, false, false).unwrap().text, "abc");
}

#[test]
fn unicode_pairs() {
    let mut buf = SourceBuffer::from_text("«a«b»c»");
    let d = scan(&mut buf, false, false).unwrap();
    assert_eq!(d.text, "a«b»c");
    assert_eq!(d.close, '»');
}

#[test]
fn unterminated_reports_start_line() {
    let mut buf = SourceBuffer::from_text("\n(abc\ndef");
    let err = scan(&mut buf, false, false).unwrap_err();
    assert_eq!(
        err,
        DelimError::Unterminated {
            close: ')',
            start_line: 2,
            open_pos: 1,
        }
    );
}

#[test]
fn body_spans_refills() {
    let mut buf = chunked("(one\ntwo\nthree) tail", 3);
    let d = scan(&mut buf, false, false).unwrap();
    assert_eq!(d.text, "one\ntwo\nthree");
    assert_eq!(buf.line(), 3);
    assert!(buf.refill_count() > 3);
}

#[test]
fn multibyte_delimiter_split_across_chunks() {
    let mut buf = chunked("「x」", 1);
    let d = scan(&mut buf, false, false).unwrap();
    assert_eq!(d.text, "x");
    assert_eq!(d.close, '」');
}

#[test]
fn substitution_second_part_reuses_delimiter() {
    let mut buf = SourceBuffer::from_text("/a/b/g");
    let first = scan(&mut buf, false, false).unwrap();
    assert_eq!(first.text, "a");
    let mut desc = DelimScan::new('/', first.start_line, first.open_pos);
    assert_eq!(scan_body(&mut buf, &mut desc).unwrap(), "b");
    assert_eq!(buf.rest(), b"g");
}

/// Text whose parentheses always pair up.
fn balanced_text() -> impl Strategy<Value = String> {
    "[a-z ]{0,4}".prop_recursive(4, 32, 4, |inner| {
        prop::collection::vec(
            prop_oneof![inner.clone(), inner.prop_map(|s| format!("({s})"))],
            0..4,
        )
        .prop_map(|parts| parts.concat())
    })
}

proptest! {
    #[test]
    fn balanced_text_round_trips(body in balanced_text(), chunk in 1usize..8) {
        let source = format!("({body});");
        let mut buf = SourceBuffer::from_text(&source);
        let d = scan(&mut buf, false, false).unwrap();
        prop_assert_eq!(&d.text, &body);
        prop_assert_eq!(buf.current(), b';');

        let mut buf = chunked(&source, chunk);
        let d = scan(&mut buf, false, false).unwrap();
        prop_assert_eq!(d.text, body);
        buf.ensure(1).unwrap();
        prop_assert_eq!(buf.current(), b';');
    }
}
