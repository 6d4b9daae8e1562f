use super::*;
use crate::stream::StrStream;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn streamed(text: &str, chunk: usize) -> SourceBuffer {
    SourceBuffer::with_stream(Box::new(StrStream::new(text, chunk)), true, chunk)
}

#[test]
fn test_sentinel_past_end() {
    let sb = SourceBuffer::from_text("ab");
    assert_eq!(sb.current(), b'a');
    assert_eq!(sb.peek(1), b'b');
    assert_eq!(sb.peek(2), EOF_BYTE);
    assert!(!sb.is_eof());
}

#[test]
fn test_ensure_pulls_chunks() {
    let mut sb = streamed("abcdef", 2);
    assert_eq!(sb.end(), 0);
    assert_eq!(sb.ensure(3), Ok(true));
    assert_eq!(sb.end(), 4);
    assert_eq!(sb.ensure(10), Ok(false));
    assert_eq!(sb.end(), 6);
    assert!(sb.stream_exhausted());
}

#[test]
fn test_closed_stream_yields_terminator() {
    let mut sb = streamed("", 4);
    assert_eq!(sb.ensure(1), Ok(false));
    assert!(sb.is_eof());
    assert_eq!(sb.current(), EOF_BYTE);
}

#[test]
fn test_advance_counts_lines() {
    let mut sb = SourceBuffer::from_text("a\nbc\nd");
    sb.advance_to(3);
    assert_eq!(sb.line(), 2);
    assert_eq!(sb.line_start(), 2);
    assert_eq!(sb.column(), 2);
    sb.advance_to(6);
    assert_eq!(sb.line(), 3);
    assert_eq!(sb.current_line_text(), "d");
}

#[test]
fn test_advance_never_moves_backwards() {
    let mut sb = SourceBuffer::from_text("abc");
    sb.advance_to(2);
    sb.advance_to(1);
    assert_eq!(sb.cursor(), 2);
}

#[test]
fn test_column_counts_characters() {
    let mut sb = SourceBuffer::from_text("é=1");
    sb.advance_to(2);
    assert_eq!(sb.column(), 2);
}

#[test]
fn test_discard_keeps_current_line() {
    let mut sb = SourceBuffer::from_text("one\ntwo three");
    sb.advance_to(8);
    sb.discard_before(8);
    // Clamped to line_start.
    assert_eq!(sb.base(), 4);
    assert_eq!(sb.cursor(), 4);
    assert_eq!(sb.line_start(), 0);
    assert_eq!(sb.position(), 8);
    assert_eq!(sb.current_line_text(), "two three");
}

#[test]
fn test_excise_defers_line_count() {
    let mut sb = SourceBuffer::from_text("x;\nbody\nEND\ny");
    sb.advance_to(2);
    let removed = sb.excise(3, 12);
    assert_eq!(removed, b"body\nEND\n");
    assert_eq!(sb.text(0, sb.end()), "x;\ny");
    sb.advance_to(3);
    assert_eq!(sb.line(), 4);
    assert_eq!(sb.current(), b'y');
    // Spans after the hole stay absolute.
    assert_eq!(sb.position(), 12);
    assert_eq!(sb.position_of(1), 1);
}

#[test]
fn test_discard_folds_holes_into_base() {
    let mut sb = SourceBuffer::from_text("a
B
E
b c");
    sb.advance_to(1);
    sb.excise(2, 6);
    sb.advance_to(4);
    assert_eq!(sb.line(), 4);
    assert_eq!(sb.position(), 8);
    sb.discard_before(4);
    assert_eq!(sb.base(), 6);
    assert_eq!(sb.position(), 8);
}

#[test]
fn test_line_end_refills() {
    let mut sb = streamed("abc\ndef", 2);
    assert_eq!(sb.line_end_from(0), Ok(Some(4)));
    assert_eq!(sb.line_end_from(4), Ok(Some(7)));
    assert_eq!(sb.line_end_from(7), Ok(None));
}

#[test]
fn test_split_utf8_sequence_waits_for_next_chunk() {
    // "é" is two bytes; chunk size 1 cuts it.
    let mut sb = streamed("aé", 1);
    assert_eq!(sb.ensure(3), Ok(true));
    assert_eq!(sb.char_at(1), Some(('é', 2)));
}

#[test]
fn test_invalid_utf8_reports_position() {
    let bytes: Vec<u8> = vec![b'a', b'b', 0xFF, b'c'];
    let mut sb = SourceBuffer::with_stream(Box::new(StrStream::new(bytes, 2)), true, 2);
    assert_eq!(sb.ensure(2), Ok(true));
    assert_eq!(sb.ensure(4), Err(BufferError::InvalidUtf8 { position: 2 }));
}

#[test]
fn test_truncated_sequence_at_eof_is_invalid() {
    let bytes: Vec<u8> = vec![b'a', 0xC3];
    let mut sb = SourceBuffer::with_stream(Box::new(StrStream::new(bytes, 8)), true, 8);
    assert_eq!(sb.ensure(2), Ok(true));
    assert_eq!(sb.ensure(3), Err(BufferError::InvalidUtf8 { position: 1 }));
}

#[test]
fn test_latin1_chars_are_bytes() {
    let sb = SourceBuffer::from_latin1(&[b'a', 0xE9]);
    assert_eq!(sb.char_at(1), Some(('é', 1)));
    assert_eq!(sb.text(0, 2), "aé");
}

#[test]
fn test_nested_keeps_absolute_positions() {
    let sb = SourceBuffer::nested("$x", 40, 7);
    assert_eq!(sb.position(), 40);
    assert_eq!(sb.line(), 7);
}

proptest! {
    #[test]
    fn prop_chunked_refill_sees_whole_text(text in "[a-z\\n é]{0,64}", chunk in 1usize..9) {
        let mut sb = streamed(&text, chunk);
        while sb.refill().map_err(|e| TestCaseError::fail(e.to_string()))? > 0 {}
        prop_assert_eq!(sb.text(0, sb.end()), text.clone());
        sb.advance_to(sb.end());
        let lines = u32::try_from(text.matches('\n').count()).unwrap();
        prop_assert_eq!(sb.line(), lines + 1);
    }

    #[test]
    fn prop_discard_preserves_position(text in "[a-z\\n]{1,64}", cut in 0usize..64) {
        let mut sb = SourceBuffer::from_text(&text);
        let at = cut.min(text.len());
        sb.advance_to(at);
        let before = sb.position();
        let line = sb.line();
        sb.discard_before(at);
        prop_assert_eq!(sb.position(), before);
        prop_assert_eq!(sb.line(), line);
    }
}
