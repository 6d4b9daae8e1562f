use super::*;
use plx_lexer_core::StrStream;
use pretty_assertions::assert_eq;

#[test]
fn plain_word() {
    let mut buf = SourceBuffer::from_text("foo_1 bar");
    assert_eq!(scan_word(&mut buf, 0, true).unwrap(), 5);
}

#[test]
fn package_words() {
    let mut buf = SourceBuffer::from_text("Foo::Bar::baz(");
    assert_eq!(scan_word(&mut buf, 0, true).unwrap(), 13);
    assert_eq!(scan_word(&mut buf, 0, false).unwrap(), 3);

    let mut buf = SourceBuffer::from_text("Foo:: x");
    assert_eq!(scan_word(&mut buf, 0, true).unwrap(), 5);

    let mut buf = SourceBuffer::from_text("::main");
    assert_eq!(scan_word(&mut buf, 0, true).unwrap(), 6);
}

#[test]
fn single_colon_is_not_a_separator() {
    let mut buf = SourceBuffer::from_text("LABEL: x");
    assert_eq!(scan_word(&mut buf, 0, true).unwrap(), 5);
}

#[test]
fn digits_do_not_start_words() {
    let mut buf = SourceBuffer::from_text("9abc");
    assert_eq!(scan_word(&mut buf, 0, true).unwrap(), 0);
    assert!(!starts_ident(&mut buf, 0).unwrap());
    assert_eq!(scan_digits(&mut buf, 0).unwrap(), 1);
}

#[test]
fn unicode_word_in_utf8_mode() {
    let mut buf = SourceBuffer::from_text("café = 1");
    assert_eq!(scan_word(&mut buf, 0, true).unwrap(), "café".len());

    let mut latin = SourceBuffer::from_latin1(b"caf\xe9 = 1");
    assert_eq!(scan_word(&mut latin, 0, true).unwrap(), 3);
}

#[test]
fn word_across_refills() {
    let mut buf =
        SourceBuffer::with_stream(Box::new(StrStream::new("Some::Long::Name;", 2)), true, 2);
    assert_eq!(scan_word(&mut buf, 0, true).unwrap(), 16);
    assert_eq!(buf.byte_at(16), b';');
}
