use super::*;
use plx_lexer_core::StrStream;
use pretty_assertions::assert_eq;

fn tag(src: &str) -> Option<HeredocTag> {
    let mut buf = SourceBuffer::from_text(src);
    parse_tag(&mut buf, 0, 1).unwrap()
}

#[test]
fn tag_forms() {
    let t = tag("<<EOF;").unwrap();
    assert_eq!(t.spec.terminator, "EOF");
    assert_eq!(t.spec.quote, HeredocQuote::Bare);
    assert_eq!(t.end, 5);

    let t = tag("<<~'END X';").unwrap();
    assert_eq!(t.spec.terminator, "END X");
    assert!(t.spec.indented);
    assert_eq!(t.spec.quote, HeredocQuote::Single);
    assert_eq!(t.end, 10);

    let t = tag("<< \"E\"").unwrap();
    assert_eq!(t.spec.quote, HeredocQuote::Double);
    assert_eq!(tag("<<`CMD`").map(|t| t.spec.quote), Some(HeredocQuote::Backtick));
}

#[test]
fn empty_tag_and_non_heredoc() {
    let t = tag("<< ;").unwrap();
    assert!(t.empty_tag);
    assert_eq!(t.spec.terminator, "");
    assert!(tag("<<2").is_none());
    assert!(tag("<<\"open\n").is_none());
}

#[test]
fn body_is_excised() {
    let src = "print <<EOF . \"x\";\nline 1\nline 2\nEOF\nnext;\n";
    let mut buf = SourceBuffer::from_text(src);
    let t = parse_tag(&mut buf, 6, 1).unwrap().unwrap();
    let body = read_body(&mut buf, t.end, &t.spec).unwrap();
    assert_eq!(body.text, "line 1\nline 2\n");
    assert_eq!(body.line, 2);
    assert_eq!(body.base, 19);
    assert!(!body.refilled);

    // The rest of the line continues, then `next;` on line 5.
    buf.advance_to(t.end);
    assert_eq!(buf.rest(), b" . \"x\";\nnext;\n");
    let nl = buf.find_byte(buf.cursor(), b'\n').unwrap();
    buf.advance_to(nl + 1);
    assert_eq!(buf.line(), 5);
    assert_eq!(buf.position(), 37);
}

#[test]
fn two_heredocs_on_one_line() {
    let src = "f(<<A, <<B);\na\nA\nb\nB\nend\n";
    let mut buf = SourceBuffer::from_text(src);
    let a = parse_tag(&mut buf, 2, 1).unwrap().unwrap();
    let body_a = read_body(&mut buf, a.end, &a.spec).unwrap();
    let b = parse_tag(&mut buf, 7, 1).unwrap().unwrap();
    let body_b = read_body(&mut buf, b.end, &b.spec).unwrap();
    assert_eq!(body_a.text, "a\n");
    assert_eq!(body_b.text, "b\n");
    assert_eq!(body_a.line, 2);
    assert_eq!(body_b.line, 4);
    assert_eq!(body_b.base, 17);
}

#[test]
fn indented_body_is_stripped() {
    let src = "x(<<~EOT);\n    a\n\n      b\n  \n    EOT\n";
    let mut buf = SourceBuffer::from_text(src);
    let t = parse_tag(&mut buf, 2, 1).unwrap().unwrap();
    let body = read_body(&mut buf, t.end, &t.spec).unwrap();
    assert_eq!(body.text, "a\n\n  b\n\n");
}

#[test]
fn less_indented_line_is_an_error() {
    let src = "<<~EOT;\n    a\n  b\n    EOT\n";
    let mut buf = SourceBuffer::from_text(src);
    let t = parse_tag(&mut buf, 0, 1).unwrap().unwrap();
    assert_eq!(
        read_body(&mut buf, t.end, &t.spec).unwrap_err(),
        HeredocError::Indent { line: 3 }
    );
}

#[test]
fn missing_terminator() {
    let src = "<<EOF;\nbody\nEOFX\n";
    let mut buf = SourceBuffer::from_text(src);
    let t = parse_tag(&mut buf, 0, 1).unwrap().unwrap();
    assert_eq!(
        read_body(&mut buf, t.end, &t.spec).unwrap_err(),
        HeredocError::Unterminated
    );
}

#[test]
fn terminator_at_end_without_newline() {
    let mut buf = SourceBuffer::from_text("<<EOF;\nbody\nEOF");
    let t = parse_tag(&mut buf, 0, 1).unwrap().unwrap();
    assert_eq!(read_body(&mut buf, t.end, &t.spec).unwrap().text, "body\n");
}

#[test]
fn body_pulled_from_stream() {
    let src = "<<EOF;\none\ntwo\nthree\nEOF\nrest\n";
    let mut buf = SourceBuffer::with_stream(Box::new(StrStream::new(src, 4)), true, 4);
    buf.ensure(8).unwrap();
    let t = parse_tag(&mut buf, 0, 1).unwrap().unwrap();
    let body = read_body(&mut buf, t.end, &t.spec).unwrap();
    assert_eq!(body.text, "one\ntwo\nthree\n");
    assert!(body.refilled);
    assert_eq!(body.base, 7);
}

#[test]
fn empty_terminator_ends_at_blank_line() {
    let mut buf = SourceBuffer::from_text("<< ;\ntext\n\nafter\n");
    let t = parse_tag(&mut buf, 0, 1).unwrap().unwrap();
    assert_eq!(read_body(&mut buf, t.end, &t.spec).unwrap().text, "text\n");
}
