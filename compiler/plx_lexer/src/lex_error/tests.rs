use super::*;
use plx_diagnostic::Severity;
use pretty_assertions::assert_eq;

#[test]
fn severity_follows_kind() {
    let err = LexError::unterminated_delimited(Span::new(0, 1), ')', 3);
    assert!(err.is_fatal());
    assert_eq!(err.context, LexErrorContext::InsideDelimited { start_line: 3 });

    let err = LexError::illegal_digit(Span::new(0, 2), Radix::Octal, '8');
    assert_eq!(err.severity, LexSeverity::Recoverable);
    assert_eq!(err.to_string(), "illegal octal digit '8'");

    let err = LexError::misplaced_underscore(Span::new(0, 2));
    assert_eq!(err.severity, LexSeverity::Advisory);
}

#[test]
fn display_messages() {
    let err = LexError::no_digits(Span::new(0, 2), Radix::Hex);
    assert_eq!(err.to_string(), "no digits found for hexadecimal literal");
    let err = LexError::invalid_trans_range(Span::new(0, 3), 'z', 'a');
    assert_eq!(
        err.to_string(),
        "invalid range \"z-a\" in transliteration operator"
    );
}

#[test]
fn diagnostic_carries_excerpt_and_note() {
    let err = LexError::unterminated_delimited(Span::new(4, 5), '"', 2)
        .with_location(2, 5, "say \"oops");
    let diag = err.to_diagnostic();
    assert_eq!(diag.code, ErrorCode::E0001);
    assert_eq!(diag.severity, Severity::Error);
    let excerpt = diag.excerpt.as_ref().unwrap();
    assert_eq!((excerpt.line, excerpt.column), (2, 5));
    assert_eq!(diag.notes, vec!["the text starts on line 2".to_string()]);
    assert_eq!(diag.span, Span::new(4, 5));
}

#[test]
fn advisory_renders_as_warning() {
    let err = LexError::integer_overflow(Span::new(0, 20), Radix::Hex);
    let diag = err.to_diagnostic();
    assert_eq!(diag.severity, Severity::Warning);
    assert_eq!(diag.code, ErrorCode::E0009);
    assert!(diag.excerpt.is_none());
}

#[test]
fn every_kind_maps_to_a_lexer_or_internal_code() {
    let kinds = [
        LexErrorKind::UnrecognizedChar { found: '\u{1}' },
        LexErrorKind::SublexMismatch {
            expected: 1,
            found: 2,
        },
        LexErrorKind::Deprecated { what: "bare <<" },
    ];
    assert_eq!(kinds[0].code(), ErrorCode::E0017);
    assert!(kinds[1].code().is_internal());
    assert_eq!(kinds[2].severity(), LexSeverity::Advisory);
}

#[test]
fn buffer_and_delimiter_failures_convert() {
    let err: LexError = BufferError::InvalidUtf8 { position: 7 }.into();
    assert_eq!(err.kind, LexErrorKind::InvalidEncoding { position: 7 });
    assert!(err.is_fatal());

    let err: LexError = DelimError::Unterminated {
        close: '}',
        start_line: 4,
        open_pos: 30,
    }
    .into();
    assert_eq!(err.span, Span::point(30));
    assert_eq!(err.context, LexErrorContext::InsideDelimited { start_line: 4 });
}
