use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_builder_collects_parts() {
    let diag = Diagnostic::error(ErrorCode::E0001, Span::new(4, 5))
        .with_message("can't find string terminator")
        .with_label("starts here")
        .with_note("the text runs to end of input")
        .with_suggestion("add the closing `)`")
        .with_excerpt(3, 5, "q(abc");

    assert!(diag.is_error());
    assert_eq!(diag.label, "starts here");
    assert_eq!(diag.position(), (3, 5));
    assert_eq!(
        diag.excerpt,
        Some(SourceExcerpt {
            line: 3,
            column: 5,
            text: "q(abc".to_string(),
        })
    );
}

#[test]
fn test_message_defaults_to_description() {
    let diag = Diagnostic::warning(ErrorCode::E0009, Span::point(0));
    assert!(!diag.is_error());
    assert_eq!(diag.message, "integer overflow in number");
    assert_eq!(diag.position(), (0, 0));
}

#[test]
fn test_display() {
    let diag = Diagnostic::error(ErrorCode::E0007, Span::new(2, 3))
        .with_message("unmatched closing ')'")
        .with_note("opened at line 1")
        .with_suggestion("remove it");
    assert_eq!(
        diag.to_string(),
        "error[E0007] 2..3: unmatched closing ')'\n  = note: opened at line 1\n  = help: remove it"
    );
}
