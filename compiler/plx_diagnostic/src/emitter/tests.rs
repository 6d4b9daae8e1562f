use super::*;
use crate::ErrorCode;
use plx_ir::Span;
use pretty_assertions::assert_eq;

fn plain() -> TerminalEmitter<Vec<u8>> {
    TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false)
}

fn render(diag: &Diagnostic) -> String {
    let mut emitter = plain();
    emitter.emit(diag);
    String::from_utf8(emitter.into_inner()).unwrap()
}

#[test]
fn test_excerpt_with_caret() {
    let diag = Diagnostic::error(ErrorCode::E0003, Span::new(9, 10))
        .with_message("illegal octal digit '8'")
        .with_label("not an octal digit")
        .with_excerpt(1, 10, "my $x = 08;")
        .with_suggestion("drop the leading zero");
    assert_eq!(
        render(&diag),
        "error[E0003]: illegal octal digit '8'\n\
         \x20--> line 1:10\n\
         \x20 |\n\
         1 | my $x = 08;\n\
         \x20 |          ^ not an octal digit\n\
         \x20 = help: drop the leading zero\n\n"
    );
}

#[test]
fn test_unlocated_diagnostic_shows_span() {
    let diag = Diagnostic::warning(ErrorCode::E0009, Span::new(4, 24))
        .with_message("integer overflow in hexadecimal number")
        .with_note("the value is kept as a float");
    assert_eq!(
        render(&diag),
        "warning[E0009]: integer overflow in hexadecimal number\n\
         \x20--> bytes 4..24\n\
         \x20 = note: the value is kept as a float\n\n"
    );
}

#[test]
fn test_colors_wrap_severity() {
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Always, false);
    emitter.emit(&Diagnostic::error(ErrorCode::E0017, Span::point(0)));
    let out = String::from_utf8(emitter.into_inner()).unwrap();
    assert!(out.starts_with("\x1b[1;31merror\x1b[0m\x1b[1m[E0017]\x1b[0m"));
}

#[test]
fn test_summary() {
    let mut emitter = plain();
    emitter.emit_summary(2, 1);
    emitter.emit_summary(1, 0);
    emitter.emit_summary(0, 3);
    emitter.emit_summary(0, 0);
    assert_eq!(
        String::from_utf8(emitter.into_inner()).unwrap(),
        "error: aborting due to 2 errors; 1 warning emitted\n\
         error: aborting due to previous error\n\
         warning: 3 warnings emitted\n"
    );
}

#[test]
fn test_color_mode_resolution() {
    assert!(ColorMode::Auto.should_use_colors(true));
    assert!(!ColorMode::Auto.should_use_colors(false));
    assert!(ColorMode::Always.should_use_colors(false));
    assert!(!ColorMode::Never.should_use_colors(true));
}
