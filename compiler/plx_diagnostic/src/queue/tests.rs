use super::*;
use pretty_assertions::assert_eq;

fn err(code: ErrorCode, msg: &str, at: u32, line: u32) -> Diagnostic {
    Diagnostic::error(code, Span::new(at, at + 1))
        .with_message(msg)
        .with_excerpt(line, 1, "")
}

#[test]
fn test_error_limit_drops_further_errors() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 2,
        deduplicate: false,
    });
    assert!(queue.push(err(ErrorCode::E0005, "a", 0, 1)));
    assert!(!queue.limit_reached());
    assert!(queue.push(err(ErrorCode::E0005, "b", 4, 2)));
    assert!(queue.limit_reached());
    assert!(!queue.push(err(ErrorCode::E0005, "c", 8, 3)));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn test_warnings_ignore_the_limit() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 1,
        deduplicate: false,
    });
    assert!(queue.push(err(ErrorCode::E0003, "x", 0, 1)));
    let warn = Diagnostic::warning(ErrorCode::E0009, Span::point(3));
    assert!(queue.push(warn.clone()));
    assert!(queue.push(warn));
    assert_eq!(queue.warning_count(), 2);
}

#[test]
fn test_same_code_and_span_deduplicated() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.push(err(ErrorCode::E0007, "unmatched", 3, 4)));
    assert!(!queue.push(err(ErrorCode::E0007, "unmatched again", 3, 4)));
    assert!(queue.push(err(ErrorCode::E0008, "unclosed", 3, 4)));
    assert!(queue.push(err(ErrorCode::E0007, "unmatched", 9, 5)));
    assert_eq!(queue.iter().count(), 3);
}

#[test]
fn test_flush_sorts_and_resets() {
    let mut queue = DiagnosticQueue::new();
    queue.push(err(ErrorCode::E0004, "heredoc", 20, 3));
    queue.push(err(ErrorCode::E0003, "first", 2, 1));
    queue.push(err(ErrorCode::E0003, "also line 3", 25, 3));

    let flushed = queue.flush();
    let messages: Vec<&str> = flushed.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, vec!["first", "heredoc", "also line 3"]);
    assert!(queue.is_empty());
    assert_eq!(queue.error_count(), 0);
    // The dedup set is cleared too.
    assert!(queue.push(err(ErrorCode::E0003, "first", 2, 1)));
}
