use super::*;

#[test]
fn push_and_pop_restore_resume() {
    let mut stack = ExpectationStack::new();
    assert_eq!(stack.current(), Expect::Statement);
    stack.push('(', Expect::Term);
    assert_eq!(stack.current(), Expect::Term);
    stack.push_with_resume('{', Expect::Statement, Expect::Statement);
    assert_eq!(stack.depth(), 2);
    assert_eq!(stack.pop('}'), Ok(Expect::Statement));
    assert_eq!(stack.pop(')'), Ok(Expect::Operator));
    assert_eq!(stack.depth(), 0);
    assert_eq!(stack.total_opened(), 2);
}

#[test]
fn mismatched_close_leaves_stack_unchanged() {
    let mut stack = ExpectationStack::new();
    stack.push('[', Expect::Term);
    assert_eq!(
        stack.pop(')'),
        Err(Mismatch {
            found: ')',
            expected: Some(']')
        })
    );
    assert_eq!(stack.depth(), 1);
    assert_eq!(stack.current(), Expect::Term);
    assert_eq!(stack.pop(']'), Ok(Expect::Operator));
}

#[test]
fn close_on_empty_stack() {
    let mut stack = ExpectationStack::new();
    assert_eq!(
        stack.pop('}'),
        Err(Mismatch {
            found: '}',
            expected: None
        })
    );
}

#[test]
fn unicode_brackets_use_pair_table() {
    let mut stack = ExpectationStack::new();
    stack.push('«', Expect::Term);
    assert!(stack.pop('»').is_ok());
}

#[test]
fn truncate_reports_dropped_frames() {
    let mut stack = ExpectationStack::new();
    stack.push('(', Expect::Term);
    stack.push('[', Expect::Term);
    stack.push('{', Expect::Term);
    assert_eq!(stack.truncate(1), vec![('{', '}'), ('[', ']')]);
    assert_eq!(stack.depth(), 1);
    assert_eq!(stack.total_opened(), 3);
}

#[test]
fn wants_term() {
    assert!(Expect::Statement.wants_term());
    assert!(Expect::Ref.wants_term());
    assert!(!Expect::Operator.wants_term());
    assert_eq!(Expect::AttrBlock.to_string(), "attribute block");
}
