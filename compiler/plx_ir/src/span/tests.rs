use super::*;

#[test]
fn test_len_and_contains() {
    let span = Span::new(10, 20);
    assert_eq!(span.len(), 10);
    assert!(!span.is_empty());
    assert!(span.contains(15));
    assert!(!span.contains(20));
}

#[test]
fn test_to_covers_both() {
    assert_eq!(Span::new(10, 20).to(Span::new(15, 30)), Span::new(10, 30));
    assert_eq!(Span::new(15, 30).to(Span::new(10, 12)), Span::new(10, 30));
}

#[test]
fn test_point() {
    let p = Span::point(7);
    assert!(p.is_empty());
    assert_eq!(p.range(), 7..7);
    assert_eq!(Span::DUMMY, Span::point(0));
}

#[test]
fn test_within_offsets_by_base() {
    assert_eq!(Span::within(100, 2..5), Span::new(102, 105));
    assert_eq!(Span::within(u32::MAX - 1, 0..4), Span::new(u32::MAX - 1, u32::MAX));
}

#[test]
fn test_debug_format() {
    assert_eq!(format!("{:?}", Span::new(1, 4)), "1..4");
}
