use super::*;

#[test]
fn test_ascii_pairs() {
    assert_eq!(closing_delimiter('('), Some(')'));
    assert_eq!(closing_delimiter('<'), Some('>'));
    assert_eq!(closing_delimiter('/'), None);
    assert_eq!(matching_close('|'), '|');
}

#[test]
fn test_unicode_pairs() {
    assert_eq!(matching_close('«'), '»');
    assert_eq!(matching_close('「'), '」');
    assert_eq!(matching_close('⦃'), '⦄');
    assert!(is_paired('⟦'));
    // Closers are not openers.
    assert!(!is_paired('»'));
}

#[test]
fn test_table_agrees_with_fast_path() {
    for &(open, close) in DELIMITER_PAIRS {
        assert_eq!(closing_delimiter(open), Some(close), "{open}");
    }
}
