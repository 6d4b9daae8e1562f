//! Character classes shared by the scanners.

#[inline]
pub fn is_ident_start_byte(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

#[inline]
pub fn is_ident_continue_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Identifier start, including non-ASCII letters.
#[inline]
pub fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

#[inline]
pub fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Horizontal or vertical whitespace that separates tokens.
#[inline]
pub fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0C)
}

#[inline]
pub fn is_horizontal_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ident_classes() {
        assert!(is_ident_start_byte(b'_'));
        assert!(!is_ident_start_byte(b'1'));
        assert!(is_ident_continue_byte(b'1'));
        assert!(is_ident_start('é'));
        assert!(!is_ident_start('$'));
    }

    #[test]
    fn test_space() {
        assert!(is_space(b'\n'));
        assert!(!is_horizontal_space(b'\n'));
        assert!(!is_space(0));
    }
}
