//! Quote delimiter pairs.
//!
//! Opening delimiters in this table nest and close with their partner. Any
//! other character closes with itself and never nests.

/// Paired delimiters: `(open, close)`.
///
/// ASCII brackets first, then the allow-listed Unicode brackets.
pub const DELIMITER_PAIRS: &[(char, char)] = &[
    ('(', ')'),
    ('[', ']'),
    ('{', '}'),
    ('<', '>'),
    ('\u{ab}', '\u{bb}'),     // « »
    ('\u{2039}', '\u{203a}'), // ‹ ›
    ('\u{300c}', '\u{300d}'), // 「 」
    ('\u{300e}', '\u{300f}'), // 『 』
    ('\u{3010}', '\u{3011}'), // 【 】
    ('\u{3008}', '\u{3009}'), // 〈 〉
    ('\u{300a}', '\u{300b}'), // 《 》
    ('\u{27e8}', '\u{27e9}'), // ⟨ ⟩
    ('\u{27e6}', '\u{27e7}'), // ⟦ ⟧
    ('\u{2983}', '\u{2984}'), // ⦃ ⦄
];

/// Closing partner of a paired opening delimiter.
pub fn closing_delimiter(open: char) -> Option<char> {
    if open.is_ascii() {
        return match open {
            '(' => Some(')'),
            '[' => Some(']'),
            '{' => Some('}'),
            '<' => Some('>'),
            _ => None,
        };
    }
    DELIMITER_PAIRS
        .iter()
        .find(|&&(o, _)| o == open)
        .map(|&(_, c)| c)
}

/// Character that ends text opened by `open`.
#[inline]
pub fn matching_close(open: char) -> char {
    closing_delimiter(open).unwrap_or(open)
}

/// Whether `open` nests (appears in the pair table).
#[inline]
pub fn is_paired(open: char) -> bool {
    closing_delimiter(open).is_some()
}

#[cfg(test)]
mod tests;
