//! Named characters for `\N{NAME}`.
//!
//! ASCII letters and digits are named algorithmically; everything else comes
//! from a small table of names that show up in scripts.

const NAMED: &[(&str, char)] = &[
    ("NULL", '\0'),
    ("CHARACTER TABULATION", '\t'),
    ("LINE FEED", '\n'),
    ("CARRIAGE RETURN", '\r'),
    ("ESCAPE", '\u{1B}'),
    ("SPACE", ' '),
    ("EXCLAMATION MARK", '!'),
    ("QUOTATION MARK", '"'),
    ("NUMBER SIGN", '#'),
    ("DOLLAR SIGN", '$'),
    ("PERCENT SIGN", '%'),
    ("AMPERSAND", '&'),
    ("APOSTROPHE", '\''),
    ("LEFT PARENTHESIS", '('),
    ("RIGHT PARENTHESIS", ')'),
    ("ASTERISK", '*'),
    ("PLUS SIGN", '+'),
    ("COMMA", ','),
    ("HYPHEN-MINUS", '-'),
    ("FULL STOP", '.'),
    ("SOLIDUS", '/'),
    ("COLON", ':'),
    ("SEMICOLON", ';'),
    ("LESS-THAN SIGN", '<'),
    ("EQUALS SIGN", '='),
    ("GREATER-THAN SIGN", '>'),
    ("QUESTION MARK", '?'),
    ("COMMERCIAL AT", '@'),
    ("REVERSE SOLIDUS", '\\'),
    ("LOW LINE", '_'),
    ("GRAVE ACCENT", '`'),
    ("TILDE", '~'),
    ("NO-BREAK SPACE", '\u{A0}'),
    ("SECTION SIGN", '§'),
    ("COPYRIGHT SIGN", '©'),
    ("LEFT-POINTING DOUBLE ANGLE QUOTATION MARK", '«'),
    ("REGISTERED SIGN", '®'),
    ("DEGREE SIGN", '°'),
    ("PLUS-MINUS SIGN", '±'),
    ("MICRO SIGN", 'µ'),
    ("PILCROW SIGN", '¶'),
    ("MIDDLE DOT", '·'),
    ("RIGHT-POINTING DOUBLE ANGLE QUOTATION MARK", '»'),
    ("MULTIPLICATION SIGN", '×'),
    ("DIVISION SIGN", '÷'),
    ("LATIN SMALL LETTER SHARP S", 'ß'),
    ("LATIN SMALL LETTER E WITH ACUTE", 'é'),
    ("LATIN CAPITAL LETTER E WITH ACUTE", 'É'),
    ("GREEK SMALL LETTER ALPHA", 'α'),
    ("GREEK SMALL LETTER BETA", 'β'),
    ("GREEK SMALL LETTER GAMMA", 'γ'),
    ("GREEK SMALL LETTER DELTA", 'δ'),
    ("GREEK SMALL LETTER LAMDA", 'λ'),
    ("GREEK SMALL LETTER PI", 'π'),
    ("GREEK CAPITAL LETTER SIGMA", 'Σ'),
    ("GREEK CAPITAL LETTER OMEGA", 'Ω'),
    ("EN DASH", '–'),
    ("EM DASH", '—'),
    ("LEFT SINGLE QUOTATION MARK", '‘'),
    ("RIGHT SINGLE QUOTATION MARK", '’'),
    ("LEFT DOUBLE QUOTATION MARK", '“'),
    ("RIGHT DOUBLE QUOTATION MARK", '”'),
    ("BULLET", '•'),
    ("HORIZONTAL ELLIPSIS", '…'),
    ("EURO SIGN", '€'),
    ("TRADE MARK SIGN", '™'),
    ("LEFTWARDS ARROW", '←'),
    ("RIGHTWARDS ARROW", '→'),
    ("INFINITY", '∞'),
    ("CHECK MARK", '✓'),
    ("BLACK HEART SUIT", '♥'),
    ("WHITE SMILING FACE", '☺'),
    ("SNOWMAN", '☃'),
    ("REPLACEMENT CHARACTER", '\u{FFFD}'),
];

const DIGITS: [&str; 10] = [
    "ZERO", "ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT", "NINE",
];

/// Resolve a character name. Matching ignores ASCII case.
pub fn lookup(name: &str) -> Option<char> {
    let name = name.trim().to_ascii_uppercase();
    if let Some(letter) = name
        .strip_prefix("LATIN SMALL LETTER ")
        .and_then(single_ascii_letter)
    {
        return Some(letter.to_ascii_lowercase());
    }
    if let Some(letter) = name
        .strip_prefix("LATIN CAPITAL LETTER ")
        .and_then(single_ascii_letter)
    {
        return Some(letter);
    }
    if let Some(digit) = name.strip_prefix("DIGIT ") {
        return DIGITS
            .iter()
            .position(|&d| d == digit)
            .and_then(|i| char::from_digit(u32::try_from(i).ok()?, 10));
    }
    NAMED
        .iter()
        .find(|&&(known, _)| known == name)
        .map(|&(_, c)| c)
}

fn single_ascii_letter(rest: &str) -> Option<char> {
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_uppercase() => Some(c),
        _ => None,
    }
}
