//! Escape processing for quoted text.
//!
//! Three entry points, one per kind of body:
//! - [`cook_run`]: double-quote-like text, one literal run at a time. The run
//!   ends at an interpolation trigger or a case modifier so the session can
//!   hand control to the interpolation states.
//! - [`single_quote`]: `'...'` and `q//` text.
//! - [`expand_tr`]: transliteration operands with `a-z` ranges.
//!
//! Problems are collected as [`EscapeIssue`]s with byte ranges relative to
//! the text; the session locates and reports them.

mod charnames;

use std::ops::Range;

use crate::lex_error::LexErrorKind;
use plx_lexer_core::char_class::is_ident_start;

pub use charnames::lookup as lookup_charname;

/// Why a literal run ended.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Stop {
    /// End of text.
    End,
    /// `$` or `@` starting an interpolated expression.
    Interpolate,
    /// `\U \L \u \l \Q \F \E`.
    CaseMod,
}

/// A problem inside an escape sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscapeIssue {
    pub at: Range<usize>,
    pub kind: LexErrorKind,
}

/// One processed literal run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cooked {
    pub text: String,
    /// Source bytes consumed; the stop point when `stop` is not `End`.
    pub consumed: usize,
    pub stop: Stop,
    pub issues: Vec<EscapeIssue>,
}

/// Escapes with a fixed one-character meaning.
#[inline]
fn resolve_simple_escape(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        'f' => Some('\u{0C}'),
        'b' => Some('\u{08}'),
        'a' => Some('\u{07}'),
        'e' => Some('\u{1B}'),
        _ => None,
    }
}

/// Is the backslash escape `c` a case modifier?
#[inline]
pub fn is_case_mod_escape(c: u8) -> bool {
    matches!(c, b'U' | b'L' | b'u' | b'l' | b'Q' | b'F' | b'E')
}

/// Does an interpolated expression start at byte `i` of `src`?
///
/// `$` or `@` followed by an identifier start, `{`, `::` or `$`; `$` also
/// before a digit or `&`.
pub fn trigger_at(src: &str, i: usize) -> bool {
    let bytes = src.as_bytes();
    let sigil = bytes.get(i).copied();
    if !matches!(sigil, Some(b'$' | b'@')) {
        return false;
    }
    let Some(next) = src.get(i + 1..).and_then(|rest| rest.chars().next()) else {
        return false;
    };
    match next {
        '{' | '$' => true,
        ':' => bytes.get(i + 2) == Some(&b':'),
        '&' => sigil == Some(b'$'),
        c if c.is_ascii_digit() => sigil == Some(b'$'),
        c => is_ident_start(c),
    }
}

/// Process one literal run of double-quote-like text.
///
/// With `interpolate` unset, `$` and `@` are ordinary characters and case
/// modifiers are unknown escapes.
pub fn cook_run(src: &str, interpolate: bool) -> Cooked {
    let bytes = src.as_bytes();
    let mut text = String::with_capacity(src.len());
    let mut issues = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if interpolate && trigger_at(src, i) {
            return Cooked {
                text,
                consumed: i,
                stop: Stop::Interpolate,
                issues,
            };
        }
        if b == b'\\' {
            if interpolate && bytes.get(i + 1).copied().is_some_and(is_case_mod_escape) {
                return Cooked {
                    text,
                    consumed: i,
                    stop: Stop::CaseMod,
                    issues,
                };
            }
            i = escape(src, i, &mut text, &mut issues);
            continue;
        }
        let Some(c) = src[i..].chars().next() else {
            break;
        };
        text.push(c);
        i += c.len_utf8();
    }
    Cooked {
        text,
        consumed: bytes.len(),
        stop: Stop::End,
        issues,
    }
}

/// Process the escape whose backslash is at `start`; returns the offset
/// after it.
fn escape(src: &str, start: usize, out: &mut String, issues: &mut Vec<EscapeIssue>) -> usize {
    let bytes = src.as_bytes();
    let mut i = start + 1;
    let Some(e) = src.get(i..).and_then(|rest| rest.chars().next()) else {
        out.push('\\');
        return i;
    };
    i += e.len_utf8();
    if let Some(c) = resolve_simple_escape(e) {
        out.push(c);
        return i;
    }
    match e {
        '0'..='7' => {
            let mut end = start + 1;
            while end < bytes.len() && end < start + 4 && (b'0'..=b'7').contains(&bytes[end]) {
                end += 1;
            }
            let value = parse_code(&src[start + 1..end], 8);
            push_code(out, value, src, start..end, issues);
            end
        }
        'x' if bytes.get(i) == Some(&b'{') => braced(src, start, i, 16, out, issues),
        'x' => {
            let mut end = i;
            while end < bytes.len() && end < i + 2 && bytes[end].is_ascii_hexdigit() {
                end += 1;
            }
            let value = parse_code(&src[i..end], 16);
            push_code(out, value, src, start..end, issues);
            end
        }
        'o' if bytes.get(i) == Some(&b'{') => braced(src, start, i, 8, out, issues),
        'N' if bytes.get(i) == Some(&b'{') => named(src, start, i, out, issues),
        'c' => {
            let Some(x) = src.get(i..).and_then(|rest| rest.chars().next()) else {
                out.push('c');
                return i;
            };
            let code = u32::from(x.to_ascii_uppercase()) ^ 64;
            push_code(out, Some(code), src, start..i + x.len_utf8(), issues);
            i + x.len_utf8()
        }
        c if c.is_alphanumeric() => {
            issues.push(EscapeIssue {
                at: start..i,
                kind: LexErrorKind::UnrecognizedEscape { escape: c },
            });
            out.push(c);
            i
        }
        c => {
            out.push(c);
            i
        }
    }
}

/// `\x{...}` or `\o{...}` with the brace at `open`.
fn braced(
    src: &str,
    start: usize,
    open: usize,
    radix: u32,
    out: &mut String,
    issues: &mut Vec<EscapeIssue>,
) -> usize {
    let Some(len) = src[open..].find('}') else {
        // No closing brace: read the digits that follow.
        let digits_end = src[open + 1..]
            .find(|c: char| !c.is_digit(radix) && c != '_')
            .map_or(src.len(), |n| open + 1 + n);
        let value = parse_code(&src[open + 1..digits_end], radix);
        push_code(out, value, src, start..digits_end, issues);
        return digits_end;
    };
    let end = open + len + 1;
    let value = parse_code(&src[open + 1..open + len], radix);
    push_code(out, value, src, start..end, issues);
    end
}

/// `\N{U+XXXX}` or `\N{NAME}` with the brace at `open`.
fn named(
    src: &str,
    start: usize,
    open: usize,
    out: &mut String,
    issues: &mut Vec<EscapeIssue>,
) -> usize {
    let Some(len) = src[open..].find('}') else {
        issues.push(EscapeIssue {
            at: start..open,
            kind: LexErrorKind::UnknownCharName {
                name: src[open + 1..].to_string(),
            },
        });
        out.push('\0');
        return src.len();
    };
    let end = open + len + 1;
    let name = &src[open + 1..open + len];
    if let Some(hex) = name.strip_prefix("U+") {
        push_code(out, parse_code(hex, 16), src, start..end, issues);
    } else if let Some(c) = charnames::lookup(name) {
        out.push(c);
    } else {
        issues.push(EscapeIssue {
            at: start..end,
            kind: LexErrorKind::UnknownCharName {
                name: name.to_string(),
            },
        });
        out.push('\0');
    }
    end
}

/// Parse digits with `_` separators; `None` on overflow. No digits is 0.
fn parse_code(digits: &str, radix: u32) -> Option<u32> {
    let mut value: u32 = 0;
    for c in digits.trim().chars() {
        if c == '_' {
            continue;
        }
        let Some(d) = c.to_digit(radix) else {
            break;
        };
        value = value.checked_mul(radix)?.checked_add(d)?;
    }
    Some(value)
}

fn push_code(
    out: &mut String,
    code: Option<u32>,
    src: &str,
    at: Range<usize>,
    issues: &mut Vec<EscapeIssue>,
) {
    if let Some(c) = code.and_then(char::from_u32) {
        out.push(c);
        return;
    }
    issues.push(EscapeIssue {
        kind: LexErrorKind::CodePointOutOfRange {
            text: src[at.clone()].to_string(),
        },
        at,
    });
    out.push('\0');
}

/// Body of single-quote-like text: only `\\` collapses.
///
/// Backslashed delimiters were already collapsed by the delimited scanner.
pub fn single_quote(text: &str) -> String {
    if !text.contains("\\\\") {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == '\\' && chars.peek() == Some(&'\\') {
            chars.next();
        }
    }
    out
}

/// Expand a transliteration operand.
///
/// Escapes are processed first; an escaped `-` is literal. `low-high` becomes
/// the inclusive range. A reversed range is an error.
pub fn expand_tr(text: &str) -> Result<(String, Vec<EscapeIssue>), LexErrorKind> {
    // (char, came from an escape)
    let mut items: Vec<(char, bool)> = Vec::with_capacity(text.len());
    let mut issues = Vec::new();
    let mut i = 0;
    while i < text.len() {
        if text.as_bytes()[i] == b'\\' {
            let mut decoded = String::new();
            i = escape(text, i, &mut decoded, &mut issues);
            items.extend(decoded.chars().map(|c| (c, true)));
            continue;
        }
        let Some(c) = text[i..].chars().next() else {
            break;
        };
        items.push((c, false));
        i += c.len_utf8();
    }

    let mut out = String::with_capacity(items.len());
    let mut k = 0;
    while k < items.len() {
        let (low, _) = items[k];
        if let (Some(&('-', false)), Some(&(high, _))) = (items.get(k + 1), items.get(k + 2)) {
            if low > high {
                return Err(LexErrorKind::InvalidTransRange { low, high });
            }
            out.extend((u32::from(low)..=u32::from(high)).filter_map(char::from_u32));
            k += 3;
        } else {
            out.push(low);
            k += 1;
        }
    }
    Ok((out, issues))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
