//! Numeric literal scanner.
//!
//! Pure functions over a byte slice that starts at the literal. The session
//! makes sure the whole literal is in the window before calling in, so the
//! scanner never sees a refill boundary. Reads past the slice see `0x00`.
//!
//! Integers accumulate in `u64`. On overflow the value continues in `f64`
//! and an advisory is recorded. A result that does not fit `i64` is returned
//! as a float.

use std::ops::Range;

use crate::lex_error::LexErrorKind;

/// Base of an integer literal.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Radix {
    Binary,
    Octal,
    Decimal,
    Hex,
}

impl Radix {
    pub fn base(self) -> u32 {
        match self {
            Radix::Binary => 2,
            Radix::Octal => 8,
            Radix::Decimal => 10,
            Radix::Hex => 16,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Radix::Binary => "binary",
            Radix::Octal => "octal",
            Radix::Decimal => "decimal",
            Radix::Hex => "hexadecimal",
        }
    }
}

/// Decoded literal value.
#[derive(Clone, Debug, PartialEq)]
pub enum NumberLiteral {
    Int(i64),
    Float(f64),
    /// Version string: one character per dotted component.
    VString(String),
}

/// A problem found while scanning, located relative to the literal start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberIssue {
    pub at: Range<usize>,
    pub kind: LexErrorKind,
}

/// Result of scanning one literal.
#[derive(Clone, Debug, PartialEq)]
pub struct NumberScan {
    pub literal: NumberLiteral,
    /// Bytes consumed.
    pub len: usize,
    pub issues: Vec<NumberIssue>,
}

#[inline]
fn at(src: &[u8], i: usize) -> u8 {
    src.get(i).copied().unwrap_or(0)
}

#[inline]
fn digit_value(b: u8) -> Option<u32> {
    char::from(b).to_digit(16)
}

/// Bytes that can belong to a numeric literal; the session refills while the
/// window ends inside such a run.
#[inline]
pub fn is_number_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'+' | b'-')
}

/// Scan a literal starting with a digit (or `.` followed by a digit).
pub fn scan_number(src: &[u8]) -> NumberScan {
    scan_signed_number(src, false)
}

/// Like [`scan_number`], for a literal preceded by a unary minus.
///
/// The sign is applied before the range check, so `-9223372036854775808`
/// is `Int(i64::MIN)`. Version strings are returned unsigned.
pub fn scan_signed_number(src: &[u8], negative: bool) -> NumberScan {
    if at(src, 0) == b'0' {
        match at(src, 1) {
            b'x' | b'X' => return scan_radix(src, 2, Radix::Hex, negative),
            b'b' | b'B' => return scan_radix(src, 2, Radix::Binary, negative),
            b'o' | b'O' => return scan_radix(src, 2, Radix::Octal, negative),
            b'0'..=b'9' | b'_' => return scan_radix(src, 1, Radix::Octal, negative),
            _ => {}
        }
    }
    scan_decimal(src, negative)
}

#[inline]
fn signed(value: f64, negative: bool) -> f64 {
    if negative {
        -value
    } else {
        value
    }
}

/// Integer accumulator that falls back to `f64` on overflow.
#[derive(Default)]
struct Accum {
    value: u64,
    float: f64,
    overflowed: bool,
}

impl Accum {
    /// Push one digit; returns `true` the first time the value overflows.
    fn push(&mut self, base: u32, digit: u32) -> bool {
        if self.overflowed {
            self.float = self.float * f64::from(base) + f64::from(digit);
            return false;
        }
        match self
            .value
            .checked_mul(u64::from(base))
            .and_then(|v| v.checked_add(u64::from(digit)))
        {
            Some(v) => {
                self.value = v;
                false
            }
            None => {
                #[allow(
                    clippy::cast_precision_loss,
                    reason = "overflowed literals are floats by definition"
                )]
                let so_far = self.value as f64;
                self.float = so_far * f64::from(base) + f64::from(digit);
                self.overflowed = true;
                true
            }
        }
    }

    fn finish(&self, negative: bool) -> NumberLiteral {
        if self.overflowed {
            return NumberLiteral::Float(signed(self.float, negative));
        }
        let int = if negative {
            0i64.checked_sub_unsigned(self.value)
        } else {
            i64::try_from(self.value).ok()
        };
        match int {
            Some(v) => NumberLiteral::Int(v),
            #[allow(clippy::cast_precision_loss, reason = "beyond i64 only a float can hold it")]
            None => NumberLiteral::Float(signed(self.value as f64, negative)),
        }
    }
}

fn scan_radix(src: &[u8], prefix: usize, radix: Radix, negative: bool) -> NumberScan {
    let base = radix.base();
    let mut issues = Vec::new();
    let mut acc = Accum::default();
    let mut digits = 0usize;
    let mut last_underscore = false;
    let mut i = prefix;

    loop {
        let c = at(src, i);
        if c == b'_' {
            if last_underscore {
                issues.push(NumberIssue {
                    at: i..i + 1,
                    kind: LexErrorKind::MisplacedUnderscore,
                });
            }
            last_underscore = true;
            i += 1;
            continue;
        }
        let Some(d) = digit_value(c) else { break };
        if d >= base {
            if c.is_ascii_digit() {
                issues.push(NumberIssue {
                    at: i..i + 1,
                    kind: LexErrorKind::IllegalDigit {
                        radix,
                        digit: char::from(c),
                    },
                });
                // The rest of the digit run belongs to the broken literal.
                while at(src, i).is_ascii_digit() || at(src, i) == b'_' {
                    i += 1;
                }
                last_underscore = false;
            }
            break;
        }
        if acc.push(base, d) {
            issues.push(NumberIssue {
                at: 0..i + 1,
                kind: LexErrorKind::IntegerOverflow { radix },
            });
        }
        digits += 1;
        last_underscore = false;
        i += 1;
    }
    if last_underscore {
        issues.push(NumberIssue {
            at: i - 1..i,
            kind: LexErrorKind::MisplacedUnderscore,
        });
    }

    if radix == Radix::Hex {
        if let Some((value, end)) = scan_hex_float_tail(src, i, &acc) {
            return NumberScan {
                literal: NumberLiteral::Float(signed(value, negative)),
                len: end,
                issues,
            };
        }
    }

    // Legacy octal: the leading `0` itself is a digit.
    if digits == 0 && prefix == 2 {
        issues.push(NumberIssue {
            at: 0..i,
            kind: LexErrorKind::NoDigits { radix },
        });
        return NumberScan {
            literal: NumberLiteral::Int(0),
            len: i,
            issues,
        };
    }

    NumberScan {
        literal: acc.finish(negative),
        len: i,
        issues,
    }
}

/// `.HHH` fraction and/or `p[+-]DDD` exponent of a hex float.
///
/// Returns `None` when no binary exponent follows, in which case the
/// integer part stands alone.
fn scan_hex_float_tail(src: &[u8], start: usize, acc: &Accum) -> Option<(f64, usize)> {
    let mut i = start;
    #[allow(clippy::cast_precision_loss, reason = "hex floats are floats")]
    let mut mantissa = if acc.overflowed {
        acc.float
    } else {
        acc.value as f64
    };
    let mut scale = 0i32;
    if at(src, i) == b'.' && digit_value(at(src, i + 1)).is_some() {
        i += 1;
        while let Some(d) = digit_value(at(src, i)).or_else(|| (at(src, i) == b'_').then_some(16))
        {
            if d < 16 {
                mantissa = mantissa * 16.0 + f64::from(d);
                scale -= 4;
            }
            i += 1;
        }
    }
    if !matches!(at(src, i), b'p' | b'P') {
        return None;
    }
    i += 1;
    let negative = match at(src, i) {
        b'-' => {
            i += 1;
            true
        }
        b'+' => {
            i += 1;
            false
        }
        _ => false,
    };
    if !at(src, i).is_ascii_digit() {
        return None;
    }
    let mut exp = 0i32;
    while at(src, i).is_ascii_digit() || at(src, i) == b'_' {
        if let Some(d) = char::from(at(src, i)).to_digit(10) {
            exp = exp.saturating_mul(10).saturating_add(i32::try_from(d).unwrap_or(0));
        }
        i += 1;
    }
    if negative {
        exp = -exp;
    }
    Some((mantissa * 2f64.powi(exp.saturating_add(scale)), i))
}

fn scan_decimal(src: &[u8], negative: bool) -> NumberScan {
    let mut issues = Vec::new();
    let mut acc = Accum::default();
    let mut text = String::new();
    let mut i = 0;
    let mut int_digits = 0usize;
    let mut last_underscore = false;

    while at(src, i).is_ascii_digit() || at(src, i) == b'_' {
        let c = at(src, i);
        if c == b'_' {
            if last_underscore {
                issues.push(NumberIssue {
                    at: i..i + 1,
                    kind: LexErrorKind::MisplacedUnderscore,
                });
            }
            last_underscore = true;
        } else {
            if acc.push(10, u32::from(c - b'0')) {
                issues.push(NumberIssue {
                    at: 0..i + 1,
                    kind: LexErrorKind::IntegerOverflow {
                        radix: Radix::Decimal,
                    },
                });
            }
            text.push(char::from(c));
            int_digits += 1;
            last_underscore = false;
        }
        i += 1;
    }

    // `1.2.3` is a version string.
    if int_digits > 0 && at(src, i) == b'.' && at(src, i + 1).is_ascii_digit() {
        let mut j = i + 1;
        while at(src, j).is_ascii_digit() || at(src, j) == b'_' {
            j += 1;
        }
        if at(src, j) == b'.' && at(src, j + 1).is_ascii_digit() {
            return scan_vstring_components(src, 0, issues);
        }
    }

    let mut is_float = false;
    if at(src, i) == b'.' && at(src, i + 1).is_ascii_digit() {
        is_float = true;
        text.push('.');
        i += 1;
        while at(src, i).is_ascii_digit() || at(src, i) == b'_' {
            if at(src, i) != b'_' {
                text.push(char::from(at(src, i)));
            }
            i += 1;
        }
    }
    if matches!(at(src, i), b'e' | b'E') {
        let sign = matches!(at(src, i + 1), b'+' | b'-');
        let first = if sign { i + 2 } else { i + 1 };
        if at(src, first).is_ascii_digit() {
            is_float = true;
            text.push('e');
            if sign {
                text.push(char::from(at(src, i + 1)));
            }
            i = first;
            while at(src, i).is_ascii_digit() || at(src, i) == b'_' {
                if at(src, i) != b'_' {
                    text.push(char::from(at(src, i)));
                }
                i += 1;
            }
        }
    }
    if last_underscore && !is_float {
        issues.push(NumberIssue {
            at: i - 1..i,
            kind: LexErrorKind::MisplacedUnderscore,
        });
    }

    let literal = if is_float {
        if text.starts_with('.') {
            text.insert(0, '0');
        }
        NumberLiteral::Float(signed(text.parse().unwrap_or(0.0), negative))
    } else {
        acc.finish(negative)
    };
    NumberScan {
        literal,
        len: i,
        issues,
    }
}

/// Scan `v1.2.3` / `v65`; `src` starts at the `v`.
pub fn scan_vstring(src: &[u8]) -> NumberScan {
    scan_vstring_components(src, 1, Vec::new())
}

/// Whether `src` (starting at `v`) begins a version string.
pub fn starts_vstring(src: &[u8]) -> bool {
    at(src, 0) == b'v' && at(src, 1).is_ascii_digit()
}

fn scan_vstring_components(src: &[u8], start: usize, mut issues: Vec<NumberIssue>) -> NumberScan {
    let mut out = String::new();
    let mut i = start;
    loop {
        let first = i;
        let mut value = 0u32;
        while at(src, i).is_ascii_digit() || at(src, i) == b'_' {
            if let Some(d) = char::from(at(src, i)).to_digit(10) {
                value = value.saturating_mul(10).saturating_add(d);
            }
            i += 1;
        }
        match char::from_u32(value) {
            Some(c) => out.push(c),
            None => {
                issues.push(NumberIssue {
                    at: first..i,
                    kind: LexErrorKind::CodePointOutOfRange {
                        text: value.to_string(),
                    },
                });
                out.push('\0');
            }
        }
        if at(src, i) == b'.' && at(src, i + 1).is_ascii_digit() {
            i += 1;
        } else {
            break;
        }
    }
    NumberScan {
        literal: NumberLiteral::VString(out),
        len: i,
        issues,
    }
}
