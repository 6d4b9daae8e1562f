//! Identifier scanning over the refillable window.
//!
//! Words are ASCII or (in UTF-8 mode) Unicode identifiers joined by `::`.
//! A trailing `::` belongs to the word (`Foo::` names a package).

use plx_lexer_core::char_class::{
    is_ident_continue, is_ident_continue_byte, is_ident_start, is_ident_start_byte,
};
use plx_lexer_core::{BufferError, SourceBuffer};

/// Width of the identifier character at `off`, if there is one.
fn ident_char(
    buf: &mut SourceBuffer,
    off: usize,
    start: bool,
) -> Result<Option<usize>, BufferError> {
    buf.ensure_offset(off + 3)?;
    let b = buf.byte_at(off);
    if b < 0x80 || !buf.is_utf8() {
        let ok = if start {
            is_ident_start_byte(b)
        } else {
            is_ident_continue_byte(b)
        };
        return Ok(ok.then_some(1));
    }
    Ok(buf
        .char_at(off)
        .filter(|&(c, _)| {
            if start {
                is_ident_start(c)
            } else {
                is_ident_continue(c)
            }
        })
        .map(|(_, width)| width))
}

/// Does an identifier start at `off`?
pub fn starts_ident(buf: &mut SourceBuffer, off: usize) -> Result<bool, BufferError> {
    Ok(ident_char(buf, off, true)?.is_some())
}

/// Is `::` at `off`?
pub fn at_package_sep(buf: &mut SourceBuffer, off: usize) -> Result<bool, BufferError> {
    buf.ensure_offset(off + 1)?;
    Ok(buf.byte_at(off) == b':' && buf.byte_at(off + 1) == b':')
}

/// End offset of the word starting at `from` (equal to `from` if none).
///
/// With `packages`, `::` separators (including a leading one) are part of
/// the word.
pub fn scan_word(buf: &mut SourceBuffer, from: usize, packages: bool) -> Result<usize, BufferError> {
    let mut pos = from;
    if packages && at_package_sep(buf, pos)? {
        pos += 2;
    }
    while let Some(width) = ident_char(buf, pos, true)? {
        pos += width;
        while let Some(width) = ident_char(buf, pos, false)? {
            pos += width;
        }
        if !(packages && at_package_sep(buf, pos)?) {
            break;
        }
        pos += 2;
    }
    Ok(pos)
}

/// End offset of an ASCII digit run starting at `from`.
pub fn scan_digits(buf: &mut SourceBuffer, from: usize) -> Result<usize, BufferError> {
    let mut pos = from;
    loop {
        buf.ensure_offset(pos)?;
        if !buf.byte_at(pos).is_ascii_digit() {
            return Ok(pos);
        }
        pos += 1;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
