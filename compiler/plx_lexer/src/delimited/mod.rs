//! Delimited-text scanner.
//!
//! Reads the body of `'...'`, `q(...)`, `m{...}`, the parts of `s///` and
//! `tr///`, and every other construct whose extent is given by a delimiter.
//! Paired delimiters nest; any other character closes with itself. The
//! scanner pulls from the stream whenever the window runs out, so a body may
//! span any number of refills.

use plx_lexer_core::{char_class, is_paired, matching_close, BufferError, SourceBuffer};

/// Failure while scanning delimited text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DelimError {
    #[error("can't find string terminator \"{close}\" anywhere before EOF")]
    Unterminated {
        close: char,
        start_line: u32,
        /// Absolute offset of the opening delimiter.
        open_pos: u32,
    },
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// State of one delimited scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelimScan {
    pub open: char,
    pub close: char,
    /// Nesting depth of paired delimiters inside the body.
    pub depth: u32,
    /// Include the outer delimiters in the text.
    pub keep_delims: bool,
    /// Keep the backslash of `\<delim>`.
    pub keep_bracketed_quoted: bool,
    pub start_line: u32,
    pub open_pos: u32,
}

impl DelimScan {
    pub fn new(open: char, start_line: u32, open_pos: u32) -> Self {
        DelimScan {
            open,
            close: matching_close(open),
            depth: 0,
            keep_delims: false,
            keep_bracketed_quoted: false,
            start_line,
            open_pos,
        }
    }

    #[must_use]
    pub fn with_keep_delims(mut self, keep: bool) -> Self {
        self.keep_delims = keep;
        self
    }

    #[must_use]
    pub fn with_keep_bracketed_quoted(mut self, keep: bool) -> Self {
        self.keep_bracketed_quoted = keep;
        self
    }

    fn unterminated(&self) -> DelimError {
        DelimError::Unterminated {
            close: self.close,
            start_line: self.start_line,
            open_pos: self.open_pos,
        }
    }
}

/// Text read by [`scan`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delimited {
    pub text: String,
    pub open: char,
    pub close: char,
    pub start_line: u32,
    /// Absolute offset of the opening delimiter.
    pub open_pos: u32,
}

/// Decode the character at `pos`, refilling first.
fn next_char(buf: &mut SourceBuffer, pos: usize) -> Result<Option<(char, usize)>, BufferError> {
    buf.ensure_offset(pos + 3)?;
    if pos >= buf.end() {
        return Ok(None);
    }
    Ok(Some(
        buf.char_at(pos).unwrap_or((char::REPLACEMENT_CHARACTER, 1)),
    ))
}

/// Skip whitespace, and comments that follow whitespace.
///
/// A `#` directly after the operator is a delimiter, not a comment.
pub fn skip_space(buf: &mut SourceBuffer) -> Result<(), BufferError> {
    let mut skipped = false;
    loop {
        buf.ensure(1)?;
        let b = buf.current();
        if char_class::is_space(b) {
            buf.advance(1);
            skipped = true;
        } else if b == b'#' && skipped {
            match buf.line_end_from(buf.cursor())? {
                Some(end) => buf.advance_to(end),
                None => return Ok(()),
            }
        } else {
            return Ok(());
        }
    }
}

/// Scan delimited text starting at the cursor (after optional whitespace).
///
/// On success the cursor sits just past the closing delimiter.
pub fn scan(
    buf: &mut SourceBuffer,
    keep_delims: bool,
    keep_bracketed_quoted: bool,
) -> Result<Delimited, DelimError> {
    skip_space(buf)?;
    let start_line = buf.line();
    let open_pos = buf.position();
    let Some((open, width)) = next_char(buf, buf.cursor())? else {
        return Err(DelimError::Unterminated {
            close: '\0',
            start_line,
            open_pos,
        });
    };
    buf.advance(width);
    let mut desc = DelimScan::new(open, start_line, open_pos)
        .with_keep_delims(keep_delims)
        .with_keep_bracketed_quoted(keep_bracketed_quoted);
    let text = scan_body(buf, &mut desc)?;
    Ok(Delimited {
        text,
        open,
        close: desc.close,
        start_line,
        open_pos,
    })
}

/// Continue a scan whose opening delimiter was already consumed.
///
/// Used directly for the second part of `s/a/b/` and `tr/a/b/`, where the
/// middle delimiter both closes the first part and opens the second.
pub fn scan_body(buf: &mut SourceBuffer, desc: &mut DelimScan) -> Result<String, DelimError> {
    let mut text = String::new();
    if desc.keep_delims {
        text.push(desc.open);
    }
    let nests = is_paired(desc.open);
    let mut pos = buf.cursor();
    loop {
        let Some((c, width)) = next_char(buf, pos)? else {
            return Err(desc.unterminated());
        };
        pos += width;
        if c == '\\' {
            let Some((escaped, w)) = next_char(buf, pos)? else {
                return Err(desc.unterminated());
            };
            pos += w;
            let is_delim = escaped == desc.open || escaped == desc.close;
            if !is_delim || desc.keep_bracketed_quoted {
                text.push('\\');
            }
            text.push(escaped);
            continue;
        }
        if nests && c == desc.open {
            desc.depth += 1;
        } else if c == desc.close {
            if desc.depth == 0 {
                if desc.keep_delims {
                    text.push(desc.close);
                }
                buf.advance_to(pos);
                return Ok(text);
            }
            desc.depth -= 1;
        }
        text.push(c);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
