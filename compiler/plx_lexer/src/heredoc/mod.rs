//! Heredoc scanner.
//!
//! `<<TAG`, `<<"TAG"`, `<<'TAG'`, `` <<`TAG` `` and the `<<~` indented forms.
//! The tag is read where the operator appears; the body starts after the end
//! of that line and runs to a line holding only the terminator. The body and
//! terminator line are then cut out of the window with
//! [`SourceBuffer::excise`], so the lexer resumes right after the tag and
//! meets the rest of the line as if the body had never been there.

use plx_lexer_core::{char_class, BufferError, SourceBuffer};

/// How the heredoc tag was quoted.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum HeredocQuote {
    /// `<<TAG`: interpolating.
    Bare,
    /// `<<'TAG'`: literal body.
    Single,
    /// `<<"TAG"`: interpolating.
    Double,
    /// `` <<`TAG` ``: interpolating command.
    Backtick,
}

impl HeredocQuote {
    pub fn interpolates(self) -> bool {
        !matches!(self, HeredocQuote::Single)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeredocSpec {
    pub terminator: String,
    /// `<<~`: strip the terminator's indentation from every line.
    pub indented: bool,
    pub quote: HeredocQuote,
    /// Line holding the `<<` operator.
    pub origin_line: u32,
}

/// A parsed `<<` tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeredocTag {
    pub spec: HeredocSpec,
    /// Window offset just past the tag.
    pub end: usize,
    /// `<<` followed by neither a quote nor an identifier.
    pub empty_tag: bool,
}

/// A located heredoc body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeredocBody {
    pub text: String,
    /// Line of the first body line.
    pub line: u32,
    /// Absolute offset of the first body byte.
    pub base: u32,
    /// The body was not complete in the window and lines were pulled from
    /// the stream.
    pub refilled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HeredocError {
    #[error("heredoc terminator not found")]
    Unterminated,
    #[error("indentation on line {line} doesn't match delimiter")]
    Indent { line: u32 },
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Parse the tag of a heredoc whose `<<` starts at `from`.
///
/// Returns `None` when the text after `<<` cannot start a heredoc (a digit or
/// an operator), leaving the caller to lex `<<` as an operator.
pub fn parse_tag(
    buf: &mut SourceBuffer,
    from: usize,
    origin_line: u32,
) -> Result<Option<HeredocTag>, BufferError> {
    let mut pos = from + 2;
    buf.ensure_offset(pos + 1)?;
    let indented = buf.byte_at(pos) == b'~';
    if indented {
        pos += 1;
    }
    let mut quoted_from = pos;
    while char_class::is_horizontal_space(buf.byte_at(quoted_from)) {
        quoted_from += 1;
        buf.ensure_offset(quoted_from)?;
    }
    let quote = match buf.byte_at(quoted_from) {
        b'"' => Some(HeredocQuote::Double),
        b'\'' => Some(HeredocQuote::Single),
        b'`' => Some(HeredocQuote::Backtick),
        _ => None,
    };
    let spec = |terminator: String, quote| HeredocSpec {
        terminator,
        indented,
        quote,
        origin_line,
    };
    if let Some(quote) = quote {
        let q = buf.byte_at(quoted_from);
        let open = quoted_from + 1;
        let mut close = open;
        loop {
            buf.ensure_offset(close)?;
            if close >= buf.end() || buf.byte_at(close) == b'\n' {
                return Ok(None);
            }
            if buf.byte_at(close) == q {
                break;
            }
            close += 1;
        }
        return Ok(Some(HeredocTag {
            spec: spec(buf.text(open, close), quote),
            end: close + 1,
            empty_tag: false,
        }));
    }
    let word_end = crate::ident::scan_word(buf, pos, false)?;
    if word_end > pos {
        return Ok(Some(HeredocTag {
            spec: spec(buf.text(pos, word_end), HeredocQuote::Bare),
            end: word_end,
            empty_tag: false,
        }));
    }
    let next = buf.byte_at(pos);
    if indented || char_class::is_space(next) || matches!(next, b';' | b',' | b')' | 0) {
        return Ok(Some(HeredocTag {
            spec: spec(String::new(), HeredocQuote::Bare),
            end: pos,
            empty_tag: true,
        }));
    }
    Ok(None)
}

/// Does `line` end the body?
fn is_terminator(line: &str, spec: &HeredocSpec) -> bool {
    if spec.indented {
        line.trim_start_matches([' ', '\t']) == spec.terminator
    } else {
        line == spec.terminator
    }
}

/// Read and excise the body that starts after the line containing `after`.
///
/// Pulls lines from the stream as needed.
pub fn read_body(
    buf: &mut SourceBuffer,
    after: usize,
    spec: &HeredocSpec,
) -> Result<HeredocBody, HeredocError> {
    let refills_before = buf.refill_count();
    let Some(start) = buf.line_end_from(after)? else {
        return Err(HeredocError::Unterminated);
    };
    let first_line = buf.line() + 1 + buf.pending_lines();
    let mut lines: Vec<String> = Vec::new();
    let mut pos = start;
    let (indent, end) = loop {
        let Some(next) = buf.line_end_from(pos)? else {
            return Err(HeredocError::Unterminated);
        };
        let raw = buf.text(pos, next);
        let content = raw.trim_end_matches('\n').trim_end_matches('\r');
        if is_terminator(content, spec) {
            let indent_len = content.len() - content.trim_start_matches([' ', '\t']).len();
            break (content[..indent_len].to_string(), next);
        }
        lines.push(raw);
        pos = next;
    };

    let mut text = String::new();
    for (i, line) in lines.iter().enumerate() {
        if !spec.indented {
            text.push_str(line);
        } else if line.trim_matches([' ', '\t', '\r', '\n']).is_empty() {
            text.push('\n');
        } else if let Some(stripped) = line.strip_prefix(indent.as_str()) {
            text.push_str(stripped);
        } else {
            let offset = u32::try_from(i).unwrap_or(u32::MAX);
            return Err(HeredocError::Indent {
                line: first_line.saturating_add(offset),
            });
        }
    }

    let base = buf.position_of(start);
    buf.excise(start, end);
    let refilled = buf.refill_count() != refills_before;
    tracing::trace!(
        terminator = %spec.terminator,
        lines = lines.len(),
        refilled,
        "heredoc body read"
    );
    Ok(HeredocBody {
        text,
        line: first_line,
        base,
        refilled,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
