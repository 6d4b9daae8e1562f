//! Refillable source window.
//!
//! [`SourceBuffer`] owns a growable byte window over the unit being lexed.
//! All positions are offsets into the window, so growing or compacting the
//! `Vec` never invalidates a cursor; only [`SourceBuffer::discard_before`]
//! shifts offsets, and it does so for every cursor the buffer owns.
//!
//! # Layout
//!
//! ```text
//!  base (absolute offset of window byte 0)
//!  v
//! [ ..consumed.. | line_start .. cursor .. | ..unread.. ] end = buf.len()
//! ```
//!
//! # End of input
//!
//! Reads past `end` return the `0x00` sentinel ([`EOF_BYTE`]) like the
//! sentinel-terminated buffers of batch lexers; [`SourceBuffer::is_eof`]
//! tells a real NUL from the synthetic terminator.
//!
//! # Encoding
//!
//! When `is_utf8` is set, the window is validated on refill: the first
//! refill validates everything, later refills only the newly appended bytes.
//! A sequence cut at a chunk boundary waits for the next chunk.

use memchr::{memchr, memchr_iter};

use crate::stream::{SourceStream, StreamError};

/// Byte returned for reads at or past the end of the window.
pub const EOF_BYTE: u8 = 0x00;

/// Default number of bytes requested per refill.
pub const DEFAULT_CHUNK: usize = 8 * 1024;

/// Failure while growing the window.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("malformed UTF-8 character at byte {position}")]
    InvalidUtf8 { position: u32 },
    #[error(transparent)]
    Stream(#[from] StreamError),
}

/// Owned, refillable source window with offset cursors.
pub struct SourceBuffer {
    buf: Vec<u8>,
    cursor: usize,
    line_start: usize,
    /// 1-based line of `cursor`.
    line: u32,
    /// Lines excised ahead of the cursor (heredoc bodies), counted when the
    /// cursor crosses the next newline.
    deferred_lines: u32,
    /// Absolute offset of `buf[0]` in the unit.
    base: u32,
    /// Excised ranges still inside the window: `(offset, len)`, sorted.
    /// Positions at or after `offset` are shifted by `len`.
    holes: Vec<(usize, u32)>,
    is_utf8: bool,
    /// Window prefix known to be valid in the declared encoding.
    validated: usize,
    refills: u32,
    stream: Option<Box<dyn SourceStream>>,
    exhausted: bool,
    chunk_size: usize,
}

impl std::fmt::Debug for SourceBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceBuffer")
            .field("len", &self.buf.len())
            .field("cursor", &self.cursor)
            .field("line_start", &self.line_start)
            .field("line", &self.line)
            .field("base", &self.base)
            .field("is_utf8", &self.is_utf8)
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

#[inline]
fn utf8_width(first: u8) -> usize {
    match first {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

#[inline]
fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

impl SourceBuffer {
    fn empty(is_utf8: bool) -> Self {
        SourceBuffer {
            buf: Vec::new(),
            cursor: 0,
            line_start: 0,
            line: 1,
            deferred_lines: 0,
            base: 0,
            holes: Vec::new(),
            is_utf8,
            validated: 0,
            refills: 0,
            stream: None,
            exhausted: true,
            chunk_size: DEFAULT_CHUNK,
        }
    }

    /// Whole-unit buffer over already-valid UTF-8 text. No stream.
    pub fn from_text(source: &str) -> Self {
        let mut sb = Self::empty(true);
        sb.buf.extend_from_slice(source.as_bytes());
        sb.validated = sb.buf.len();
        sb
    }

    /// Whole-unit buffer whose bytes are Latin-1 code points.
    pub fn from_latin1(bytes: &[u8]) -> Self {
        let mut sb = Self::empty(false);
        sb.buf.extend_from_slice(bytes);
        sb.validated = sb.buf.len();
        sb
    }

    /// Empty window fed on demand from `stream`.
    pub fn with_stream(stream: Box<dyn SourceStream>, is_utf8: bool, chunk_size: usize) -> Self {
        let mut sb = Self::empty(is_utf8);
        sb.stream = Some(stream);
        sb.exhausted = false;
        sb.chunk_size = chunk_size.max(1);
        sb
    }

    /// Window over text that was cut out of another buffer.
    ///
    /// `base` and `line` place the text in the enclosing unit so spans and
    /// line numbers of tokens lexed from it stay absolute.
    pub fn nested(text: &str, base: u32, line: u32) -> Self {
        let mut sb = Self::from_text(text);
        sb.base = base;
        sb.line = line;
        sb
    }

    // ─── Accessors ───

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn line_start(&self) -> usize {
        self.line_start
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[inline]
    pub fn base(&self) -> u32 {
        self.base
    }

    #[inline]
    pub fn is_utf8(&self) -> bool {
        self.is_utf8
    }

    pub fn refill_count(&self) -> u32 {
        self.refills
    }

    /// Whether the stream (if any) has no more bytes to give.
    pub fn stream_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Absolute unit offset of `cursor`.
    #[inline]
    pub fn position(&self) -> u32 {
        self.position_of(self.cursor)
    }

    /// Absolute unit offset of a window offset.
    #[inline]
    pub fn position_of(&self, off: usize) -> u32 {
        let skipped: u32 = self
            .holes
            .iter()
            .take_while(|&&(at, _)| at <= off)
            .map(|&(_, len)| len)
            .sum();
        self.base.saturating_add(to_u32(off)).saturating_add(skipped)
    }

    /// Lines removed by [`SourceBuffer::excise`] and not yet counted.
    #[inline]
    pub fn pending_lines(&self) -> u32 {
        self.deferred_lines
    }

    /// 1-based column of `cursor`, counted in characters.
    pub fn column(&self) -> u32 {
        self.column_of(self.cursor)
    }

    /// 1-based column of `off`, which must lie on the current line.
    ///
    /// Offsets before the current line report column 1.
    pub fn column_of(&self, off: usize) -> u32 {
        let end = off.min(self.buf.len());
        if end < self.line_start {
            return 1;
        }
        let seg = &self.buf[self.line_start..end];
        let chars = if self.is_utf8 {
            seg.iter().filter(|&&b| (b & 0xC0) != 0x80).count()
        } else {
            seg.len()
        };
        to_u32(chars) + 1
    }

    // ─── Byte access ───

    /// Byte at `cursor`, or [`EOF_BYTE`] past the end of the window.
    #[inline]
    pub fn current(&self) -> u8 {
        self.byte_at(self.cursor)
    }

    /// Byte `n` positions after `cursor`.
    #[inline]
    pub fn peek(&self, n: usize) -> u8 {
        self.byte_at(self.cursor + n)
    }

    #[inline]
    pub fn byte_at(&self, off: usize) -> u8 {
        self.buf.get(off).copied().unwrap_or(EOF_BYTE)
    }

    /// At the synthetic terminator: window consumed and stream exhausted.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.cursor >= self.buf.len() && self.exhausted
    }

    pub fn bytes(&self, from: usize, to: usize) -> &[u8] {
        let to = to.min(self.buf.len());
        &self.buf[from.min(to)..to]
    }

    /// Unread bytes currently in the window.
    pub fn rest(&self) -> &[u8] {
        &self.buf[self.cursor.min(self.buf.len())..]
    }

    /// Decode the character at `off` in the declared encoding.
    ///
    /// Returns the character and its byte width; `None` past the window.
    pub fn char_at(&self, off: usize) -> Option<(char, usize)> {
        let first = *self.buf.get(off)?;
        if !self.is_utf8 || first < 0x80 {
            return Some((char::from(first), 1));
        }
        let width = utf8_width(first);
        let slice = self.buf.get(off..off + width)?;
        std::str::from_utf8(slice)
            .ok()
            .and_then(|s| s.chars().next())
            .map(|c| (c, width))
    }

    /// Decode `from..to` into text (Latin-1 bytes map one-to-one).
    pub fn text(&self, from: usize, to: usize) -> String {
        let bytes = self.bytes(from, to);
        if self.is_utf8 {
            String::from_utf8_lossy(bytes).into_owned()
        } else {
            bytes.iter().map(|&b| char::from(b)).collect()
        }
    }

    /// Text of the current physical line (window contents only).
    pub fn current_line_text(&self) -> String {
        let start = self.line_start.min(self.buf.len());
        let end = memchr(b'\n', &self.buf[start..]).map_or(self.buf.len(), |i| start + i);
        self.text(start, end).trim_end_matches('\r').to_string()
    }

    /// Find `byte` at or after `from` within the window.
    #[inline]
    pub fn find_byte(&self, from: usize, byte: u8) -> Option<usize> {
        let from = from.min(self.buf.len());
        memchr(byte, &self.buf[from..]).map(|i| from + i)
    }

    // ─── Refill ───

    /// Guarantee `n` readable bytes after `cursor`.
    ///
    /// Returns `Ok(false)` when the stream ran dry first; reads past the end
    /// then see the synthetic terminator.
    pub fn ensure(&mut self, n: usize) -> Result<bool, BufferError> {
        while self.buf.len() - self.cursor.min(self.buf.len()) < n {
            if self.refill()? == 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Guarantee the window extends to absolute window offset `off`.
    pub fn ensure_offset(&mut self, off: usize) -> Result<bool, BufferError> {
        while self.buf.len() <= off {
            if self.refill()? == 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Pull one chunk from the stream. Returns the number of bytes appended.
    pub fn refill(&mut self) -> Result<usize, BufferError> {
        if self.exhausted {
            return Ok(0);
        }
        let Some(stream) = self.stream.as_mut() else {
            self.exhausted = true;
            return Ok(0);
        };
        let n = stream.read_more(self.chunk_size, &mut self.buf)?;
        if n == 0 {
            self.exhausted = true;
        } else {
            self.refills += 1;
        }
        self.validate_new_bytes()?;
        Ok(n)
    }

    fn validate_new_bytes(&mut self) -> Result<(), BufferError> {
        if !self.is_utf8 {
            self.validated = self.buf.len();
            return Ok(());
        }
        let start = if self.refills <= 1 { 0 } else { self.validated };
        match std::str::from_utf8(&self.buf[start..]) {
            Ok(_) => {
                self.validated = self.buf.len();
                Ok(())
            }
            Err(e) if e.error_len().is_none() && !self.exhausted => {
                // Sequence cut by the chunk boundary: finish it next refill.
                self.validated = start + e.valid_up_to();
                Ok(())
            }
            Err(e) => Err(BufferError::InvalidUtf8 {
                position: self.position_of(start + e.valid_up_to()),
            }),
        }
    }

    /// Offset one past the `\n` ending the line that contains `from`.
    ///
    /// Pulls from the stream until a newline arrives. A final line without a
    /// newline ends at the window end; `None` means `from` is past the input.
    pub fn line_end_from(&mut self, from: usize) -> Result<Option<usize>, BufferError> {
        let mut scan = from;
        loop {
            if let Some(nl) = self.find_byte(scan, b'\n') {
                return Ok(Some(nl + 1));
            }
            scan = self.buf.len().max(from);
            if self.refill()? == 0 {
                return Ok((from < self.buf.len()).then_some(self.buf.len()));
            }
        }
    }

    // ─── Cursor movement ───

    /// Move `cursor` forward to `p`, counting the newlines crossed.
    pub fn advance_to(&mut self, p: usize) {
        let p = p.min(self.buf.len());
        if p <= self.cursor {
            return;
        }
        let mut last_nl = None;
        let mut crossed = 0u32;
        for nl in memchr_iter(b'\n', &self.buf[self.cursor..p]) {
            crossed += 1;
            last_nl = Some(self.cursor + nl);
        }
        if let Some(nl) = last_nl {
            self.line += crossed + std::mem::take(&mut self.deferred_lines);
            self.line_start = nl + 1;
        }
        self.cursor = p;
    }

    /// Move `cursor` forward by `n` bytes.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.advance_to(self.cursor + n);
    }

    /// Drop window bytes before `p`.
    ///
    /// Never drops past `line_start`, which keeps excerpts of the current
    /// line available and the cursor invariant intact.
    pub fn discard_before(&mut self, p: usize) {
        let p = p.min(self.line_start).min(self.cursor);
        if p == 0 {
            return;
        }
        self.buf.drain(..p);
        let mut folded = 0u32;
        self.holes.retain_mut(|(at, len)| {
            if *at <= p {
                folded += *len;
                false
            } else {
                *at -= p;
                true
            }
        });
        self.base = self.base.saturating_add(folded);
        self.cursor -= p;
        self.line_start -= p;
        self.validated = self.validated.saturating_sub(p);
        self.base = self.base.saturating_add(to_u32(p));
    }

    /// Remove `start..end` (which must lie after `cursor`) from the window.
    ///
    /// Used to cut a heredoc body out of the text that follows it. Newlines
    /// in the removed range are added to the line count when the cursor next
    /// crosses a newline.
    pub fn excise(&mut self, start: usize, end: usize) -> Vec<u8> {
        let end = end.min(self.buf.len());
        let start = start.clamp(self.cursor, end);
        let removed: Vec<u8> = self.buf.drain(start..end).collect();
        self.deferred_lines += to_u32(memchr_iter(b'\n', &removed).count());
        let mut hidden = to_u32(removed.len());
        self.holes.retain(|&(at, len)| {
            // Earlier holes inside the removed range merge into the new one.
            if at > start && at < end {
                hidden += len;
                false
            } else {
                true
            }
        });
        for (at, _) in &mut self.holes {
            if *at >= end {
                *at -= removed.len();
            }
        }
        let idx = self.holes.partition_point(|&(at, _)| at <= start);
        self.holes.insert(idx, (start, hidden));
        if self.validated > start {
            self.validated = self.validated.saturating_sub(removed.len()).max(start);
        }
        removed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
