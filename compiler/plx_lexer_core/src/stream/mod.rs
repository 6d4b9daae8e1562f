//! External byte streams and the source-filter chain.
//!
//! The buffer never reads files itself. It pulls bytes through
//! [`SourceStream::read_more`]; a [`FilterChain`] sits between the raw
//! stream and the buffer when source filters are installed.

use std::io::Read;

/// Failure while pulling bytes from a stream.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    #[error("I/O error while reading source: {0}")]
    Io(String),
    #[error("source filter `{filter}` failed: {message}")]
    Filter { filter: String, message: String },
}

impl From<std::io::Error> for StreamError {
    fn from(err: std::io::Error) -> Self {
        StreamError::Io(err.to_string())
    }
}

/// A source of raw bytes.
pub trait SourceStream {
    /// Append at most `max` bytes to `out`.
    ///
    /// Returns the number of bytes appended; `0` means end of input and every
    /// later call must return `0` as well.
    fn read_more(&mut self, max: usize, out: &mut Vec<u8>) -> Result<usize, StreamError>;
}

/// In-memory stream handing out fixed-size chunks.
///
/// Small chunk sizes force the lexer through its refill paths, which is how
/// the tests exercise the continue-after-refill behavior.
#[derive(Clone, Debug)]
pub struct StrStream {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
}

impl StrStream {
    pub fn new(data: impl Into<Vec<u8>>, chunk: usize) -> Self {
        StrStream {
            data: data.into(),
            pos: 0,
            chunk: chunk.max(1),
        }
    }
}

impl SourceStream for StrStream {
    fn read_more(&mut self, max: usize, out: &mut Vec<u8>) -> Result<usize, StreamError> {
        let n = max.min(self.chunk).min(self.data.len() - self.pos);
        out.extend_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Stream over any `std::io::Read`.
pub struct ReaderStream<R: Read> {
    reader: R,
    scratch: Vec<u8>,
}

impl<R: Read> ReaderStream<R> {
    pub fn new(reader: R) -> Self {
        ReaderStream {
            reader,
            scratch: Vec::new(),
        }
    }
}

impl<R: Read> SourceStream for ReaderStream<R> {
    fn read_more(&mut self, max: usize, out: &mut Vec<u8>) -> Result<usize, StreamError> {
        self.scratch.resize(max, 0);
        loop {
            match self.reader.read(&mut self.scratch) {
                Ok(n) => {
                    out.extend_from_slice(&self.scratch[..n]);
                    return Ok(n);
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// One stage of a source-filter chain.
pub trait SourceFilter {
    fn name(&self) -> &str;

    /// Transform `input` and append the result to `out`.
    ///
    /// `eof` is set on the final call so buffering filters can flush.
    fn apply(&mut self, input: &[u8], eof: bool, out: &mut Vec<u8>) -> Result<(), StreamError>;
}

/// Normalizes `\r\n` line endings to `\n`, including pairs split across chunks.
#[derive(Clone, Debug, Default)]
pub struct CrlfFilter {
    pending_cr: bool,
}

impl SourceFilter for CrlfFilter {
    fn name(&self) -> &str {
        "crlf"
    }

    fn apply(&mut self, input: &[u8], eof: bool, out: &mut Vec<u8>) -> Result<(), StreamError> {
        for &b in input {
            if self.pending_cr {
                self.pending_cr = false;
                if b != b'\n' {
                    out.push(b'\r');
                }
            }
            if b == b'\r' {
                self.pending_cr = true;
            } else {
                out.push(b);
            }
        }
        if eof && self.pending_cr {
            self.pending_cr = false;
            out.push(b'\r');
        }
        Ok(())
    }
}

/// A stream whose bytes pass through zero or more filters.
pub struct FilterChain {
    source: Box<dyn SourceStream>,
    filters: Vec<Box<dyn SourceFilter>>,
    finished: bool,
}

impl FilterChain {
    pub fn new(source: Box<dyn SourceStream>) -> Self {
        FilterChain {
            source,
            filters: Vec::new(),
            finished: false,
        }
    }

    /// Append a filter stage; stages run in insertion order.
    #[must_use]
    pub fn with_filter(mut self, filter: Box<dyn SourceFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl SourceStream for FilterChain {
    fn read_more(&mut self, max: usize, out: &mut Vec<u8>) -> Result<usize, StreamError> {
        if self.finished {
            return Ok(0);
        }
        // A filter may swallow a whole chunk, so keep pulling until something
        // comes out or the source ends.
        loop {
            let mut raw = Vec::with_capacity(max);
            let n = self.source.read_more(max, &mut raw)?;
            let eof = n == 0;
            let mut stage = raw;
            for filter in &mut self.filters {
                let mut next = Vec::with_capacity(stage.len());
                filter.apply(&stage, eof, &mut next)?;
                stage = next;
            }
            if eof {
                self.finished = true;
            }
            if !stage.is_empty() || eof {
                out.extend_from_slice(&stage);
                return Ok(stage.len());
            }
        }
    }
}

#[cfg(test)]
mod tests;
