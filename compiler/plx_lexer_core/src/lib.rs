//! Standalone buffer layer for the PLX lexer.
//!
//! This crate has no `plx_*` dependencies. It provides:
//! - [`SourceBuffer`]: a refillable window over the source with offset cursors
//! - [`SourceStream`] and [`FilterChain`]: the seam through which bytes arrive
//! - the quote delimiter pair table
//! - character classes used by every scanner

pub mod char_class;
mod delimiters;
mod source_buffer;
mod stream;

pub use delimiters::{closing_delimiter, is_paired, matching_close, DELIMITER_PAIRS};
pub use source_buffer::{BufferError, SourceBuffer, DEFAULT_CHUNK, EOF_BYTE};
pub use stream::{
    CrlfFilter, FilterChain, ReaderStream, SourceFilter, SourceStream, StrStream, StreamError,
};
