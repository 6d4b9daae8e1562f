//! Diagnostics for the PLX lexer.
//!
//! A lexer error points at one place in the source, so a [`Diagnostic`] has
//! a single span with a caret label, plus the excerpt of the line it points
//! into. The lexer only keeps a window of the source in memory; carrying the
//! excerpt lets an emitter render the error without re-reading the file.
//!
//! [`DiagnosticQueue`] collects what a session reports and hands it back
//! sorted by position.

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod queue;

pub use diagnostic::{Diagnostic, Severity, SourceExcerpt};
pub use error_code::ErrorCode;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
