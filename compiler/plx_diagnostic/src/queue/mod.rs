//! Collection of the diagnostics one lexer session reports.
//!
//! The lexer reports in source order most of the time, but a heredoc body
//! or an unclosed bracket is only diagnosed after later text was read, so
//! the queue sorts on [`flush`](DiagnosticQueue::flush).

use rustc_hash::FxHashSet;

use plx_ir::Span;

use crate::{Diagnostic, ErrorCode};

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Errors kept before the rest are dropped; 0 keeps all. Warnings never
    /// count.
    pub error_limit: usize,
    /// Drop a diagnostic with the same code and span as an earlier one.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: true,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    seen: FxHashSet<(ErrorCode, Span)>,
    error_count: usize,
    warning_count: usize,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    /// Queue `diag`. Returns `false` when it was dropped as a duplicate or
    /// because the error limit was reached.
    pub fn push(&mut self, diag: Diagnostic) -> bool {
        if diag.is_error() && self.limit_reached() {
            return false;
        }
        if self.config.deduplicate && !self.seen.insert((diag.code, diag.span)) {
            return false;
        }
        if diag.is_error() {
            self.error_count += 1;
        } else {
            self.warning_count += 1;
        }
        self.diagnostics.push(diag);
        true
    }

    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Everything queued so far, sorted by line and column, leaving the queue
    /// empty. Diagnostics at the same position keep their report order.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut out = std::mem::take(&mut self.diagnostics);
        out.sort_by_key(Diagnostic::position);
        self.seen.clear();
        self.error_count = 0;
        self.warning_count = 0;
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

#[cfg(test)]
mod tests;
