//! Rendering diagnostics for people.
//!
//! ```text
//! error[E0003]: illegal octal digit '8'
//!  --> line 1:10
//!   |
//! 1 | my $x = 08;
//!   |          ^ not an octal digit
//!   = help: drop the leading zero
//! ```

use std::fmt::Write as _;
use std::io::{self, Write};

use crate::{Diagnostic, Severity};

pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: &Diagnostic);

    fn emit_all(&mut self, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            self.emit(diag);
        }
    }

    /// Closing line: `error: aborting due to 2 previous errors`.
    fn emit_summary(&mut self, error_count: usize, warning_count: usize);

    fn flush(&mut self);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Color when writing to a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// ANSI escapes, or empty strings when color is off.
#[derive(Clone, Copy)]
struct Palette {
    error: &'static str,
    warning: &'static str,
    help: &'static str,
    bold: &'static str,
    reset: &'static str,
}

impl Palette {
    const ANSI: Palette = Palette {
        error: "\x1b[1;31m",
        warning: "\x1b[1;33m",
        help: "\x1b[1;32m",
        bold: "\x1b[1m",
        reset: "\x1b[0m",
    };

    const PLAIN: Palette = Palette {
        error: "",
        warning: "",
        help: "",
        bold: "",
        reset: "",
    };

    fn severity(self, severity: Severity) -> &'static str {
        match severity {
            Severity::Error => self.error,
            Severity::Warning => self.warning,
        }
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("1 {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// Human-readable output with an optional source excerpt and caret.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    palette: Palette,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        let palette = if mode.should_use_colors(is_tty) {
            Palette::ANSI
        } else {
            Palette::PLAIN
        };
        TerminalEmitter { writer, palette }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn render(&self, diag: &Diagnostic) -> String {
        let p = self.palette;
        let tone = p.severity(diag.severity);
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "{tone}{}{reset}{bold}[{}]{reset}: {}",
            diag.severity,
            diag.code,
            diag.message,
            reset = p.reset,
            bold = p.bold,
        );

        let gutter = diag.excerpt.as_ref().map_or(1, |ex| ex.line.to_string().len());
        let pad = " ".repeat(gutter);
        match &diag.excerpt {
            Some(ex) => {
                let caret_at = " ".repeat(ex.column.saturating_sub(1) as usize);
                let _ = writeln!(out, "{pad}--> line {}:{}", ex.line, ex.column);
                let _ = writeln!(out, "{pad} |");
                let _ = writeln!(out, "{} | {}", ex.line, ex.text);
                let _ = writeln!(out, "{pad} | {caret_at}{tone}^ {}{}", diag.label, p.reset);
            }
            None => {
                let _ = writeln!(out, "{pad}--> bytes {}", diag.span);
            }
        }
        for note in &diag.notes {
            let _ = writeln!(out, "{pad} = {}note{}: {note}", p.bold, p.reset);
        }
        for suggestion in &diag.suggestions {
            let _ = writeln!(out, "{pad} = {}help{}: {suggestion}", p.help, p.reset);
        }
        out
    }
}

impl TerminalEmitter<io::Stderr> {
    pub fn stderr(mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter::with_color_mode(io::stderr(), mode, is_tty)
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        let text = self.render(diagnostic);
        // Output errors have nowhere better to go.
        let _ = writeln!(self.writer, "{text}");
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        let p = self.palette;
        let line = match (error_count, warning_count) {
            (0, 0) => return,
            (0, w) => format!("{}warning{}: {} emitted", p.warning, p.reset, plural(w, "warning")),
            (1, 0) => format!("{}error{}: aborting due to previous error", p.error, p.reset),
            (e, 0) => format!("{}error{}: aborting due to {e} previous errors", p.error, p.reset),
            (e, w) => format!(
                "{}error{}: aborting due to {}; {} emitted",
                p.error,
                p.reset,
                plural(e, "error"),
                plural(w, "warning"),
            ),
        };
        let _ = writeln!(self.writer, "{line}");
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
