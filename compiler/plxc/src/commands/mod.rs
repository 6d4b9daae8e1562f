//! Command handlers for the PLX CLI.

use std::fs::File;
use std::io::IsTerminal;

use plx_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use plx_diagnostic::{ErrorCode, Severity};
use plx_ir::{SharedInterner, Token, TokenValue};
use plx_lexer::{LexerOptions, LexerSession};
use plx_lexer_core::{CrlfFilter, FilterChain, ReaderStream};

/// Arguments of `plx lex`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexArgs {
    pub path: String,
    pub strict: bool,
    pub latin1: bool,
    pub error_limit: Option<usize>,
    pub chunk: Option<usize>,
}

impl LexArgs {
    pub const USAGE: &'static str = "Usage: plx lex <file> [options]

Options:
  --strict            Warn about barewords used as values
  --latin1            Read the source as Latin-1 instead of UTF-8
  --error-limit=<n>   Stop after n recoverable errors (0 = no limit)
  --chunk=<n>         Read the file n bytes at a time";

    /// Parse the arguments that follow `lex`.
    pub fn parse(args: &[String]) -> Result<Self, String> {
        let mut path = None;
        let mut lex = LexArgs {
            path: String::new(),
            strict: false,
            latin1: false,
            error_limit: None,
            chunk: None,
        };
        for arg in args {
            if arg == "--strict" {
                lex.strict = true;
            } else if arg == "--latin1" {
                lex.latin1 = true;
            } else if let Some(n) = arg.strip_prefix("--error-limit=") {
                lex.error_limit = Some(parse_count(n, "--error-limit")?);
            } else if let Some(n) = arg.strip_prefix("--chunk=") {
                lex.chunk = Some(parse_count(n, "--chunk")?.max(1));
            } else if arg.starts_with('-') {
                return Err(format!("unknown option '{arg}'"));
            } else if path.is_none() {
                path = Some(arg.clone());
            } else {
                return Err(format!("unexpected argument '{arg}'"));
            }
        }
        lex.path = path.ok_or_else(|| "missing file path".to_string())?;
        Ok(lex)
    }

    /// Lexer options for these arguments.
    pub fn options(&self) -> LexerOptions {
        let mut options = LexerOptions::new()
            .with_utf8(!self.latin1)
            .with_strict_barewords(self.strict)
            .with_file_name(self.path.clone());
        if let Some(limit) = self.error_limit {
            options = options.with_error_limit(limit);
        }
        if let Some(chunk) = self.chunk {
            options = options.with_chunk_size(chunk);
        }
        options
    }
}

fn parse_count(text: &str, flag: &str) -> Result<usize, String> {
    text.parse()
        .map_err(|_| format!("{flag} expects a number, got '{text}'"))
}

/// Text printed by `plx explain <code>`.
pub fn explain(code: &str) -> Result<String, String> {
    let code: ErrorCode = code
        .parse()
        .map_err(|()| format!("unknown error code '{code}' (codes look like E0001)"))?;
    Ok(format!("{code} ({} phase): {}", code.phase(), code.description()))
}

/// One line of `plx lex` output: `line:start..end Kind payload`.
pub fn describe(token: &Token, interner: &SharedInterner) -> String {
    let head = format!("{:>4}:{} {:?}", token.line, token.span, token.kind);
    match &token.value {
        TokenValue::None => head,
        TokenValue::Int(v) => format!("{head} {v}"),
        TokenValue::Float(v) => format!("{head} {}", v.get()),
        TokenValue::Str(lit) => format!("{head} {:?}", lit.text),
        TokenValue::Ident(name) => format!("{head} {}", interner.lookup(*name)),
        TokenValue::Handle(handle) => format!("{head} {handle:?}"),
    }
}

/// Lex a file and print its tokens and diagnostics.
///
/// Returns `false` when the file could not be read or an error was reported.
pub fn lex_file(args: &LexArgs) -> bool {
    let file = match File::open(&args.path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("error: cannot read '{}': {e}", args.path);
            return false;
        }
    };
    let stream = FilterChain::new(Box::new(ReaderStream::new(file)))
        .with_filter(Box::new(CrlfFilter::default()));
    let interner = SharedInterner::new();
    let mut lexer = LexerSession::from_stream(Box::new(stream), args.options(), interner.clone());

    let mut count = 0usize;
    println!("Tokens for '{}':", args.path);
    loop {
        match lexer.next_token() {
            Ok(tok) if tok.is_eof() => break,
            Ok(tok) => {
                count += 1;
                println!("  {}", describe(&tok, &interner));
            }
            Err(err) => {
                tracing::debug!(%err, line = lexer.line(), "lexing stopped");
                break;
            }
        }
    }
    println!("({count} tokens)");

    let diagnostics = lexer.diagnostics();
    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    if !diagnostics.is_empty() {
        let mut emitter = TerminalEmitter::stderr(ColorMode::Auto, std::io::stderr().is_terminal());
        emitter.emit_all(&diagnostics);
        emitter.emit_summary(errors, warnings);
        emitter.flush();
    }
    errors == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
