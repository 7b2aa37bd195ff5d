//! Pattern parser.
//!
//! Syntax: literals, implicit concatenation, `|`, `( )`, postfix `* + ?`,
//! bracket sets `[...]` / `[^...]` with `x-y` ranges, the escapes
//! `\n \r \t \v \f`, the classes `\w \d \s`, the start-of-input anchor `\^`
//! and `ϵ` for the empty string. Any other escaped character is itself.
//! Non-ASCII characters stand for their UTF-8 byte sequence. Ranges such as
//! `a-z` only mean a range inside brackets; elsewhere `-` is a literal.

pub mod ast;
mod grammar;
pub mod lexer;


pub use ast::{Node, NodeKind, Text};

use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Parser dialect switches.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub(crate) allow_classes: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            allow_classes: true,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept bracket sets and `\w \d \s`. Some targets only take plain
    /// alternations, in which case any class fails the parse.
    pub fn allow_classes(mut self, value: bool) -> Self {
        self.allow_classes = value;
        self
    }
}

/// Syntax errors in a pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{diagnostics}")]
pub struct ParseError {
    pub pattern: String,
    pub diagnostics: Diagnostics,
}

impl ParseError {
    /// Kind of the earliest error.
    pub fn kind(&self) -> Option<DiagnosticKind> {
        self.diagnostics.first().map(|d| d.kind())
    }

    /// Byte offset of the earliest error.
    pub fn offset(&self) -> Option<usize> {
        self.diagnostics.first().map(|d| d.offset())
    }

    /// Errors annotated against the pattern text.
    pub fn render(&self) -> String {
        self.diagnostics.render(&self.pattern)
    }
}

pub fn parse(source: &str) -> Result<Node, ParseError> {
    parse_with(source, &ParseOptions::default())
}

pub fn parse_with(source: &str, options: &ParseOptions) -> Result<Node, ParseError> {
    let _span = tracing::debug_span!("parse", len = source.len()).entered();

    let tokens = lexer::lex(source);
    let mut parser = grammar::Parser::new(source, tokens, options);
    let root = parser.parse_root();

    let mut diagnostics = parser.diagnostics;
    if diagnostics.is_empty() {
        return Ok(root);
    }
    diagnostics.settle();
    tracing::debug!(errors = diagnostics.len(), "pattern rejected");
    Err(ParseError {
        pattern: source.to_string(),
        diagnostics,
    })
}
