//! Lexer for the pattern language.
//!
//! Produces span-based tokens without storing text. Every character the
//! grammar gives no special meaning lexes as a single [`TokenKind::Literal`],
//! so the only lexer errors are malformed escapes, which are coalesced into
//! single `UnexpectedFragment` tokens.

use std::ops::Range;

use logos::Logos;
use rowan::TextRange;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    /// `[^` opens a negated bracket; must win over `[` followed by `^`
    #[token("[^")]
    NegatedBracketOpen,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("|")]
    Pipe,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    #[token("?")]
    Question,

    #[token("^")]
    Caret,

    /// Range separator inside brackets, a literal elsewhere
    #[token("-")]
    Dash,

    /// Explicit empty string
    #[token("ϵ")]
    Epsilon,

    /// Backslash plus one character
    #[regex(r"\\.")]
    Escape,

    /// Backslash with nothing (or a line break) after it
    #[token("\\")]
    DanglingBackslash,

    #[regex(r"[^()\[\]|*+?^\-\\ϵ]")]
    Literal,

    UnexpectedFragment,
}

impl TokenKind {
    pub fn is_quantifier(self) -> bool {
        matches!(self, Self::Star | Self::Plus | Self::Question)
    }
}

/// Zero-copy token: kind + span, text retrieved via [`token_text`] when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: TextRange,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: TextRange) -> Self {
        Self { kind, span }
    }
}

fn range_to_text_range(range: Range<usize>) -> TextRange {
    TextRange::new((range.start as u32).into(), (range.end as u32).into())
}

/// Tokenizes source into a vector of span-based tokens.
///
/// Post-processes the Logos output to coalesce consecutive lexer errors into single `UnexpectedFragment` tokens.
pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                if let Some(start) = error_start.take() {
                    let end = lexer.span().start;
                    tokens.push(Token::new(
                        TokenKind::UnexpectedFragment,
                        range_to_text_range(start..end),
                    ));
                }

                let span = lexer.span();
                tokens.push(Token::new(kind, range_to_text_range(span)));
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    tokens.push(Token::new(
                        TokenKind::UnexpectedFragment,
                        range_to_text_range(start..source.len()),
                    ));
                }
                break;
            }
        }
    }

    tokens
}

/// Retrieves the text slice for a token. O(1) slice into source.
#[inline]
pub fn token_text<'src>(source: &'src str, token: &Token) -> &'src str {
    &source[Range::<usize>::from(token.span)]
}
