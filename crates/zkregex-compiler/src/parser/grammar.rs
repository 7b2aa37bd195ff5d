//! Recursive-descent parser over the token stream.
//!
//! Precedence from loosest to tightest: alternation `|`, concatenation,
//! postfix quantifiers, atoms. Errors are reported into [`Diagnostics`] and
//! parsing continues, so one pass surfaces every independent problem.

use rowan::{TextRange, TextSize};
use zkregex_core::ByteSet;

use super::ParseOptions;
use super::ast::Node;
use super::lexer::{Token, TokenKind, token_text};
use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Highest byte a negated bracket can produce; 255 carries the anchor.
const NEGATION_MAX: u8 = 254;

pub(super) struct Parser<'src, 'opt> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    options: &'opt ParseOptions,
    pub(super) diagnostics: Diagnostics,
}

/// One element of a bracket expression.
enum Member {
    Byte(u8),
    Bytes(Vec<u8>),
    Class(ByteSet),
    Anchor,
}

/// Meaning of a `\x` escape.
enum Escaped {
    Anchor,
    Byte(u8),
    Bytes(Vec<u8>),
    Class(ByteSet),
}

impl<'src, 'opt> Parser<'src, 'opt> {
    pub(super) fn new(source: &'src str, tokens: Vec<Token>, options: &'opt ParseOptions) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            options,
            diagnostics: Diagnostics::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Token cursor

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn text(&self, token: &Token) -> &'src str {
        token_text(self.source, token)
    }

    fn end_range(&self) -> TextRange {
        let end = TextSize::from(self.source.len() as u32);
        TextRange::empty(end)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Structure

    pub(super) fn parse_root(&mut self) -> Node {
        if self.tokens.is_empty() {
            self.diagnostics
                .report(DiagnosticKind::EmptyPattern, self.end_range())
                .emit();
            return Node::empty(self.end_range());
        }

        let root = self.parse_alternation();
        while let Some(stray) = self.bump() {
            // Only an unmatched `)` stops the top-level alternation early.
            self.diagnostics
                .report(DiagnosticKind::UnexpectedCloseParen, stray.span)
                .emit();
            let _ = self.parse_alternation();
        }

        root.unwrap_or_else(|| {
            if self.diagnostics.is_empty() {
                self.diagnostics
                    .report(DiagnosticKind::EmptyPattern, self.end_range())
                    .emit();
            }
            Node::empty(self.end_range())
        })
    }

    /// `None` when the alternation has nothing in it (or only erroneous input).
    fn parse_alternation(&mut self) -> Option<Node> {
        let mut branches = vec![self.parse_concat()];
        let mut pipes = Vec::new();
        while self.at(TokenKind::Pipe) {
            pipes.extend(self.bump());
            branches.push(self.parse_concat());
        }

        if branches.len() == 1 {
            return branches.pop().flatten();
        }

        for (i, branch) in branches.iter().enumerate() {
            if branch.is_some() {
                continue;
            }
            // Blame the pipe next to the empty branch.
            let pipe = pipes.get(i).or_else(|| pipes.get(i.wrapping_sub(1)));
            if let Some(pipe) = pipe {
                self.diagnostics
                    .report(DiagnosticKind::EmptyAlternative, pipe.span)
                    .hint("use `ϵ` to match the empty string")
                    .emit();
            }
        }

        let branches: Vec<Node> = branches.into_iter().flatten().collect();
        let span = cover(&branches)?;
        Some(Node::alternation(branches, span))
    }

    fn parse_concat(&mut self) -> Option<Node> {
        let mut items = Vec::new();
        while let Some(token) = self.peek() {
            if matches!(token.kind, TokenKind::Pipe | TokenKind::ParenClose) {
                break;
            }
            if let Some(item) = self.parse_quantified() {
                items.push(item);
            }
        }
        let span = cover(&items)?;
        Some(Node::concat(items, span))
    }

    fn parse_quantified(&mut self) -> Option<Node> {
        let mut atom = self.parse_atom()?;
        while let Some(token) = self.peek().filter(|t| t.kind.is_quantifier()) {
            self.bump();
            let span = atom.span.cover(token.span);
            atom = match token.kind {
                TokenKind::Star => Node::star(atom, span),
                TokenKind::Plus => {
                    let repeated = Node::star(atom.clone(), span);
                    Node::concat(vec![atom, repeated], span)
                }
                _ => Node::alternation(vec![atom, Node::empty(token.span)], span),
            };
        }
        Some(atom)
    }

    fn parse_atom(&mut self) -> Option<Node> {
        let token = self.bump()?;
        match token.kind {
            TokenKind::ParenOpen => self.parse_group(token),
            TokenKind::BracketOpen | TokenKind::NegatedBracketOpen => self.parse_bracket(token),
            TokenKind::Literal | TokenKind::Dash => {
                Some(Node::bytes(self.text(&token).as_bytes(), token.span))
            }
            TokenKind::Epsilon => Some(Node::empty(token.span)),
            TokenKind::Escape => match self.escape(&token) {
                Escaped::Anchor => Some(Node::anchor(token.span)),
                Escaped::Byte(b) => Some(Node::byte(b, token.span)),
                Escaped::Bytes(bytes) => Some(Node::bytes(&bytes, token.span)),
                Escaped::Class(set) => self.class_allowed(token.span).then(|| Node::class(set, token.span)),
            },
            TokenKind::Star | TokenKind::Plus | TokenKind::Question => {
                let text = self.text(&token);
                self.diagnostics
                    .report(DiagnosticKind::DanglingQuantifier, token.span)
                    .message(text)
                    .emit();
                None
            }
            TokenKind::Caret => {
                self.diagnostics
                    .report(DiagnosticKind::UnexpectedCaret, token.span)
                    .hint("use `\\^` to anchor at the start of input")
                    .emit();
                None
            }
            TokenKind::BracketClose => {
                self.diagnostics
                    .report(DiagnosticKind::UnexpectedCloseBracket, token.span)
                    .emit();
                None
            }
            TokenKind::DanglingBackslash => {
                self.diagnostics
                    .report(DiagnosticKind::DanglingEscape, token.span)
                    .emit();
                None
            }
            TokenKind::UnexpectedFragment => {
                let text = self.text(&token);
                self.diagnostics
                    .report(DiagnosticKind::UnexpectedFragment, token.span)
                    .message(text)
                    .emit();
                None
            }
            // Concat stops before these; reaching them here means the caller
            // consumed a separator it should have left alone.
            TokenKind::Pipe | TokenKind::ParenClose => {
                self.pos -= 1;
                None
            }
        }
    }

    fn parse_group(&mut self, open: Token) -> Option<Node> {
        let inner = self.parse_alternation();

        let Some(close) = self.peek().filter(|t| t.kind == TokenKind::ParenClose) else {
            let end = self.end_range();
            self.diagnostics
                .report(DiagnosticKind::UnclosedGroup, open.span)
                .related_to("input ends here", end)
                .emit();
            return inner;
        };
        self.bump();

        let span = open.span.cover(close.span);
        match inner {
            Some(node) => Some(Node { span, ..node }),
            None => {
                self.diagnostics
                    .report(DiagnosticKind::EmptyGroup, span)
                    .hint("use `ϵ` to match the empty string")
                    .emit();
                None
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Bracket expressions

    fn parse_bracket(&mut self, open: Token) -> Option<Node> {
        let negated = open.kind == TokenKind::NegatedBracketOpen;
        let mut singles = ByteSet::new();
        let mut sequences: Vec<Vec<u8>> = Vec::new();
        let mut range_start: Option<u8> = None;
        let errors_before = self.diagnostics.len();

        let close = loop {
            let Some(token) = self.bump() else {
                let end = self.end_range();
                self.diagnostics
                    .report(DiagnosticKind::UnclosedBracket, open.span)
                    .related_to("input ends here", end)
                    .emit();
                return None;
            };

            match token.kind {
                TokenKind::BracketClose => break token,
                TokenKind::Dash => {
                    let bounds = range_start
                        .take()
                        .and_then(|lo| self.peek_range_end().map(|hi| (lo, hi)));
                    if let Some((lo, hi)) = bounds {
                        let hi_token = self.bump();
                        if lo > hi {
                            let span = hi_token.map_or(token.span, |t| token.span.cover(t.span));
                            let text = format!("{}-{}", lo as char, hi as char);
                            self.diagnostics
                                .report(DiagnosticKind::InvalidRange, span)
                                .message(text)
                                .emit();
                        } else {
                            singles = singles.union(&ByteSet::range(lo, hi));
                        }
                        continue;
                    }
                    singles.insert(b'-');
                }
                TokenKind::Caret => {
                    self.diagnostics
                        .report(DiagnosticKind::UnexpectedCaret, token.span)
                        .hint("`^` negates only as the first character of a bracket")
                        .emit();
                    range_start = None;
                }
                TokenKind::ParenOpen
                | TokenKind::ParenClose
                | TokenKind::BracketOpen
                | TokenKind::NegatedBracketOpen
                | TokenKind::Star
                | TokenKind::Plus
                | TokenKind::Question => {
                    let text = &self.text(&token)[..1];
                    self.diagnostics
                        .report(DiagnosticKind::InvalidInBracket, token.span)
                        .message(text)
                        .hint("escape it with `\\`")
                        .emit();
                    range_start = None;
                }
                TokenKind::DanglingBackslash => {
                    self.diagnostics
                        .report(DiagnosticKind::DanglingEscape, token.span)
                        .emit();
                }
                TokenKind::UnexpectedFragment => {
                    let text = self.text(&token);
                    self.diagnostics
                        .report(DiagnosticKind::UnexpectedFragment, token.span)
                        .message(text)
                        .emit();
                }
                TokenKind::Literal
                | TokenKind::Pipe
                | TokenKind::Epsilon
                | TokenKind::Escape => {
                    range_start = None;
                    match self.member(&token) {
                        Member::Byte(b) => {
                            singles.insert(b);
                            range_start = Some(b);
                        }
                        Member::Bytes(bytes) => sequences.push(bytes),
                        Member::Class(set) => singles = singles.union(&set),
                        Member::Anchor => {
                            self.diagnostics
                                .report(DiagnosticKind::InvalidInBracket, token.span)
                                .message("\\^")
                                .hint("`\\^` anchors only outside brackets")
                                .emit();
                        }
                    }
                }
            }
        };

        if self.diagnostics.len() > errors_before {
            return None;
        }

        let span = open.span.cover(close.span);
        if singles.is_empty() && sequences.is_empty() {
            self.diagnostics
                .report(DiagnosticKind::EmptyBracket, span)
                .emit();
            return None;
        }
        if !self.class_allowed(span) {
            return None;
        }

        if negated {
            if !sequences.is_empty() {
                self.diagnostics
                    .report(DiagnosticKind::NegatedMultiByte, span)
                    .emit();
                return None;
            }
            let set = ByteSet::range(0, NEGATION_MAX).difference(&singles);
            if set.is_empty() {
                self.diagnostics
                    .report(DiagnosticKind::EmptyBracket, span)
                    .message("negation excludes every byte")
                    .emit();
                return None;
            }
            return Some(Node::class(set, span));
        }

        let mut alternatives = Vec::with_capacity(1 + sequences.len());
        if !singles.is_empty() {
            alternatives.push(Node::class(singles, span));
        }
        alternatives.extend(sequences.iter().map(|seq| Node::bytes(seq, span)));
        Some(Node::alternation(alternatives, span))
    }

    /// Upper bound of a range when the next token is a single-byte member.
    fn peek_range_end(&self) -> Option<u8> {
        let token = self.peek()?;
        match token.kind {
            TokenKind::Literal | TokenKind::Escape => match self.member(&token) {
                Member::Byte(b) => Some(b),
                Member::Bytes(_) | Member::Class(_) | Member::Anchor => None,
            },
            _ => None,
        }
    }

    fn member(&self, token: &Token) -> Member {
        if token.kind == TokenKind::Escape {
            return match self.escape(token) {
                Escaped::Anchor => Member::Anchor,
                Escaped::Byte(b) => Member::Byte(b),
                Escaped::Bytes(bytes) => Member::Bytes(bytes),
                Escaped::Class(set) => Member::Class(set),
            };
        }
        match self.text(token).as_bytes() {
            [b] => Member::Byte(*b),
            bytes => Member::Bytes(bytes.to_vec()),
        }
    }

    fn escape(&self, token: &Token) -> Escaped {
        let escaped = &self.text(token)[1..];
        match escaped {
            "n" => Escaped::Byte(b'\n'),
            "r" => Escaped::Byte(b'\r'),
            "t" => Escaped::Byte(b'\t'),
            "v" => Escaped::Byte(0x0b),
            "f" => Escaped::Byte(0x0c),
            "^" => Escaped::Anchor,
            "w" => Escaped::Class(word_bytes()),
            "d" => Escaped::Class(ByteSet::range(b'0', b'9')),
            "s" => Escaped::Class(space_bytes()),
            other => match other.as_bytes() {
                [b] => Escaped::Byte(*b),
                bytes => Escaped::Bytes(bytes.to_vec()),
            },
        }
    }

    fn class_allowed(&mut self, span: TextRange) -> bool {
        if self.options.allow_classes {
            return true;
        }
        self.diagnostics
            .report(DiagnosticKind::CharacterClassNotSupported, span)
            .emit();
        false
    }
}

/// `\w`: ASCII letters, digits and underscore.
pub(crate) fn word_bytes() -> ByteSet {
    ByteSet::range(b'A', b'Z')
        .union(&ByteSet::range(b'a', b'z'))
        .union(&ByteSet::range(b'0', b'9'))
        .union(&ByteSet::single(b'_'))
}

/// `\s`: the control whitespace escapes `\n \r \t \v \f`.
pub(crate) fn space_bytes() -> ByteSet {
    [b'\n', b'\r', b'\t', 0x0b, 0x0c].into_iter().collect()
}

fn cover(nodes: &[Node]) -> Option<TextRange> {
    let first = nodes.first()?;
    let last = nodes.last()?;
    Some(first.span.cover(last.span))
}
