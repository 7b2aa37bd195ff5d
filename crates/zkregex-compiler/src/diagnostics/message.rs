use rowan::TextRange;

/// Diagnostic kinds ordered by priority (highest priority first).
///
/// When two diagnostics start at the same offset, the higher-priority one
/// suppresses the other. Unclosed delimiters come last because they are
/// usually a consequence of something the user wrote inside them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Input the lexer could not classify
    UnexpectedFragment,
    DanglingEscape,

    // Misplaced operators
    DanglingQuantifier,
    UnexpectedCaret,
    UnexpectedCloseParen,
    UnexpectedCloseBracket,
    InvalidInBracket,

    // Empty constructs
    EmptyPattern,
    EmptyGroup,
    EmptyAlternative,
    EmptyBracket,

    // Bracket contents
    InvalidRange,
    NegatedMultiByte,

    // Rejected by parse options
    CharacterClassNotSupported,

    // Often consequences of earlier errors
    UnclosedGroup,
    UnclosedBracket,
}

impl DiagnosticKind {
    /// Whether this kind suppresses `other` when both start at the same offset.
    pub fn suppresses(&self, other: &DiagnosticKind) -> bool {
        self < other
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnexpectedFragment => "unexpected input",
            Self::DanglingEscape => "escape at end of pattern",

            Self::DanglingQuantifier => "quantifier has nothing to repeat",
            Self::UnexpectedCaret => "unexpected `^`",
            Self::UnexpectedCloseParen => "unexpected `)`",
            Self::UnexpectedCloseBracket => "unexpected `]`",
            Self::InvalidInBracket => "unexpected character in bracket",

            Self::EmptyPattern => "empty input",
            Self::EmptyGroup => "empty `()` is not allowed",
            Self::EmptyAlternative => "empty alternative",
            Self::EmptyBracket => "empty `[]` is not allowed",

            Self::InvalidRange => "invalid range",
            Self::NegatedMultiByte => "negated bracket cannot contain multi-byte characters",

            Self::CharacterClassNotSupported => "CharacterClass not supported",

            Self::UnclosedGroup => "missing right parentheses",
            Self::UnclosedBracket => "missing right brackets",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::DanglingQuantifier => "unexpected `{}`: nothing to repeat".to_string(),
            Self::InvalidInBracket => "unexpected `{}` in bracket".to_string(),
            Self::UnexpectedFragment => "unexpected `{}`".to_string(),
            Self::InvalidRange => "invalid range `{}`".to_string(),
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    /// Byte range of the offending input.
    pub(crate) range: TextRange,
    pub(crate) message: String,
    pub(crate) related: Vec<RelatedInfo>,
    pub(crate) hints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) range: TextRange,
    pub(crate) message: String,
}

impl DiagnosticMessage {
    pub(crate) fn with_default_message(kind: DiagnosticKind, range: TextRange) -> Self {
        Self {
            kind,
            range,
            message: kind.fallback_message().to_string(),
            related: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    /// Byte offset where the offending input starts.
    pub fn offset(&self) -> usize {
        u32::from(self.range.start()) as usize
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "error at {}..{}: {}",
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )?;
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message,
                u32::from(related.range.start()),
                u32::from(related.range.end())
            )?;
        }
        for hint in &self.hints {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}
