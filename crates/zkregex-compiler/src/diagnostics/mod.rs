//! Pattern diagnostics.
//!
//! Every parse problem becomes a [`DiagnosticMessage`] carrying its kind, the
//! byte range of the offending input and a rendered message. Collections print
//! either plainly (`error at 3..4: ...`) or as annotated pattern snippets.

mod message;
mod printer;


use rowan::TextRange;

pub use message::{DiagnosticKind, DiagnosticMessage};
pub use printer::DiagnosticsPrinter;

use message::RelatedInfo;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    messages: Vec<DiagnosticMessage>,
}

#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Create a diagnostic with the given kind and span.
    ///
    /// Uses the kind's default message. Call `.message()` on the builder to override.
    pub fn report(&mut self, kind: DiagnosticKind, range: TextRange) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::with_default_message(kind, range),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages.iter()
    }

    pub fn first(&self) -> Option<&DiagnosticMessage> {
        self.messages.first()
    }

    /// Drop lower-priority diagnostics that start where a higher-priority one does,
    /// then order by offset.
    pub(crate) fn settle(&mut self) {
        let snapshot = self.messages.clone();
        self.messages.retain(|b| {
            !snapshot
                .iter()
                .any(|a| a.range.start() == b.range.start() && a.kind.suppresses(&b.kind))
        });
        self.messages.sort_by_key(|m| (m.range.start(), m.kind));
        self.messages.dedup();
    }

    pub fn printer<'s>(&self, pattern: &'s str) -> DiagnosticsPrinter<'_, 's> {
        DiagnosticsPrinter::new(self, pattern)
    }

    /// Annotated snippets against `pattern`.
    pub fn render(&self, pattern: &str) -> String {
        self.printer(pattern).render()
    }
}

/// One `error at a..b: ...` line per diagnostic.
impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, diag) in self.messages.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{diag}")?;
        }
        Ok(())
    }
}

impl<'a> DiagnosticBuilder<'a> {
    /// Provide custom detail for this diagnostic, rendered using the kind's template.
    pub fn message(mut self, msg: impl Into<String>) -> Self {
        let detail = msg.into();
        self.message.message = self.message.kind.message(Some(&detail));
        self
    }

    pub fn related_to(mut self, msg: impl Into<String>, range: TextRange) -> Self {
        self.message.related.push(RelatedInfo {
            range,
            message: msg.into(),
        });
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.message.hints.push(hint.into());
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}
