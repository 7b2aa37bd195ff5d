//! Pattern errors annotated against the pattern text.
//!
//! Every diagnostic becomes one report: a caret under the offending bytes,
//! secondary labels for related spans and `help:` lines for hints. Patterns
//! that belong to a decomposed regex can be named (`part 2`) so a report says
//! which part it points into.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use rowan::TextRange;

use super::{DiagnosticMessage, Diagnostics};

pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    pattern: &'s str,
    name: Option<&'s str>,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics, pattern: &'s str) -> Self {
        Self {
            diagnostics,
            pattern,
            name: None,
        }
    }

    /// Label shown in the `-->` line of every report.
    pub fn name(mut self, name: &'s str) -> Self {
        self.name = Some(name);
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let renderer = Renderer::plain();
        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", renderer.render(&[self.report(diag)]))?;
        }
        Ok(())
    }

    fn report<'a>(&'a self, diag: &'a DiagnosticMessage) -> Group<'a> {
        let len = self.pattern.len();
        let mut snippet = Snippet::source(self.pattern).line_start(1).annotation(
            AnnotationKind::Primary
                .span(caret_range(diag.range, len))
                .label(&diag.message),
        );
        if let Some(name) = self.name {
            snippet = snippet.path(name);
        }
        for related in &diag.related {
            snippet = snippet.annotation(
                AnnotationKind::Context
                    .span(caret_range(related.range, len))
                    .label(&related.message),
            );
        }

        let mut group = Level::ERROR.primary_title(&diag.message).element(snippet);
        for hint in &diag.hints {
            group = group.element(Level::HELP.message(hint));
        }
        group
    }
}

/// Errors at the end of the pattern point one past its last byte.
fn caret_range(range: TextRange, len: usize) -> std::ops::Range<usize> {
    let start: usize = range.start().into();
    let end: usize = range.end().into();
    if start == end {
        return start..(start + 1).min(len).max(start);
    }
    start..end
}
