//! Mask spans of text, transform the rest, then put the spans back.
//!
//! Masked spans are replaced by `\u{E000}N\u{E001}` tokens, where `N` indexes
//! the stored span. The delimiters are private-use code points, so no
//! Markdown or HTML rewrite can match inside a token.

use regex::{Captures, Regex};
use std::sync::LazyLock;

const OPEN: char = '\u{E000}';
const CLOSE: char = '\u{E001}';

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{E000}(\\d+)\u{E001}").expect("invalid mask token regex"));

/// How a masked span is written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// Restored as `<code>captured</code>`.
    InlineCode,
    /// Restored exactly as matched.
    Verbatim,
    /// Markup that is already HTML. Restored exactly as matched, and only by
    /// [`MaskedText::unmask`].
    Element,
}

#[derive(Debug, Clone, PartialEq)]
struct Span {
    kind: SpanKind,
    text: String,
}

/// Text with some spans swapped out for placeholder tokens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaskedText {
    text: String,
    spans: Vec<Span>,
}

impl MaskedText {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            spans: Vec::new(),
        }
    }

    /// Replace every match of `pattern` with a token.
    ///
    /// [`SpanKind::InlineCode`] keeps capture group 1 (the code without its
    /// backticks); [`SpanKind::Verbatim`] keeps the whole match.
    pub fn mask(mut self, pattern: &Regex, kind: SpanKind) -> Self {
        let mut spans = std::mem::take(&mut self.spans);
        let text = pattern
            .replace_all(&self.text, |caps: &Captures| {
                let captured = match kind {
                    SpanKind::InlineCode => caps.get(1).or_else(|| caps.get(0)),
                    SpanKind::Verbatim | SpanKind::Element => caps.get(0),
                };
                spans.push(Span {
                    kind,
                    text: captured.map(|m| m.as_str()).unwrap_or_default().to_string(),
                });
                format!("{OPEN}{}{CLOSE}", spans.len() - 1)
            })
            .into_owned();
        Self { text, spans }
    }

    /// Run a transformation over the unmasked remainder.
    pub fn map(self, f: impl FnOnce(&str) -> String) -> Self {
        Self {
            text: f(&self.text),
            spans: self.spans,
        }
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[cfg(test)]
    pub fn masked_count(&self) -> usize {
        self.spans.len()
    }

    /// Put back the spans of the given kinds and keep the rest masked.
    /// [`SpanKind::Element`] spans are never restored here.
    pub fn restore(self, kinds: &[SpanKind]) -> Self {
        let text = substitute(&self.text, &self.spans, |kind| {
            kind != SpanKind::Element && kinds.contains(&kind)
        });
        Self {
            text,
            spans: self.spans,
        }
    }

    /// Substitute every token back by index. Unknown tokens are left alone.
    pub fn unmask(self) -> String {
        substitute(&self.text, &self.spans, |_| true)
    }
}

fn substitute(text: &str, spans: &[Span], wanted: impl Fn(SpanKind) -> bool) -> String {
    TOKEN
        .replace_all(text, |caps: &Captures| {
            let span = caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| spans.get(i))
                .filter(|span| wanted(span.kind));
            match span {
                Some(Span {
                    kind: SpanKind::InlineCode,
                    text,
                }) => format!("<code>{text}</code>"),
                Some(span) => span.text.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
