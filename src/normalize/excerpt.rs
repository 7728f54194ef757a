//! Plain-text excerpts for previews, meta descriptions and the feed.

use regex::Regex;
use std::sync::LazyLock;

pub const DEFAULT_EXCERPT_LENGTH: usize = 160;
const ELLIPSIS: &str = "...";

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("invalid excerpt regex")
}

static NUMERIC_ENTITY: LazyLock<Regex> = LazyLock::new(|| regex(r"&#(?:\d+|[xX][0-9a-fA-F]+);"));
/// Block boundaries become spaces so adjacent paragraphs don't run together.
static BLOCK_BREAK: LazyLock<Regex> =
    LazyLock::new(|| regex(r"(?i)<br\s*/?>|</(?:p|div|li|h[1-6]|blockquote|pre|tr)>"));
static TAG: LazyLock<Regex> = LazyLock::new(|| regex(r"<[^>]*>"));
static HEADING_MARKER: LazyLock<Regex> = LazyLock::new(|| regex(r"(?m)(^|\s)#{1,6}\s+"));
static BOLD: LazyLock<Regex> = LazyLock::new(|| regex(r"\*\*(.+?)\*\*"));
static ITALIC: LazyLock<Regex> = LazyLock::new(|| regex(r"\*([^*\n]+)\*"));
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| regex(r"`([^`]+)`"));
static LINK: LazyLock<Regex> = LazyLock::new(|| regex(r"\[([^\]]+)\]\([^)]*\)"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| regex(r"\s+"));

/// Decode the entities WordPress emits in titles and excerpts.
///
/// En dash, em dash, non-breaking space and `&amp;` are decoded; any other
/// numeric entity is dropped. `&amp;` goes last so `&amp;#8211;` does not turn
/// into a dash.
pub fn decode_entities(text: &str) -> String {
    let text = text
        .replace("&#8211;", "\u{2013}")
        .replace("&#8212;", "\u{2014}")
        .replace("&nbsp;", " ");
    NUMERIC_ENTITY.replace_all(&text, "").replace("&amp;", "&")
}

/// Rendered HTML (possibly containing Markdown) as a single line of text.
pub fn plain_text(html: &str) -> String {
    let text = decode_entities(html);
    let text = BLOCK_BREAK.replace_all(&text, " ");
    let text = TAG.replace_all(&text, "");
    let text = HEADING_MARKER.replace_all(&text, "$1");
    let text = BOLD.replace_all(&text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = INLINE_CODE.replace_all(&text, "$1");
    let text = LINK.replace_all(&text, "$1");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// [`plain_text`] cut to `max_len` characters, with `...` appended only when
/// something was cut.
pub fn excerpt_text(html: &str, max_len: usize) -> String {
    let text = plain_text(html);
    if text.chars().count() <= max_len {
        return text;
    }
    let mut cut: String = text.chars().take(max_len).collect();
    cut.push_str(ELLIPSIS);
    cut
}
