//! The individual rewrite passes. Each is a pure `&str -> String` function.
//!
//! Most passes look for a `<p>` element whose whole content is one Markdown
//! construct, which is how WordPress wraps Markdown typed into the classic or
//! paragraph block.

use super::mask::{MaskedText, SpanKind};
use regex::{Captures, Regex};
use std::sync::LazyLock;

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("invalid normalizer regex")
}

/// Fence regions, masked so inline-code and emphasis passes skip them.
static BACKTICK_REGION: LazyLock<Regex> = LazyLock::new(|| regex(r"(?s)```.*?```"));
static TILDE_REGION: LazyLock<Regex> = LazyLock::new(|| regex(r"(?s)~~~.*?~~~"));
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| regex(r"`([^`\n]+)`"));

/// Greedy marker run followed by required whitespace, so `######` is tried
/// before `#` and seven hashes never match.
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| regex(r"<p>[ \t]*(#{1,6})[ \t]+([^\n]+?)[ \t]*</p>"));

static STRONG: LazyLock<Regex> =
    LazyLock::new(|| regex(r"\*\*([^\s*](?:[^*\n]*[^\s*])?)\*\*"));
static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| regex(r"\*([^\s*](?:[^*\n]*[^\s*])?)\*"));

/// Groups: 1 opening `<p>`, 2 language, 3 body, 4 closing `</p>`.
static BACKTICK_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    regex(r"(?s)(<p>\s*)?```[ \t]*([\w+#.-]*)[ \t]*(?:<br\s*/?>\s*|\n)(.*?)```[ \t]*(\s*</p>)?")
});
static TILDE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    regex(r"(?s)(<p>\s*)?~~~[ \t]*([\w+#.-]*)[ \t]*(?:<br\s*/?>\s*|\n)(.*?)~~~[ \t]*(\s*</p>)?")
});
static FENCE_LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| regex(r"<br\s*/?>\n?"));
static FENCE_PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| regex(r"\n?</p>\s*<p>"));

static BLOCKQUOTE: LazyLock<Regex> = LazyLock::new(|| regex(r"(?s)<p>\s*&gt;[ \t]?(.*?)</p>"));
static QUOTE_CONTINUATION: LazyLock<Regex> =
    LazyLock::new(|| regex(r"(<br\s*/?>\s*)&gt;[ \t]?"));

/// Three or more of the same marker, optionally spaced: `---`, `* * *`.
static RULE: LazyLock<Regex> = LazyLock::new(|| {
    regex(r"<p>\s*(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})\s*</p>")
});

static PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| regex(r"(?s)<p>(.*?)</p>"));
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| regex(r"<br\s*/?>|\n"));
static ORDERED_ITEM: LazyLock<Regex> = LazyLock::new(|| regex(r"^\d+\.\s+(.+)$"));
static UNORDERED_ITEM: LazyLock<Regex> = LazyLock::new(|| regex(r"^[-*]\s+(.+)$"));

/// Code the editor already marked up. Never rewritten by any pass.
static PRE_ELEMENT: LazyLock<Regex> = LazyLock::new(|| regex(r"(?s)<pre\b.*?</pre>"));
static CODE_ELEMENT: LazyLock<Regex> = LazyLock::new(|| regex(r"(?s)<code\b.*?</code>"));

/// Pass 1: mask existing `<pre>`/`<code>` elements, then fence regions
/// verbatim, then inline code spans.
pub fn protect_code(html: &str) -> MaskedText {
    MaskedText::new(html)
        .mask(&PRE_ELEMENT, SpanKind::Element)
        .mask(&CODE_ELEMENT, SpanKind::Element)
        .mask(&BACKTICK_REGION, SpanKind::Verbatim)
        .mask(&TILDE_REGION, SpanKind::Verbatim)
        .mask(&INLINE_CODE, SpanKind::InlineCode)
}

/// Pass 2: `<p>## Title</p>` → `<h2>Title</h2>`.
pub fn promote_headings(html: &str) -> String {
    HEADING
        .replace_all(html, |caps: &Captures| {
            let level = caps[1].len();
            format!("<h{level}>{}</h{level}>", &caps[2])
        })
        .into_owned()
}

/// Pass 3: `**strong**` then `*em*`. Underscores are never emphasis.
pub fn apply_emphasis(html: &str) -> String {
    let strong = STRONG.replace_all(html, "<strong>$1</strong>");
    replace_single_emphasis(&strong)
}

/// `*x*` → `<em>x</em>`, skipping any candidate that touches another `*`.
fn replace_single_emphasis(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut search_from = 0;
    while let Some(caps) = EMPHASIS.captures_at(text, search_from) {
        let Some(whole) = caps.get(0) else {
            break;
        };
        let before = text[..whole.start()].chars().next_back();
        let after = text[whole.end()..].chars().next();
        if before == Some('*') || after == Some('*') {
            // The opening `*` is one byte; retry from the next character.
            search_from = whole.start() + 1;
            continue;
        }
        out.push_str(&text[copied..whole.start()]);
        out.push_str("<em>");
        out.push_str(&caps[1]);
        out.push_str("</em>");
        copied = whole.end();
        search_from = whole.end();
    }
    out.push_str(&text[copied..]);
    out
}

/// Pass 5: fenced blocks → `<pre><code class="language-x">`.
pub fn convert_fenced_code(html: &str) -> String {
    let once = BACKTICK_FENCE.replace_all(html, fence_replacement);
    TILDE_FENCE.replace_all(&once, fence_replacement).into_owned()
}

/// A fence that starts or ends mid-paragraph splits it, so the surrounding
/// text keeps a balanced `<p>`.
fn fence_replacement(caps: &Captures) -> String {
    let opens_paragraph = caps.get(1).is_some();
    let closes_paragraph = caps.get(4).is_some();
    let language = &caps[2];
    let body = FENCE_PARAGRAPH_BREAK.replace_all(&caps[3], "\n\n");
    let body = FENCE_LINE_BREAK.replace_all(&body, "\n");
    let code = escape_html(body.trim());
    let block = if language.is_empty() {
        format!("<pre><code>{code}</code></pre>")
    } else {
        format!(r#"<pre><code class="language-{language}">{code}</code></pre>"#)
    };
    match (opens_paragraph, closes_paragraph) {
        (true, true) | (false, false) => block,
        (false, true) => format!("</p>{block}"),
        (true, false) => format!("{block}<p>"),
    }
}

/// Escape the three characters that can open markup.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Pass 6: `<p>&gt; quote</p>` → `<blockquote><p>quote</p></blockquote>`.
/// Continuation lines lose their own `&gt;` marker.
pub fn convert_blockquotes(html: &str) -> String {
    BLOCKQUOTE
        .replace_all(html, |caps: &Captures| {
            let inner = QUOTE_CONTINUATION.replace_all(&caps[1], "$1");
            format!("<blockquote><p>{}</p></blockquote>", inner.trim())
        })
        .into_owned()
}

/// Pass 7: `<p>---</p>` → `<hr />`.
pub fn convert_rules(html: &str) -> String {
    RULE.replace_all(html, "<hr />").into_owned()
}

#[derive(Clone, Copy, PartialEq)]
enum ListKind {
    Ordered,
    Unordered,
}

/// Pass 8: a paragraph whose every line is a list item becomes a list.
/// Any other paragraph comes back unchanged.
pub fn convert_lists(html: &str) -> String {
    PARAGRAPH
        .replace_all(html, |caps: &Captures| {
            list_from_paragraph(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn list_from_paragraph(inner: &str) -> Option<String> {
    let lines: Vec<&str> = LINE_BREAK
        .split(inner)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let first = lines.first()?;
    let kind = if ORDERED_ITEM.is_match(first) {
        ListKind::Ordered
    } else if UNORDERED_ITEM.is_match(first) {
        ListKind::Unordered
    } else {
        return None;
    };
    let marker = match kind {
        ListKind::Ordered => &*ORDERED_ITEM,
        ListKind::Unordered => &*UNORDERED_ITEM,
    };

    let mut items = Vec::with_capacity(lines.len());
    for line in &lines {
        let caps = marker.captures(line)?;
        items.push(format!("<li>{}</li>", caps[1].trim()));
    }
    if items.is_empty() {
        return None;
    }

    let tag = match kind {
        ListKind::Ordered => "ol",
        ListKind::Unordered => "ul",
    };
    Some(format!("<{tag}>{}</{tag}>", items.concat()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Headings

    #[test]
    fn heading_levels_one_through_six() {
        for level in 1..=6 {
            let input = format!("<p>{} Title</p>", "#".repeat(level));
            assert_eq!(promote_headings(&input), format!("<h{level}>Title</h{level}>"));
        }
    }

    #[test]
    fn seven_hashes_stay_a_paragraph() {
        let input = "<p>####### Too deep</p>";
        assert_eq!(promote_headings(input), input);
    }

    #[test]
    fn hash_without_space_is_not_a_heading() {
        let input = "<p>#hashtag</p>";
        assert_eq!(promote_headings(input), input);
    }

    #[test]
    fn heading_must_be_whole_paragraph() {
        let input = "<p>See ## this</p>";
        assert_eq!(promote_headings(input), input);
    }

    #[test]
    fn multi_line_paragraph_is_not_promoted() {
        let input = "<p>## Title<br />\nbody</p>";
        assert_eq!(promote_headings(input), input);
    }

    #[test]
    fn headings_pass_is_identity_without_markers() {
        let input = "<p>Plain text</p>\n<p>C# is a language</p>";
        assert_eq!(promote_headings(input), input);
    }

    // Emphasis

    #[test]
    fn strong_and_em() {
        assert_eq!(
            apply_emphasis("<p>**bold** and *italic*</p>"),
            "<p><strong>bold</strong> and <em>italic</em></p>"
        );
    }

    #[test]
    fn underscores_are_untouched() {
        let input = "<p>edit my_config_file.toml and __init__.py</p>";
        assert_eq!(apply_emphasis(input), input);
    }

    #[test]
    fn spaced_asterisks_are_not_emphasis() {
        let input = "<p>2 * 3 * 4</p>";
        assert_eq!(apply_emphasis(input), input);
    }

    #[test]
    fn single_star_next_to_star_is_skipped() {
        let input = "<p>**not closed* here</p>";
        assert_eq!(apply_emphasis(input), input);
    }

    #[test]
    fn several_emphasis_spans_in_one_line() {
        assert_eq!(apply_emphasis("*a* and *b*"), "<em>a</em> and <em>b</em>");
    }

    #[test]
    fn emphasis_does_not_cross_lines() {
        let input = "<p>* one<br />\n* two</p>";
        assert_eq!(apply_emphasis(input), input);
    }

    // Fenced code

    #[test]
    fn fenced_block_in_paragraph() {
        let input = "<p>```js\nconst x = 1 < 2 && y > 0;\n```</p>";
        assert_eq!(
            convert_fenced_code(input),
            r#"<pre><code class="language-js">const x = 1 &lt; 2 &amp;&amp; y &gt; 0;</code></pre>"#
        );
    }

    #[test]
    fn fenced_block_with_br_line_breaks() {
        let input = "<p>```rust<br />\nfn main() {<br />\n}<br />\n```</p>";
        assert_eq!(
            convert_fenced_code(input),
            "<pre><code class=\"language-rust\">fn main() {\n}</code></pre>"
        );
    }

    #[test]
    fn fenced_block_split_across_paragraphs() {
        let input = "<p>```\na\n</p>\n<p>b\n```</p>";
        assert_eq!(convert_fenced_code(input), "<pre><code>a\n\nb</code></pre>");
    }

    #[test]
    fn tilde_fence_without_language() {
        let input = "~~~\nplain\n~~~";
        assert_eq!(convert_fenced_code(input), "<pre><code>plain</code></pre>");
    }

    #[test]
    fn text_around_fence_is_kept() {
        let input = "<p>Intro</p>\n<p>```sh\nls\n```</p>\n<p>Outro</p>";
        assert_eq!(
            convert_fenced_code(input),
            "<p>Intro</p>\n<pre><code class=\"language-sh\">ls</code></pre>\n<p>Outro</p>"
        );
    }

    #[test]
    fn fence_after_text_closes_the_paragraph() {
        let input = "<p>Example:\n```\nls -l\n```</p>";
        assert_eq!(
            convert_fenced_code(input),
            "<p>Example:\n</p><pre><code>ls -l</code></pre>"
        );
    }

    #[test]
    fn fence_before_text_reopens_the_paragraph() {
        let input = "<p>```\nls -l\n```\nThen run it.</p>";
        assert_eq!(
            convert_fenced_code(input),
            "<pre><code>ls -l</code></pre><p>\nThen run it.</p>"
        );
    }

    // Existing markup

    #[test]
    fn existing_code_elements_are_masked() {
        let input = "<pre class=\"wp-block-code\"><code>a*b*c</code></pre> and <code>x*y*z</code>";
        let masked = protect_code(input);
        assert_eq!(masked.masked_count(), 2);
        assert!(!masked.as_str().contains('*'));
        assert_eq!(masked.unmask(), input);
    }

    // Blockquotes, rules

    #[test]
    fn encoded_gt_paragraph_becomes_blockquote() {
        assert_eq!(
            convert_blockquotes("<p>&gt; Quoted words</p>"),
            "<blockquote><p>Quoted words</p></blockquote>"
        );
    }

    #[test]
    fn blockquote_continuation_markers_are_removed() {
        assert_eq!(
            convert_blockquotes("<p>&gt; one<br />\n&gt; two</p>"),
            "<blockquote><p>one<br />\ntwo</p></blockquote>"
        );
    }

    #[test]
    fn gt_mid_paragraph_is_not_a_quote() {
        let input = "<p>a &gt; b</p>";
        assert_eq!(convert_blockquotes(input), input);
    }

    #[test]
    fn rule_variants() {
        assert_eq!(convert_rules("<p>---</p>"), "<hr />");
        assert_eq!(convert_rules("<p>*****</p>"), "<hr />");
        assert_eq!(convert_rules("<p> ___ </p>"), "<hr />");
        assert_eq!(convert_rules("<p>--</p>"), "<p>--</p>");
        assert_eq!(convert_rules("<p>--- text</p>"), "<p>--- text</p>");
    }

    #[test]
    fn spaced_rule_markers() {
        assert_eq!(convert_rules("<p>* * *</p>"), "<hr />");
        assert_eq!(convert_rules("<p>- - -</p>"), "<hr />");
        assert_eq!(convert_rules("<p>_ _ _ _</p>"), "<hr />");
        assert_eq!(convert_rules("<p>- * -</p>"), "<p>- * -</p>");
    }

    // Lists

    #[test]
    fn unordered_list_from_br_lines() {
        assert_eq!(
            convert_lists("<p>- apples<br />\n- pears<br />\n* plums</p>"),
            "<ul><li>apples</li><li>pears</li><li>plums</li></ul>"
        );
    }

    #[test]
    fn ordered_list_from_newlines() {
        assert_eq!(
            convert_lists("<p>1. first\n2. second\n10. tenth</p>"),
            "<ol><li>first</li><li>second</li><li>tenth</li></ol>"
        );
    }

    #[test]
    fn paragraph_without_markers_is_unchanged() {
        let input = "<p>Just a sentence.<br />\nAnother one.</p>";
        assert_eq!(convert_lists(input), input);
    }

    #[test]
    fn mixed_paragraph_is_unchanged() {
        let input = "<p>- item<br />\nnot an item</p>";
        assert_eq!(convert_lists(input), input);
    }

    #[test]
    fn mixed_list_kinds_are_unchanged() {
        let input = "<p>1. one<br />\n- two</p>";
        assert_eq!(convert_lists(input), input);
    }

    #[test]
    fn empty_paragraph_is_unchanged() {
        assert_eq!(convert_lists("<p></p>"), "<p></p>");
    }

    #[test]
    fn only_list_paragraphs_are_rewritten() {
        assert_eq!(
            convert_lists("<p>Shopping:</p>\n<p>- milk</p>"),
            "<p>Shopping:</p>\n<ul><li>milk</li></ul>"
        );
    }

    #[test]
    fn escape_html_covers_reserved_chars() {
        assert_eq!(escape_html("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
    }
}
