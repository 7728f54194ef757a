//! Content normalization: WordPress HTML with stray Markdown → semantic HTML.
//!
//! Authors often paste Markdown into the editor. WordPress wraps it in `<p>`
//! tags and leaves the syntax alone, so `## Title` arrives as
//! `<p>## Title</p>`. [`normalize_content`] rewrites that into real markup.
//!
//! # Pass Order
//!
//! ```text
//! 1. protect    <pre>/<code>, fence regions, inline code → placeholder tokens
//! 2. headings   <p>## x</p>            → <h2>x</h2>
//! 3. emphasis   **x** / *x*            → <strong> / <em>
//! 4. restore    code tokens            → <code>x</code> (fences verbatim)
//! 5. fences     ```lang … ```          → <pre><code class="language-lang">
//! 6. quotes     <p>&gt; x</p>          → <blockquote><p>x</p></blockquote>
//! 7. rules      <p>---</p>             → <hr />
//! 8. lists      <p>- a<br />- b</p>    → <ul><li>a</li><li>b</li></ul>
//! ```
//!
//! Passes 2 and 3 only ever see masked text, which is what keeps `*`, `_` and
//! `#` inside code spans intact. Elements that were already `<pre>` or
//! `<code>` stay masked through every pass and come back last. Fences are converted after restoration and
//! before the paragraph-level passes so their bodies are escaped once and no
//! later pass sees a `<p>` inside them.
//!
//! Underscore emphasis is deliberately unsupported: `my_file_name.rs` must
//! survive untouched.

mod excerpt;
mod mask;
mod passes;

pub use excerpt::{DEFAULT_EXCERPT_LENGTH, decode_entities, excerpt_text, plain_text};
pub use mask::{MaskedText, SpanKind};
pub use passes::{
    apply_emphasis, convert_blockquotes, convert_fenced_code, convert_lists, convert_rules,
    escape_html, promote_headings, protect_code,
};

/// Run every pass in order.
pub fn normalize_content(html: &str) -> String {
    protect_code(html)
        .map(promote_headings)
        .map(apply_emphasis)
        .restore(&[SpanKind::InlineCode, SpanKind::Verbatim])
        .map(convert_fenced_code)
        .map(convert_blockquotes)
        .map(convert_rules)
        .map(convert_lists)
        .unmask()
}
