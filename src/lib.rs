//! # Press Front
//!
//! A static front end and publishing tool for a WordPress blog. WordPress
//! stays the editor and the source of truth; this crate reads its REST API,
//! cleans up the rendered content, and writes a plain HTML site plus an RSS
//! feed. It can also publish local Markdown drafts back through the API.
//!
//! # Architecture
//!
//! ```text
//! WordPress REST API
//!     │  api::ContentClient (blocking reqwest behind the Transport trait)
//!     ▼
//! SiteContent snapshot        generate::fetch_site
//!     │  normalize::normalize_content on every post body
//!     ▼
//! dist/ HTML + feed.xml       generate::render_site (maud)
//! ```
//!
//! Publishing runs the other way: `draft` parses a Markdown file, and
//! `api::PublishClient` resolves its category and creates the post with a
//! Basic-authenticated request.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`api`] | REST access: transport seam, read client, embedded accessors, publishing |
//! | [`normalize`] | Markdown-in-HTML cleanup: headings, emphasis, code, quotes, rules, lists, excerpts |
//! | [`generate`] | Fetches the site snapshot and renders the HTML pages with Maud |
//! | [`feed`] | RSS 2.0 feed of the newest posts |
//! | [`draft`] | `+++` TOML front matter drafts for the `publish` command |
//! | [`format`] | WordPress date parsing and display |
//! | [`config`] | `confique` settings from the environment and `press-front.toml` |
//! | [`types`] | API data model (`Post`, `Term`, `Media`, ...) |
//! | [`output`] | CLI output formatting, pure `format_*` plus `print_*` wrappers |
//!
//! # Design Decisions
//!
//! ## Normalize at Render Time
//!
//! Posts are stored in WordPress exactly as the editor produced them. Markdown
//! typed into a paragraph block arrives as `<p>## Title</p>` and is rewritten
//! only when a page is rendered, so the stored content never changes and a
//! better normalizer takes effect on the next build.
//!
//! ## One Transport Seam
//!
//! Every request goes through [`api::Transport`]. Production uses a blocking
//! reqwest client; tests queue canned responses in a mock and inspect the
//! recorded requests, so API behaviour is tested without a server.
//!
//! ## Maud Over Template Engines
//!
//! HTML and the RSS feed are generated with [Maud](https://maud.lambda.xyz/).
//! Interpolation is escaped by default, and the only unescaped insertions are
//! content WordPress already rendered as HTML and the bundled stylesheet.

pub mod api;
pub mod config;
pub mod draft;
pub mod feed;
pub mod format;
pub mod generate;
pub mod normalize;
pub mod output;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
