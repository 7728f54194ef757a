//! Local post drafts for the `publish` command.
//!
//! A draft is a Markdown file with TOML front matter between `+++` lines:
//!
//! ```text
//! +++
//! title = "Release notes"
//! category = "Announcements"   # optional; created if missing
//! status = "publish"           # draft | publish | pending | private (default: draft)
//! slug = "release-notes"       # optional
//! excerpt = "What shipped"     # optional
//! tags = ["release"]           # accepted, ignored
//! +++
//!
//! Markdown body...
//! ```
//!
//! The body is rendered to HTML with pulldown-cmark before it is sent, so the
//! backend stores real markup rather than raw Markdown.

use crate::api::NewPost;
use crate::types::PostStatus;
use pulldown_cmark::{Options, Parser, html as md_html};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

const FRONT_MATTER_DELIMITER: &str = "+++";
const WELCOME_POST: &str = include_str!("../content/welcome.md");

#[derive(Error, Debug)]
pub enum DraftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Draft must start with a `+++` front matter block")]
    MissingFrontMatter,
    #[error("Front matter is not closed with `+++`")]
    UnclosedFrontMatter,
    #[error("Front matter error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Draft title must not be empty")]
    EmptyTitle,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FrontMatter {
    title: String,
    category: Option<String>,
    #[serde(default)]
    status: PostStatus,
    slug: Option<String>,
    excerpt: Option<String>,
    /// Accepted so drafts shared with other tools load; not sent.
    #[serde(default, rename = "tags")]
    _tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    pub title: String,
    pub category: Option<String>,
    pub status: PostStatus,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    /// Markdown source of the body.
    pub body: String,
}

impl PostDraft {
    pub fn parse(source: &str) -> Result<Self, DraftError> {
        let source = source.trim_start_matches('\u{feff}');
        let rest = source
            .trim_start()
            .strip_prefix(FRONT_MATTER_DELIMITER)
            .ok_or(DraftError::MissingFrontMatter)?;
        let (front, body) = split_front_matter(rest).ok_or(DraftError::UnclosedFrontMatter)?;

        let meta: FrontMatter = toml::from_str(front)?;
        if meta.title.trim().is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        Ok(Self {
            title: meta.title.trim().to_string(),
            category: meta
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            status: meta.status,
            slug: meta.slug,
            excerpt: meta.excerpt,
            body: body.trim().to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, DraftError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// The bundled welcome post, published when no file is given.
    pub fn welcome() -> Result<Self, DraftError> {
        Self::parse(WELCOME_POST)
    }

    pub fn body_html(&self) -> String {
        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        let parser = Parser::new_ext(&self.body, options);
        let mut html = String::new();
        md_html::push_html(&mut html, parser);
        html
    }

    /// Request body for `POST /posts`.
    pub fn to_new_post(&self, category_id: Option<u64>) -> NewPost {
        NewPost {
            title: self.title.clone(),
            content: self.body_html(),
            status: self.status,
            categories: category_id.into_iter().collect(),
            tags: Vec::new(),
            slug: self.slug.clone(),
            excerpt: self.excerpt.clone(),
        }
    }
}

/// Split `front\n+++\nbody` on the first line that is exactly `+++`.
fn split_front_matter(rest: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FRONT_MATTER_DELIMITER {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}
