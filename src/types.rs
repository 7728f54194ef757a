//! Content types returned by the WordPress `wp/v2` REST API.
//!
//! These mirror the JSON payloads closely enough to deserialize them without
//! loss for the fields the site uses. Everything else is ignored. Optional
//! fields default so that partial responses (for example `_fields=slug`) and
//! private embeds still decode.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A `{ "rendered": "..." }` wrapper used for title, content and excerpt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rendered {
    #[serde(default)]
    pub rendered: String,
}

impl From<&str> for Rendered {
    fn from(s: &str) -> Self {
        Self {
            rendered: s.to_string(),
        }
    }
}

/// A blog post as returned by `GET /wp-json/wp/v2/posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    pub id: u64,
    pub slug: String,
    pub status: String,
    pub link: String,
    pub title: Rendered,
    pub content: Rendered,
    pub excerpt: Rendered,
    /// Publish date in the site's timezone (`YYYY-MM-DDTHH:MM:SS`).
    pub date: String,
    /// Publish date in UTC.
    pub date_gmt: String,
    pub modified: String,
    pub modified_gmt: String,
    pub author: u64,
    pub featured_media: u64,
    pub categories: Vec<u64>,
    pub tags: Vec<u64>,
    pub sticky: bool,
    /// Related objects inlined by `_embed`.
    #[serde(rename = "_embedded", skip_serializing_if = "Option::is_none")]
    pub embedded: Option<Embedded>,
}

/// The `_embedded` block of a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Embedded {
    pub author: Vec<Author>,
    #[serde(rename = "wp:featuredmedia")]
    pub featured_media: Vec<Media>,
    /// One inner list per taxonomy, in the order WordPress registers them
    /// (categories first, then tags).
    #[serde(rename = "wp:term")]
    pub terms: Vec<Vec<Term>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub link: String,
}

/// A category or tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Term {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub count: u32,
    pub description: String,
    /// `category` or `post_tag`.
    pub taxonomy: String,
    /// Parent category id; always 0 for tags.
    pub parent: u64,
}

/// An attachment, usually a post's featured image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Media {
    pub id: u64,
    pub source_url: String,
    pub alt_text: String,
    pub media_details: MediaDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaDetails {
    pub width: u32,
    pub height: u32,
    /// Rendered size variants keyed by size name (`thumbnail`, `medium`, `large`, ...).
    pub sizes: BTreeMap<String, MediaSize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaSize {
    pub source_url: String,
    pub width: u32,
    pub height: u32,
}

/// Publication status of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Publish,
    Pending,
    Private,
    Future,
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Publish => "publish",
            Self::Pending => "pending",
            Self::Private => "private",
            Self::Future => "future",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_decodes_from_wordpress_payload() {
        let json = r#"{
            "id": 42,
            "date": "2024-03-01T09:30:00",
            "date_gmt": "2024-03-01T08:30:00",
            "slug": "hello-world",
            "status": "publish",
            "link": "https://cms.example.com/hello-world/",
            "title": {"rendered": "Hello &#8211; World"},
            "content": {"rendered": "<p>Body</p>", "protected": false},
            "excerpt": {"rendered": "<p>Body</p>", "protected": false},
            "author": 1,
            "featured_media": 7,
            "categories": [3],
            "tags": [5, 6],
            "meta": [],
            "_links": {}
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, 42);
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.title.rendered, "Hello &#8211; World");
        assert_eq!(post.tags, vec![5, 6]);
        assert!(post.embedded.is_none());
    }

    #[test]
    fn slug_only_payload_decodes() {
        let posts: Vec<Post> = serde_json::from_str(r#"[{"slug": "a"}, {"slug": "b"}]"#).unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].slug, "b");
        assert_eq!(posts[1].id, 0);
    }

    #[test]
    fn embedded_block_decodes() {
        let json = r#"{
            "id": 1,
            "_embedded": {
                "author": [{"id": 2, "name": "Sam"}],
                "wp:featuredmedia": [{
                    "id": 7,
                    "source_url": "https://cms.example.com/full.jpg",
                    "media_details": {
                        "width": 2000, "height": 1000,
                        "sizes": {"large": {"source_url": "https://cms.example.com/large.jpg", "width": 1024, "height": 512}}
                    }
                }],
                "wp:term": [
                    [{"id": 3, "name": "Rust", "slug": "rust", "taxonomy": "category"}],
                    [{"id": 5, "name": "cli", "slug": "cli", "taxonomy": "post_tag"}]
                ]
            }
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        let embedded = post.embedded.unwrap();
        assert_eq!(embedded.author[0].name, "Sam");
        assert_eq!(embedded.featured_media[0].media_details.sizes["large"].width, 1024);
        assert_eq!(embedded.terms[1][0].taxonomy, "post_tag");
    }

    #[test]
    fn restricted_media_embed_still_decodes() {
        // WordPress embeds an error object when the media is not public.
        let json = r#"{"_embedded": {"wp:featuredmedia": [{"code": "rest_forbidden", "message": "Sorry"}]}}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        let media = &post.embedded.unwrap().featured_media[0];
        assert!(media.source_url.is_empty());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&PostStatus::Publish).unwrap(), r#""publish""#);
        assert_eq!(PostStatus::Draft.to_string(), "draft");
    }
}
