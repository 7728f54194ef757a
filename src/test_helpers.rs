//! Shared builders for the press-front test suite.
//!
//! Produces posts, terms and settings shaped like real API payloads so tests
//! read as "given these posts" rather than walls of struct literals.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let settings = test_settings();
//! let p = post_with_terms(1, "hello", "2024-01-01T00:00:00");
//! assert_eq!(p.terms().categories[0].slug, "rust");
//! ```

use crate::config::{ApiConfig, AuthConfig, Settings, SiteConfig};
use crate::types::{Author, Embedded, Media, MediaDetails, MediaSize, Post, Rendered, Term};
use std::collections::BTreeMap;

// =========================================================================
// Settings
// =========================================================================

/// Settings equal to the stock defaults, pointed at example URLs.
pub fn test_settings() -> Settings {
    Settings {
        api: ApiConfig {
            url: "https://cms.example.com".to_string(),
            per_page: 10,
        },
        auth: AuthConfig {
            username: None,
            app_password: None,
        },
        site: SiteConfig {
            title: "Test Blog".to_string(),
            description: "Notes and essays".to_string(),
            url: Some("https://blog.example.com".to_string()),
            language: "en".to_string(),
            posts_per_page: 10,
            feed_size: 20,
            excerpt_length: 160,
            image_size: "large".to_string(),
        },
    }
}

// =========================================================================
// Posts and terms
// =========================================================================

/// A published post with no embedded objects.
pub fn post(id: u64, slug: &str, title: &str, date: &str) -> Post {
    Post {
        id,
        slug: slug.to_string(),
        status: "publish".to_string(),
        link: format!("https://cms.example.com/{slug}/"),
        title: Rendered::from(title),
        content: Rendered::from("<p>Body</p>"),
        excerpt: Rendered::from("<p>Summary</p>"),
        date: date.to_string(),
        date_gmt: date.to_string(),
        modified: date.to_string(),
        modified_gmt: date.to_string(),
        ..Post::default()
    }
}

pub fn term(id: u64, name: &str, slug: &str, taxonomy: &str) -> Term {
    Term {
        id,
        name: name.to_string(),
        slug: slug.to_string(),
        count: 1,
        taxonomy: taxonomy.to_string(),
        ..Term::default()
    }
}

pub fn category(id: u64, name: &str, slug: &str) -> Term {
    term(id, name, slug, "category")
}

pub fn tag(id: u64, name: &str, slug: &str) -> Term {
    term(id, name, slug, "post_tag")
}

/// A post with an embedded author, one category (`rust`) and two tags
/// (`cli`, `parsing`).
pub fn post_with_terms(id: u64, slug: &str, date: &str) -> Post {
    let mut p = post(id, slug, "Tagged post", date);
    p.categories = vec![3];
    p.tags = vec![5, 6];
    p.embedded = Some(Embedded {
        author: vec![Author {
            id: 2,
            name: "Sam Writer".to_string(),
            slug: "sam".to_string(),
            ..Author::default()
        }],
        featured_media: Vec::new(),
        terms: vec![
            vec![category(3, "Rust", "rust")],
            vec![tag(5, "CLI", "cli"), tag(6, "Parsing", "parsing")],
        ],
    });
    p
}

/// A post whose featured image has a `medium` (300x200) variant and a
/// 1200x800 original.
pub fn post_with_media(id: u64, slug: &str, date: &str) -> Post {
    let mut sizes = BTreeMap::new();
    sizes.insert(
        "medium".to_string(),
        MediaSize {
            source_url: "https://cms.example.com/uploads/photo-300x200.jpg".to_string(),
            width: 300,
            height: 200,
        },
    );
    let mut p = post(id, slug, "Illustrated post", date);
    p.featured_media = 7;
    p.embedded = Some(Embedded {
        featured_media: vec![Media {
            id: 7,
            source_url: "https://cms.example.com/uploads/photo.jpg".to_string(),
            alt_text: "A photo".to_string(),
            media_details: MediaDetails {
                width: 1200,
                height: 800,
                sizes,
            },
        }],
        ..Embedded::default()
    });
    p
}

// =========================================================================
// Assertions
// =========================================================================

/// Assert that `needles` occur in `haystack` in the given order.
pub fn assert_in_order(haystack: &str, needles: &[&str]) {
    let mut from = 0;
    for needle in needles {
        match haystack[from..].find(needle) {
            Some(pos) => from += pos + needle.len(),
            None => panic!("'{needle}' not found after byte {from} in:\n{haystack}"),
        }
    }
}
