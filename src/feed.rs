//! RSS 2.0 feed of the most recent posts.
//!
//! Rendered with maud like the HTML pages; maud knows nothing about HTML
//! element semantics, so it emits XML elements such as `<link>` and
//! `<pubDate>` with content just as readily.

use crate::config::Settings;
use crate::format::rfc2822_date;
use crate::normalize::{excerpt_text, plain_text};
use crate::types::Post;
use chrono::{DateTime, Utc};
use maud::{Markup, PreEscaped, html};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Absolute URL of a post page on the generated site.
pub fn post_url(site_url: &str, slug: &str) -> String {
    format!("{}/posts/{}/", site_url.trim_end_matches('/'), slug)
}

pub fn render_feed(settings: &Settings, posts: &[Post], built_at: DateTime<Utc>) -> String {
    let site_url = settings.site_url();
    let max_items = settings.site.feed_size as usize;
    let feed: Markup = html! {
        (PreEscaped(XML_DECLARATION))
        rss version="2.0" {
            channel {
                title { (settings.site.title) }
                link { (site_url) "/" }
                description { (settings.site.description) }
                language { (settings.site.language) }
                lastBuildDate { (built_at.to_rfc2822()) }
                @for post in posts.iter().take(max_items) {
                    @let url = post_url(site_url, &post.slug);
                    item {
                        title { (plain_text(&post.title.rendered)) }
                        link { (url) }
                        guid isPermaLink="true" { (url) }
                        @if let Some(date) = rfc2822_date(&post.date_gmt) {
                            pubDate { (date) }
                        }
                        description { (post_summary(post, settings.site.excerpt_length)) }
                    }
                }
            }
        }
    };
    feed.into_string()
}

/// The post excerpt as plain text, or the start of the body when the
/// excerpt is empty.
pub fn post_summary(post: &Post, max_len: usize) -> String {
    let excerpt = excerpt_text(&post.excerpt.rendered, max_len);
    if excerpt.is_empty() {
        excerpt_text(&post.content.rendered, max_len)
    } else {
        excerpt
    }
}
