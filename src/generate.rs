//! Static site generation.
//!
//! Two steps: [`fetch_site`] pulls everything the site needs from the API
//! into a [`SiteContent`] snapshot, then [`render_site`] writes HTML from
//! that snapshot without touching the network.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                 # Newest posts (page 1)
//! ├── page/2/index.html          # Older posts
//! ├── posts/<slug>/index.html    # One page per post
//! ├── category/<slug>/index.html # Posts in a category
//! ├── tag/<slug>/index.html      # Posts with a tag
//! └── feed.xml                   # RSS 2.0
//! ```
//!
//! ## Fetch Strategy
//!
//! Post pages are discovered with [`ContentClient::get_all_post_slugs`] and
//! each post is then fetched by slug. Slug discovery never fails: if it
//! cannot reach the API the site builds with zero posts and a warning. Every
//! other request failure aborts the build.
//!
//! Post bodies go through [`normalize_content`] so Markdown typed into the
//! editor renders as real headings, lists and code blocks.

use crate::api::client::MAX_PER_PAGE;
use crate::api::{ApiError, ContentClient, PostQuery, Transport};
use crate::config::Settings;
use crate::feed::{post_summary, render_feed};
use crate::format::display_date;
use crate::normalize::{normalize_content, plain_text};
use crate::types::{Post, Term};
use chrono::{DateTime, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A category or tag together with its posts.
#[derive(Debug, Clone)]
pub struct TermListing {
    pub term: Term,
    pub posts: Vec<Post>,
}

/// Everything the renderer needs, fetched up front.
#[derive(Debug, Clone, Default)]
pub struct SiteContent {
    /// Every post, newest first.
    pub posts: Vec<Post>,
    pub categories: Vec<TermListing>,
    pub tags: Vec<TermListing>,
    /// The newest posts for the feed.
    pub recent: Vec<Post>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Index,
    Post,
    Category,
    Tag,
    Feed,
}

/// One written file, for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPage {
    pub kind: PageKind,
    pub title: String,
    /// Path relative to the output directory.
    pub path: String,
}

#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    pub pages: Vec<GeneratedPage>,
}

impl GenerateReport {
    pub fn count(&self, kind: PageKind) -> usize {
        self.pages.iter().filter(|p| p.kind == kind).count()
    }

    fn record(&mut self, kind: PageKind, title: impl Into<String>, path: impl Into<String>) {
        self.pages.push(GeneratedPage {
            kind,
            title: title.into(),
            path: path.into(),
        });
    }
}

const CSS: &str = include_str!("../static/style.css");

/// Fetch and render the whole site into `output_dir`.
pub fn build(settings: &Settings, output_dir: &Path) -> Result<GenerateReport, GenerateError> {
    let client = ContentClient::from_config(&settings.api)?;
    let content = fetch_site(&client, settings)?;
    render_site(&content, settings, output_dir, Utc::now())
}

pub fn fetch_site<T: Transport>(
    client: &ContentClient<T>,
    settings: &Settings,
) -> Result<SiteContent, GenerateError> {
    let slugs = client.get_all_post_slugs();
    info!(count = slugs.len(), "discovered posts");

    let mut posts = Vec::with_capacity(slugs.len());
    for slug in &slugs {
        match client.get_post_by_slug(slug)? {
            Some(post) => posts.push(post),
            None => warn!(%slug, "post listed but not found; skipping"),
        }
    }
    posts.sort_by(|a, b| b.date.cmp(&a.date));

    let mut categories = Vec::new();
    for term in client.get_categories()? {
        let query = PostQuery::default().per_page(MAX_PER_PAGE).category(term.id);
        categories.push(TermListing {
            posts: client.get_posts(&query)?,
            term,
        });
    }
    info!(count = categories.len(), "fetched categories");

    let mut tags = Vec::new();
    for term in client.get_tags()? {
        let query = PostQuery::default().per_page(MAX_PER_PAGE).tag(term.id);
        tags.push(TermListing {
            posts: client.get_posts(&query)?,
            term,
        });
    }
    info!(count = tags.len(), "fetched tags");

    let feed_query = PostQuery::default().per_page(settings.site.feed_size.min(MAX_PER_PAGE));
    let recent = client.get_posts(&feed_query)?;

    Ok(SiteContent {
        posts,
        categories,
        tags,
        recent,
    })
}

pub fn render_site(
    content: &SiteContent,
    settings: &Settings,
    output_dir: &Path,
    built_at: DateTime<Utc>,
) -> Result<GenerateReport, GenerateError> {
    fs::create_dir_all(output_dir)?;
    let mut report = GenerateReport::default();
    let nav: Vec<&Term> = content.categories.iter().map(|l| &l.term).collect();

    // Index pages; an empty site still gets a home page
    let per_page = settings.site.posts_per_page.max(1);
    let chunks: Vec<&[Post]> = if content.posts.is_empty() {
        vec![&content.posts[..]]
    } else {
        content.posts.chunks(per_page).collect()
    };
    for (idx, chunk) in chunks.iter().enumerate() {
        let page = idx + 1;
        let markup = render_index_page(chunk, page, chunks.len(), &nav, settings);
        let path = if page == 1 {
            "index.html".to_string()
        } else {
            format!("page/{page}/index.html")
        };
        write_page(output_dir, &path, markup)?;
        report.record(PageKind::Index, format!("Page {page}"), path);
    }

    for post in &content.posts {
        if !is_safe_slug(&post.slug) {
            warn!(slug = %post.slug, id = post.id, "unsafe slug; post page skipped");
            continue;
        }
        let path = format!("posts/{}/index.html", post.slug);
        write_page(output_dir, &path, render_post_page(post, &nav, settings))?;
        report.record(PageKind::Post, plain_text(&post.title.rendered), path);
    }

    for (listings, kind, label, dir) in [
        (&content.categories, PageKind::Category, "Category", "category"),
        (&content.tags, PageKind::Tag, "Tag", "tag"),
    ] {
        for listing in listings {
            if !is_safe_slug(&listing.term.slug) {
                warn!(slug = %listing.term.slug, "unsafe term slug; page skipped");
                continue;
            }
            let path = format!("{dir}/{}/index.html", listing.term.slug);
            write_page(output_dir, &path, render_term_page(listing, label, &nav, settings))?;
            report.record(kind, listing.term.name.clone(), path);
        }
    }

    fs::write(
        output_dir.join("feed.xml"),
        render_feed(settings, &content.recent, built_at),
    )?;
    report.record(PageKind::Feed, "RSS feed", "feed.xml");

    info!(pages = report.pages.len(), dir = %output_dir.display(), "site generated");
    Ok(report)
}

fn write_page(output_dir: &Path, rel_path: &str, markup: Markup) -> std::io::Result<()> {
    let path = output_dir.join(rel_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, markup.into_string())
}

/// Slugs become directory names. WordPress slugs are lowercase ASCII,
/// digits, dashes and percent-encoded bytes.
fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '%'))
}

fn post_href(post: &Post) -> String {
    format!("/posts/{}/", post.slug)
}

fn page_href(page: usize) -> String {
    if page <= 1 {
        "/".to_string()
    } else {
        format!("/page/{page}/")
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(
    settings: &Settings,
    title: &str,
    description: Option<&str>,
    nav: &[&Term],
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(settings.site.language) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                @if let Some(desc) = description.filter(|d| !d.is_empty()) {
                    meta name="description" content=(desc);
                }
                link rel="alternate" type="application/rss+xml" title=(settings.site.title) href="/feed.xml";
                style { (PreEscaped(CSS)) }
            }
            body {
                (site_header(settings, nav))
                (content)
                footer.site-footer {
                    a href="/feed.xml" { "RSS" }
                }
            }
        }
    }
}

/// Renders the site header with title and category navigation
fn site_header(settings: &Settings, nav: &[&Term]) -> Markup {
    html! {
        header.site-header {
            a.site-title href="/" { (settings.site.title) }
            @if !settings.site.description.is_empty() {
                p.site-description { (settings.site.description) }
            }
            @if !nav.is_empty() {
                nav.site-nav {
                    ul {
                        @for term in nav {
                            li { a href={ "/category/" (term.slug) "/" } { (term.name) } }
                        }
                    }
                }
            }
        }
    }
}

/// Renders a post summary for listings
fn post_card(post: &Post, settings: &Settings) -> Markup {
    html! {
        article.post-card {
            h2 { a href=(post_href(post)) { (PreEscaped(&post.title.rendered)) } }
            p.post-meta {
                time datetime=(post.date) { (display_date(&post.date)) }
            }
            p.post-excerpt { (post_summary(post, settings.site.excerpt_length)) }
        }
    }
}

fn pagination(page: usize, total_pages: usize) -> Markup {
    html! {
        @if total_pages > 1 {
            nav.pagination {
                @if page > 1 {
                    a rel="prev" href=(page_href(page - 1)) { "← Newer posts" }
                } @else {
                    span {}
                }
                span.page-count { "Page " (page) " of " (total_pages) }
                @if page < total_pages {
                    a rel="next" href=(page_href(page + 1)) { "Older posts →" }
                } @else {
                    span {}
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_index_page(
    posts: &[Post],
    page: usize,
    total_pages: usize,
    nav: &[&Term],
    settings: &Settings,
) -> Markup {
    let title = if page == 1 {
        settings.site.title.clone()
    } else {
        format!("{} | Page {page}", settings.site.title)
    };

    let content = html! {
        main.index-page {
            @if posts.is_empty() {
                p.empty { "No posts yet." }
            }
            @for post in posts {
                (post_card(post, settings))
            }
            (pagination(page, total_pages))
        }
    };

    base_document(settings, &title, Some(settings.site.description.as_str()), nav, content)
}

fn render_post_page(post: &Post, nav: &[&Term], settings: &Settings) -> Markup {
    let title = format!("{} | {}", plain_text(&post.title.rendered), settings.site.title);
    let description = post_summary(post, settings.site.excerpt_length);
    let terms = post.terms();

    let content = html! {
        main {
            article.post {
                header {
                    h1 { (PreEscaped(&post.title.rendered)) }
                    p.post-meta {
                        time datetime=(post.date) { (display_date(&post.date)) }
                        @if let Some(author) = post.author() {
                            " · " span.author { (author.name) }
                        }
                    }
                }
                @if let Some(image) = post.featured_image(&settings.site.image_size) {
                    figure.featured-image {
                        img src=(image.url) alt=(image.alt) width=(image.width) height=(image.height);
                    }
                }
                div.post-content {
                    (PreEscaped(normalize_content(&post.content.rendered)))
                }
                @if !terms.categories.is_empty() || !terms.tags.is_empty() {
                    footer.post-terms {
                        @for term in &terms.categories {
                            a.category href={ "/category/" (term.slug) "/" } { (term.name) }
                        }
                        @for term in &terms.tags {
                            a.tag href={ "/tag/" (term.slug) "/" } { "#" (term.name) }
                        }
                    }
                }
            }
        }
    };

    base_document(settings, &title, Some(description.as_str()), nav, content)
}

fn render_term_page(listing: &TermListing, label: &str, nav: &[&Term], settings: &Settings) -> Markup {
    let title = format!("{label}: {} | {}", listing.term.name, settings.site.title);
    let description = plain_text(&listing.term.description);

    let content = html! {
        main.term-page {
            h1 { (label) ": " (listing.term.name) }
            @if !description.is_empty() {
                p.term-description { (description) }
            }
            @if listing.posts.is_empty() {
                p.empty { "No posts yet." }
            }
            @for post in &listing.posts {
                (post_card(post, settings))
            }
        }
    };

    base_document(settings, &title, Some(description.as_str()), nav, content)
}

// ============================================================================
// Tests
// ============================================================================
