//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Every entity (post, page, term) leads with its positional index and
//! title. URLs, slugs and dates follow as indented context lines, so the
//! output reads as a content inventory while still pointing at the exact
//! resource.
//!
//! # Output Format
//!
//! ## List
//!
//! ```text
//! Posts (page 1 of 3, 25 total)
//! 001 Hello World
//!     Date: January 5, 2024
//!     Slug: hello-world
//!     Categories: Rust, Tooling
//!     A short summary of the post...
//! ```
//!
//! ## Build
//!
//! ```text
//! Index
//! 001 Page 1 → index.html
//! Posts
//! 001 Hello World → posts/hello-world/index.html
//! Categories
//! 001 Rust → category/rust/index.html
//!
//! Generated 1 index page, 1 post, 1 category, 0 tags, 1 feed
//! ```
//!
//! ## Publish
//!
//! ```text
//! Published post 42
//!     URL: https://cms.example.com/welcome/
//!     Slug: welcome
//!     Status: publish
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects. Diagnostics go through `tracing` to
//! stderr instead.

use crate::api::client::MAX_PER_PAGE;
use crate::api::{PostPage, PublishedPost};
use crate::config::Settings;
use crate::feed::post_summary;
use crate::format::display_date;
use crate::generate::{GenerateReport, PageKind};
use crate::normalize::plain_text;
use std::path::Path;

/// Listing summaries are kept to one terminal line.
const LIST_SUMMARY_LENGTH: usize = 100;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 post`, `2 posts`.
fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

// ============================================================================
// list
// ============================================================================

/// Format one page of posts. `page` is 1-based and offsets the positional
/// index so indices stay unique across pages.
pub fn format_post_list(listing: &PostPage, page: u32, per_page: u32) -> Vec<String> {
    let mut lines = Vec::new();

    if listing.posts.is_empty() {
        lines.push("No posts found".to_string());
        return lines;
    }

    lines.push(format!(
        "Posts (page {} of {}, {} total)",
        page,
        listing.total_pages.max(1),
        listing.total
    ));

    // The API never serves more than MAX_PER_PAGE posts per page
    let per_page = per_page.clamp(1, MAX_PER_PAGE) as usize;
    let offset = (page.max(1) as usize - 1).saturating_mul(per_page);
    for (i, post) in listing.posts.iter().enumerate() {
        lines.push(format!(
            "{} {}",
            format_index(offset + i + 1),
            plain_text(&post.title.rendered)
        ));
        lines.push(format!("{}Date: {}", indent(1), display_date(&post.date)));
        lines.push(format!("{}Slug: {}", indent(1), post.slug));

        let terms = post.terms();
        if !terms.categories.is_empty() {
            let names: Vec<&str> = terms.categories.iter().map(|t| t.name.as_str()).collect();
            lines.push(format!("{}Categories: {}", indent(1), names.join(", ")));
        }
        if !terms.tags.is_empty() {
            let names: Vec<&str> = terms.tags.iter().map(|t| t.name.as_str()).collect();
            lines.push(format!("{}Tags: {}", indent(1), names.join(", ")));
        }

        let summary = post_summary(post, LIST_SUMMARY_LENGTH);
        if !summary.is_empty() {
            lines.push(format!("{}{}", indent(1), summary));
        }
    }

    lines
}

pub fn print_post_list(listing: &PostPage, page: u32, per_page: u32) {
    for line in format_post_list(listing, page, per_page) {
        println!("{}", line);
    }
}

// ============================================================================
// build
// ============================================================================

/// Format the pages written by a build, grouped by kind.
pub fn format_generate_report(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();

    let sections = [
        (PageKind::Index, "Index"),
        (PageKind::Post, "Posts"),
        (PageKind::Category, "Categories"),
        (PageKind::Tag, "Tags"),
        (PageKind::Feed, "Feed"),
    ];
    for (kind, heading) in sections {
        let pages: Vec<_> = report.pages.iter().filter(|p| p.kind == kind).collect();
        if pages.is_empty() {
            continue;
        }
        lines.push(heading.to_string());
        for (i, page) in pages.iter().enumerate() {
            lines.push(format!("{} {} → {}", format_index(i + 1), page.title, page.path));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, {}, {}, {}",
        plural(report.count(PageKind::Index), "index page", "index pages"),
        plural(report.count(PageKind::Post), "post", "posts"),
        plural(report.count(PageKind::Category), "category", "categories"),
        plural(report.count(PageKind::Tag), "tag", "tags"),
        plural(report.count(PageKind::Feed), "feed", "feeds"),
    ));

    lines
}

pub fn print_generate_report(report: &GenerateReport) {
    for line in format_generate_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// publish
// ============================================================================

pub fn format_published(post: &PublishedPost) -> Vec<String> {
    vec![
        format!("Published post {}", post.id),
        format!("{}URL: {}", indent(1), post.link),
        format!("{}Slug: {}", indent(1), post.slug),
        format!("{}Status: {}", indent(1), post.status),
    ]
}

pub fn print_published(post: &PublishedPost) {
    for line in format_published(post) {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

/// Format the effective configuration. Secrets are never echoed, only
/// whether they are set.
pub fn format_check(settings: &Settings, config_file: Option<&Path>, category_count: usize) -> Vec<String> {
    let set = |v: &Option<String>| {
        if v.as_deref().is_some_and(|s| !s.trim().is_empty()) {
            "set"
        } else {
            "not set"
        }
    };

    let mut lines = vec!["Config".to_string()];
    match config_file {
        Some(path) => lines.push(format!("{}File: {}", indent(1), path.display())),
        None => lines.push(format!("{}File: none (environment only)", indent(1))),
    }
    lines.push(format!("{}API: {}", indent(1), settings.api.url));
    lines.push(format!("{}Site: {} ({})", indent(1), settings.site.title, settings.site_url()));
    lines.push(format!("{}Username: {}", indent(1), set(&settings.auth.username)));
    lines.push(format!("{}App password: {}", indent(1), set(&settings.auth.app_password)));
    lines.push(String::new());
    lines.push(format!(
        "API reachable ({})",
        plural(category_count, "category", "categories")
    ));
    lines
}

pub fn print_check(settings: &Settings, config_file: Option<&Path>, category_count: usize) {
    for line in format_check(settings, config_file, category_count) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
