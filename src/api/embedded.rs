//! Accessors over the `_embedded` block of a post.

use crate::types::{Author, Media, Post, Term};

pub const CATEGORY_TAXONOMY: &str = "category";
pub const TAG_TAXONOMY: &str = "post_tag";

/// A featured image resolved to one size variant.
#[derive(Debug, Clone, PartialEq)]
pub struct FeaturedImage<'a> {
    pub url: &'a str,
    pub width: u32,
    pub height: u32,
    pub alt: &'a str,
}

/// Embedded terms split by taxonomy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostTerms<'a> {
    pub categories: Vec<&'a Term>,
    pub tags: Vec<&'a Term>,
}

impl Post {
    fn featured_media_embed(&self) -> Option<&Media> {
        self.embedded
            .as_ref()?
            .featured_media
            .first()
            .filter(|m| !m.source_url.is_empty())
    }

    /// URL of the featured image in `size`, or the original upload when that
    /// size was not generated.
    pub fn featured_image_url(&self, size: &str) -> Option<&str> {
        self.featured_image(size).map(|img| img.url)
    }

    pub fn featured_image(&self, size: &str) -> Option<FeaturedImage<'_>> {
        let media = self.featured_media_embed()?;
        let image = match media.media_details.sizes.get(size) {
            Some(variant) if !variant.source_url.is_empty() => FeaturedImage {
                url: &variant.source_url,
                width: variant.width,
                height: variant.height,
                alt: &media.alt_text,
            },
            _ => FeaturedImage {
                url: &media.source_url,
                width: media.media_details.width,
                height: media.media_details.height,
                alt: &media.alt_text,
            },
        };
        Some(image)
    }

    pub fn author(&self) -> Option<&Author> {
        self.embedded.as_ref()?.author.first()
    }

    pub fn terms(&self) -> PostTerms<'_> {
        let mut terms = PostTerms::default();
        let Some(embedded) = &self.embedded else {
            return terms;
        };
        for term in embedded.terms.iter().flatten() {
            match term.taxonomy.as_str() {
                CATEGORY_TAXONOMY => terms.categories.push(term),
                TAG_TAXONOMY => terms.tags.push(term),
                _ => {}
            }
        }
        terms
    }
}
