//! Read accessors over the content API.
//!
//! All post requests ask for `_embed` so author, featured media and terms come
//! back inline, and ask for newest-first ordering. Results are also sorted
//! locally so callers never depend on the server honouring `orderby`.

use super::ApiError;
use super::transport::{ApiRequest, HttpTransport, Transport};
use crate::config::ApiConfig;
use crate::types::{Post, Term};
use tracing::{debug, warn};

/// Page size WordPress uses when none is requested.
pub const DEFAULT_PER_PAGE: u32 = 10;
/// Largest page size the API accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Filters for a post listing. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    pub categories: Vec<u64>,
    pub tags: Vec<u64>,
    pub search: Option<String>,
}

impl PostQuery {
    pub fn per_page(mut self, n: u32) -> Self {
        self.per_page = Some(n);
        self
    }

    pub fn page(mut self, n: u32) -> Self {
        self.page = Some(n);
        self
    }

    pub fn category(mut self, id: u64) -> Self {
        self.categories.push(id);
        self
    }

    pub fn tag(mut self, id: u64) -> Self {
        self.tags.push(id);
        self
    }

    pub fn search(mut self, text: &str) -> Self {
        self.search = Some(text.to_string());
        self
    }
}

/// One page of posts plus the totals WordPress reports in its headers.
#[derive(Debug, Clone, Default)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total: u32,
    pub total_pages: u32,
}

pub struct ContentClient<T: Transport = HttpTransport> {
    transport: T,
    per_page: u32,
}

impl ContentClient<HttpTransport> {
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self::with_transport(HttpTransport::new(&config.url)?).default_per_page(config.per_page))
    }
}

impl<T: Transport> ContentClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Page size used when a [`PostQuery`] does not set one.
    pub fn default_per_page(mut self, n: u32) -> Self {
        self.per_page = n.clamp(1, MAX_PER_PAGE);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Posts matching `query`, newest first.
    pub fn get_posts(&self, query: &PostQuery) -> Result<Vec<Post>, ApiError> {
        Ok(self.get_posts_page(query)?.posts)
    }

    /// Like [`get_posts`](Self::get_posts) but keeps the pagination totals.
    pub fn get_posts_page(&self, query: &PostQuery) -> Result<PostPage, ApiError> {
        let per_page = query.per_page.unwrap_or(self.per_page).clamp(1, MAX_PER_PAGE);
        let mut request = ApiRequest::get("posts")
            .param("_embed", "true")
            .param("per_page", per_page)
            .param("page", query.page.unwrap_or(1).max(1))
            .param("orderby", "date")
            .param("order", "desc");
        if !query.categories.is_empty() {
            request = request.param("categories", join_ids(&query.categories));
        }
        if !query.tags.is_empty() {
            request = request.param("tags", join_ids(&query.tags));
        }
        if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
            request = request.param("search", search);
        }

        let response = self.transport.send(&request)?;
        let mut posts: Vec<Post> = response.json()?;
        sort_newest_first(&mut posts);
        debug!(count = posts.len(), "fetched posts");

        Ok(PostPage {
            total: response.total.unwrap_or(posts.len() as u32),
            total_pages: response.total_pages.unwrap_or(1),
            posts,
        })
    }

    /// The post with `slug`, or `None` when nothing matches.
    pub fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>, ApiError> {
        let request = ApiRequest::get("posts")
            .param("slug", slug)
            .param("_embed", "true");
        let posts: Vec<Post> = self.transport.send(&request)?.json()?;
        Ok(posts.into_iter().next())
    }

    /// Slugs of up to 100 posts, for static path generation.
    ///
    /// Never fails: any error is logged and yields an empty list so a build can
    /// continue with zero known posts.
    pub fn get_all_post_slugs(&self) -> Vec<String> {
        let request = ApiRequest::get("posts")
            .param("per_page", MAX_PER_PAGE)
            .param("_fields", "slug");
        let result = self
            .transport
            .send(&request)
            .and_then(|resp| resp.json::<Vec<Post>>());
        match result {
            Ok(posts) => posts
                .into_iter()
                .map(|p| p.slug)
                .filter(|s| !s.is_empty())
                .collect(),
            Err(e) => {
                warn!(error = %e, "could not enumerate post slugs; continuing with none");
                Vec::new()
            }
        }
    }

    /// Non-empty categories.
    pub fn get_categories(&self) -> Result<Vec<Term>, ApiError> {
        self.list_terms("categories")
    }

    pub fn get_category_by_slug(&self, slug: &str) -> Result<Option<Term>, ApiError> {
        self.term_by_slug("categories", slug)
    }

    /// Non-empty tags.
    pub fn get_tags(&self) -> Result<Vec<Term>, ApiError> {
        self.list_terms("tags")
    }

    pub fn get_tag_by_slug(&self, slug: &str) -> Result<Option<Term>, ApiError> {
        self.term_by_slug("tags", slug)
    }

    fn list_terms(&self, taxonomy: &str) -> Result<Vec<Term>, ApiError> {
        let request = ApiRequest::get(taxonomy)
            .param("per_page", MAX_PER_PAGE)
            .param("hide_empty", "true");
        self.transport.send(&request)?.json()
    }

    fn term_by_slug(&self, taxonomy: &str, slug: &str) -> Result<Option<Term>, ApiError> {
        let request = ApiRequest::get(taxonomy).param("slug", slug);
        let terms: Vec<Term> = self.transport.send(&request)?.json()?;
        Ok(terms.into_iter().next())
    }
}

fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Stable sort by publish date, newest first. WordPress dates are fixed-width
/// `YYYY-MM-DDTHH:MM:SS` strings, so string order is chronological order.
fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::tests::MockTransport;
    use serde_json::json;

    fn client(mock: MockTransport) -> ContentClient<MockTransport> {
        ContentClient::with_transport(mock)
    }

    #[test]
    fn get_posts_sends_embed_and_ordering() {
        let c = client(MockTransport::new().reply_json(json!([])));
        c.get_posts(&PostQuery::default()).unwrap();

        let req = &c.transport().requests()[0];
        assert_eq!(req.path, "posts");
        assert_eq!(req.query_value("_embed"), Some("true"));
        assert_eq!(req.query_value("orderby"), Some("date"));
        assert_eq!(req.query_value("order"), Some("desc"));
        assert_eq!(req.query_value("per_page"), Some("10"));
        assert_eq!(req.query_value("page"), Some("1"));
        assert_eq!(req.query_value("search"), None);
    }

    #[test]
    fn get_posts_passes_filters() {
        let c = client(MockTransport::new().reply_json(json!([])));
        let query = PostQuery::default()
            .per_page(5)
            .page(3)
            .category(4)
            .category(9)
            .tag(2)
            .search("rust");
        c.get_posts(&query).unwrap();

        let req = &c.transport().requests()[0];
        assert_eq!(req.query_value("per_page"), Some("5"));
        assert_eq!(req.query_value("page"), Some("3"));
        assert_eq!(req.query_value("categories"), Some("4,9"));
        assert_eq!(req.query_value("tags"), Some("2"));
        assert_eq!(req.query_value("search"), Some("rust"));
    }

    #[test]
    fn per_page_is_capped_at_api_limit() {
        let c = client(MockTransport::new().reply_json(json!([])));
        c.get_posts(&PostQuery::default().per_page(500)).unwrap();
        assert_eq!(c.transport().requests()[0].query_value("per_page"), Some("100"));
    }

    #[test]
    fn get_posts_sorts_newest_first() {
        let c = client(MockTransport::new().reply_json(json!([
            {"id": 1, "slug": "old", "date": "2023-01-01T00:00:00"},
            {"id": 2, "slug": "new", "date": "2024-06-01T00:00:00"},
            {"id": 3, "slug": "mid", "date": "2023-09-15T12:00:00"}
        ])));
        let posts = c.get_posts(&PostQuery::default()).unwrap();
        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "mid", "old"]);
    }

    #[test]
    fn get_posts_surfaces_status() {
        let c = client(MockTransport::new().reply(500, "Internal Server Error", String::new(), None));
        let err = c.get_posts(&PostQuery::default()).unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
        assert!(err.to_string().contains("Internal Server Error"));
    }

    #[test]
    fn get_posts_page_reads_totals() {
        let c = client(MockTransport::new().reply_page(json!([{"id": 1}]), 23, 3));
        let page = c.get_posts_page(&PostQuery::default()).unwrap();
        assert_eq!(page.total, 23);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.posts.len(), 1);
    }

    #[test]
    fn get_post_by_slug_returns_first_match() {
        let c = client(MockTransport::new().reply_json(json!([{"id": 8, "slug": "hello"}])));
        let post = c.get_post_by_slug("hello").unwrap().unwrap();
        assert_eq!(post.id, 8);

        let req = &c.transport().requests()[0];
        assert_eq!(req.query_value("slug"), Some("hello"));
        assert_eq!(req.query_value("_embed"), Some("true"));
    }

    #[test]
    fn get_post_by_slug_empty_result_is_none() {
        let c = client(MockTransport::new().reply_json(json!([])));
        assert!(c.get_post_by_slug("missing").unwrap().is_none());
    }

    #[test]
    fn get_all_post_slugs_requests_slug_field_only() {
        let c = client(MockTransport::new().reply_json(json!([{"slug": "a"}, {"slug": "b"}])));
        assert_eq!(c.get_all_post_slugs(), vec!["a", "b"]);

        let req = &c.transport().requests()[0];
        assert_eq!(req.query_value("_fields"), Some("slug"));
        assert_eq!(req.query_value("per_page"), Some("100"));
    }

    #[test]
    fn get_all_post_slugs_is_empty_when_fetch_fails() {
        let c = client(MockTransport::new().fail("connection refused"));
        assert!(c.get_all_post_slugs().is_empty());
    }

    #[test]
    fn get_all_post_slugs_is_empty_on_error_status() {
        let c = client(MockTransport::new().reply(503, "Service Unavailable", String::new(), None));
        assert!(c.get_all_post_slugs().is_empty());
    }

    #[test]
    fn get_categories_hides_empty() {
        let c = client(MockTransport::new().reply_json(json!([
            {"id": 3, "name": "Rust", "slug": "rust", "count": 4, "taxonomy": "category"}
        ])));
        let cats = c.get_categories().unwrap();
        assert_eq!(cats[0].name, "Rust");

        let req = &c.transport().requests()[0];
        assert_eq!(req.path, "categories");
        assert_eq!(req.query_value("hide_empty"), Some("true"));
    }

    #[test]
    fn get_category_by_slug_missing_is_none() {
        let c = client(MockTransport::new().reply_json(json!([])));
        assert!(c.get_category_by_slug("nope").unwrap().is_none());
    }

    #[test]
    fn get_tag_by_slug_queries_tags() {
        let c = client(MockTransport::new().reply_json(json!([{"id": 5, "slug": "cli"}])));
        let tag = c.get_tag_by_slug("cli").unwrap().unwrap();
        assert_eq!(tag.id, 5);
        assert_eq!(c.transport().requests()[0].path, "tags");
    }
}
