//! Authenticated write path.
//!
//! WordPress application passwords are sent as HTTP Basic credentials. They
//! are displayed in groups separated by spaces (`abcd efgh ijkl ...`); the
//! spaces are not part of the secret and are removed before encoding.

use super::ApiError;
use super::client::MAX_PER_PAGE;
use super::transport::{ApiRequest, HttpTransport, Transport};
use crate::config::{ApiConfig, Credentials};
use crate::types::{PostStatus, Term};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Build the `Authorization` header value for an application password.
pub fn basic_auth_header(username: &str, app_password: &str) -> String {
    let password: String = app_password.chars().filter(|c| !c.is_whitespace()).collect();
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// Body of `POST /posts`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

/// Body of `POST /posts/:id`. Only set fields are changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

/// The fields of a created or updated post worth reporting.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PublishedPost {
    pub id: u64,
    pub link: String,
    pub slug: String,
    pub status: String,
}

pub struct PublishClient<T: Transport = HttpTransport> {
    transport: T,
    authorization: String,
}

impl PublishClient<HttpTransport> {
    pub fn from_config(config: &ApiConfig, credentials: &Credentials) -> Result<Self, ApiError> {
        Ok(Self::with_transport(HttpTransport::new(&config.url)?, credentials))
    }
}

impl<T: Transport> PublishClient<T> {
    pub fn with_transport(transport: T, credentials: &Credentials) -> Self {
        Self {
            transport,
            authorization: basic_auth_header(&credentials.username, &credentials.app_password),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn write<B: Serialize>(&self, path: &str, body: &B) -> Result<PublishedPost, ApiError> {
        let request =
            ApiRequest::post(path, serde_json::to_value(body)?).authorization(&self.authorization);
        self.transport.send(&request)?.written()
    }

    pub fn create_post(&self, post: &NewPost) -> Result<PublishedPost, ApiError> {
        let created = self.write("posts", post)?;
        info!(id = created.id, slug = %created.slug, status = %created.status, "created post");
        Ok(created)
    }

    pub fn update_post(&self, id: u64, changes: &PostUpdate) -> Result<PublishedPost, ApiError> {
        let updated = self.write(&format!("posts/{id}"), changes)?;
        info!(id, status = %updated.status, "updated post");
        Ok(updated)
    }

    /// Flip an existing post to `publish`.
    pub fn publish_post(&self, id: u64) -> Result<PublishedPost, ApiError> {
        let changes = PostUpdate {
            status: Some(PostStatus::Publish),
            ..PostUpdate::default()
        };
        self.update_post(id, &changes)
    }

    /// Every category, including empty ones, across all result pages.
    pub fn list_categories(&self) -> Result<Vec<Term>, ApiError> {
        let mut all = Vec::new();
        let mut page = 1;
        loop {
            let request = ApiRequest::get("categories")
                .param("per_page", MAX_PER_PAGE)
                .param("page", page)
                .param("hide_empty", "false")
                .authorization(&self.authorization);
            let response = self.transport.send(&request)?;
            let terms: Vec<Term> = response.json()?;
            all.extend(terms);
            if page >= response.total_pages.unwrap_or(1) {
                return Ok(all);
            }
            page += 1;
        }
    }

    /// Id of the category called `name` (compared case-insensitively),
    /// creating it only when no such category exists.
    pub fn get_or_create_category(&self, name: &str) -> Result<u64, ApiError> {
        let wanted = name.trim().to_lowercase();
        if let Some(existing) = self
            .list_categories()?
            .into_iter()
            .find(|c| c.name.trim().to_lowercase() == wanted)
        {
            info!(id = existing.id, name = %existing.name, "using existing category");
            return Ok(existing.id);
        }

        let request = ApiRequest::post("categories", serde_json::json!({ "name": name.trim() }))
            .authorization(&self.authorization);
        let created: Term = self.transport.send(&request)?.written()?;
        info!(id = created.id, name = %created.name, "created category");
        Ok(created.id)
    }
}
