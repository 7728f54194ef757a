//! WordPress REST API access.
//!
//! | Piece | Role |
//! |---|---|
//! | [`transport`] | [`Transport`] trait + blocking [`HttpTransport`] (reqwest) |
//! | [`client`] | [`ContentClient`]: typed read accessors for posts, categories, tags |
//! | [`embedded`] | Accessors over `_embed` data: featured image, author, terms |
//! | [`publish`] | [`PublishClient`]: Basic-authenticated writes |
//!
//! Every call is one blocking request. Reads fail with [`ApiError::Status`]
//! (status + reason phrase), writes with [`ApiError::Rejected`] (status +
//! response body verbatim). Nothing is retried.

pub mod client;
pub mod embedded;
pub mod publish;
pub mod transport;

pub use client::{ContentClient, PostPage, PostQuery};
pub use embedded::{FeaturedImage, PostTerms};
pub use publish::{NewPost, PostUpdate, PublishClient, PublishedPost, basic_auth_header};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("API request failed: {status} {reason}")]
    Status { status: u16, reason: String },
    #[error("API rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("HTTP error: {0}")]
    Transport(String),
    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),
}
