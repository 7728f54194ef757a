//! Runtime configuration.
//!
//! Settings come from environment variables layered over an optional TOML
//! file (`press-front.toml` in the working directory, or `--config FILE`).
//! Environment wins over the file.
//!
//! ```toml
//! [api]
//! url = "https://cms.example.com"   # WORDPRESS_API_URL (required)
//! per_page = 10
//!
//! [auth]
//! username = "editor"               # WORDPRESS_USERNAME
//! app_password = "abcd efgh ..."    # WORDPRESS_APP_PASSWORD
//!
//! [site]
//! title = "Blog"                    # SITE_TITLE
//! description = ""
//! url = "https://blog.example.com"  # SITE_URL (defaults to api.url)
//! language = "en"
//! posts_per_page = 10
//! feed_size = 20
//! excerpt_length = 160
//! image_size = "large"
//! ```
//!
//! The API URL is required and validated at startup. Credentials are only
//! resolved by commands that write ([`Settings::credentials`]); a missing
//! username or password is an explicit error, never a placeholder.

use confique::Config;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "press-front.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config load error: {0}")]
    Load(#[from] confique::Error),
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Missing secret {key}: set {env} or add it to the config file")]
    MissingSecret {
        key: &'static str,
        env: &'static str,
    },
}

#[derive(Debug, Clone, Config)]
pub struct Settings {
    /// WordPress REST API connection.
    #[config(nested)]
    pub api: ApiConfig,
    /// Credentials for publishing (application password).
    #[config(nested)]
    pub auth: AuthConfig,
    /// Generated site.
    #[config(nested)]
    pub site: SiteConfig,
}

#[derive(Debug, Clone, Config)]
pub struct ApiConfig {
    /// Root URL of the WordPress site, e.g. "https://cms.example.com".
    /// The `/wp-json/wp/v2` namespace is appended automatically.
    #[config(env = "WORDPRESS_API_URL")]
    pub url: String,
    /// Page size for post listings when none is given (1-100).
    #[config(default = 10)]
    pub per_page: u32,
}

#[derive(Debug, Clone, Config)]
pub struct AuthConfig {
    /// Account that owns the application password.
    #[config(env = "WORDPRESS_USERNAME")]
    pub username: Option<String>,
    /// Application password (spaces are ignored).
    #[config(env = "WORDPRESS_APP_PASSWORD")]
    pub app_password: Option<String>,
}

#[derive(Debug, Clone, Config)]
pub struct SiteConfig {
    /// Site title used in page headers and the feed.
    #[config(env = "SITE_TITLE", default = "Blog")]
    pub title: String,
    /// Tagline used on the home page and as the feed description.
    #[config(default = "")]
    pub description: String,
    /// Public URL of the generated site; used for absolute feed links.
    /// Defaults to the API URL.
    #[config(env = "SITE_URL")]
    pub url: Option<String>,
    /// Language code for `<html lang>` and the feed.
    #[config(default = "en")]
    pub language: String,
    /// Posts per index page.
    #[config(default = 10)]
    pub posts_per_page: usize,
    /// Number of posts in feed.xml.
    #[config(default = 20)]
    pub feed_size: u32,
    /// Maximum characters of derived excerpts and meta descriptions.
    #[config(default = 160)]
    pub excerpt_length: usize,
    /// Featured image size variant to display ("thumbnail", "medium", "large", ...).
    #[config(default = "large")]
    pub image_size: String,
}

/// Resolved publishing credentials.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub app_password: String,
}

impl Settings {
    /// Check values that the type system cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_http_url("api.url", &self.api.url)?;
        if let Some(url) = &self.site.url {
            require_http_url("site.url", url)?;
        }
        if !(1..=100).contains(&self.api.per_page) {
            return Err(ConfigError::Validation(
                "api.per_page must be 1-100".into(),
            ));
        }
        if self.site.posts_per_page == 0 {
            return Err(ConfigError::Validation(
                "site.posts_per_page must be non-zero".into(),
            ));
        }
        if self.site.feed_size == 0 {
            return Err(ConfigError::Validation(
                "site.feed_size must be non-zero".into(),
            ));
        }
        if self.site.excerpt_length == 0 {
            return Err(ConfigError::Validation(
                "site.excerpt_length must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Public base URL of the site, without a trailing slash.
    pub fn site_url(&self) -> &str {
        self.site
            .url
            .as_deref()
            .unwrap_or(&self.api.url)
            .trim_end_matches('/')
    }

    /// Credentials for write commands.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let username = non_blank(&self.auth.username).ok_or(ConfigError::MissingSecret {
            key: "auth.username",
            env: "WORDPRESS_USERNAME",
        })?;
        let app_password = non_blank(&self.auth.app_password).ok_or(ConfigError::MissingSecret {
            key: "auth.app_password",
            env: "WORDPRESS_APP_PASSWORD",
        })?;
        Ok(Credentials {
            username: username.to_string(),
            app_password: app_password.to_string(),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn require_http_url(key: &str, url: &str) -> Result<(), ConfigError> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.trim_matches('/').is_empty() => Ok(()),
        _ => Err(ConfigError::Validation(format!(
            "{key} must be an http(s) URL, got {url:?}"
        ))),
    }
}

/// Load settings from the environment and a config file, then validate.
///
/// An explicitly named file must exist; the default file is optional.
pub fn load_config(file: Option<&Path>) -> Result<Settings, ConfigError> {
    let path = match file {
        Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(DEFAULT_CONFIG_FILE),
    };
    let settings = Settings::builder().env().file(path).load()?;
    settings.validate()?;
    Ok(settings)
}

/// Load settings from a file only, ignoring the environment.
#[cfg(test)]
pub fn load_config_file(path: &Path) -> Result<Settings, ConfigError> {
    let settings = Settings::from_file(path)?;
    settings.validate()?;
    Ok(settings)
}

/// A documented config file with every key and its default.
///
/// Used by the `gen-config` CLI command.
pub fn config_template() -> String {
    confique::toml::template::<Settings>(confique::toml::FormatOptions::default())
}
