//! Widget configuration
//!
//! Only `base_url` affects session behavior; the remaining fields are
//! presentational and passed through to whatever renders the conversation.

use reqwest::Url;
use thiserror::Error;

pub const DEFAULT_TITLE: &str = "How can we help?";
pub const DEFAULT_PLACEHOLDER: &str = "Ask us anything...";
pub const DEFAULT_PRIMARY_COLOR: &str = "#2563eb";

/// Configuration errors are fatal at construction time
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Chat widget requires the backend base_url option")]
    MissingBaseUrl,
    #[error("Backend base_url must be an http(s) URL with a host, got {0:?}")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub base_url: String,
    pub title: String,
    pub placeholder: String,
    pub primary_color: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            title: DEFAULT_TITLE.to_string(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
        }
    }
}

impl WidgetConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (`BIZCHAT_*` names).
    /// Unset or blank presentational keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            base_url: lookup("BIZCHAT_BASE_URL").unwrap_or_default(),
            title: non_blank("BIZCHAT_TITLE").unwrap_or(defaults.title),
            placeholder: non_blank("BIZCHAT_PLACEHOLDER").unwrap_or(defaults.placeholder),
            primary_color: non_blank("BIZCHAT_PRIMARY_COLOR").unwrap_or(defaults.primary_color),
        }
    }

    /// Parse the base URL.
    ///
    /// # Errors
    ///
    /// `MissingBaseUrl` when it is blank, `InvalidBaseUrl` when it does not
    /// parse, is not http(s), or has no host.
    pub fn parse_base_url(&self) -> Result<Url, ConfigError> {
        let raw = self.base_url.trim();
        if raw.is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        let invalid = || ConfigError::InvalidBaseUrl(self.base_url.clone());

        let url = Url::parse(raw).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(invalid());
        }
        Ok(url)
    }

    /// # Errors
    ///
    /// Same as [`WidgetConfig::parse_base_url`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parse_base_url().map(|_| ())
    }

    /// # Errors
    ///
    /// Same as [`WidgetConfig::parse_base_url`].
    pub fn chat_endpoint(&self) -> Result<Url, ConfigError> {
        self.endpoint("api/chat")
    }

    /// # Errors
    ///
    /// Same as [`WidgetConfig::parse_base_url`].
    pub fn health_endpoint(&self) -> Result<Url, ConfigError> {
        self.endpoint("api/health")
    }

    /// Append `path` below the base path. Query is kept, fragment dropped.
    fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
        let mut url = self.parse_base_url()?;
        let joined = format!("{}/{path}", url.path().trim_end_matches('/'));
        url.set_path(&joined);
        url.set_fragment(None);
        Ok(url)
    }
}
