use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::api::ApiError;
use crate::PLACEHOLDER_IMAGE;

/// Raw completion handed back by the shell for every GET the core issues.
pub type HttpOutput = crux_http::Response<Vec<u8>>;
pub type HttpResult = crux_http::Result<HttpOutput>;

pub const MAX_URL_LENGTH: usize = 2048;
pub const DEFAULT_API_BASE: &str = "https://www.themealdb.com/api/json/v1/1";

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Base URL every endpoint path is appended to.
///
/// Only absolute `http`/`https` URLs with a host and without credentials,
/// query or fragment are accepted. Trailing slashes are dropped so paths can
/// be joined with a plain concatenation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiBaseUrl {
    url: String,
}

impl ApiBaseUrl {
    pub fn parse(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let trimmed = url.trim();

        if trimmed.is_empty() {
            return Err(Self::invalid(&url, "URL cannot be empty"));
        }

        if trimmed.len() > MAX_URL_LENGTH {
            return Err(Self::invalid(
                &url,
                &format!("URL exceeds maximum length of {MAX_URL_LENGTH} bytes"),
            ));
        }

        let parsed = Url::parse(trimmed).map_err(|e| Self::invalid(&url, &e.to_string()))?;

        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(Self::invalid(
                &url,
                &format!("invalid scheme '{scheme}', only 'http' and 'https' are allowed"),
            ));
        }

        if parsed.host_str().is_none() {
            return Err(Self::invalid(&url, "URL must have a host"));
        }

        if !parsed.username().is_empty() || parsed.password().is_some() {
            return Err(Self::invalid(&url, "credentials in URL are not allowed"));
        }

        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(Self::invalid(&url, "base URL cannot carry a query or fragment"));
        }

        Ok(Self {
            url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// `path_and_query` must start with `/`.
    pub fn join(&self, path_and_query: &str) -> String {
        format!("{}{}", self.url, path_and_query)
    }

    fn invalid(url: &str, reason: &str) -> ConfigError {
        let shown = if url.len() <= 100 {
            url.to_string()
        } else {
            let mut end = 100;
            while !url.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &url[..end])
        };
        ConfigError::InvalidUrl {
            url: shown,
            reason: reason.to_string(),
        }
    }
}

impl Default for ApiBaseUrl {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl TryFrom<String> for ApiBaseUrl {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ApiBaseUrl> for String {
    fn from(value: ApiBaseUrl) -> Self {
        value.url
    }
}

/// Runtime configuration the shell may push with `Event::Configure`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: ApiBaseUrl,
    pub placeholder_image: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: ApiBaseUrl::default(),
            placeholder_image: PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

/// Turns a shell completion into the response body, mapping transport
/// failures and non-2xx statuses onto [`ApiError`].
pub fn into_body(result: HttpResult) -> Result<Vec<u8>, ApiError> {
    let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status(u16::from(status)));
    }

    response.take_body().ok_or(ApiError::MissingBody)
}
