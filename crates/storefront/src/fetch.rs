//! HTTP access to the static site.
//!
//! Every resource the storefront needs (entry document, page fragments,
//! component fragments, the JSON catalog) is addressed by a site-absolute path
//! and resolved against the configured base URL.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

/// Script tags injected by the Vite dev server into every HTML response.
static DEV_INJECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<script.+?vite/client.+?</script>").expect("Invalid regex")
});

/// Errors that can occur while fetching a resource.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The path could not be resolved against the base URL.
    #[error("Invalid resource path {path}: {source}")]
    InvalidUrl {
        path: String,
        #[source]
        source: url::ParseError,
    },

    /// HTTP request or body decoding failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// Fetches text and JSON resources from the static site.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HtmlFetcher {
    client: reqwest::Client,
    base_url: Url,
}

impl HtmlFetcher {
    /// Create a fetcher for the site at `base_url`.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// The origin every path is resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a site path (optionally with query string) to an absolute URL.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if the path cannot be joined.
    pub fn resolve(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path)
            .map_err(|source| FetchError::InvalidUrl {
                path: path.to_string(),
                source,
            })
    }

    /// Fetch a text resource with dev-server injections removed.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    #[instrument(skip(self))]
    pub async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let response = self.get(path).await?;
        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched text resource");
        Ok(strip_dev_injections(&body).into_owned())
    }

    /// Fetch a JSON resource and decode it.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status or a body
    /// that does not decode as `T`.
    #[instrument(skip(self))]
    pub async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let response = self.get(path).await?;
        Ok(response.json::<T>().await?)
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, FetchError> {
        let url = self.resolve(path)?;
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "Resource fetch returned non-success status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        Ok(response)
    }
}

/// Remove dev-server client script tags from fetched markup.
#[must_use]
pub fn strip_dev_injections(html: &str) -> Cow<'_, str> {
    DEV_INJECTION_RE.replace_all(html, "")
}
