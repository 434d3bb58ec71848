//! Session cache of fetched page fragments.
//!
//! Pages are static for the lifetime of a session, so entries never expire
//! and are never evicted. The key is the fully resolved URL, query string
//! included: `book.html?id=1` and `book.html?id=2` are distinct entries.

use std::sync::Arc;

use moka::future::Cache;
use tracing::{debug, instrument};

use crate::fetch::{FetchError, HtmlFetcher};

/// Fetch-through cache of page HTML keyed by resolved URL.
///
/// Cheap to clone; clones share entries.
#[derive(Clone)]
pub struct PageCache {
    fetcher: HtmlFetcher,
    pages: Cache<String, Arc<str>>,
}

impl PageCache {
    /// Create an empty cache in front of `fetcher`.
    #[must_use]
    pub fn new(fetcher: HtmlFetcher) -> Self {
        Self {
            fetcher,
            pages: Cache::builder().name("pages").build(),
        }
    }

    /// Return the cached HTML for `path`, fetching it on first use.
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` if the page is not cached and the fetch fails.
    /// Failures are not cached.
    #[instrument(skip(self))]
    pub async fn get_or_fetch(&self, path: &str) -> Result<Arc<str>, FetchError> {
        let key = self.fetcher.resolve(path)?.to_string();

        if let Some(html) = self.pages.get(&key).await {
            debug!("Cache hit for page");
            return Ok(html);
        }

        let html: Arc<str> = self.fetcher.fetch_text(path).await?.into();
        self.pages.insert(key, Arc::clone(&html)).await;
        Ok(html)
    }

    /// Whether the page at `path` has been cached.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.fetcher
            .resolve(path)
            .is_ok_and(|url| self.pages.contains_key(url.as_str()))
    }
}

impl std::fmt::Debug for PageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageCache")
            .field("base_url", &self.fetcher.base_url().as_str())
            .field("entries", &self.pages.entry_count())
            .finish()
    }
}
