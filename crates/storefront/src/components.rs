//! Component mounting.
//!
//! Markup may contain placeholders such as `<component src="/header"></component>`.
//! Mounting replaces each one with the fragment at `{html_root}{src}.html`.
//! Fragments may contain placeholders of their own; those are expanded
//! depth-first before the fragment is spliced in, which yields the same
//! document-order result as repeatedly mounting the first placeholder.
//!
//! A fragment that (directly or transitively) includes itself is rejected
//! with [`MountError::Cycle`], and nesting beyond the configured depth with
//! [`MountError::TooDeep`].

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::dom::{Document, Selector};
use crate::fetch::{FetchError, HtmlFetcher};

/// Tag name of component placeholders.
pub const PLACEHOLDER_TAG: &str = "component";

/// Errors that can occur while mounting components.
#[derive(Debug, Error)]
pub enum MountError {
    /// A fragment includes itself; `chain` lists the `src` values from the
    /// outermost placeholder down to the repeated one.
    #[error("Template cycle: {}", chain.join(" -> "))]
    Cycle { chain: Vec<String> },

    /// Placeholders are nested deeper than the configured limit.
    #[error("Component '{src}' exceeds the maximum nesting depth of {max_depth}")]
    TooDeep { src: String, max_depth: usize },

    /// A placeholder has no `src` attribute.
    #[error("Component placeholder without a src attribute")]
    MissingSrc,

    /// Fetching a fragment failed.
    #[error("Failed to fetch component '{src}': {source}")]
    Fetch {
        src: String,
        #[source]
        source: FetchError,
    },
}

type MountFuture<'a> = Pin<Box<dyn Future<Output = Result<usize, MountError>> + Send + 'a>>;

/// Replaces component placeholders with fetched fragments.
#[derive(Debug, Clone)]
pub struct ComponentMounter {
    fetcher: HtmlFetcher,
    html_root: String,
    max_depth: usize,
}

impl ComponentMounter {
    /// Create a mounter resolving fragments under `html_root`.
    #[must_use]
    pub fn new(fetcher: HtmlFetcher, html_root: impl Into<String>, max_depth: usize) -> Self {
        Self {
            fetcher,
            html_root: html_root.into(),
            max_depth,
        }
    }

    /// Path of the fragment a placeholder's `src` refers to.
    #[must_use]
    pub fn fragment_path(&self, src: &str) -> String {
        format!("{}{src}.html", self.html_root)
    }

    /// Mount every placeholder in `document`, returning how many were mounted
    /// (nested ones included).
    ///
    /// # Errors
    ///
    /// Returns a `MountError` on a cycle, excessive nesting, a placeholder
    /// without `src`, or a failed fetch. Placeholders mounted before the
    /// failure stay mounted.
    #[instrument(skip_all)]
    pub async fn mount(&self, document: &mut Document) -> Result<usize, MountError> {
        let mut ancestry = Vec::new();
        let mounted = self.expand(document, &mut ancestry).await?;
        if mounted > 0 {
            debug!(mounted, "Mounted components");
        }
        Ok(mounted)
    }

    fn expand<'a>(
        &'a self,
        document: &'a mut Document,
        ancestry: &'a mut Vec<String>,
    ) -> MountFuture<'a> {
        Box::pin(async move {
            let placeholder = Selector::tag(PLACEHOLDER_TAG);
            let mut mounted = 0;

            while let Some(element) = document.find(&placeholder) {
                let src = element.attr("src").ok_or(MountError::MissingSrc)?.to_string();

                if ancestry.contains(&src) {
                    let mut chain = ancestry.clone();
                    chain.push(src);
                    return Err(MountError::Cycle { chain });
                }
                if ancestry.len() >= self.max_depth {
                    return Err(MountError::TooDeep {
                        src,
                        max_depth: self.max_depth,
                    });
                }

                let html = self
                    .fetcher
                    .fetch_text(&self.fragment_path(&src))
                    .await
                    .map_err(|source| MountError::Fetch {
                        src: src.clone(),
                        source,
                    })?;

                let mut fragment = Document::new(html);
                ancestry.push(src);
                mounted += self.expand(&mut fragment, ancestry).await?;
                ancestry.pop();

                document.replace_element(&element, fragment.html().trim());
                mounted += 1;
            }

            Ok(mounted)
        })
    }
}
