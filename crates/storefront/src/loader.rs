//! Page loading: fragment URL resolution, main-content swap and mounting.

use bookstore_core::BookId;
use tracing::instrument;

use crate::cache::PageCache;
use crate::components::ComponentMounter;
use crate::dom::{Document, Selector};
use crate::error::Result;
use crate::router::Route;
use crate::views::containers;

/// Swaps page fragments into a document's `main` container.
#[derive(Debug, Clone)]
pub struct PageLoader {
    pages: PageCache,
    mounter: ComponentMounter,
    html_root: String,
}

impl PageLoader {
    #[must_use]
    pub fn new(pages: PageCache, mounter: ComponentMounter, html_root: impl Into<String>) -> Self {
        Self {
            pages,
            mounter,
            html_root: html_root.into(),
        }
    }

    /// Fragment path of a routed page.
    #[must_use]
    pub fn page_path(&self, route: &Route) -> String {
        format!("{}/pages/{}.html", self.html_root, route.page_name())
    }

    /// Fragment path of a book's detail page; the id keeps each book's
    /// page a distinct cache entry.
    #[must_use]
    pub fn detail_path(&self, id: Option<BookId>) -> String {
        let base = self.page_path(&Route::BookDetail(id));
        match id {
            Some(id) => format!("{base}?id={id}"),
            None => base,
        }
    }

    /// The session page cache.
    #[must_use]
    pub const fn pages(&self) -> &PageCache {
        &self.pages
    }

    /// The component mounter.
    #[must_use]
    pub const fn mounter(&self) -> &ComponentMounter {
        &self.mounter
    }

    /// Fetch (or reuse) the fragment at `path`, make it the content of
    /// `main`, then mount any components it contains.
    ///
    /// # Errors
    ///
    /// Returns an error if the fragment cannot be fetched, the document has
    /// no `main` element, or mounting fails.
    #[instrument(skip(self, document))]
    pub async fn swap_main(&self, document: &mut Document, path: &str) -> Result<()> {
        let html = self.pages.get_or_fetch(path).await?;
        document.set_inner_html(&Selector::parse(containers::MAIN), &html)?;
        self.mounter.mount(document).await?;
        Ok(())
    }
}
