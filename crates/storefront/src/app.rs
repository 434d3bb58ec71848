//! The storefront session.
//!
//! `Storefront` owns everything a browsing session mutates: the document,
//! the session history, the catalog store and the cart. Every event handler
//! takes `&mut self`, so handlers run one at a time and a page load can never
//! be overtaken by a later one.

use std::sync::Arc;

use bookstore_core::{Book, BookId};
use tracing::{info, instrument, warn};
use url::Url;

use crate::cache::PageCache;
use crate::cart::{Cart, RemoveOutcome};
use crate::catalog::{CatalogStore, CategoryFilter};
use crate::components::ComponentMounter;
use crate::config::StorefrontConfig;
use crate::dom::{Document, Selector};
use crate::error::{Result, StorefrontError};
use crate::fetch::HtmlFetcher;
use crate::loader::PageLoader;
use crate::router::{ClickOutcome, Route, SessionHistory, book_href, intercept_click};
use crate::views::{self, containers};

/// A single storefront browsing session.
#[derive(Debug)]
pub struct Storefront {
    config: StorefrontConfig,
    fetcher: HtmlFetcher,
    loader: PageLoader,
    document: Document,
    history: SessionHistory,
    catalog: CatalogStore,
    cart: Cart,
}

impl Storefront {
    /// Create a session with an empty document, positioned at the configured
    /// start location.
    ///
    /// # Errors
    ///
    /// Returns an error if the start path cannot be resolved.
    pub fn new(config: StorefrontConfig) -> Result<Self> {
        let start = config.base_url.join(&config.start_path).map_err(|source| {
            StorefrontError::InvalidLocation {
                href: config.start_path.clone(),
                source,
            }
        })?;

        let fetcher = HtmlFetcher::new(config.base_url.clone());
        let mounter = ComponentMounter::new(
            fetcher.clone(),
            config.html_root.clone(),
            config.max_mount_depth,
        );
        let pages = PageCache::new(fetcher.clone());
        let loader = PageLoader::new(pages, mounter, config.html_root.clone());

        Ok(Self {
            config,
            fetcher,
            loader,
            document: Document::default(),
            history: SessionHistory::new(start),
            catalog: CatalogStore::new(),
            cart: Cart::new(),
        })
    }

    /// Fetch the entry document and perform the initial hard load.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry document or the start page cannot be
    /// loaded.
    #[instrument(skip_all, fields(base_url = %config.base_url))]
    pub async fn boot(config: StorefrontConfig) -> Result<Self> {
        let mut storefront = Self::new(config)?;
        let entry = storefront
            .fetcher
            .fetch_text(&storefront.config.entry_path)
            .await?;
        storefront.document = Document::new(entry);
        storefront.start().await?;
        Ok(storefront)
    }

    /// Use `document` as the entry document instead of fetching it.
    #[must_use]
    pub fn with_document(mut self, document: Document) -> Self {
        self.document = document;
        self
    }

    /// Mount the entry document's components, then load the current location.
    ///
    /// # Errors
    ///
    /// Returns an error if mounting or the page load fails.
    pub async fn start(&mut self) -> Result<()> {
        self.loader.mounter().mount(&mut self.document).await?;
        self.load_page(None).await?;
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// The current location.
    #[must_use]
    pub const fn location(&self) -> &Url {
        self.history.current()
    }

    #[must_use]
    pub const fn history(&self) -> &SessionHistory {
        &self.history
    }

    #[must_use]
    pub const fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn page_cache(&self) -> &PageCache {
        self.loader.pages()
    }

    #[must_use]
    pub const fn loader(&self) -> &PageLoader {
        &self.loader
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Handle a click whose nearest enclosing link has `href` (`None` if the
    /// click was not inside a link).
    ///
    /// # Errors
    ///
    /// Returns an error if the soft navigation fails.
    pub async fn handle_click(&mut self, href: Option<&str>) -> Result<ClickOutcome> {
        let outcome = intercept_click(href);
        if let ClickOutcome::SoftNavigate(href) = &outcome {
            self.navigate(href).await?;
        }
        Ok(outcome)
    }

    /// Push `href` onto the session history and load it.
    ///
    /// # Errors
    ///
    /// Returns an error if the href cannot be resolved or the load fails.
    /// The history entry is kept even when the load fails.
    #[instrument(skip(self))]
    pub async fn navigate(&mut self, href: &str) -> Result<Route> {
        let location = self.resolve(href)?;
        self.history.push(location.clone());
        self.load_location(&location).await
    }

    /// Go back one history entry and load it. Returns `false` at the first
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the page load fails.
    pub async fn back(&mut self) -> Result<bool> {
        if !self.history.back() {
            return Ok(false);
        }
        self.pop_state().await?;
        Ok(true)
    }

    /// Go forward one history entry and load it. Returns `false` at the last
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the page load fails.
    pub async fn forward(&mut self) -> Result<bool> {
        if !self.history.forward() {
            return Ok(false);
        }
        self.pop_state().await?;
        Ok(true)
    }

    /// React to a history change made outside the storefront by reloading
    /// the current location.
    ///
    /// # Errors
    ///
    /// Returns an error if the page load fails.
    pub async fn pop_state(&mut self) -> Result<Route> {
        self.load_page(None).await
    }

    /// Load `href` (default: the current location) without touching history.
    ///
    /// # Errors
    ///
    /// Returns an error if the href cannot be resolved or the load fails.
    pub async fn load_page(&mut self, href: Option<&str>) -> Result<Route> {
        let location = match href {
            Some(href) => self.resolve(href)?,
            None => self.history.current().clone(),
        };
        self.load_location(&location).await
    }

    /// Navigate to a book's detail page.
    ///
    /// # Errors
    ///
    /// Returns an error if the detail page cannot be loaded.
    pub async fn open_book(&mut self, id: BookId) -> Result<()> {
        self.navigate(&book_href(id)).await?;
        Ok(())
    }

    /// Load the detail page for `id` and render the book into it.
    ///
    /// An unknown or missing id renders the not-found panel.
    ///
    /// # Errors
    ///
    /// Returns an error if the page, its components or the catalog cannot be
    /// loaded, or the page has no detail container.
    #[instrument(skip(self))]
    pub async fn load_detail_page(&mut self, id: Option<BookId>) -> Result<()> {
        let path = self.loader.detail_path(id);
        self.loader.swap_main(&mut self.document, &path).await?;

        if !self.catalog.is_loaded() {
            self.load_catalog().await?;
        }

        let book = id.and_then(|id| self.catalog.find(id)).cloned();
        if book.is_none() {
            warn!(book_id = ?id, "Book not found in catalog");
        }

        let html = views::book_detail(book.as_deref(), &self.config.currency_label)?;
        self.document
            .set_inner_html(&Selector::parse(containers::BOOK_DETAIL), &html)?;
        Ok(())
    }

    #[instrument(skip_all, fields(location = %location))]
    async fn load_location(&mut self, location: &Url) -> Result<Route> {
        let route = Route::resolve(location);
        info!(?route, "Loading page");

        if let Route::BookDetail(id) = route {
            self.load_detail_page(id).await?;
            return Ok(route);
        }

        let path = self.loader.page_path(&route);
        self.loader.swap_main(&mut self.document, &path).await?;

        match route {
            Route::Start => self.show_catalog().await?,
            Route::ShoppingCart => {
                render_cart(&mut self.document, &self.cart, &self.config.currency_label)?;
            }
            Route::BookDetail(_) | Route::Page(_) => {}
        }
        Ok(route)
    }

    fn resolve(&self, href: &str) -> Result<Url> {
        self.history
            .resolve(href)
            .map_err(|source| StorefrontError::InvalidLocation {
                href: href.to_string(),
                source,
            })
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch the catalog, replacing whatever was loaded before.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be fetched or decoded.
    #[instrument(skip(self))]
    pub async fn load_catalog(&mut self) -> Result<&[Arc<Book>]> {
        let books: Vec<Book> = self.fetcher.fetch_json(&self.config.catalog_path).await?;
        info!(books = books.len(), "Catalog loaded");
        self.catalog.replace(books);
        Ok(self.catalog.books())
    }

    /// Filter the catalog grid, returning how many books are shown.
    ///
    /// # Errors
    ///
    /// Returns an error if the page has no catalog grid.
    pub fn select_category(&mut self, filter: CategoryFilter) -> Result<usize> {
        let books = self.catalog.select(filter);
        self.render_grid(&books)?;
        Ok(books.len())
    }

    async fn show_catalog(&mut self) -> Result<()> {
        self.load_catalog().await?;
        let books = self.catalog.visible();
        self.render_grid(&books)?;
        let filters = views::category_filter(&self.catalog)?;
        self.document
            .set_inner_html(&Selector::parse(containers::FILTERS), &filters)?;
        Ok(())
    }

    fn render_grid(&mut self, books: &[Arc<Book>]) -> Result<()> {
        let html = views::catalog_grid(
            books.iter().map(AsRef::as_ref),
            &self.config.currency_label,
        )?;
        self.document
            .set_inner_html(&Selector::parse(containers::BOOK_LIST), &html)?;
        Ok(())
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add one unit of a catalog book to the cart and refresh the badge.
    /// Returns the book's new quantity.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::BookNotFound` if the id is not in the
    /// catalog, or an error if the badge cannot be rendered. The cart is
    /// unchanged on error.
    #[instrument(skip(self))]
    pub fn add_to_cart(&mut self, id: BookId) -> Result<u32> {
        let book = self
            .catalog
            .find(id)
            .cloned()
            .ok_or(StorefrontError::BookNotFound(id))?;
        let mut cart = self.cart.clone();
        let quantity = cart.add(&book);
        render_badge(&mut self.document, &cart)?;
        self.cart = cart;
        info!(quantity, items = self.cart.item_count(), "Added to cart");
        Ok(quantity)
    }

    /// Remove one unit of a book from the cart, then refresh the cart view
    /// (when it is showing) and the badge.
    ///
    /// # Errors
    ///
    /// Returns an error if the views cannot be rendered; the cart and the
    /// document are then left unchanged.
    #[instrument(skip(self))]
    pub fn remove_from_cart(&mut self, id: BookId) -> Result<RemoveOutcome> {
        let mut cart = self.cart.clone();
        let outcome = cart.remove(id);
        if outcome == RemoveOutcome::Missing {
            warn!("Book is not in the cart");
        }
        let cart_page = Route::resolve(self.history.current()) == Route::ShoppingCart;
        let mut document = self.document.clone();
        if cart_page {
            render_cart(&mut document, &cart, &self.config.currency_label)?;
        }
        render_badge(&mut document, &cart)?;
        self.document = document;
        self.cart = cart;
        Ok(outcome)
    }
}

fn render_cart(document: &mut Document, cart: &Cart, currency_label: &str) -> Result<()> {
    let rows = views::cart_rows(cart, currency_label)?;
    let total = views::cart_total(cart, currency_label)?;
    document.set_inner_html(&Selector::parse(containers::CART_LIST), &rows)?;
    document.set_inner_html(&Selector::parse(containers::CART_TOTAL), &total)?;
    Ok(())
}

fn render_badge(document: &mut Document, cart: &Cart) -> Result<()> {
    let count = views::cart_badge(cart)?;
    document.set_inner_html(&Selector::parse(containers::BADGE), &count)?;
    Ok(())
}
