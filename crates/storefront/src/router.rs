//! Soft navigation: click interception, session history and routes.

use bookstore_core::BookId;
use url::Url;

/// Hrefs starting with this marker leave the storefront.
const EXTERNAL_MARKER: &str = "http";

/// What to do with a click on (or inside) a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Let the host follow the link natively (or do nothing).
    Native,
    /// Suppress the default action and navigate in-app to this href.
    SoftNavigate(String),
}

/// Decide how to handle a click given the href of the nearest enclosing link.
///
/// `None` means the click was not inside a link.
#[must_use]
pub fn intercept_click(href: Option<&str>) -> ClickOutcome {
    match href {
        None => ClickOutcome::Native,
        Some(href) if href.starts_with(EXTERNAL_MARKER) || href == "#" => ClickOutcome::Native,
        Some(href) => ClickOutcome::SoftNavigate(href.to_string()),
    }
}

/// A logical page, resolved from a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/` (also `/start`): the catalog.
    Start,
    /// `/shopping-cart`.
    ShoppingCart,
    /// `/book?id=N`; `None` when the id is missing or malformed.
    BookDetail(Option<BookId>),
    /// Any other page, by fragment name.
    Page(String),
}

impl Route {
    /// Fragment name of the start page.
    pub const START_PAGE: &'static str = "start";

    /// Resolve the route a location points at.
    #[must_use]
    pub fn resolve(location: &Url) -> Self {
        let name = location.path().trim_matches('/');
        match name {
            "" | Self::START_PAGE => Self::Start,
            "shopping-cart" => Self::ShoppingCart,
            "book" => Self::BookDetail(
                location
                    .query_pairs()
                    .find(|(key, _)| key == "id")
                    .and_then(|(_, value)| value.parse().ok()),
            ),
            other => Self::Page(other.to_string()),
        }
    }

    /// Name of the page fragment under `{html_root}/pages/`.
    #[must_use]
    pub fn page_name(&self) -> &str {
        match self {
            Self::Start => Self::START_PAGE,
            Self::ShoppingCart => "shopping-cart",
            Self::BookDetail(_) => "book",
            Self::Page(name) => name,
        }
    }
}

/// The href of a book's detail page.
#[must_use]
pub fn book_href(id: BookId) -> String {
    format!("/book?id={id}")
}

/// In-memory session history with back/forward.
#[derive(Debug, Clone)]
pub struct SessionHistory {
    past: Vec<Url>,
    current: Url,
    future: Vec<Url>,
}

impl SessionHistory {
    /// Start a history at `initial`.
    #[must_use]
    pub const fn new(initial: Url) -> Self {
        Self {
            past: Vec::new(),
            current: initial,
            future: Vec::new(),
        }
    }

    /// The current location.
    #[must_use]
    pub const fn current(&self) -> &Url {
        &self.current
    }

    /// Resolve `href` against the current location without navigating.
    ///
    /// # Errors
    ///
    /// Returns an error if the href cannot be joined.
    pub fn resolve(&self, href: &str) -> Result<Url, url::ParseError> {
        self.current.join(href)
    }

    /// Push a new entry, discarding any forward entries.
    pub fn push(&mut self, location: Url) {
        self.future.clear();
        let previous = std::mem::replace(&mut self.current, location);
        self.past.push(previous);
    }

    /// Step back. Returns `false` at the first entry.
    pub fn back(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, previous);
        self.future.push(current);
        true
    }

    /// Step forward. Returns `false` at the last entry.
    pub fn forward(&mut self) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, next);
        self.past.push(current);
        true
    }

    /// Number of entries, current included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.past.len() + 1 + self.future.len()
    }

    /// Always `false`; a history holds at least its initial entry.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}
