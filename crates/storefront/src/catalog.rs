//! Catalog store: the session's book list and category filter.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use bookstore_core::{Book, BookId};

/// The category selection shown in the filter dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// No filtering.
    #[default]
    All,
    /// Only books whose category equals this string exactly.
    Category(String),
}

impl CategoryFilter {
    /// Dropdown label of the unfiltered option.
    pub const ALL_LABEL: &'static str = "all";
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == Self::ALL_LABEL {
            Self::All
        } else {
            Self::Category(s.to_string())
        })
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL_LABEL),
            Self::Category(category) => f.write_str(category),
        }
    }
}

/// Holds the loaded catalog, its derived categories and the current filter.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    books: Vec<Arc<Book>>,
    categories: Vec<String>,
    selected: CategoryFilter,
    loaded: bool,
}

impl CatalogStore {
    /// Create an empty, not-yet-loaded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the catalog wholesale.
    ///
    /// Recomputes the category facets and resets the selection to `all`.
    pub fn replace(&mut self, books: Vec<Book>) {
        self.books = books.into_iter().map(Arc::new).collect();
        self.categories = derive_categories(&self.books);
        self.selected = CategoryFilter::All;
        self.loaded = true;
    }

    /// Whether a catalog has been loaded this session.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// All books in catalog order.
    #[must_use]
    pub fn books(&self) -> &[Arc<Book>] {
        &self.books
    }

    /// Books whose category equals `category`, in catalog order.
    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<Arc<Book>> {
        self.books
            .iter()
            .filter(|book| book.category == category)
            .cloned()
            .collect()
    }

    /// First book with the given id.
    #[must_use]
    pub fn find(&self, id: BookId) -> Option<&Arc<Book>> {
        self.books.iter().find(|book| book.id == id)
    }

    /// Distinct categories, sorted ascending.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// The current selection.
    #[must_use]
    pub const fn selected(&self) -> &CategoryFilter {
        &self.selected
    }

    /// Change the selection and return the books it shows.
    pub fn select(&mut self, filter: CategoryFilter) -> Vec<Arc<Book>> {
        self.selected = filter;
        self.visible()
    }

    /// The books the current selection shows.
    #[must_use]
    pub fn visible(&self) -> Vec<Arc<Book>> {
        match &self.selected {
            CategoryFilter::All => self.books.clone(),
            CategoryFilter::Category(category) => self.by_category(category),
        }
    }
}

fn derive_categories(books: &[Arc<Book>]) -> Vec<String> {
    books
        .iter()
        .map(|book| book.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bookstore_core::Price;

    use super::*;

    fn book(id: u32, category: &str) -> Book {
        Book {
            id: BookId::new(id),
            title: format!("Book {id}"),
            author: "Author".to_string(),
            category: category.to_string(),
            price: Price::from_units(100),
            description: String::new(),
            image_url: String::new(),
        }
    }

    fn store() -> CatalogStore {
        let mut store = CatalogStore::new();
        store.replace(vec![book(1, "Fiction"), book(2, "Drama"), book(3, "Fiction")]);
        store
    }

    #[test]
    fn test_categories_deduplicated_and_sorted() {
        assert_eq!(store().categories(), ["Drama", "Fiction"]);
    }

    #[test]
    fn test_by_category_preserves_order() {
        let ids: Vec<_> = store()
            .by_category("Fiction")
            .iter()
            .map(|b| b.id.as_u32())
            .collect();
        assert_eq!(ids, [1, 3]);
    }

    #[test]
    fn test_by_category_is_exact_match() {
        assert!(store().by_category("fiction").is_empty());
        assert!(store().by_category("Poetry").is_empty());
    }

    #[test]
    fn test_find() {
        let store = store();
        assert_eq!(store.find(BookId::new(2)).unwrap().category, "Drama");
        assert!(store.find(BookId::new(99)).is_none());
    }

    #[test]
    fn test_find_on_unloaded_store() {
        let store = CatalogStore::new();
        assert!(!store.is_loaded());
        assert!(store.find(BookId::new(1)).is_none());
        assert!(store.categories().is_empty());
    }

    #[test]
    fn test_select_and_reload_resets_selection() {
        let mut store = store();
        assert_eq!(store.select("Drama".parse().unwrap()).len(), 1);
        assert_eq!(store.selected().to_string(), "Drama");
        assert_eq!(store.select(CategoryFilter::All).len(), 3);

        store.select(CategoryFilter::Category("Fiction".to_string()));
        store.replace(vec![book(4, "Poetry")]);
        assert_eq!(store.selected(), &CategoryFilter::All);
        assert_eq!(store.categories(), ["Poetry"]);
        assert_eq!(store.visible().len(), 1);
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "Science Fiction".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Category("Science Fiction".to_string())
        );
    }
}
