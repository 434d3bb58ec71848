//! View renderers.
//!
//! Each renderer turns store state into a markup fragment that fully
//! replaces one container's content. Interaction hooks are declared with
//! `data-action` / `data-book-id` attributes:
//!
//! | `data-action`       | Host behaviour                                    |
//! |---------------------|---------------------------------------------------|
//! | `open-book`         | navigate to the book's detail page                |
//! | `add-to-cart`       | add the book; must not bubble to `open-book`      |
//! | `remove-from-cart`  | remove one unit of the book                       |
//! | `filter-category`   | on change, filter the grid by the selected option |

use askama::Template;

use bookstore_core::{Book, Price};

use crate::cart::{Cart, CartLine};
use crate::catalog::{CatalogStore, CategoryFilter};

/// Container selectors the renderers write into.
pub mod containers {
    /// Page content swapped on every navigation.
    pub const MAIN: &str = "main";
    /// Catalog grid on the start page.
    pub const BOOK_LIST: &str = "#book-list";
    /// Category dropdown on the start page.
    pub const FILTERS: &str = ".filters";
    /// Detail panel on the book page.
    pub const BOOK_DETAIL: &str = "#book-detail";
    /// Cart table body on the cart page.
    pub const CART_LIST: &str = "#cart-list";
    /// Grand total cell on the cart page.
    pub const CART_TOTAL: &str = "#cart-total";
    /// Item count in the header.
    pub const BADGE: &str = ".badge";
}

/// Format a price with the configured currency label.
fn format_price(price: Price, currency_label: &str) -> String {
    format!("{price} {currency_label}")
}

/// Book display data for the catalog grid.
#[derive(Debug, Clone)]
pub struct BookCardView {
    pub id: String,
    pub title: String,
    pub author: String,
    pub image_url: String,
    pub price: String,
}

impl BookCardView {
    fn new(book: &Book, currency_label: &str) -> Self {
        Self {
            id: book.id.to_string(),
            title: book.title.clone(),
            author: book.author.clone(),
            image_url: book.image_url.clone(),
            price: format_price(book.price, currency_label),
        }
    }
}

/// Book display data for the detail panel.
#[derive(Debug, Clone)]
pub struct BookDetailView {
    pub id: String,
    pub title: String,
    pub author: String,
    pub category: String,
    pub description: String,
    pub image_url: String,
    pub price: String,
}

impl BookDetailView {
    fn new(book: &Book, currency_label: &str) -> Self {
        Self {
            id: book.id.to_string(),
            title: book.title.clone(),
            author: book.author.clone(),
            category: book.category.clone(),
            description: book.description.clone(),
            image_url: book.image_url.clone(),
            price: format_price(book.price, currency_label),
        }
    }
}

/// Cart row display data.
#[derive(Debug, Clone)]
pub struct CartRowView {
    pub id: String,
    pub title: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

impl CartRowView {
    fn new(line: &CartLine, currency_label: &str) -> Self {
        Self {
            id: line.book_id().to_string(),
            title: line.book().title.clone(),
            quantity: line.quantity(),
            unit_price: format_price(line.book().price, currency_label),
            line_total: format_price(line.total(), currency_label),
        }
    }
}

/// One `<option>` of the category dropdown.
#[derive(Debug, Clone)]
pub struct FilterOptionView {
    pub label: String,
    pub selected: bool,
}

/// Catalog grid template.
#[derive(Template)]
#[template(path = "partials/catalog_grid.html")]
pub struct CatalogGridTemplate {
    pub cards: Vec<BookCardView>,
}

/// Detail panel template.
#[derive(Template)]
#[template(path = "partials/book_detail.html")]
pub struct BookDetailTemplate {
    pub book: Option<BookDetailView>,
}

/// Cart table rows template.
#[derive(Template)]
#[template(path = "partials/cart_rows.html")]
pub struct CartRowsTemplate {
    pub rows: Vec<CartRowView>,
}

/// Cart grand total template.
#[derive(Template)]
#[template(path = "partials/cart_total.html")]
pub struct CartTotalTemplate {
    pub total: String,
}

/// Cart count badge template.
#[derive(Template)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Category dropdown template.
#[derive(Template)]
#[template(path = "partials/category_filter.html")]
pub struct CategoryFilterTemplate {
    pub options: Vec<FilterOptionView>,
}

// =============================================================================
// Renderers
// =============================================================================

/// Render one card per book.
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn catalog_grid<'a>(
    books: impl IntoIterator<Item = &'a Book>,
    currency_label: &str,
) -> askama::Result<String> {
    CatalogGridTemplate {
        cards: books
            .into_iter()
            .map(|book| BookCardView::new(book, currency_label))
            .collect(),
    }
    .render()
}

/// Render the detail panel, or a not-found panel when `book` is absent.
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn book_detail(book: Option<&Book>, currency_label: &str) -> askama::Result<String> {
    BookDetailTemplate {
        book: book.map(|book| BookDetailView::new(book, currency_label)),
    }
    .render()
}

/// Render the cart table body.
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn cart_rows(cart: &Cart, currency_label: &str) -> askama::Result<String> {
    CartRowsTemplate {
        rows: cart
            .lines()
            .iter()
            .map(|line| CartRowView::new(line, currency_label))
            .collect(),
    }
    .render()
}

/// Render the cart grand total.
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn cart_total(cart: &Cart, currency_label: &str) -> askama::Result<String> {
    CartTotalTemplate {
        total: format_price(cart.total(), currency_label),
    }
    .render()
}

/// Render the header badge count.
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn cart_badge(cart: &Cart) -> askama::Result<String> {
    let count = CartCountTemplate {
        count: cart.item_count(),
    }
    .render()?;
    Ok(count.trim().to_string())
}

/// Render the category dropdown with the current selection marked.
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn category_filter(catalog: &CatalogStore) -> askama::Result<String> {
    let selected = catalog.selected();
    let all = FilterOptionView {
        label: CategoryFilter::ALL_LABEL.to_string(),
        selected: *selected == CategoryFilter::All,
    };
    let options = std::iter::once(all)
        .chain(catalog.categories().iter().map(|category| FilterOptionView {
            label: category.clone(),
            selected: matches!(selected, CategoryFilter::Category(c) if c == category),
        }))
        .collect();

    CategoryFilterTemplate { options }.render()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use bookstore_core::BookId;

    use super::*;

    fn book(id: u32, title: &str, category: &str, price: i64) -> Book {
        Book {
            id: BookId::new(id),
            title: title.to_string(),
            author: "Selma Lagerlöf".to_string(),
            category: category.to_string(),
            price: Price::from_units(price),
            description: "A long journey.".to_string(),
            image_url: format!("/images/{id}.jpg"),
        }
    }

    #[test]
    fn test_catalog_grid_cards_and_hooks() {
        let books = [
            book(1, "Nils Holgersson", "Fiction", 199),
            book(2, "Gösta Berling", "Fiction", 149),
        ];
        let html = catalog_grid(&books, "SEK").unwrap();

        assert_eq!(html.matches(r#"data-action="open-book""#).count(), 2);
        assert_eq!(html.matches(r#"data-action="add-to-cart""#).count(), 2);
        assert!(html.contains(r#"data-book-id="2""#));
        assert!(html.contains("199 SEK"));
        assert!(!html.contains("catalog-empty"));
    }

    #[test]
    fn test_catalog_grid_escapes_markup() {
        let books = [book(1, "<script>alert(1)</script>", "Fiction", 1)];
        let html = catalog_grid(&books, "SEK").unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&#60;script&#62;alert(1)&#60;/script&#62;"));
    }

    #[test]
    fn test_catalog_grid_empty() {
        let html = catalog_grid(std::iter::empty(), "SEK").unwrap();
        assert!(html.contains("catalog-empty"));
    }

    #[test]
    fn test_book_detail_found_and_missing() {
        let kejsarn = book(7, "Kejsarn av Portugallien", "Drama", 89);
        let found = book_detail(Some(&kejsarn), "SEK").unwrap();
        assert!(found.contains(r#"id="book-title""#));
        assert!(found.contains("Kejsarn av Portugallien"));
        assert!(found.contains("89 SEK"));
        assert!(found.contains(r#"data-book-id="7""#));

        let missing = book_detail(None, "SEK").unwrap();
        assert!(missing.contains("Book not found"));
        assert!(!missing.contains("add-to-cart"));
    }

    #[test]
    fn test_cart_views() {
        let mut cart = Cart::new();
        let a = Arc::new(book(1, "A", "Fiction", 100));
        let b = Arc::new(book(2, "B", "Drama", 50));
        cart.add(&a);
        cart.add(&a);
        cart.add(&b);

        let rows = cart_rows(&cart, "SEK").unwrap();
        assert_eq!(rows.matches("<tr").count(), 2);
        assert_eq!(rows.matches(r#"data-action="remove-from-cart""#).count(), 2);
        assert!(rows.contains("200 SEK"));

        assert_eq!(cart_total(&cart, "SEK").unwrap().trim(), "<b>250 SEK</b>");
        assert_eq!(cart_badge(&cart).unwrap(), "3");
        assert_eq!(cart_badge(&Cart::new()).unwrap(), "0");
    }

    #[test]
    fn test_category_filter_marks_selection() {
        let mut catalog = CatalogStore::new();
        catalog.replace(vec![
            book(1, "A", "Fiction", 1),
            book(2, "B", "Drama", 1),
            book(3, "C", "Fiction", 1),
        ]);

        let html = category_filter(&catalog).unwrap();
        assert!(html.contains("<option selected>all</option>"));
        let drama = html.find("Drama").unwrap();
        let fiction = html.find("Fiction").unwrap();
        assert!(drama < fiction);

        catalog.select(CategoryFilter::Category("Drama".to_string()));
        let html = category_filter(&catalog).unwrap();
        assert!(html.contains("<option selected>Drama</option>"));
        assert!(html.contains("<option>all</option>"));
    }
}
