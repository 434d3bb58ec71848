//! Cart store: one line per distinct book, memory-only.

use std::sync::Arc;

use bookstore_core::{Book, BookId, Price};

/// One aggregated cart entry.
///
/// `total` is kept in step with `quantity` so that it always equals
/// `quantity x book.price`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    book: Arc<Book>,
    quantity: u32,
    total: Price,
}

impl CartLine {
    fn new(book: Arc<Book>) -> Self {
        let total = book.price;
        Self {
            book,
            quantity: 1,
            total,
        }
    }

    #[must_use]
    pub fn book_id(&self) -> BookId {
        self.book.id
    }

    #[must_use]
    pub fn book(&self) -> &Book {
        &self.book
    }

    /// Always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }
}

/// What `Cart::remove` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The line lost one unit and is still in the cart.
    Decremented,
    /// The line held a single unit and was deleted.
    Removed,
    /// No line for that book.
    Missing,
}

/// Ordered cart lines, unique by book id.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `book`, returning the new line quantity.
    pub fn add(&mut self, book: &Arc<Book>) -> u32 {
        if let Some(line) = self.lines.iter_mut().find(|line| line.book.id == book.id) {
            line.quantity += 1;
            line.total += line.book.price;
            line.quantity
        } else {
            self.lines.push(CartLine::new(Arc::clone(book)));
            1
        }
    }

    /// Remove one unit of the book, deleting the line at quantity 1.
    pub fn remove(&mut self, book_id: BookId) -> RemoveOutcome {
        let Some(index) = self.lines.iter().position(|line| line.book.id == book_id) else {
            return RemoveOutcome::Missing;
        };

        match self.lines.get_mut(index) {
            Some(line) if line.quantity > 1 => {
                line.quantity -= 1;
                line.total -= line.book.price;
                RemoveOutcome::Decremented
            }
            _ => {
                self.lines.remove(index);
                RemoveOutcome::Removed
            }
        }
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, book_id: BookId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.book.id == book_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line quantities (the badge number).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(|line| line.total).sum()
    }
}
