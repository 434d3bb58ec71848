//! Unified error handling.
//!
//! Provides a unified `StorefrontError` type for every storefront operation.
//! Failures are local: the document keeps whatever state it reached before
//! the failing step, and the session continues.

use bookstore_core::BookId;
use thiserror::Error;

use crate::components::MountError;
use crate::dom::DomError;
use crate::fetch::FetchError;

/// Storefront-level error type.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// A page, the entry document or the catalog could not be fetched.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Mounting components failed.
    #[error("Mount error: {0}")]
    Mount(#[from] MountError),

    /// An expected container is missing from the document.
    #[error("Document error: {0}")]
    Dom(#[from] DomError),

    /// A view template failed to render.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// An href could not be resolved against the current location.
    #[error("Invalid location '{href}': {source}")]
    InvalidLocation {
        href: String,
        #[source]
        source: url::ParseError,
    },

    /// A cart action referenced a book that is not in the catalog.
    #[error("Book not found: {0}")]
    BookNotFound(BookId),
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;
