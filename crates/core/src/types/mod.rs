//! Core types for the bookstore.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod book;
pub mod id;
pub mod price;

pub use book::Book;
pub use id::*;
pub use price::Price;
