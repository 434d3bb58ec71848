//! Bookstore storefront library.
//!
//! A client-side storefront session: pages are HTML fragments swapped into
//! the entry document's `main` element, `<component src>` placeholders are
//! expanded recursively, and the catalog and cart live in memory for the
//! lifetime of a [`app::Storefront`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod cache;
pub mod cart;
pub mod catalog;
pub mod components;
pub mod config;
pub mod dom;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod router;
pub mod shell;
pub mod views;

pub use app::Storefront;
pub use config::StorefrontConfig;
pub use error::{Result, StorefrontError};
