//! Bookstore Core - Shared types library.
//!
//! This crate provides the domain types used by the storefront session engine:
//! books, their identifiers and their prices.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no rendering.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices, and the `Book` record

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
