//! The catalog record.

use serde::{Deserialize, Serialize};

use super::{BookId, Price};

/// A book as listed in the static catalog.
///
/// Immutable after load; identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub category: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
}
