//! Product and category types.
//!
//! Wire field names follow the remote GraphQL schema (`creationAt`,
//! `updatedAt`); locally persisted records written by older revisions used
//! `createdAt`, which is accepted as an alias on deserialization.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::is_local_id;

/// Reserved id of the pinned default category.
pub const DEFAULT_CATEGORY_ID: &str = "default_electronics";

/// Name of the pinned default category.
pub const DEFAULT_CATEGORY_NAME: &str = "electronics";

/// Sentinel category name selecting the unfiltered product list.
pub const ALL_CATEGORIES: &str = "all";

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Opaque remote id, a generated `local_` id, or the pinned default id.
    pub id: String,
    /// Display name, compared case-insensitively when filtering.
    pub name: String,
    /// Icon URL.
    pub image: String,
    /// Creation timestamp, absent on records written by older revisions.
    #[serde(rename = "creationAt", alias = "createdAt", default)]
    pub creation_at: Option<DateTime<Utc>>,
    /// Last-update timestamp.
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Category {
    /// The pinned default category, always present and always listed first.
    #[must_use]
    pub fn default_electronics(image: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: DEFAULT_CATEGORY_ID.to_string(),
            name: DEFAULT_CATEGORY_NAME.to_string(),
            image: image.into(),
            creation_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// True for the pinned default category, which rejects mutation.
    #[must_use]
    pub fn is_pinned(&self) -> bool {
        self.id == DEFAULT_CATEGORY_ID
    }
}

/// A set of category field changes to merge into an existing record.
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub image: Option<String>,
}

/// A product, remote-origin or local-origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Opaque remote id or a generated `local_` id.
    pub id: String,
    pub title: String,
    /// Non-negative unit price.
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    /// Ordered image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Single image URL carried by locally created products.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(rename = "creationAt", alias = "createdAt", default)]
    pub creation_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// True if this product exists only in the local fallback store.
    ///
    /// Derived from the id on every load; never persisted.
    #[must_use]
    pub fn is_local_origin(&self) -> bool {
        is_local_id(&self.id)
    }

    /// First image of the product: the first entry of `images`, else the
    /// legacy single `image` field, else the empty string.
    #[must_use]
    pub fn primary_image(&self) -> String {
        self.images
            .first()
            .cloned()
            .or_else(|| self.image.clone())
            .unwrap_or_default()
    }
}
