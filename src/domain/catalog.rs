//! Catalog entities mirrored from the storefront database.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub image_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccasionRecord {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub image_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A purchasable size variant of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSize {
    pub label: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub badge: Option<String>,
    pub is_new: bool,
    pub is_festival: bool,
    pub category: CategoryRecord,
    pub images: Vec<String>,
    pub keywords: Vec<String>,
    pub sizes: Vec<ProductSize>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BannerRecord {
    pub id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub cta_text: Option<String>,
    pub cta_link: Option<String>,
    pub image_url: String,
    pub is_active: bool,
    pub position: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A short product video surfaced on the storefront, with its product
/// embedded the way the public API returns it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReelRecord {
    pub id: Uuid,
    pub video_url: String,
    pub caption: Option<String>,
    pub product: ProductRecord,
    pub is_active: bool,
    pub position: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
