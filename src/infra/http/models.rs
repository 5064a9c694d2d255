//! Request payloads and query models for the HTTP surface.

use serde::Deserialize;
use uuid::Uuid;

use crate::application::repos::{
    BannerDraft, CategoryDraft, OccasionDraft, ProductDraft, ReelDraft,
};
use crate::domain::catalog::ProductSize;

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub category: Option<String>,
    pub is_new: Option<bool>,
    pub is_festival: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_festival: bool,
    pub category_id: Uuid,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<ProductSize>,
}

impl From<ProductPayload> for ProductDraft {
    fn from(payload: ProductPayload) -> Self {
        Self {
            name: payload.name,
            description: payload.description,
            badge: payload.badge,
            is_new: payload.is_new,
            is_festival: payload.is_festival,
            category_id: payload.category_id,
            images: payload.images,
            keywords: payload.keywords,
            sizes: payload.sizes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl From<CategoryPayload> for CategoryDraft {
    fn from(payload: CategoryPayload) -> Self {
        Self {
            slug: payload.slug,
            name: payload.name,
            image_url: payload.image_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OccasionPayload {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl From<OccasionPayload> for OccasionDraft {
    fn from(payload: OccasionPayload) -> Self {
        Self {
            slug: payload.slug,
            name: payload.name,
            image_url: payload.image_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BannerPayload {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub cta_text: Option<String>,
    #[serde(default)]
    pub cta_link: Option<String>,
    pub image_url: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub position: i32,
}

impl From<BannerPayload> for BannerDraft {
    fn from(payload: BannerPayload) -> Self {
        Self {
            title: payload.title,
            subtitle: payload.subtitle,
            cta_text: payload.cta_text,
            cta_link: payload.cta_link,
            image_url: payload.image_url,
            is_active: payload.is_active,
            position: payload.position,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReelPayload {
    pub video_url: String,
    #[serde(default)]
    pub caption: Option<String>,
    pub product_id: Uuid,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub position: i32,
}

impl From<ReelPayload> for ReelDraft {
    fn from(payload: ReelPayload) -> Self {
        Self {
            video_url: payload.video_url,
            caption: payload.caption,
            product_id: payload.product_id,
            is_active: payload.is_active,
            position: payload.position,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReorderPayload {
    pub ids: Vec<Uuid>,
}
