//! Repository traits describing the storage adapters the HTTP layer talks to.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::catalog::{
    BannerRecord, CategoryRecord, OccasionRecord, ProductRecord, ProductSize, ReelRecord,
};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
}

impl RepoError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductQueryFilter {
    /// Category slug, as supplied by the storefront filter bar.
    pub category: Option<String>,
    pub is_new: Option<bool>,
    pub is_festival: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub badge: Option<String>,
    pub is_new: bool,
    pub is_festival: bool,
    pub category_id: Uuid,
    pub images: Vec<String>,
    pub keywords: Vec<String>,
    pub sizes: Vec<ProductSize>,
}

#[derive(Debug, Clone)]
pub struct CategoryDraft {
    pub slug: String,
    pub name: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OccasionDraft {
    pub slug: String,
    pub name: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BannerDraft {
    pub title: String,
    pub subtitle: Option<String>,
    pub cta_text: Option<String>,
    pub cta_link: Option<String>,
    pub image_url: String,
    pub is_active: bool,
    pub position: i32,
}

#[derive(Debug, Clone)]
pub struct ReelDraft {
    pub video_url: String,
    pub caption: Option<String>,
    pub product_id: Uuid,
    pub is_active: bool,
    pub position: i32,
}

#[async_trait]
pub trait ProductsRepo: Send + Sync {
    async fn list_products(
        &self,
        filter: &ProductQueryFilter,
    ) -> Result<Vec<ProductRecord>, RepoError>;
    async fn find_product(&self, id: Uuid) -> Result<Option<ProductRecord>, RepoError>;
    async fn create_product(&self, draft: ProductDraft) -> Result<ProductRecord, RepoError>;
    async fn update_product(
        &self,
        id: Uuid,
        draft: ProductDraft,
    ) -> Result<ProductRecord, RepoError>;
    async fn delete_product(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait CategoriesRepo: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError>;
    async fn find_category(&self, id: Uuid) -> Result<Option<CategoryRecord>, RepoError>;
    async fn create_category(&self, draft: CategoryDraft) -> Result<CategoryRecord, RepoError>;
    async fn update_category(
        &self,
        id: Uuid,
        draft: CategoryDraft,
    ) -> Result<CategoryRecord, RepoError>;
    /// Fails with [`RepoError::Integrity`] while any product still references
    /// the category.
    async fn delete_category(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait OccasionsRepo: Send + Sync {
    async fn list_occasions(&self) -> Result<Vec<OccasionRecord>, RepoError>;
    async fn find_occasion(&self, id: Uuid) -> Result<Option<OccasionRecord>, RepoError>;
    async fn create_occasion(&self, draft: OccasionDraft) -> Result<OccasionRecord, RepoError>;
    async fn update_occasion(
        &self,
        id: Uuid,
        draft: OccasionDraft,
    ) -> Result<OccasionRecord, RepoError>;
    async fn delete_occasion(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait BannersRepo: Send + Sync {
    /// Active banners in position order when `active_only`, otherwise every
    /// banner (admin listing).
    async fn list_banners(&self, active_only: bool) -> Result<Vec<BannerRecord>, RepoError>;
    async fn find_banner(&self, id: Uuid) -> Result<Option<BannerRecord>, RepoError>;
    async fn create_banner(&self, draft: BannerDraft) -> Result<BannerRecord, RepoError>;
    async fn update_banner(&self, id: Uuid, draft: BannerDraft) -> Result<BannerRecord, RepoError>;
    async fn delete_banner(&self, id: Uuid) -> Result<(), RepoError>;
    /// Reassigns positions to match the supplied id order.
    async fn reorder_banners(&self, ids: &[Uuid]) -> Result<(), RepoError>;
}

#[async_trait]
pub trait ReelsRepo: Send + Sync {
    async fn list_reels(&self, active_only: bool) -> Result<Vec<ReelRecord>, RepoError>;
    async fn find_reel(&self, id: Uuid) -> Result<Option<ReelRecord>, RepoError>;
    async fn create_reel(&self, draft: ReelDraft) -> Result<ReelRecord, RepoError>;
    async fn update_reel(&self, id: Uuid, draft: ReelDraft) -> Result<ReelRecord, RepoError>;
    async fn delete_reel(&self, id: Uuid) -> Result<(), RepoError>;
    async fn reorder_reels(&self, ids: &[Uuid]) -> Result<(), RepoError>;
}
