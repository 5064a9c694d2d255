use std::sync::Arc;

use crate::application::repos::{
    BannersRepo, CategoriesRepo, OccasionsRepo, ProductsRepo, ReelsRepo,
};
use crate::cache::{CacheConfig, CacheInvalidator, ResponseCache};

use super::middleware::AdminToken;

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductsRepo>,
    pub categories: Arc<dyn CategoriesRepo>,
    pub occasions: Arc<dyn OccasionsRepo>,
    pub banners: Arc<dyn BannersRepo>,
    pub reels: Arc<dyn ReelsRepo>,
    pub cache_config: CacheConfig,
    pub cache: Arc<ResponseCache>,
    pub invalidator: Arc<CacheInvalidator>,
    pub admin_token: AdminToken,
}
