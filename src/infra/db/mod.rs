//! In-memory catalog repositories.
//!
//! The storefront keeps its catalog memory-resident; records embed their
//! related rows the way the public API returns them, so writes to a parent
//! (category, product) rewrite the embedded copies held by dependents.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    BannerDraft, BannersRepo, CategoriesRepo, CategoryDraft, OccasionDraft, OccasionsRepo,
    ProductDraft, ProductQueryFilter, ProductsRepo, ReelDraft, ReelsRepo, RepoError,
};
use crate::domain::catalog::{
    BannerRecord, CategoryRecord, OccasionRecord, ProductRecord, ReelRecord,
};

#[derive(Default)]
pub struct MemoryCatalog {
    categories: RwLock<Vec<CategoryRecord>>,
    occasions: RwLock<Vec<OccasionRecord>>,
    products: RwLock<Vec<ProductRecord>>,
    banners: RwLock<Vec<BannerRecord>>,
    reels: RwLock<Vec<ReelRecord>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

fn read_guard<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, RepoError> {
    lock.read()
        .map_err(|_| RepoError::Persistence("catalog lock poisoned".to_string()))
}

fn write_guard<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, RepoError> {
    lock.write()
        .map_err(|_| RepoError::Persistence("catalog lock poisoned".to_string()))
}

fn reposition<T>(
    rows: &mut [T],
    ids: &[Uuid],
    id_of: impl Fn(&T) -> Uuid,
    set_position: impl Fn(&mut T, i32),
) -> Result<(), RepoError> {
    for id in ids {
        if !rows.iter().any(|row| id_of(row) == *id) {
            return Err(RepoError::NotFound);
        }
    }
    for (index, id) in ids.iter().enumerate() {
        if let Some(row) = rows.iter_mut().find(|row| id_of(row) == *id) {
            set_position(row, index as i32);
        }
    }
    Ok(())
}

#[async_trait]
impl CategoriesRepo for MemoryCatalog {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        let mut categories = read_guard(&self.categories)?.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<CategoryRecord>, RepoError> {
        Ok(read_guard(&self.categories)?
            .iter()
            .find(|category| category.id == id)
            .cloned())
    }

    async fn create_category(&self, draft: CategoryDraft) -> Result<CategoryRecord, RepoError> {
        let mut categories = write_guard(&self.categories)?;
        if categories.iter().any(|category| category.slug == draft.slug) {
            return Err(RepoError::integrity(format!(
                "category slug `{}` already exists",
                draft.slug
            )));
        }
        let now = OffsetDateTime::now_utc();
        let record = CategoryRecord {
            id: Uuid::new_v4(),
            slug: draft.slug,
            name: draft.name,
            image_url: draft.image_url,
            created_at: now,
            updated_at: now,
        };
        categories.push(record.clone());
        Ok(record)
    }

    async fn update_category(
        &self,
        id: Uuid,
        draft: CategoryDraft,
    ) -> Result<CategoryRecord, RepoError> {
        let mut categories = write_guard(&self.categories)?;
        let record = categories
            .iter_mut()
            .find(|category| category.id == id)
            .ok_or(RepoError::NotFound)?;
        record.slug = draft.slug;
        record.name = draft.name;
        record.image_url = draft.image_url;
        record.updated_at = OffsetDateTime::now_utc();
        let updated = record.clone();
        drop(categories);

        // Rewrite embedded copies held by products and reels.
        let mut products = write_guard(&self.products)?;
        for product in products.iter_mut() {
            if product.category.id == id {
                product.category = updated.clone();
            }
        }
        drop(products);
        let mut reels = write_guard(&self.reels)?;
        for reel in reels.iter_mut() {
            if reel.product.category.id == id {
                reel.product.category = updated.clone();
            }
        }

        Ok(updated)
    }

    async fn delete_category(&self, id: Uuid) -> Result<(), RepoError> {
        let products = read_guard(&self.products)?;
        if products.iter().any(|product| product.category.id == id) {
            return Err(RepoError::integrity(
                "category is still referenced by products",
            ));
        }
        drop(products);

        let mut categories = write_guard(&self.categories)?;
        let before = categories.len();
        categories.retain(|category| category.id != id);
        if categories.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl OccasionsRepo for MemoryCatalog {
    async fn list_occasions(&self) -> Result<Vec<OccasionRecord>, RepoError> {
        let mut occasions = read_guard(&self.occasions)?.clone();
        occasions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(occasions)
    }

    async fn find_occasion(&self, id: Uuid) -> Result<Option<OccasionRecord>, RepoError> {
        Ok(read_guard(&self.occasions)?
            .iter()
            .find(|occasion| occasion.id == id)
            .cloned())
    }

    async fn create_occasion(&self, draft: OccasionDraft) -> Result<OccasionRecord, RepoError> {
        let mut occasions = write_guard(&self.occasions)?;
        if occasions.iter().any(|occasion| occasion.slug == draft.slug) {
            return Err(RepoError::integrity(format!(
                "occasion slug `{}` already exists",
                draft.slug
            )));
        }
        let now = OffsetDateTime::now_utc();
        let record = OccasionRecord {
            id: Uuid::new_v4(),
            slug: draft.slug,
            name: draft.name,
            image_url: draft.image_url,
            created_at: now,
            updated_at: now,
        };
        occasions.push(record.clone());
        Ok(record)
    }

    async fn update_occasion(
        &self,
        id: Uuid,
        draft: OccasionDraft,
    ) -> Result<OccasionRecord, RepoError> {
        let mut occasions = write_guard(&self.occasions)?;
        let record = occasions
            .iter_mut()
            .find(|occasion| occasion.id == id)
            .ok_or(RepoError::NotFound)?;
        record.slug = draft.slug;
        record.name = draft.name;
        record.image_url = draft.image_url;
        record.updated_at = OffsetDateTime::now_utc();
        Ok(record.clone())
    }

    async fn delete_occasion(&self, id: Uuid) -> Result<(), RepoError> {
        let mut occasions = write_guard(&self.occasions)?;
        let before = occasions.len();
        occasions.retain(|occasion| occasion.id != id);
        if occasions.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl ProductsRepo for MemoryCatalog {
    async fn list_products(
        &self,
        filter: &ProductQueryFilter,
    ) -> Result<Vec<ProductRecord>, RepoError> {
        let mut products: Vec<ProductRecord> = read_guard(&self.products)?
            .iter()
            .filter(|product| {
                filter
                    .category
                    .as_deref()
                    .is_none_or(|slug| product.category.slug == slug)
            })
            .filter(|product| filter.is_new.is_none_or(|wanted| product.is_new == wanted))
            .filter(|product| {
                filter
                    .is_festival
                    .is_none_or(|wanted| product.is_festival == wanted)
            })
            .cloned()
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<ProductRecord>, RepoError> {
        Ok(read_guard(&self.products)?
            .iter()
            .find(|product| product.id == id)
            .cloned())
    }

    async fn create_product(&self, draft: ProductDraft) -> Result<ProductRecord, RepoError> {
        let category = read_guard(&self.categories)?
            .iter()
            .find(|category| category.id == draft.category_id)
            .cloned()
            .ok_or_else(|| RepoError::invalid_input("unknown category id"))?;

        let now = OffsetDateTime::now_utc();
        let record = ProductRecord {
            id: Uuid::new_v4(),
            name: draft.name,
            description: draft.description,
            badge: draft.badge,
            is_new: draft.is_new,
            is_festival: draft.is_festival,
            category,
            images: draft.images,
            keywords: draft.keywords,
            sizes: draft.sizes,
            created_at: now,
            updated_at: now,
        };
        write_guard(&self.products)?.push(record.clone());
        Ok(record)
    }

    async fn update_product(
        &self,
        id: Uuid,
        draft: ProductDraft,
    ) -> Result<ProductRecord, RepoError> {
        let category = read_guard(&self.categories)?
            .iter()
            .find(|category| category.id == draft.category_id)
            .cloned()
            .ok_or_else(|| RepoError::invalid_input("unknown category id"))?;

        let mut products = write_guard(&self.products)?;
        let record = products
            .iter_mut()
            .find(|product| product.id == id)
            .ok_or(RepoError::NotFound)?;
        record.name = draft.name;
        record.description = draft.description;
        record.badge = draft.badge;
        record.is_new = draft.is_new;
        record.is_festival = draft.is_festival;
        record.category = category;
        record.images = draft.images;
        record.keywords = draft.keywords;
        record.sizes = draft.sizes;
        record.updated_at = OffsetDateTime::now_utc();
        let updated = record.clone();
        drop(products);

        let mut reels = write_guard(&self.reels)?;
        for reel in reels.iter_mut() {
            if reel.product.id == id {
                reel.product = updated.clone();
            }
        }

        Ok(updated)
    }

    async fn delete_product(&self, id: Uuid) -> Result<(), RepoError> {
        let reels = read_guard(&self.reels)?;
        if reels.iter().any(|reel| reel.product.id == id) {
            return Err(RepoError::integrity("product is still referenced by reels"));
        }
        drop(reels);

        let mut products = write_guard(&self.products)?;
        let before = products.len();
        products.retain(|product| product.id != id);
        if products.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl BannersRepo for MemoryCatalog {
    async fn list_banners(&self, active_only: bool) -> Result<Vec<BannerRecord>, RepoError> {
        let mut banners: Vec<BannerRecord> = read_guard(&self.banners)?
            .iter()
            .filter(|banner| !active_only || banner.is_active)
            .cloned()
            .collect();
        banners.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(banners)
    }

    async fn find_banner(&self, id: Uuid) -> Result<Option<BannerRecord>, RepoError> {
        Ok(read_guard(&self.banners)?
            .iter()
            .find(|banner| banner.id == id)
            .cloned())
    }

    async fn create_banner(&self, draft: BannerDraft) -> Result<BannerRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let record = BannerRecord {
            id: Uuid::new_v4(),
            title: draft.title,
            subtitle: draft.subtitle,
            cta_text: draft.cta_text,
            cta_link: draft.cta_link,
            image_url: draft.image_url,
            is_active: draft.is_active,
            position: draft.position,
            created_at: now,
            updated_at: now,
        };
        write_guard(&self.banners)?.push(record.clone());
        Ok(record)
    }

    async fn update_banner(&self, id: Uuid, draft: BannerDraft) -> Result<BannerRecord, RepoError> {
        let mut banners = write_guard(&self.banners)?;
        let record = banners
            .iter_mut()
            .find(|banner| banner.id == id)
            .ok_or(RepoError::NotFound)?;
        record.title = draft.title;
        record.subtitle = draft.subtitle;
        record.cta_text = draft.cta_text;
        record.cta_link = draft.cta_link;
        record.image_url = draft.image_url;
        record.is_active = draft.is_active;
        record.position = draft.position;
        record.updated_at = OffsetDateTime::now_utc();
        Ok(record.clone())
    }

    async fn delete_banner(&self, id: Uuid) -> Result<(), RepoError> {
        let mut banners = write_guard(&self.banners)?;
        let before = banners.len();
        banners.retain(|banner| banner.id != id);
        if banners.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn reorder_banners(&self, ids: &[Uuid]) -> Result<(), RepoError> {
        let mut banners = write_guard(&self.banners)?;
        reposition(
            banners.as_mut_slice(),
            ids,
            |banner| banner.id,
            |banner, position| {
                banner.position = position;
                banner.updated_at = OffsetDateTime::now_utc();
            },
        )
    }
}

#[async_trait]
impl ReelsRepo for MemoryCatalog {
    async fn list_reels(&self, active_only: bool) -> Result<Vec<ReelRecord>, RepoError> {
        let mut reels: Vec<ReelRecord> = read_guard(&self.reels)?
            .iter()
            .filter(|reel| !active_only || reel.is_active)
            .cloned()
            .collect();
        reels.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(reels)
    }

    async fn find_reel(&self, id: Uuid) -> Result<Option<ReelRecord>, RepoError> {
        Ok(read_guard(&self.reels)?
            .iter()
            .find(|reel| reel.id == id)
            .cloned())
    }

    async fn create_reel(&self, draft: ReelDraft) -> Result<ReelRecord, RepoError> {
        let product = read_guard(&self.products)?
            .iter()
            .find(|product| product.id == draft.product_id)
            .cloned()
            .ok_or_else(|| RepoError::invalid_input("unknown product id"))?;

        let now = OffsetDateTime::now_utc();
        let record = ReelRecord {
            id: Uuid::new_v4(),
            video_url: draft.video_url,
            caption: draft.caption,
            product,
            is_active: draft.is_active,
            position: draft.position,
            created_at: now,
            updated_at: now,
        };
        write_guard(&self.reels)?.push(record.clone());
        Ok(record)
    }

    async fn update_reel(&self, id: Uuid, draft: ReelDraft) -> Result<ReelRecord, RepoError> {
        let product = read_guard(&self.products)?
            .iter()
            .find(|product| product.id == draft.product_id)
            .cloned()
            .ok_or_else(|| RepoError::invalid_input("unknown product id"))?;

        let mut reels = write_guard(&self.reels)?;
        let record = reels
            .iter_mut()
            .find(|reel| reel.id == id)
            .ok_or(RepoError::NotFound)?;
        record.video_url = draft.video_url;
        record.caption = draft.caption;
        record.product = product;
        record.is_active = draft.is_active;
        record.position = draft.position;
        record.updated_at = OffsetDateTime::now_utc();
        Ok(record.clone())
    }

    async fn delete_reel(&self, id: Uuid) -> Result<(), RepoError> {
        let mut reels = write_guard(&self.reels)?;
        let before = reels.len();
        reels.retain(|reel| reel.id != id);
        if reels.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn reorder_reels(&self, ids: &[Uuid]) -> Result<(), RepoError> {
        let mut reels = write_guard(&self.reels)?;
        reposition(
            reels.as_mut_slice(),
            ids,
            |reel| reel.id,
            |reel, position| {
                reel.position = position;
                reel.updated_at = OffsetDateTime::now_utc();
            },
        )
    }
}
