pub mod banners;
pub mod cache;
pub mod categories;
pub mod occasions;
pub mod products;
pub mod reels;
