//! Resource family registry.
//!
//! Each cached endpoint belongs to exactly one family, identified by the
//! literal path prefix its keys share. The table below is the single place
//! that wires a family to its cache policy and to the families a write on
//! it must invalidate; adding a cached resource without invalidation wiring
//! is impossible by construction.

use std::time::Duration;

use super::config::CacheConfig;

/// Storefront resource families whose read endpoints are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceFamily {
    Products,
    Categories,
    Occasions,
    Banners,
    Reels,
}

pub const ALL_FAMILIES: [ResourceFamily; 5] = [
    ResourceFamily::Products,
    ResourceFamily::Categories,
    ResourceFamily::Occasions,
    ResourceFamily::Banners,
    ResourceFamily::Reels,
];

impl ResourceFamily {
    /// The key prefix shared by every cached variant of this family.
    pub fn prefix(self) -> &'static str {
        match self {
            ResourceFamily::Products => "/products",
            ResourceFamily::Categories => "/categories",
            ResourceFamily::Occasions => "/occasions",
            ResourceFamily::Banners => "/banners",
            ResourceFamily::Reels => "/reels",
        }
    }

    /// Families whose cached responses embed data owned by this one and must
    /// be dropped together with it on any write.
    ///
    /// Reels embed their product; products embed their category.
    pub fn invalidates(self) -> &'static [ResourceFamily] {
        match self {
            ResourceFamily::Products => &[ResourceFamily::Products, ResourceFamily::Reels],
            ResourceFamily::Categories => &[ResourceFamily::Categories, ResourceFamily::Products],
            ResourceFamily::Occasions => &[ResourceFamily::Occasions],
            ResourceFamily::Banners => &[ResourceFamily::Banners],
            ResourceFamily::Reels => &[ResourceFamily::Reels],
        }
    }

    /// Resolve the family a request path belongs to, if any.
    ///
    /// A path matches only on a whole segment (`/productsale` is nobody's
    /// business here).
    pub fn for_path(path: &str) -> Option<ResourceFamily> {
        ALL_FAMILIES.into_iter().find(|family| {
            path.strip_prefix(family.prefix())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }

    /// Time-to-live for this family's stored responses.
    ///
    /// Uniform across families today; kept per-family so a hotter or colder
    /// endpoint can diverge without touching the middleware.
    pub fn ttl(self, config: &CacheConfig) -> Duration {
        config.response_ttl()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_resolve_to_their_family() {
        assert_eq!(
            ResourceFamily::for_path("/products"),
            Some(ResourceFamily::Products)
        );
        assert_eq!(
            ResourceFamily::for_path("/products/0d9f74c2"),
            Some(ResourceFamily::Products)
        );
        assert_eq!(
            ResourceFamily::for_path("/banners"),
            Some(ResourceFamily::Banners)
        );
        assert_eq!(ResourceFamily::for_path("/cache/stats"), None);
        assert_eq!(ResourceFamily::for_path("/healthz"), None);
    }

    #[test]
    fn prefix_matching_respects_segment_boundaries() {
        assert_eq!(ResourceFamily::for_path("/productsale"), None);
        assert_eq!(ResourceFamily::for_path("/reelsets"), None);
    }

    #[test]
    fn every_family_invalidates_itself() {
        for family in ALL_FAMILIES {
            assert!(
                family.invalidates().contains(&family),
                "{family:?} must invalidate its own prefix"
            );
        }
    }

    #[test]
    fn embedded_data_couplings_are_wired() {
        assert!(
            ResourceFamily::Products
                .invalidates()
                .contains(&ResourceFamily::Reels)
        );
        assert!(
            ResourceFamily::Categories
                .invalidates()
                .contains(&ResourceFamily::Products)
        );
    }
}
