// Service exports
pub mod cache;
pub mod catalog;

pub use cache::{CacheKey, CacheStats, RecommendKey, ResultCache, SearchKey};
pub use catalog::{CatalogProvider, CatalogSnapshot, InMemoryStore, ProfileProvider, ProviderError, SeedData};
