//! Quote cache: last-known quote per tracked symbol, optionally persisted.

mod cache_model;
mod cache_traits;
mod quote_cache;
mod storage;

pub use cache_model::CacheSnapshot;
pub use cache_traits::CacheStorage;
pub use quote_cache::QuoteCache;
pub use storage::{FileCacheStorage, MemoryCacheStorage};
