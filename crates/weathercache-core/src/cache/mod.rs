//! Single-slot cache for the last successful forecast.
//!
//! The `CacheStore` trait is the seam between the retriever and durable
//! storage. Two stores are provided:
//!
//! - `FileCacheStore`: JSON file in the cache directory, survives restarts
//! - `MemoryCacheStore`: in-process slot, used by tests and throwaway runs
//!
//! A stored value that cannot be read or parsed is treated as absent.

pub mod manager;
pub mod memory;

use anyhow::Result;

use crate::models::ForecastResult;

pub use manager::{CachedData, FileCacheStore};
pub use memory::MemoryCacheStore;

/// The persisted form of the most recent successful forecast.
pub type CacheEntry = CachedData<ForecastResult>;

/// Storage for exactly one cached forecast.
///
/// `read` and `write` are each atomic with respect to the slot; `write`
/// unconditionally replaces whatever was there.
pub trait CacheStore: Send + Sync {
    fn read(&self) -> Option<CacheEntry>;

    fn write(&self, forecast: &ForecastResult) -> Result<()>;
}
