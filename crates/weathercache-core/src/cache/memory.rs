use anyhow::Result;
use parking_lot::Mutex;

use crate::models::ForecastResult;

use super::{CacheEntry, CacheStore, CachedData};

/// In-memory cache slot. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    slot: Mutex<Option<CacheEntry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `forecast`.
    pub fn with_forecast(forecast: ForecastResult) -> Self {
        Self {
            slot: Mutex::new(Some(CachedData::new(forecast))),
        }
    }
}

impl CacheStore for MemoryCacheStore {
    fn read(&self) -> Option<CacheEntry> {
        self.slot.lock().clone()
    }

    fn write(&self, forecast: &ForecastResult) -> Result<()> {
        *self.slot.lock() = Some(CachedData::new(forecast.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_reads_none() {
        let store = MemoryCacheStore::new();
        assert!(store.read().is_none());
    }

    #[test]
    fn test_write_overwrites() {
        let store = MemoryCacheStore::with_forecast(ForecastResult::empty("paris"));
        store.write(&ForecastResult::empty("rome")).unwrap();

        let entry = store.read().unwrap();
        assert_eq!(entry.data.city, "rome");
    }
}
