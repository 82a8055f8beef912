use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::ForecastResult;

use super::{CacheEntry, CacheStore};

/// File holding the last successful forecast
const CACHE_FILE: &str = "last_forecast.json";

/// Scratch file written before being renamed over `CACHE_FILE`
const CACHE_TMP_FILE: &str = "last_forecast.json.tmp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew (negative ages)
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            let remaining_mins = minutes % 60;
            if remaining_mins >= 30 {
                // Round up: 1h 30m+ becomes 2h
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            let remaining_hours = (minutes % 1440) / 60;
            if remaining_hours >= 12 {
                // Round up: 1d 12h+ becomes 2d
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}

/// Durable single-slot store backed by a JSON file.
pub struct FileCacheStore {
    cache_dir: PathBuf,
    // Serializes access to the slot across tasks
    lock: Mutex<()>,
}

impl FileCacheStore {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory: {}", cache_dir.display()))?;
        Ok(Self {
            cache_dir,
            lock: Mutex::new(()),
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn cache_path(&self) -> PathBuf {
        self.cache_dir.join(CACHE_FILE)
    }

    fn load(&self) -> Result<Option<CacheEntry>> {
        let path = self.cache_path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", CACHE_FILE))?;

        let cached: CacheEntry = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", CACHE_FILE))?;

        Ok(Some(cached))
    }

    fn save(&self, forecast: &ForecastResult) -> Result<()> {
        let cached = CachedData::new(forecast);
        let contents = serde_json::to_string_pretty(&cached)?;

        // Write then rename so a reader never sees a half-written slot
        let tmp_path = self.cache_dir.join(CACHE_TMP_FILE);
        std::fs::write(&tmp_path, contents)
            .with_context(|| format!("Failed to write cache file: {}", CACHE_TMP_FILE))?;
        std::fs::rename(&tmp_path, self.cache_path())
            .with_context(|| format!("Failed to replace cache file: {}", CACHE_FILE))?;
        Ok(())
    }
}

impl CacheStore for FileCacheStore {
    fn read(&self) -> Option<CacheEntry> {
        let _guard = self.lock.lock();
        match self.load() {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable forecast cache");
                None
            }
        }
    }

    fn write(&self, forecast: &ForecastResult) -> Result<()> {
        let _guard = self.lock.lock();
        self.save(forecast)?;
        debug!(city = %forecast.city, "Forecast cached");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForecastDay, Source};
    use chrono::Duration;
    use tempfile::tempdir;

    fn sample_forecast() -> ForecastResult {
        ForecastResult {
            city: "london".to_string(),
            source: Source::Live,
            days: vec![ForecastDay {
                date: "2024-06-01".parse().unwrap(),
                high: Some(18.0),
                low: None,
                advice: vec!["Bring an umbrella".to_string()],
            }],
        }
    }

    #[test]
    fn test_cached_data_age_display_just_now() {
        let cached = CachedData::new(vec![1, 2, 3]);
        assert_eq!(cached.age_display(), "just now");
    }

    #[test]
    fn test_cached_data_age_display_rounding() {
        let mut cached = CachedData::new(());

        cached.cached_at = Utc::now() - Duration::minutes(5);
        assert_eq!(cached.age_display(), "5m ago");

        cached.cached_at = Utc::now() - Duration::minutes(95);
        assert_eq!(cached.age_display(), "2h ago");

        cached.cached_at = Utc::now() - Duration::hours(36);
        assert_eq!(cached.age_display(), "2d ago");

        // Clock skew
        cached.cached_at = Utc::now() + Duration::minutes(10);
        assert_eq!(cached.age_display(), "just now");
    }

    #[test]
    fn test_missing_file_reads_none() {
        let dir = tempdir().unwrap();
        let store = FileCacheStore::new(dir.path().to_path_buf()).unwrap();
        assert!(store.read().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let store = FileCacheStore::new(dir.path().to_path_buf()).unwrap();

        store.write(&sample_forecast()).unwrap();

        let entry = store.read().unwrap();
        assert_eq!(entry.data, sample_forecast());
        assert!(entry.age_minutes() <= 1);
        assert!(!dir.path().join(CACHE_TMP_FILE).exists());
    }

    #[test]
    fn test_survives_new_instance() {
        let dir = tempdir().unwrap();
        {
            let store = FileCacheStore::new(dir.path().to_path_buf()).unwrap();
            store.write(&sample_forecast()).unwrap();
        }

        let reopened = FileCacheStore::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.read().unwrap().data.city, "london");
    }

    #[test]
    fn test_write_overwrites_previous_entry() {
        let dir = tempdir().unwrap();
        let store = FileCacheStore::new(dir.path().to_path_buf()).unwrap();

        store.write(&sample_forecast()).unwrap();
        store.write(&ForecastResult::empty("oslo")).unwrap();

        let entry = store.read().unwrap();
        assert_eq!(entry.data.city, "oslo");
        assert!(entry.data.days.is_empty());
    }

    #[test]
    fn test_corrupt_file_reads_none() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CACHE_FILE), "{ not valid json").unwrap();

        let store = FileCacheStore::new(dir.path().to_path_buf()).unwrap();
        assert!(store.read().is_none());
    }

    #[test]
    fn test_wrong_shape_reads_none() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CACHE_FILE), r#"{"city": "london", "days": []}"#).unwrap();

        let store = FileCacheStore::new(dir.path().to_path_buf()).unwrap();
        assert!(store.read().is_none());
    }

    #[test]
    fn test_creates_nested_cache_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileCacheStore::new(nested.clone()).unwrap();
        assert_eq!(store.cache_dir(), nested.as_path());
        assert!(nested.is_dir());
    }
}
