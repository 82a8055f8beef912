//! Fetch-with-cache-fallback retrieval.
//!
//! `ForecastRetriever` decides, per request, whether data comes from the
//! forecast service or from the cache store, and what gets persisted:
//!
//! - Offline: the service is never contacted; the cached forecast (if any)
//!   is returned without error.
//! - Online success: the payload replaces the cached forecast and is
//!   returned as live.
//! - Online failure: the cached forecast is returned with an advisory
//!   error, or an empty result with a fatal error when nothing is cached.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::cache::{CacheEntry, CacheStore};
use crate::error::RetrievalError;
use crate::models::{ForecastResult, RequestMode, Source};

/// The outcome of one retrieval, including its error channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Retrieval {
    pub result: ForecastResult,
    pub error: Option<RetrievalError>,
    /// When the returned data was cached, for results served from the cache
    pub cached_at: Option<DateTime<Utc>>,
}

impl Retrieval {
    fn live(forecast: ForecastResult) -> Self {
        Self {
            result: forecast.with_source(Source::Live),
            error: None,
            cached_at: None,
        }
    }

    fn cached(entry: CacheEntry, error: Option<RetrievalError>) -> Self {
        Self {
            result: entry.data.with_source(Source::OfflineCache),
            error,
            cached_at: Some(entry.cached_at),
        }
    }

    fn empty(city: &str, error: Option<RetrievalError>) -> Self {
        Self {
            result: ForecastResult::empty(city),
            error,
            cached_at: None,
        }
    }
}

/// Retrieves forecasts from the service, falling back to the cache store.
/// Clone is cheap - the HTTP client and store are shared.
#[derive(Clone)]
pub struct ForecastRetriever {
    api: ApiClient,
    store: Arc<dyn CacheStore>,
}

impl ForecastRetriever {
    pub fn new(api: ApiClient, store: Arc<dyn CacheStore>) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Retrieve the forecast for `city`. Never fails; errors are reported in
    /// the returned `Retrieval`.
    pub async fn retrieve(&self, city: &str, mode: RequestMode) -> Retrieval {
        if mode.is_offline() {
            info!(city = city, "Offline mode - reading cached forecast");
            return match self.store.read() {
                Some(entry) => Retrieval::cached(entry, None),
                None => Retrieval::empty(city, None),
            };
        }

        // Offline mode never reaches the service, so the flag is always false
        match self.api.fetch_forecast(city, false).await {
            Ok(forecast) => {
                if let Err(e) = self.store.write(&forecast) {
                    warn!(error = %e, "Failed to cache forecast");
                }
                info!(city = %forecast.city, days = forecast.days.len(), "Live forecast retrieved");
                Retrieval::live(forecast)
            }
            Err(e) => {
                warn!(city = city, error = %e, "Forecast fetch failed, falling back to cache");
                match self.store.read() {
                    Some(entry) => Retrieval::cached(entry, Some(RetrievalError::Advisory)),
                    None => Retrieval::empty(city, Some(RetrievalError::Fatal)),
                }
            }
        }
    }
}
