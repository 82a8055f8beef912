//! weathercache-core - forecast retrieval with offline cache fallback.
//!
//! This crate holds everything a front end needs to show a short-horizon
//! forecast without depending on any UI toolkit:
//!
//! - `api`: HTTP client for the forecast service
//! - `cache`: single-slot store for the last successful forecast
//! - `retriever`: the fetch-with-cache-fallback decision logic
//! - `controller`: the presentation state a front end renders
//! - `presentation`: pure theme, icon and provenance derivations
//! - `config`: persisted settings and directory resolution

pub mod api;
pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod presentation;
pub mod retriever;

pub use api::{ApiClient, ApiError};
pub use cache::{CacheEntry, CacheStore, CachedData, FileCacheStore, MemoryCacheStore};
pub use config::Config;
pub use controller::ForecastController;
pub use error::RetrievalError;
pub use models::{ForecastDay, ForecastResult, RequestMode, Source, MAX_VISIBLE_DAYS};
pub use presentation::{
    dominant_temperature, forecast_theme, source_label, temperature_theme, weather_icon,
    SourceLabel, Theme, ThemeKind, WeatherIcon,
};
pub use retriever::{ForecastRetriever, Retrieval};
