//! Data models for forecast payloads.
//!
//! This module contains the data structures exchanged with the forecast
//! service and persisted in the cache:
//!
//! - `ForecastDay`: one calendar day of highs, lows and advice
//! - `ForecastResult`: the outcome of one retrieval
//! - `Source`: provenance of a result (live, cached, none)
//! - `RequestMode`: whether a retrieval may contact the service

pub mod forecast;

pub use forecast::{ForecastDay, ForecastResult, RequestMode, Source, MAX_VISIBLE_DAYS};
