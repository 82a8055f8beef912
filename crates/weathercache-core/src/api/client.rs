//! API client for the forecast service.
//!
//! This module provides the `ApiClient` struct for requesting a forecast
//! for one city and decoding the JSON payload into a `ForecastResult`.

use std::time::Duration;

use reqwest::{header, Client};
use tracing::debug;

use crate::models::ForecastResult;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Path of the forecast endpoint, relative to the configured base URL
const FORECAST_PATH: &str = "/api/v1/weather/forecast";

/// API client for the forecast service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// No timeout is applied unless one is given; a hung request only blocks
    /// the retrieval that issued it.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Fetch the forecast for a city.
    ///
    /// Fails on transport errors, non-2xx statuses, bodies that do not decode
    /// as a forecast, and forecasts whose days are not in date order.
    pub async fn fetch_forecast(
        &self,
        city: &str,
        offline_mode: bool,
    ) -> Result<ForecastResult, ApiError> {
        let url = format!("{}{}", self.base_url, FORECAST_PATH);
        debug!(city = city, offline_mode = offline_mode, "Requesting forecast");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(&[
                ("city", city),
                ("offlineMode", if offline_mode { "true" } else { "false" }),
            ])
            .send()
            .await?;

        let response = Self::check_response(response).await?;

        let text = response.text().await?;
        let forecast: ForecastResult = serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse forecast: {}", e)))?;
        forecast.validate().map_err(ApiError::InvalidResponse)?;

        debug!(city = %forecast.city, days = forecast.days.len(), "Forecast received");
        Ok(forecast)
    }
}
