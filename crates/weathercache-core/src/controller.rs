//! Presentation state for the forecast view.
//!
//! `ForecastController` owns the state a front end renders (the selected
//! city and mode, the loading flag, the last result and its error) and
//! changes it only through retrievals. A retrieval can be awaited in place
//! with `retrieve`, or split into `begin` (run the returned future anywhere)
//! and `complete` (apply its outcome).
//!
//! Outcomes are applied in the order they complete, so when retrievals
//! overlap the most recently finished one is what ends up displayed.

use std::future::Future;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::cache::CachedData;
use crate::error::RetrievalError;
use crate::models::{ForecastResult, RequestMode, Source};
use crate::presentation::{forecast_theme, source_label, SourceLabel, Theme};
use crate::retriever::{ForecastRetriever, Retrieval};

pub struct ForecastController {
    retriever: ForecastRetriever,
    city: String,
    mode: RequestMode,
    in_flight: usize,
    last_result: Option<ForecastResult>,
    last_error: Option<RetrievalError>,
    cached_at: Option<DateTime<Utc>>,
}

impl ForecastController {
    /// Create a controller, showing whatever forecast is already cached.
    pub fn new(retriever: ForecastRetriever, city: &str, mode: RequestMode) -> Self {
        let cached = retriever.store().read();
        debug!(has_cached = cached.is_some(), "Hydrating forecast state from cache");

        let (last_result, cached_at) = match cached {
            Some(entry) => (
                Some(entry.data.with_source(Source::OfflineCache)),
                Some(entry.cached_at),
            ),
            None => (None, None),
        };

        Self {
            retriever,
            city: city.to_string(),
            mode,
            in_flight: 0,
            last_result,
            last_error: None,
            cached_at,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn set_city(&mut self, city: &str) {
        self.city = city.to_string();
    }

    pub fn mode(&self) -> RequestMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RequestMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggle();
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn last_result(&self) -> Option<&ForecastResult> {
        self.last_result.as_ref()
    }

    pub fn last_error(&self) -> Option<&RetrievalError> {
        self.last_error.as_ref()
    }

    /// Age of the displayed data, when it came from the cache
    pub fn cached_age(&self) -> Option<String> {
        self.cached_at.map(|at| {
            CachedData {
                data: (),
                cached_at: at,
            }
            .age_display()
        })
    }

    pub fn theme(&self) -> Theme {
        forecast_theme(self.last_result.as_ref())
    }

    /// Provenance label, hidden until there is a result
    pub fn source_label(&self) -> Option<SourceLabel> {
        self.last_result.as_ref().map(|r| source_label(r.source))
    }

    // =========================================================================
    // Retrieval
    // =========================================================================

    /// Start a retrieval for the current city and mode.
    ///
    /// Marks the controller as loading and clears the previous error. The
    /// returned future does not borrow the controller; pass its output to
    /// `complete`.
    pub fn begin(&mut self) -> impl Future<Output = Retrieval> + Send + 'static {
        self.in_flight += 1;
        self.last_error = None;

        let retriever = self.retriever.clone();
        let city = self.city.clone();
        let mode = self.mode;
        debug!(city = %city, ?mode, in_flight = self.in_flight, "Retrieval started");

        async move { retriever.retrieve(&city, mode).await }
    }

    /// Apply a finished retrieval. The latest call wins.
    pub fn complete(&mut self, retrieval: Retrieval) {
        self.in_flight = self.in_flight.saturating_sub(1);
        debug!(
            city = %retrieval.result.city,
            source = retrieval.result.source.as_str(),
            error = ?retrieval.error,
            "Retrieval completed"
        );

        self.last_result = Some(retrieval.result);
        self.last_error = retrieval.error;
        self.cached_at = retrieval.cached_at;
    }

    /// Retrieve `city` in `mode` and apply the outcome.
    pub async fn retrieve(&mut self, city: &str, mode: RequestMode) {
        self.city = city.to_string();
        self.mode = mode;
        let retrieval = self.begin().await;
        self.complete(retrieval);
    }
}
