//! Application state management for weathercache.
//!
//! This module contains the `App` struct that owns the forecast controller,
//! the city input being edited, and the channel that carries finished
//! retrievals back from background tasks.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use weathercache_core::{
    ApiClient, CacheStore, Config, ForecastController, ForecastRetriever, Retrieval,
};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the retrieval result channel.
/// Retrievals are user-triggered, so a handful in flight is already a lot.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Maximum length for the city input.
/// Long enough for "Llanfairpwllgwyngyll"-style names with a country suffix.
pub const MAX_CITY_LENGTH: usize = 64;

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    Quitting,
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    pub config: Config,
    pub controller: ForecastController,

    pub state: AppState,
    pub city_input: String,
    pub status_message: Option<String>,

    // Background task channel
    retrieval_tx: mpsc::Sender<Retrieval>,
    retrieval_rx: mpsc::Receiver<Retrieval>,
}

impl App {
    /// Create a new application instance backed by `store`.
    pub fn new(config: Config, store: Arc<dyn CacheStore>) -> Result<Self> {
        debug!(base_url = %config.base_url, "App::new() starting");

        let api = ApiClient::new(&config.base_url, config.request_timeout())?;
        let retriever = ForecastRetriever::new(api, store);
        let controller =
            ForecastController::new(retriever, &config.last_city, config.request_mode());

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Ok(Self {
            city_input: config.last_city.clone(),
            config,
            controller,
            state: AppState::Normal,
            status_message: None,
            retrieval_tx: tx,
            retrieval_rx: rx,
        })
    }

    // =========================================================================
    // City Input
    // =========================================================================

    // Editing the city dismisses any prompt about it

    pub fn push_city_char(&mut self, c: char) {
        if can_add_city_char(self.city_input.chars().count(), c) {
            self.city_input.push(c);
            self.status_message = None;
        }
    }

    pub fn pop_city_char(&mut self) {
        self.city_input.pop();
        self.status_message = None;
    }

    pub fn clear_city(&mut self) {
        self.city_input.clear();
        self.status_message = None;
    }

    pub fn toggle_mode(&mut self) {
        self.controller.toggle_mode();
        info!(mode = self.controller.mode().display_name(), "Request mode changed");
    }

    // =========================================================================
    // Background Retrieval
    // =========================================================================

    /// Spawn a background retrieval for the city in the input box.
    pub fn request_forecast(&mut self) {
        let city = self.city_input.trim().to_string();
        if city.is_empty() {
            self.status_message = Some("Enter a city name first".to_string());
            return;
        }

        self.status_message = None;
        self.controller.set_city(&city);
        let retrieval = self.controller.begin();
        let tx = self.retrieval_tx.clone();

        tokio::spawn(async move {
            let result = retrieval.await;
            if let Err(e) = tx.send(result).await {
                error!(error = %e, "Failed to send retrieval result - channel closed");
            }
        });
    }

    /// Apply any retrievals that have finished, in arrival order.
    pub fn check_background_tasks(&mut self) {
        while let Ok(retrieval) = self.retrieval_rx.try_recv() {
            self.controller.complete(retrieval);
        }
    }

    /// Wait until every spawned retrieval has been applied.
    pub async fn wait_for_retrievals(&mut self) {
        while self.controller.is_loading() {
            match self.retrieval_rx.recv().await {
                Some(retrieval) => self.controller.complete(retrieval),
                // Unreachable while `self` holds a sender
                None => break,
            }
        }
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Remember the city and mode for the next launch.
    pub fn save_config(&mut self) {
        self.config.last_city = self.controller.city().to_string();
        self.config.offline_mode = self.controller.mode().is_offline();
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }
}

// ============================================================================
// Input Validation
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a city character should be accepted
pub fn can_add_city_char(current_len: usize, c: char) -> bool {
    current_len < MAX_CITY_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use weathercache_core::{MemoryCacheStore, RequestMode, RetrievalError, Source};
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_with(base_url: &str, store: Arc<dyn CacheStore>) -> App {
        let config = Config {
            base_url: base_url.to_string(),
            ..Config::default()
        };
        App::new(config, store).unwrap()
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_city_char() {
        assert!(can_add_city_char(0, 'a'));
        assert!(can_add_city_char(0, ' '));
        assert!(can_add_city_char(0, 'é'));
        assert!(!can_add_city_char(0, '\n'));
        assert!(!can_add_city_char(0, '\u{7}'));
        assert!(!can_add_city_char(MAX_CITY_LENGTH, 'a'));
    }

    #[test]
    fn test_city_editing() {
        let mut app = app_with("http://127.0.0.1:1", Arc::new(MemoryCacheStore::new()));
        assert_eq!(app.city_input, "london");

        app.clear_city();
        for c in "São Paulo".chars() {
            app.push_city_char(c);
        }
        assert_eq!(app.city_input, "São Paulo");

        app.pop_city_char();
        assert_eq!(app.city_input, "São Paul");
    }

    #[test]
    fn test_city_input_length_capped() {
        let mut app = app_with("http://127.0.0.1:1", Arc::new(MemoryCacheStore::new()));
        app.clear_city();
        for _ in 0..(MAX_CITY_LENGTH + 10) {
            app.push_city_char('x');
        }
        assert_eq!(app.city_input.chars().count(), MAX_CITY_LENGTH);
    }

    #[test]
    fn test_toggle_mode() {
        let mut app = app_with("http://127.0.0.1:1", Arc::new(MemoryCacheStore::new()));
        assert_eq!(app.controller.mode(), RequestMode::Online);
        app.toggle_mode();
        assert_eq!(app.controller.mode(), RequestMode::Offline);
    }

    #[test]
    fn test_empty_city_not_requested() {
        let mut app = app_with("http://127.0.0.1:1", Arc::new(MemoryCacheStore::new()));
        app.city_input = "   ".to_string();
        app.request_forecast();
        assert!(!app.controller.is_loading());
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_editing_city_clears_status() {
        let mut app = app_with("http://127.0.0.1:1", Arc::new(MemoryCacheStore::new()));
        app.clear_city();
        app.request_forecast();
        assert_eq!(app.status_message.as_deref(), Some("Enter a city name first"));

        app.push_city_char('o');
        assert!(app.status_message.is_none());

        app.status_message = Some("Enter a city name first".to_string());
        app.pop_city_char();
        assert!(app.status_message.is_none());

        app.status_message = Some("Enter a city name first".to_string());
        app.clear_city();
        assert!(app.status_message.is_none());
    }

    // -------------------------------------------------------------------------
    // Background Retrieval Tests
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_request_forecast_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("city", "madrid"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "city": "madrid",
                "source": "live",
                "days": [
                    {"date": "2024-07-01", "high": 36, "low": 22, "advice": ["Wear sunscreen"]}
                ]
            })))
            .mount(&server)
            .await;

        let mut app = app_with(&server.uri(), Arc::new(MemoryCacheStore::new()));
        app.city_input = " madrid ".to_string();
        app.request_forecast();
        assert!(app.controller.is_loading());

        app.wait_for_retrievals().await;
        assert!(!app.controller.is_loading());
        assert_eq!(app.controller.city(), "madrid");

        let result = app.controller.last_result().unwrap();
        assert_eq!(result.source, Source::Live);
        assert_eq!(result.city, "madrid");
    }

    #[tokio::test]
    async fn test_request_forecast_unreachable_without_cache() {
        let mut app = app_with("http://127.0.0.1:1", Arc::new(MemoryCacheStore::new()));
        app.request_forecast();
        app.wait_for_retrievals().await;

        assert_eq!(app.controller.last_error(), Some(&RetrievalError::Fatal));
    }
}
