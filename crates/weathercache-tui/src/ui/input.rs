//! Keyboard input handling for the TUI.
//!
//! This module translates key events into application state changes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppState};

/// Handle a key press. Returns `true` when the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Enter) {
            app.state = AppState::Normal;
        }
        return false;
    }

    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Quitting;
            return true;
        }
        KeyCode::F(1) => app.state = AppState::ShowingHelp,
        KeyCode::Tab => app.toggle_mode(),
        KeyCode::Enter => app.request_forecast(),
        KeyCode::Backspace => app.pop_city_char(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => app.clear_city(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.push_city_char(c)
        }
        _ => {}
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use weathercache_core::{Config, MemoryCacheStore, RequestMode};

    fn app() -> App {
        let config = Config {
            base_url: "http://127.0.0.1:1".to_string(),
            ..Config::default()
        };
        App::new(config, Arc::new(MemoryCacheStore::new())).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_typing_edits_city() {
        let mut app = app();
        assert!(!handle_input(&mut app, ctrl('u')));
        assert!(app.city_input.is_empty());

        for c in "Paris".chars() {
            handle_input(&mut app, key(KeyCode::Char(c)));
        }
        handle_input(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.city_input, "Pari");

        // Control chords other than Ctrl+U are ignored
        handle_input(&mut app, ctrl('x'));
        assert_eq!(app.city_input, "Pari");
    }

    #[test]
    fn test_tab_toggles_mode() {
        let mut app = app();
        handle_input(&mut app, key(KeyCode::Tab));
        assert_eq!(app.controller.mode(), RequestMode::Offline);
        handle_input(&mut app, key(KeyCode::Tab));
        assert_eq!(app.controller.mode(), RequestMode::Online);
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut app = app();
        handle_input(&mut app, key(KeyCode::F(1)));
        assert_eq!(app.state, AppState::ShowingHelp);

        // Esc closes help rather than quitting
        assert!(!handle_input(&mut app, key(KeyCode::Esc)));
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::F(1)));
        handle_input(&mut app, key(KeyCode::Char('z')));
        assert_eq!(app.city_input, "london");
    }

    #[test]
    fn test_escape_quits() {
        let mut app = app();
        assert!(handle_input(&mut app, key(KeyCode::Esc)));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[tokio::test]
    async fn test_enter_starts_retrieval() {
        let mut app = app();
        app.controller.set_mode(RequestMode::Offline);
        handle_input(&mut app, key(KeyCode::Enter));
        assert!(app.controller.is_loading());

        app.wait_for_retrievals().await;
        assert!(!app.controller.is_loading());
        assert_eq!(app.controller.city(), "london");
    }
}
