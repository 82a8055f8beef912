use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use weathercache_core::{weather_icon, ForecastDay, Theme, MAX_VISIBLE_DAYS};

use crate::app::{App, AppState};
use crate::utils::{day_label, format_date, format_temp, truncate_string};

use super::styles;

/// Widest city name shown in the source bar
const MAX_CITY_WIDTH: usize = 40;

pub fn render(frame: &mut Frame, app: &App) {
    let theme = app.controller.theme();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title bar
            Constraint::Length(3), // Search row
            Constraint::Length(1), // Source bar
            Constraint::Length(1), // Error line
            Constraint::Min(8),    // Forecast cards
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, &theme, chunks[0]);
    render_search_row(frame, app, &theme, chunks[1]);
    render_source_bar(frame, app, chunks[2]);
    render_error(frame, app, chunks[3]);
    render_main_content(frame, app, &theme, chunks[4]);
    render_status_bar(frame, app, chunks[5]);

    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, theme: &Theme, area: Rect) {
    let title_line = Line::from(vec![
        Span::raw(format!("  {} ", theme.emoji)),
        Span::styled("Weather Forecast", styles::theme_title_style(theme)),
        Span::styled("  Next 3 days · ", styles::muted_style()),
        Span::styled(theme.label, styles::theme_title_style(theme)),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::theme_border_style(theme));

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_search_row(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let mode = app.controller.mode();
    let action = if app.controller.is_loading() {
        Span::styled("[ Loading... ]", styles::highlight_style())
    } else {
        Span::styled("[ Get Forecast ]", styles::title_style())
    };

    let line = Line::from(vec![
        Span::raw("🔍 "),
        Span::styled(app.city_input.clone(), styles::input_style()),
        Span::styled("█", styles::muted_style()),
        Span::raw("   "),
        Span::styled(mode.display_name(), styles::mode_style(mode.is_offline())),
        Span::raw("   "),
        action,
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::theme_border_style(theme))
        .title(" City ");

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_source_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (Some(label), Some(result)) =
        (app.controller.source_label(), app.controller.last_result())
    else {
        return;
    };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(label.text, styles::source_style(&label)),
        Span::raw("  "),
        Span::styled(truncate_string(&result.city, MAX_CITY_WIDTH), styles::highlight_style()),
    ];
    if let Some(age) = app.controller.cached_age() {
        spans.push(Span::styled(format!("  (cached {})", age), styles::muted_style()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_error(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(error) = app.controller.last_error() {
        let line = Line::from(Span::styled(format!(" ⚠️ {}", error), styles::error_style()));
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn render_main_content(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let result = app.controller.last_result();
    let has_error = app.controller.last_error().is_some();

    match result {
        None if !has_error => {
            render_empty_state(frame, area, "🌐", "Enter a city and press Enter to begin.");
        }
        Some(result) if !result.has_days() && !has_error => {
            render_empty_state(
                frame,
                area,
                "📭",
                "No cached data yet. Switch to Online Mode and search first.",
            );
        }
        Some(result) if result.has_days() => {
            render_cards(frame, result.visible_days(), theme, area);
        }
        _ => {}
    }
}

fn render_empty_state(frame: &mut Frame, area: Rect, icon: &str, message: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(icon.to_string()),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), styles::muted_style())),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_cards(frame: &mut Frame, days: &[ForecastDay], theme: &Theme, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, MAX_VISIBLE_DAYS as u32); MAX_VISIBLE_DAYS])
        .split(area);

    for (idx, day) in days.iter().enumerate() {
        render_card(frame, idx, day, theme, columns[idx]);
    }
}

fn render_card(frame: &mut Frame, idx: usize, day: &ForecastDay, theme: &Theme, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(format_date(day.date), styles::muted_style())),
        Line::from(""),
        Line::from(format!("  {}", weather_icon(&day.advice).emoji())),
        Line::from(""),
        Line::from(vec![
            Span::styled("High ", styles::muted_style()),
            Span::styled(format_temp(day.high), styles::highlight_style()),
            Span::styled("   Low ", styles::muted_style()),
            Span::styled(format_temp(day.low), styles::title_style()),
        ]),
        Line::from(Span::styled(
            "─".repeat(area.width.saturating_sub(2) as usize),
            styles::muted_style(),
        )),
    ];

    if day.advice.is_empty() {
        lines.push(Line::from(Span::styled("✓ All clear!", styles::muted_style())));
    } else {
        for advice in &day.advice {
            lines.push(Line::from(format!("• {}", advice)));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::theme_border_style(theme))
        .title(Span::styled(format!(" {} ", day_label(idx)), styles::theme_title_style(theme)));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[Enter] forecast | [Tab] mode | [F1] help | [Esc] quit";

    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None => " Offline support enabled ".to_string(),
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(status_line).style(styles::status_bar_style()), area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 14, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled(" weathercache", styles::title_style())),
        Line::from(Span::styled(format!(" version {}", version), styles::muted_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Enter     ", styles::help_key_style()),
            Span::styled("Get forecast for the city", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  Tab       ", styles::help_key_style()),
            Span::styled("Toggle online / offline mode", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  Ctrl+U    ", styles::help_key_style()),
            Span::styled("Clear the city", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  F1        ", styles::help_key_style()),
            Span::styled("Toggle this help", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  Esc       ", styles::help_key_style()),
            Span::styled("Quit", styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            " Offline mode only shows the last cached forecast.",
            styles::muted_style(),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::title_style())
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use ratatui::{backend::TestBackend, Terminal};
    use weathercache_core::{Config, ForecastResult, MemoryCacheStore};

    fn buffer_text(app: &App) -> String {
        let backend = TestBackend::new(100, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();

        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    fn app_with_cache(cached: Option<ForecastResult>) -> App {
        let store = match cached {
            Some(forecast) => MemoryCacheStore::with_forecast(forecast),
            None => MemoryCacheStore::new(),
        };
        App::new(
            Config {
                base_url: "http://127.0.0.1:1".to_string(),
                ..Config::default()
            },
            Arc::new(store),
        )
        .unwrap()
    }

    #[test]
    fn test_render_initial_empty_state() {
        let text = buffer_text(&app_with_cache(None));
        assert!(text.contains("Weather Forecast"));
        assert!(text.contains("Enter a city and press Enter to begin."));
        assert!(text.contains("Online Mode"));
        assert!(!text.contains("No Cache"));
    }

    #[test]
    fn test_render_cached_cards() {
        let forecast: ForecastResult = serde_json::from_value(serde_json::json!({
            "city": "reykjavik",
            "source": "live",
            "days": [
                {"date": "2024-06-01", "high": 9, "low": 2, "advice": ["It's windy"]},
                {"date": "2024-06-02", "high": 8, "low": 1, "advice": []}
            ]
        }))
        .unwrap();

        let text = buffer_text(&app_with_cache(Some(forecast)));
        assert!(text.contains("Cached"));
        assert!(text.contains("reykjavik"));
        assert!(text.contains("Today"));
        assert!(text.contains("Tomorrow"));
        assert!(!text.contains("Day After"));
        assert!(text.contains("All clear!"));
        assert!(text.contains("Cold"));
    }

    #[test]
    fn test_centered_rect_fixed_clamps() {
        let r = centered_rect_fixed(52, 14, Rect::new(0, 0, 40, 10));
        assert_eq!(r.width, 40);
        assert_eq!(r.height, 10);
    }
}
