//! Plain-text rendering for `--once` runs.

use weathercache_core::{weather_icon, ForecastController, ForecastDay};

use crate::utils::{day_label, format_date, format_temp};

/// Render the controller's current state as plain text.
pub fn render_plain(controller: &ForecastController) -> String {
    let theme = controller.theme();
    let mut out = format!("{} Weather Forecast · Next 3 days ({})\n", theme.emoji, theme.label);

    if let (Some(label), Some(result)) = (controller.source_label(), controller.last_result()) {
        out.push_str(&format!("{}  {}", label.text, result.city));
        if let Some(age) = controller.cached_age() {
            out.push_str(&format!("  (cached {})", age));
        }
        out.push('\n');
    }

    if let Some(error) = controller.last_error() {
        out.push_str(&format!("⚠️ {}\n", error));
    }

    match controller.last_result() {
        Some(result) if result.has_days() => {
            for (idx, day) in result.visible_days().iter().enumerate() {
                out.push_str(&render_day(idx, day));
            }
        }
        Some(_) if controller.last_error().is_none() => {
            out.push_str("No cached data yet. Switch to Online Mode and search first.\n");
        }
        None => out.push_str("Enter a city and press Enter to begin.\n"),
        _ => {}
    }

    out
}

fn render_day(idx: usize, day: &ForecastDay) -> String {
    let mut out = format!(
        "\n{} {} · {}\n  High {}  Low {}\n",
        weather_icon(&day.advice).emoji(),
        day_label(idx),
        format_date(day.date),
        format_temp(day.high),
        format_temp(day.low)
    );

    if day.advice.is_empty() {
        out.push_str("  ✓ All clear!\n");
    }
    for advice in &day.advice {
        out.push_str(&format!("  • {}\n", advice));
    }
    out
}
