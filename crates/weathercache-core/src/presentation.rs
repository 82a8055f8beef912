//! Derived presentation values.
//!
//! Pure functions from forecast data to display values: the temperature
//! theme, the per-day weather icon and the provenance label. None of them
//! touch the network or the cache, and all of them are total.

use crate::models::{ForecastDay, ForecastResult, Source};

// ============================================================================
// Temperature Theme
// ============================================================================

/// Temperature band a theme belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeKind {
    Scorching,
    Hot,
    Warm,
    Cool,
    Cold,
    Default,
}

/// Display theme selected from the average temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub kind: ThemeKind,
    pub emoji: &'static str,
    pub label: &'static str,
    /// Three-stop background gradient, as hex colours
    pub background: [&'static str; 3],
}

pub const SCORCHING: Theme = Theme {
    kind: ThemeKind::Scorching,
    emoji: "🔥",
    label: "Scorching",
    background: ["#b71c1c", "#e53935", "#ff7043"],
};

pub const HOT: Theme = Theme {
    kind: ThemeKind::Hot,
    emoji: "☀️",
    label: "Hot",
    background: ["#e65100", "#f57c00", "#ffa726"],
};

pub const WARM: Theme = Theme {
    kind: ThemeKind::Warm,
    emoji: "🌤️",
    label: "Warm",
    background: ["#f9a825", "#fdd835", "#ffee58"],
};

pub const COOL: Theme = Theme {
    kind: ThemeKind::Cool,
    emoji: "🌥️",
    label: "Cool",
    background: ["#1565c0", "#1976d2", "#42a5f5"],
};

pub const COLD: Theme = Theme {
    kind: ThemeKind::Cold,
    emoji: "❄️",
    label: "Cold",
    background: ["#0d47a1", "#1a237e", "#283593"],
};

pub const DEFAULT_THEME: Theme = Theme {
    kind: ThemeKind::Default,
    emoji: "🌍",
    label: "Weather",
    background: ["#1a237e", "#1565c0", "#0288d1"],
};

/// Lower bounds of each band, highest first. First match wins.
const THEME_BANDS: [(f64, Theme); 4] = [
    (40.0, SCORCHING),
    (30.0, HOT),
    (20.0, WARM),
    (10.0, COOL),
];

/// Mean of every defined high and low across `days`.
///
/// Values are pooled, not averaged per day: a day missing one of its values
/// contributes only the other. Returns `None` when no value is defined.
pub fn dominant_temperature(days: &[ForecastDay]) -> Option<f64> {
    let temps: Vec<f64> = days
        .iter()
        .flat_map(|d| [d.high, d.low])
        .flatten()
        .collect();

    if temps.is_empty() {
        return None;
    }
    Some(temps.iter().sum::<f64>() / temps.len() as f64)
}

/// Pick the theme for an average temperature.
pub fn temperature_theme(avg: Option<f64>) -> Theme {
    let Some(avg) = avg else {
        return DEFAULT_THEME;
    };
    THEME_BANDS
        .iter()
        .find(|(lower, _)| avg >= *lower)
        .map(|(_, theme)| *theme)
        .unwrap_or(COLD)
}

/// Theme for the days a result presents.
pub fn forecast_theme(result: Option<&ForecastResult>) -> Theme {
    let days = result.map(|r| r.visible_days()).unwrap_or(&[]);
    temperature_theme(dominant_temperature(days))
}

// ============================================================================
// Weather Icon
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherIcon {
    Storm,
    Rain,
    Sun,
    Wind,
    PartlyCloudy,
}

impl WeatherIcon {
    pub fn emoji(&self) -> &'static str {
        match self {
            WeatherIcon::Storm => "⛈️",
            WeatherIcon::Rain => "🌧️",
            WeatherIcon::Sun => "☀️",
            WeatherIcon::Wind => "💨",
            WeatherIcon::PartlyCloudy => "🌤️",
        }
    }
}

/// Advice keywords in priority order
const ICON_KEYWORDS: [(&str, WeatherIcon); 4] = [
    ("storm", WeatherIcon::Storm),
    ("umbrella", WeatherIcon::Rain),
    ("sunscreen", WeatherIcon::Sun),
    ("windy", WeatherIcon::Wind),
];

/// Pick a day's icon from its advice text (case-insensitive).
pub fn weather_icon(advice: &[String]) -> WeatherIcon {
    let all = advice.join(" ").to_lowercase();
    ICON_KEYWORDS
        .iter()
        .find(|(keyword, _)| all.contains(keyword))
        .map(|(_, icon)| *icon)
        .unwrap_or(WeatherIcon::PartlyCloudy)
}

// ============================================================================
// Source Label
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLabel {
    pub text: &'static str,
    /// Hex colour
    pub color: &'static str,
}

pub fn source_label(source: Source) -> SourceLabel {
    match source {
        Source::Live => SourceLabel {
            text: "● Live",
            color: "#2e7d32",
        },
        Source::OfflineCache => SourceLabel {
            text: "● Cached",
            color: "#e65100",
        },
        Source::None => SourceLabel {
            text: "● No Cache",
            color: "#999999",
        },
    }
}
