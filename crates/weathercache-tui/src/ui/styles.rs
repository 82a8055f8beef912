use ratatui::style::{Color, Modifier, Style};

use weathercache_core::{SourceLabel, Theme};

// Color palette
pub const PRIMARY: Color = Color::Rgb(64, 128, 192);
pub const ACCENT: Color = Color::Rgb(192, 160, 64);
pub const ERROR: Color = Color::Rgb(192, 64, 64);
pub const MUTED: Color = Color::Rgb(128, 128, 128);

/// Parse a `#rrggbb` or `#rgb` colour, falling back to `MUTED`.
pub fn hex_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return MUTED;
    }
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return MUTED,
    };

    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => MUTED,
    }
}

// Theme-driven styles

/// Accent colour of a theme: the middle stop of its gradient
pub fn theme_accent(theme: &Theme) -> Color {
    hex_color(theme.background[1])
}

pub fn theme_title_style(theme: &Theme) -> Style {
    Style::default()
        .fg(theme_accent(theme))
        .add_modifier(Modifier::BOLD)
}

pub fn theme_border_style(theme: &Theme) -> Style {
    Style::default().fg(theme_accent(theme))
}

pub fn source_style(label: &SourceLabel) -> Style {
    Style::default()
        .fg(hex_color(label.color))
        .add_modifier(Modifier::BOLD)
}

// Styles

pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR).add_modifier(Modifier::BOLD)
}

pub fn input_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn mode_style(offline: bool) -> Style {
    if offline {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(32, 32, 40)).fg(Color::White)
}

pub fn help_key_style() -> Style {
    Style::default()
        .fg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(Color::White)
}

#[cfg(test)]
mod tests {
    use super::*;
    use weathercache_core::presentation::{COLD, SCORCHING};

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color("#2e7d32"), Color::Rgb(0x2e, 0x7d, 0x32));
        assert_eq!(hex_color("e65100"), Color::Rgb(0xe6, 0x51, 0x00));
        assert_eq!(hex_color("#999"), Color::Rgb(0x99, 0x99, 0x99));
    }

    #[test]
    fn test_hex_color_invalid_falls_back() {
        assert_eq!(hex_color(""), MUTED);
        assert_eq!(hex_color("#12"), MUTED);
        assert_eq!(hex_color("#zzzzzz"), MUTED);
        assert_eq!(hex_color("#ééé"), MUTED);
    }

    #[test]
    fn test_theme_accent_is_middle_stop() {
        assert_eq!(theme_accent(&SCORCHING), Color::Rgb(0xe5, 0x39, 0x35));
        assert_eq!(theme_accent(&COLD), Color::Rgb(0x1a, 0x23, 0x7e));
    }
}
