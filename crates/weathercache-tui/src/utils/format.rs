use chrono::NaiveDate;

/// Card headings for the presented days, in order
const DAY_LABELS: [&str; 3] = ["Today", "Tomorrow", "Day After"];

/// Heading for the day at `index` in the presented forecast
pub fn day_label(index: usize) -> &'static str {
    DAY_LABELS.get(index).copied().unwrap_or("Later")
}

/// Format a temperature in Celsius, or a placeholder when absent
pub fn format_temp(value: Option<f64>) -> String {
    match value {
        // f64 Display drops a zero fraction: 21.0 -> "21", 21.5 -> "21.5"
        Some(v) => format!("{}°C", v),
        None => "--".to_string(),
    }
}

/// Format a forecast date for a card header
pub fn format_date(date: NaiveDate) -> String {
    date.format("%a %b %-d").to_string()
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
