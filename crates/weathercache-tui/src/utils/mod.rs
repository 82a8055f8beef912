//! Utility functions for string formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{day_label, format_date, format_temp, truncate_string};
