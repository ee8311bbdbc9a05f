//! Formatting utilities used for CLI outputs.

use chrono::{DateTime, Utc};

/// Depth in metres, `--` when unknown.
pub fn depth(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "--".to_string(),
    }
}

pub fn timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "--".to_string())
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
