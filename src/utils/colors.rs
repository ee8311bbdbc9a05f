/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Greyed `--` for a missing value.
pub fn colorize_optional(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => format!("{GREY}--{RESET}"),
    }
}

/// Red when a validation flag is raised, grey otherwise.
pub fn colorize_flag(label: &str, raised: bool) -> String {
    if raised {
        format!("{RED}{label}{RESET}")
    } else {
        format!("{GREY}·{RESET}")
    }
}
