use chrono::{DateTime, Datelike, Utc};

/// Formats a timestamp the way the dashboard shows it, e.g. `January 1st, 2024`.
pub fn format_display_date(date: &DateTime<Utc>) -> String {
    let day = date.day();
    format!("{} {day}{}, {}", date.format("%B"), ordinal_suffix(day), date.year())
}

pub fn ordinal_suffix(n: u32) -> &'static str {
    match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
