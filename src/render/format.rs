//! Pure formatting of domain values for display.

use chrono::{DateTime, Utc};

/// `1250000.0` → `"1.250.000 ₫"`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{grouped} ₫")
}

/// `DD-MM-YYYY`, or an empty string when the backend sent no date.
pub fn format_date(date: Option<&DateTime<Utc>>) -> String {
    date.map(|d| d.format("%d-%m-%Y").to_string())
        .unwrap_or_default()
}

/// Minutes as `"1h 5m"` or `"45m"`.
pub fn format_duration(minutes: u32) -> String {
    let (hours, rest) = (minutes / 60, minutes % 60);
    if hours > 0 {
        format!("{hours}h {rest}m")
    } else {
        format!("{rest}m")
    }
}

/// Palette name of a status; `assets/app.css` styles `.badge-<name>`.
pub fn badge_color(status: &str) -> &'static str {
    match status {
        "new" => "blue",
        "waiting_approve" => "gold",
        "approve" => "green",
        "reject" => "volcano",
        "active" => "geekblue",
        "inactive" => "gray",
        "request_paid" | "request_payout" => "yellow",
        "completed" => "green",
        "rejected" => "red",
        _ => "blue",
    }
}

pub fn badge_label(status: &str) -> String {
    status.to_uppercase()
}

/// Strips scripts and unsafe attributes from backend-provided rich text.
pub fn sanitize(html: &str) -> String {
    ammonia::clean(html)
}
