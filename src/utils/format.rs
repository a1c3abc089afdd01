//! Display formatting in the `id-ID` locale.

use chrono::{DateTime, Utc};

pub const IMAGE_PLACEHOLDER: &str = "https://via.placeholder.com/600x400?text=No+Image";

/// Format a number the way `toLocaleString('id-ID')` does: `.` groups
/// thousands, `,` separates at most three fraction digits.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = (value.abs() * 1000.0).round() / 1000.0;
    let fixed = format!("{rounded:.3}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && rounded != 0.0 { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped},{frac_part}")
    }
}

pub fn format_rupiah(value: f64) -> String {
    format!("Rp {}", format_number(value))
}

/// Share of the target collected, rounded to two decimals. Zero when no
/// target is set.
pub fn percent_of_target(collected: f64, target: f64) -> f64 {
    if target > 0.0 {
        ((collected / target) * 100.0 * 100.0).round() / 100.0
    } else {
        0.0
    }
}

pub fn format_percent(percent: f64) -> String {
    format!("{percent:.2}%")
}

/// Whole days until `end`, rounded up and never negative
pub fn remaining_days(end: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    let Some(end) = end else {
        return 0;
    };
    let millis = (end - now).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    const DAY_MS: i64 = 24 * 60 * 60 * 1000;
    (millis + DAY_MS - 1) / DAY_MS
}

/// Resolve a stored photo reference to a URL
pub fn image_url(image_base_url: &str, photo: &str) -> String {
    if photo.is_empty() {
        return IMAGE_PLACEHOLDER.to_string();
    }
    if photo.starts_with("http") {
        return photo.to_string();
    }
    format!("{}/uploads/{}", image_base_url.trim_end_matches('/'), photo)
}

/// `YYYY-MM-DD` part of a timestamp, as used to prefill date inputs
pub fn date_input_value(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|dt| dt.to_rfc3339())
        .and_then(|s| s.split('T').next().map(str::to_string))
        .unwrap_or_default()
}

/// Cut a description to `max` characters and mark the cut
pub fn excerpt(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{cut}...")
}
