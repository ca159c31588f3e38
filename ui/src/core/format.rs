//! Formatting helpers for presenting listening statistics.

/// Minute granularities tried (ascending) when labelling duration axes.
pub const TICK_INTERVALS_MINUTES: [u32; 8] = [1, 2, 5, 10, 15, 20, 30, 60];

/// Upper bound on the number of ticks a duration axis may show.
pub const MAX_DURATION_TICKS: f64 = 7.0;

/// en-US style number: thousands separators, at most three fraction digits.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞".into() } else { "-∞".into() };
    }

    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::new();
    let is_zero = int_part == "0" && frac.is_empty();
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Parse a number that may carry thousands separators (`"1,234.5"`).
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Listening time in table cells:
/// - `>= 10` hours -> whole hours, `"12h"`
/// - otherwise -> `"H:MMh"`
pub fn hours_to_str(hours: f64) -> String {
    if hours >= 10.0 {
        format!("{}h", hours.round() as i64)
    } else {
        format!("{}h", clock_label(hours))
    }
}

/// Fractional hours as a clock string, `1.5 -> "1:30"`.
pub fn clock_label(hours: f64) -> String {
    let total_minutes = (hours * 60.0).round().max(0.0) as i64;
    minutes_label(total_minutes)
}

/// Whole minutes as a clock string, `90 -> "1:30"`.
pub fn minutes_label(total_minutes: i64) -> String {
    format!("{}:{:02}", total_minutes / 60, total_minutes % 60)
}

/// Inverse of [`hours_to_str`] / [`clock_label`]: `"9:30h"`, `"12h"` or `"1:40"`.
pub fn parse_hours(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let body = trimmed.strip_suffix('h').unwrap_or(trimmed);
    match body.split_once(':') {
        Some((hours, minutes)) => {
            let hours: f64 = hours.trim().parse().ok()?;
            let minutes: f64 = minutes.trim().parse().ok()?;
            Some(hours + minutes / 60.0)
        }
        None if trimmed.ends_with('h') => body.trim().parse().ok(),
        None => None,
    }
}

/// Pick the tick spacing (in minutes) for a duration axis whose largest
/// value is `max_hours`: the smallest candidate that needs at most
/// [`MAX_DURATION_TICKS`] ticks, or a full hour.
pub fn select_tick_interval(max_hours: f64) -> u32 {
    let max_minutes = max_hours * 60.0;
    TICK_INTERVALS_MINUTES
        .iter()
        .copied()
        .find(|interval| max_minutes / f64::from(*interval) <= MAX_DURATION_TICKS)
        .unwrap_or(60)
}

/// Tick positions (hours) and `H:MM` labels covering `0..=max_hours`,
/// plus one extra step of headroom.
pub fn duration_ticks(max_hours: f64) -> (Vec<f64>, Vec<String>) {
    let interval = select_tick_interval(max_hours);
    let limit = max_hours.max(0.0) * 60.0 + f64::from(interval);

    let mut values = Vec::new();
    let mut labels = Vec::new();
    let mut minute: i64 = 0;
    while (minute as f64) <= limit {
        values.push(minute as f64 / 60.0);
        labels.push(minutes_label(minute));
        minute += i64::from(interval);
    }
    (values, labels)
}
