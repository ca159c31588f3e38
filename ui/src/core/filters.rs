//! Helpers behind the filter form: month options and top-k parsing.

use api::filter::{YearMonth, UNLIMITED_TOP_K};
use time::Month;

/// Choices offered by the top-k select. Labels without a `-` mean "all".
pub const TOP_K_CHOICES: &[&str] = &["Top-20", "Top-50", "Top-100", "All"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthOption {
    /// Form value, `2015-6`.
    pub value: String,
    /// Display label, `2015-Jun`.
    pub label: String,
}

/// Every month from `first` to `last` inclusive, in order.
pub fn month_options(first: YearMonth, last: YearMonth) -> Vec<MonthOption> {
    let mut options = Vec::new();
    let mut current = first;
    while current <= last {
        options.push(MonthOption {
            value: current.to_string(),
            label: format!("{}-{}", current.year, short_month(current.month)),
        });
        current = current.next();
    }
    options
}

fn short_month(month: u8) -> String {
    Month::try_from(month)
        .map(|m| m.to_string().chars().take(3).collect())
        .unwrap_or_else(|_| month.to_string())
}

/// `"Top-20"` -> 20; anything without a number after `-` -> unlimited.
pub fn parse_top_k(label: &str) -> usize {
    label
        .split_once('-')
        .and_then(|(_, count)| count.trim().parse().ok())
        .unwrap_or(UNLIMITED_TOP_K)
}
