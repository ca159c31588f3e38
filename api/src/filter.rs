//! Filter parameters passed to the pipeline when re-crunching.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-k used when the selection carries no explicit limit ("all").
pub const UNLIMITED_TOP_K: usize = 100_000;

/// Default top-k for the initial crunch of a fresh upload.
pub const DEFAULT_TOP_K: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u8,
}

impl YearMonth {
    pub fn new(year: i32, month: u8) -> Self {
        Self { year, month }
    }

    /// Parses `2015-6` and `2015-06`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (year, month) = raw.trim().split_once('-')?;
        let year = year.parse().ok()?;
        let month: u8 = month.parse().ok()?;
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn next(self) -> Self {
        if self.month >= 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }
}

/// Renders the form-value encoding, `2015-6`.
impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
    pub min_year: i32,
    pub min_month: u8,
    pub max_year: i32,
    pub max_month: u8,
    /// Empty means "all artists".
    pub artist_name: String,
    pub top_k: usize,
}

impl FilterParams {
    pub fn new(start: YearMonth, end: YearMonth, artist_name: &str, top_k: usize) -> Self {
        Self {
            min_year: start.year,
            min_month: start.month,
            max_year: end.year,
            max_month: end.month,
            artist_name: artist_name.trim().to_string(),
            top_k,
        }
    }

    pub fn start(&self) -> YearMonth {
        YearMonth::new(self.min_year, self.min_month)
    }

    pub fn end(&self) -> YearMonth {
        YearMonth::new(self.max_year, self.max_month)
    }

    /// Inclusive month-range check used by pipelines that filter rows.
    pub fn contains(&self, month: YearMonth) -> bool {
        self.start() <= month && month <= self.end()
    }
}
