//! Date-range selection for stats views.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Time window for completion statistics, counted backward from an anchor day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsRange {
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
    /// Last 90 days
    ThreeMonths,
    /// Last 180 days
    SixMonths,
    /// Last 365 days
    Year,
}

impl StatsRange {
    /// Number of days covered by this range.
    pub fn day_count(&self) -> u32 {
        match self {
            StatsRange::Week => 7,
            StatsRange::Month => 30,
            StatsRange::ThreeMonths => 90,
            StatsRange::SixMonths => 180,
            StatsRange::Year => 365,
        }
    }

    /// Parse a range keyword.
    ///
    /// Unrecognized keywords fall back to [`StatsRange::Week`]. The stats
    /// views are display-only, so a bad keyword degrades to the default
    /// rather than failing; callers wanting strict validation must check the
    /// keyword themselves.
    pub fn parse(keyword: &str) -> Self {
        match keyword {
            "week" => StatsRange::Week,
            "month" => StatsRange::Month,
            "3months" => StatsRange::ThreeMonths,
            "6months" => StatsRange::SixMonths,
            "year" => StatsRange::Year,
            _ => StatsRange::Week,
        }
    }

    /// Returns the keyword form of this range.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatsRange::Week => "week",
            StatsRange::Month => "month",
            StatsRange::ThreeMonths => "3months",
            StatsRange::SixMonths => "6months",
            StatsRange::Year => "year",
        }
    }

    /// Returns the display name for this range.
    pub fn display_name(&self) -> &'static str {
        match self {
            StatsRange::Week => "Weekly",
            StatsRange::Month => "Monthly",
            StatsRange::ThreeMonths => "3 Months",
            StatsRange::SixMonths => "6 Months",
            StatsRange::Year => "Yearly",
        }
    }
}

impl Default for StatsRange {
    fn default() -> Self {
        StatsRange::Week
    }
}

impl std::fmt::Display for StatsRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Generate the sequence of calendar days ending at `anchor`, inclusive.
///
/// Index 0 is the oldest day, the last index is `anchor` itself.
pub fn date_range(anchor: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..days)
        .map(|i| anchor - Duration::days((days - 1 - i) as i64))
        .collect()
}
