//! Period-over-period comparison of completion totals.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::analytics::range::{date_range, StatsRange};
use crate::analytics::stats::{daily_stats, percentage};
use crate::types::Routine;

/// Totals for one period.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodSummary {
    /// Completions within the period
    pub total: u32,
    /// Rounded completion percentage
    pub rate: u8,
}

/// Signed current-minus-previous differences.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodDiff {
    pub total: i64,
    pub rate: i64,
}

/// Current period vs. the immediately preceding period of equal length.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonStats {
    pub current: PeriodSummary,
    pub previous: PeriodSummary,
    pub diff: PeriodDiff,
}

/// Compare the range ending at `today` against the equal-length period that
/// ends the day before it starts.
pub fn comparison_stats(
    routines: &[Routine],
    range: StatsRange,
    today: NaiveDate,
) -> ComparisonStats {
    let days = range.day_count();
    let current = period_summary(routines, today, days);

    // The previous window ends exactly one day before the current one starts
    let previous_end = today - Duration::days(i64::from(days));
    let previous = period_summary(routines, previous_end, days);

    ComparisonStats {
        diff: PeriodDiff {
            total: i64::from(current.total) - i64::from(previous.total),
            rate: i64::from(current.rate) - i64::from(previous.rate),
        },
        current,
        previous,
    }
}

fn period_summary(routines: &[Routine], end: NaiveDate, days: u32) -> PeriodSummary {
    let daily = daily_stats(&date_range(end, days), routines);
    let total: u32 = daily.iter().map(|d| d.completed).sum();
    let possible: u32 = daily.iter().map(|d| d.total).sum();
    PeriodSummary {
        total,
        rate: percentage(total, possible),
    }
}
