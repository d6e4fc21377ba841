//! Analytics module for taskmeter
//!
//! Derives productivity statistics from routine completion histories:
//! - Per-day completion counts and rates over a selectable range
//! - Current and all-time-longest streaks
//! - A fixed 365-day activity heatmap
//! - Period-over-period comparison
//! - Per-routine efficiency breakdown
//!
//! The engine is a set of pure functions: every computation takes the
//! routine snapshot and an explicit `today` and returns freshly built result
//! values. Nothing is cached, nothing reads the wall clock, and the store is
//! only reached through the [`RoutineSource`] capability, which keeps the
//! whole module testable with fabricated inputs.

pub mod comparison;
pub mod heatmap;
pub mod range;
pub mod stats;

pub use comparison::{ComparisonStats, PeriodDiff, PeriodSummary};
pub use heatmap::{HeatmapCell, HEATMAP_DAYS};
pub use range::StatsRange;
pub use stats::{CompletionStats, DailyStat, RoutineEfficiency};

use chrono::NaiveDate;

use crate::error::Result;
use crate::types::Routine;

/// Capability to read the current routine snapshot.
///
/// Implemented by [`crate::store::Store`]; tests implement it over a plain
/// vector.
pub trait RoutineSource {
    /// Read-only snapshot of all routines, including completion histories.
    fn list_routines(&self) -> Result<Vec<Routine>>;
}

impl RoutineSource for Vec<Routine> {
    fn list_routines(&self) -> Result<Vec<Routine>> {
        Ok(self.clone())
    }
}

/// Completion statistics for the range ending at `today`.
pub fn completion_stats(
    source: &impl RoutineSource,
    range: StatsRange,
    today: NaiveDate,
) -> Result<CompletionStats> {
    Ok(stats::completion_stats(&source.list_routines()?, range, today))
}

/// Current period vs. the immediately preceding period.
pub fn comparison_stats(
    source: &impl RoutineSource,
    range: StatsRange,
    today: NaiveDate,
) -> Result<ComparisonStats> {
    Ok(comparison::comparison_stats(
        &source.list_routines()?,
        range,
        today,
    ))
}

/// The fixed 365-day heatmap ending at `today`.
pub fn heatmap_data(source: &impl RoutineSource, today: NaiveDate) -> Result<Vec<HeatmapCell>> {
    Ok(heatmap::heatmap_data(&source.list_routines()?, today))
}

/// Per-routine completion percentages for the range ending at `today`.
pub fn efficiency_breakdown(
    source: &impl RoutineSource,
    range: StatsRange,
    today: NaiveDate,
) -> Result<Vec<RoutineEfficiency>> {
    Ok(stats::efficiency_breakdown(
        &source.list_routines()?,
        range,
        today,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn day(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_facade_over_fabricated_source() {
        let today = day(2026, 8, 6);
        let source = vec![Routine {
            id: "r1".to_string(),
            title: "Walk".to_string(),
            description: String::new(),
            created_at: Utc::now(),
            last_completed: Some(today),
            history: vec![today],
        }];

        let stats = completion_stats(&source, StatsRange::Week, today).unwrap();
        assert_eq!(stats.total_completions, 1);
        assert_eq!(stats.streak, 1);

        let cells = heatmap_data(&source, today).unwrap();
        assert_eq!(cells.len(), HEATMAP_DAYS as usize);

        let cmp = comparison_stats(&source, StatsRange::Week, today).unwrap();
        assert_eq!(cmp.diff.total, 1);

        let efficiency = efficiency_breakdown(&source, StatsRange::Week, today).unwrap();
        assert_eq!(efficiency[0].percent, 14);
    }
}
