//! Completion statistics over routine histories.
//!
//! Everything here is a pure function of the routine snapshot and an
//! explicit `today`; nothing reads the clock or the store.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::analytics::range::{date_range, StatsRange};
use crate::types::Routine;

/// Per-day completion counts within a stats window.
#[derive(Debug, Clone, Serialize)]
pub struct DailyStat {
    /// The calendar day
    pub date: NaiveDate,
    /// Routines completed on this day
    pub completed: u32,
    /// Routines in existence at computation time
    pub total: u32,
    /// Short weekday name ("Mon"), informational only
    pub day_label: String,
}

impl DailyStat {
    /// A day counts toward streaks only when every routine was completed.
    fn fully_completed(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Aggregate completion statistics for a range of days.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionStats {
    /// Per-day breakdown, oldest first
    pub daily_stats: Vec<DailyStat>,
    /// Sum of completions across the range
    pub total_completions: u32,
    /// Routine-days available across the range
    pub possible_completions: u32,
    /// totals as a rounded percentage, 0 when nothing was possible
    pub completion_rate: u8,
    /// Consecutive fully-completed days ending at (or just before) today
    pub streak: u32,
    /// Longest fully-completed run anywhere in history, range-independent
    pub longest_streak: u32,
    /// The day with the most completions (first occurrence on ties)
    pub best_day: Option<DailyStat>,
}

/// Per-routine completion share of a stats window.
#[derive(Debug, Clone, Serialize)]
pub struct RoutineEfficiency {
    pub id: String,
    pub title: String,
    /// Days within the window this routine was completed on
    pub completions: u32,
    /// completions over window length, rounded percentage
    pub percent: u8,
}

/// Count completions for each day of the window.
///
/// `total` is the current routine count for every day, including days before
/// a routine existed; the history does not record membership over time.
pub fn daily_stats(days: &[NaiveDate], routines: &[Routine]) -> Vec<DailyStat> {
    let total = routines.len() as u32;
    days.iter()
        .map(|&date| DailyStat {
            date,
            completed: routines.iter().filter(|r| r.completed_on(date)).count() as u32,
            total,
            day_label: date.format("%a").to_string(),
        })
        .collect()
}

/// Compute the full statistics block for the given range ending at `today`.
pub fn completion_stats(
    routines: &[Routine],
    range: StatsRange,
    today: NaiveDate,
) -> CompletionStats {
    let days = date_range(today, range.day_count());
    let daily = daily_stats(&days, routines);

    let total_completions: u32 = daily.iter().map(|d| d.completed).sum();
    let possible_completions: u32 = daily.iter().map(|d| d.total).sum();

    let best_day = daily
        .iter()
        .fold(None::<&DailyStat>, |best, day| match best {
            Some(b) if day.completed > b.completed => Some(day),
            Some(b) => Some(b),
            None => Some(day),
        })
        .cloned();

    CompletionStats {
        streak: current_streak(&daily, today),
        longest_streak: longest_streak(routines),
        completion_rate: percentage(total_completions, possible_completions),
        total_completions,
        possible_completions,
        best_day,
        daily_stats: daily,
    }
}

/// Consecutive fully-completed days, walking backward from the newest day.
///
/// An unfinished day equal to `today` is skipped rather than breaking the
/// run; the day's routines can still be completed before midnight. Any other
/// failing day ends the walk.
fn current_streak(daily: &[DailyStat], today: NaiveDate) -> u32 {
    let mut streak = 0;
    for stat in daily.iter().rev() {
        if stat.fully_completed() {
            streak += 1;
        } else if stat.date == today {
            continue;
        } else {
            break;
        }
    }
    streak
}

/// Longest run of consecutive fully-completed days across all recorded
/// history, regardless of any requested range.
///
/// "Fully completed" means every routine in the current snapshot has the day
/// in its history.
pub fn longest_streak(routines: &[Routine]) -> u32 {
    if routines.is_empty() {
        return 0;
    }

    let all_days: BTreeSet<NaiveDate> = routines
        .iter()
        .flat_map(|r| r.history.iter().copied())
        .collect();

    let mut max_streak = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;

    for day in all_days {
        let all_completed = routines.iter().all(|r| r.completed_on(day));
        if all_completed {
            run = match prev {
                Some(p) if (day - p).num_days() == 1 => run + 1,
                _ => 1,
            };
            prev = Some(day);
        } else {
            run = 0;
            prev = None;
        }
        max_streak = max_streak.max(run);
    }

    max_streak
}

/// Per-routine completion percentages over the range ending at `today`.
pub fn efficiency_breakdown(
    routines: &[Routine],
    range: StatsRange,
    today: NaiveDate,
) -> Vec<RoutineEfficiency> {
    let days = date_range(today, range.day_count());
    routines
        .iter()
        .map(|routine| {
            let completions = days.iter().filter(|&&d| routine.completed_on(d)).count() as u32;
            RoutineEfficiency {
                id: routine.id.clone(),
                title: routine.title.clone(),
                completions,
                percent: percentage(completions, days.len() as u32),
            }
        })
        .collect()
}

/// Rounded percentage, 0 when nothing was possible.
///
/// Rounds half away from zero, so 12.5% displays as 13%.
pub(crate) fn percentage(part: u32, whole: u32) -> u8 {
    if whole == 0 {
        return 0;
    }
    (100.0 * f64::from(part) / f64::from(whole)).round() as u8
}
