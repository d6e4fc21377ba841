//! Activity heatmap over the last year of completions.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use crate::analytics::range::date_range;
use crate::types::Routine;

/// The heatmap window is a fixed year ending today, never the stats range.
pub const HEATMAP_DAYS: u32 = 365;

/// One day of the heatmap.
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapCell {
    /// The calendar day
    pub date: NaiveDate,
    /// Routines completed on this day
    pub count: u32,
    /// Completion-rate bucket in 0..=4 for display shading
    pub intensity: u8,
}

/// Build the 365-day heatmap ending at `today`, oldest cell first.
pub fn heatmap_data(routines: &[Routine], today: NaiveDate) -> Vec<HeatmapCell> {
    let mut counts: HashMap<NaiveDate, u32> = HashMap::new();
    for routine in routines {
        for &day in &routine.history {
            *counts.entry(day).or_insert(0) += 1;
        }
    }

    let total = routines.len() as u32;
    date_range(today, HEATMAP_DAYS)
        .into_iter()
        .map(|date| {
            let count = counts.get(&date).copied().unwrap_or(0);
            HeatmapCell {
                date,
                count,
                intensity: intensity_for(count, total),
            }
        })
        .collect()
}

/// Bucket a day's completion rate into a 0..=4 intensity.
///
/// The top bucket is reserved for a fully-completed day; anything short of
/// that caps at 3.
fn intensity_for(count: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let rate = f64::from(count) / f64::from(total);
    if rate == 0.0 {
        0
    } else if rate <= 0.33 {
        1
    } else if rate <= 0.66 {
        2
    } else if rate < 1.0 {
        3
    } else {
        4
    }
}
