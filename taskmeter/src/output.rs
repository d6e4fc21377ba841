//! Text and JSON rendering for the CLI views.

use anyhow::Result;
use chrono::NaiveDate;
use serde_json::json;

use taskmeter_core::analytics::{
    ComparisonStats, CompletionStats, HeatmapCell, RoutineEfficiency, StatsRange,
};
use taskmeter_core::types::{Routine, Task, TaskStatus};

/// Shading characters indexed by heatmap intensity.
const INTENSITY_CHARS: [char; 5] = ['·', '░', '▒', '▓', '█'];

/// Daily breakdown lines are only printed for windows this size or smaller.
const BREAKDOWN_MAX_DAYS: u32 = 31;

pub fn print_tasks(tasks: &[Task], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks yet. Add your first task with `taskmeter task add`.");
        return Ok(());
    }

    for task in tasks {
        let marker = status_marker(task.status);
        let due = task
            .due_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{} {}  {:<6} due {:<10}  {}",
            marker,
            short_id(&task.id),
            task.priority.display_name(),
            due,
            task.title
        );
    }
    Ok(())
}

pub fn print_routines(routines: &[Routine], today: NaiveDate, json: bool) -> Result<()> {
    let completed_today = routines
        .iter()
        .filter(|r| r.is_completed_today(today))
        .count();

    if json {
        let entries: Vec<_> = routines
            .iter()
            .map(|r| {
                json!({
                    "id": r.id,
                    "title": r.title,
                    "description": r.description,
                    "status": r.status_for(today),
                    "last_completed": r.last_completed,
                    "history": r.history,
                })
            })
            .collect();
        let out = json!({
            "routines": entries,
            "completed_today": completed_today,
            "total": routines.len(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if routines.is_empty() {
        println!("No daily routines yet. Add one with `taskmeter routine add`.");
        return Ok(());
    }

    println!(
        "Daily Routines - {}/{} completed today",
        completed_today,
        routines.len()
    );
    for routine in routines {
        let marker = status_marker(routine.status_for(today));
        println!("{} {}  {}", marker, short_id(&routine.id), routine.title);
    }
    Ok(())
}

pub fn print_stats(
    stats: &CompletionStats,
    efficiency: &[RoutineEfficiency],
    range: StatsRange,
    json: bool,
) -> Result<()> {
    if json {
        let out = json!({
            "range": range.as_str(),
            "stats": stats,
            "efficiency": efficiency,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Completion Stats ({})", range.display_name());
    println!("  Total Done:     {}", stats.total_completions);
    println!("  Success Rate:   {}%", stats.completion_rate);
    println!("  Current Streak: {}", stats.streak);
    println!("  All-time Best:  {}", stats.longest_streak);
    if let Some(best) = &stats.best_day {
        println!(
            "  Best Day:       {} ({}) - {} completed",
            best.date, best.day_label, best.completed
        );
    }

    if range.day_count() <= BREAKDOWN_MAX_DAYS {
        println!();
        println!("Daily breakdown:");
        for day in &stats.daily_stats {
            println!(
                "  {} {}  {:<10} {}/{}",
                day.day_label,
                day.date,
                bar(day.completed, day.total),
                day.completed,
                day.total
            );
        }
    }

    if !efficiency.is_empty() {
        println!();
        println!("Routine efficiency:");
        let width = efficiency.iter().map(|e| e.title.len()).max().unwrap_or(0);
        for entry in efficiency {
            println!(
                "  {:<width$}  {:>3}%  {}",
                entry.title,
                entry.percent,
                bar(u32::from(entry.percent), 100),
                width = width
            );
        }
    }
    Ok(())
}

pub fn print_heatmap(cells: &[HeatmapCell], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(cells)?);
        return Ok(());
    }

    if let (Some(first), Some(last)) = (cells.first(), cells.last()) {
        println!("Completion heatmap {} .. {}", first.date, last.date);
    }

    // Seven rows, one column per consecutive 7-day chunk, oldest first
    let columns = (cells.len() + 6) / 7;
    for row in 0..7 {
        let mut line = String::with_capacity(columns);
        for col in 0..columns {
            let idx = col * 7 + row;
            match cells.get(idx) {
                Some(cell) => {
                    line.push(INTENSITY_CHARS[usize::from(cell.intensity.min(4))]);
                }
                None => line.push(' '),
            }
        }
        println!("  {}", line);
    }

    println!(
        "  less {} more",
        INTENSITY_CHARS.iter().collect::<String>()
    );
    Ok(())
}

pub fn print_comparison(comparison: &ComparisonStats, range: StatsRange, json: bool) -> Result<()> {
    if json {
        let out = json!({
            "range": range.as_str(),
            "comparison": comparison,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Period Comparison ({})", range.display_name());
    println!(
        "  Total Completions: {} ({})",
        comparison.current.total,
        signed_delta(comparison.diff.total, "")
    );
    println!(
        "  Completion Rate:   {}% ({})",
        comparison.current.rate,
        signed_delta(comparison.diff.rate, "%")
    );
    println!("Compared to previous period");
    Ok(())
}

fn status_marker(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "[ ]",
        TaskStatus::Completed => "[x]",
    }
}

fn short_id(id: &str) -> &str {
    &id[..8.min(id.len())]
}

/// Ten-slot progress bar.
fn bar(value: u32, max: u32) -> String {
    if max == 0 {
        return String::new();
    }
    let filled = (u64::from(value) * 10 / u64::from(max)) as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(10 - filled.min(10)))
}

fn signed_delta(delta: i64, suffix: &str) -> String {
    if delta >= 0 {
        format!("up {}{}", delta, suffix)
    } else {
        format!("down {}{}", delta.abs(), suffix)
    }
}
