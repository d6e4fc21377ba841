//! Core domain types for taskmeter
//!
//! Two kinds of task live side by side:
//!
//! | Term | Definition |
//! |------|------------|
//! | **Task** | A one-off item with a status that flips once and stays |
//! | **Routine** | A recurring daily item; its status resets every local midnight |
//! | **Completion history** | The set of calendar days a routine was completed on |
//! | **Calendar day** | A local `YYYY-MM-DD` day, the atomic unit of tracking |
//!
//! Routines carry their full completion history; the analytics engine in
//! [`crate::analytics`] derives streaks, rates, and heatmaps from it. The
//! `last_completed` field is a store-maintained convenience for "done today"
//! checks and is never consumed by the historical computations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// Priority
// ============================================

/// Priority of a one-off task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Returns the identifier used in database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Returns the display name for this priority
    pub fn display_name(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!("unknown priority: {}", s)),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================
// Task status
// ============================================

/// Completion status for tasks and for routines-as-of-today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    /// Returns the identifier used in database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }

    /// Returns the display name for this status
    pub fn display_name(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Completed => "Completed",
        }
    }

    /// The opposite status.
    pub fn toggled(&self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(format!("unknown task status: {}", s)),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================
// Task
// ============================================

/// A one-off task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier (generated on insert)
    pub id: String,
    /// Short title
    pub title: String,
    /// Free-form description (may be empty)
    pub description: String,
    /// Optional due day
    pub due_date: Option<NaiveDate>,
    /// Priority (default medium)
    pub priority: Priority,
    /// Current status
    pub status: TaskStatus,
    /// When this task was created
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the caller when creating a task; the store assigns
/// the id and creation timestamp.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub status: TaskStatus,
}

// ============================================
// Routine
// ============================================

/// A recurring daily task ("daily routine").
///
/// `history` holds every calendar day the routine was completed on, ascending,
/// with no duplicates. The store enforces both invariants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Routine {
    /// Unique identifier (generated on insert)
    pub id: String,
    /// Short title
    pub title: String,
    /// Free-form description (may be empty)
    pub description: String,
    /// When this routine was created
    pub created_at: DateTime<Utc>,
    /// Most recent completion day, if any
    pub last_completed: Option<NaiveDate>,
    /// Every day this routine was completed on, ascending
    pub history: Vec<NaiveDate>,
}

impl Routine {
    /// Whether the routine was completed on the given day.
    pub fn completed_on(&self, day: NaiveDate) -> bool {
        self.history.contains(&day)
    }

    /// Whether the routine is completed for the given "today".
    ///
    /// Uses `last_completed`, matching how the store maintains day-of status;
    /// historical analytics never go through this.
    pub fn is_completed_today(&self, today: NaiveDate) -> bool {
        self.last_completed == Some(today)
    }

    /// Day-of status derived from `last_completed`.
    pub fn status_for(&self, today: NaiveDate) -> TaskStatus {
        if self.is_completed_today(today) {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_priority_round_trip() {
        for p in [Priority::Low, Priority::Medium, Priority::High] {
            assert_eq!(p.as_str().parse::<Priority>().unwrap(), p);
        }
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_status_toggled() {
        assert_eq!(TaskStatus::Pending.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::Completed.toggled(), TaskStatus::Pending);
    }

    #[test]
    fn test_routine_day_of_status() {
        let today = day(2026, 8, 6);
        let routine = Routine {
            id: "r1".to_string(),
            title: "Meditate".to_string(),
            description: String::new(),
            created_at: Utc::now(),
            last_completed: Some(today),
            history: vec![day(2026, 8, 4), today],
        };

        assert!(routine.is_completed_today(today));
        assert_eq!(routine.status_for(today), TaskStatus::Completed);
        assert!(routine.completed_on(day(2026, 8, 4)));
        assert!(!routine.completed_on(day(2026, 8, 5)));

        // Yesterday's completion does not count for today
        let stale = Routine {
            last_completed: Some(day(2026, 8, 5)),
            ..routine
        };
        assert_eq!(stale.status_for(today), TaskStatus::Pending);
    }
}
