//! Store repository layer
//!
//! Provides query and insert operations for tasks and routines.

use crate::error::{Error, Result};
use crate::types::{Routine, Task, TaskDraft, TaskStatus};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Store handle with a single connection
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open or create a database at the given path
    pub fn open(path: &PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable foreign keys and WAL mode for better concurrency
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    /// Get the underlying connection (for advanced use)
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    // ============================================
    // Task operations
    // ============================================

    /// Insert a new one-off task, assigning its id and creation timestamp.
    pub fn add_task(&self, draft: TaskDraft) -> Result<Task> {
        let task = Task {
            id: new_id(),
            title: draft.title,
            description: draft.description,
            due_date: draft.due_date,
            priority: draft.priority,
            status: draft.status,
            created_at: Utc::now(),
        };

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO tasks (id, title, description, due_date, priority, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                task.id,
                task.title,
                task.description,
                task.due_date.map(|d| d.format(DAY_FORMAT).to_string()),
                task.priority.as_str(),
                task.status.as_str(),
                task.created_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!(task_id = %task.id, title = %task.title, "Task added");
        Ok(task)
    }

    /// Get a task by ID
    pub fn get_task(&self, id: &str) -> Result<Option<Task>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT * FROM tasks WHERE id = ?", [id], Self::row_to_task)
            .optional()
            .map_err(Error::from)
    }

    /// List all one-off tasks, oldest first
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT * FROM tasks ORDER BY created_at, id")?;
        let tasks = stmt
            .query_map([], Self::row_to_task)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Write back every field of an existing task
    pub fn update_task(&self, task: &Task) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            r#"
            UPDATE tasks
            SET title = ?2, description = ?3, due_date = ?4, priority = ?5, status = ?6
            WHERE id = ?1
            "#,
            params![
                task.id,
                task.title,
                task.description,
                task.due_date.map(|d| d.format(DAY_FORMAT).to_string()),
                task.priority.as_str(),
                task.status.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(Error::TaskNotFound(task.id.clone()));
        }
        Ok(())
    }

    /// Flip a task between pending and completed, returning the new status.
    pub fn toggle_task_status(&self, id: &str) -> Result<TaskStatus> {
        let mut task = self
            .get_task(id)?
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        task.status = task.status.toggled();
        self.update_task(&task)?;
        Ok(task.status)
    }

    /// Delete a task
    pub fn delete_task(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute("DELETE FROM tasks WHERE id = ?", [id])?;
        if changed == 0 {
            return Err(Error::TaskNotFound(id.to_string()));
        }
        tracing::debug!(task_id = %id, "Task deleted");
        Ok(())
    }

    // ============================================
    // Routine operations
    // ============================================

    /// Insert a new routine with an empty completion history.
    pub fn add_routine(&self, title: &str, description: &str) -> Result<Routine> {
        let routine = Routine {
            id: new_id(),
            title: title.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
            last_completed: None,
            history: Vec::new(),
        };

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO routines (id, title, description, created_at, last_completed)
            VALUES (?1, ?2, ?3, ?4, NULL)
            "#,
            params![
                routine.id,
                routine.title,
                routine.description,
                routine.created_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!(routine_id = %routine.id, title = %routine.title, "Routine added");
        Ok(routine)
    }

    /// Get a routine (with its full completion history) by ID
    pub fn get_routine(&self, id: &str) -> Result<Option<Routine>> {
        let conn = self.conn.lock().unwrap();
        let Some(mut routine) = conn
            .query_row(
                "SELECT * FROM routines WHERE id = ?",
                [id],
                Self::row_to_routine,
            )
            .optional()?
        else {
            return Ok(None);
        };
        routine.history = Self::history_for(&conn, id)?;
        Ok(Some(routine))
    }

    /// List all routines (with completion histories), oldest first
    pub fn list_routines(&self) -> Result<Vec<Routine>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT * FROM routines ORDER BY created_at, id")?;
        let mut routines = stmt
            .query_map([], Self::row_to_routine)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        // One pass over the completions table instead of a query per routine
        let mut stmt =
            conn.prepare("SELECT routine_id, day FROM routine_completions ORDER BY day")?;
        let mut histories: HashMap<String, Vec<NaiveDate>> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (routine_id, day) = row?;
            if let Ok(day) = NaiveDate::parse_from_str(&day, DAY_FORMAT) {
                histories.entry(routine_id).or_default().push(day);
            }
        }

        for routine in &mut routines {
            routine.history = histories.remove(&routine.id).unwrap_or_default();
        }

        Ok(routines)
    }

    /// Delete a routine and its completion history
    pub fn delete_routine(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute("DELETE FROM routines WHERE id = ?", [id])?;
        if changed == 0 {
            return Err(Error::RoutineNotFound(id.to_string()));
        }
        tracing::debug!(routine_id = %id, "Routine deleted");
        Ok(())
    }

    /// Toggle a routine's completion for the given "today".
    ///
    /// Completing adds today to the history and records it as the last
    /// completion; un-completing removes today from the history and clears
    /// the last completion. Returns the routine in its new state.
    pub fn toggle_routine(&self, id: &str, today: NaiveDate) -> Result<Routine> {
        let day = today.format(DAY_FORMAT).to_string();
        {
            let conn = self.conn.lock().unwrap();
            let last_completed: Option<String> = conn
                .query_row("SELECT last_completed FROM routines WHERE id = ?", [id], |r| {
                    r.get(0)
                })
                .optional()?
                .ok_or_else(|| Error::RoutineNotFound(id.to_string()))?;

            if last_completed.as_deref() == Some(day.as_str()) {
                // Uncomplete: remove today from history
                conn.execute(
                    "DELETE FROM routine_completions WHERE routine_id = ?1 AND day = ?2",
                    params![id, day],
                )?;
                conn.execute(
                    "UPDATE routines SET last_completed = NULL WHERE id = ?",
                    [id],
                )?;
            } else {
                // Complete: add today to history
                conn.execute(
                    "INSERT OR IGNORE INTO routine_completions (routine_id, day) VALUES (?1, ?2)",
                    params![id, day],
                )?;
                conn.execute(
                    "UPDATE routines SET last_completed = ?2 WHERE id = ?1",
                    params![id, day],
                )?;
            }
        }

        self.get_routine(id)?
            .ok_or_else(|| Error::RoutineNotFound(id.to_string()))
    }

    /// Record a completion for an arbitrary day (idempotent).
    ///
    /// Backfill primitive for imports and tests; `last_completed` only moves
    /// forward.
    pub fn record_completion(&self, id: &str, day: NaiveDate) -> Result<()> {
        let day_str = day.format(DAY_FORMAT).to_string();
        let conn = self.conn.lock().unwrap();

        let exists: Option<String> = conn
            .query_row("SELECT id FROM routines WHERE id = ?", [id], |r| r.get(0))
            .optional()?;
        if exists.is_none() {
            return Err(Error::RoutineNotFound(id.to_string()));
        }

        conn.execute(
            "INSERT OR IGNORE INTO routine_completions (routine_id, day) VALUES (?1, ?2)",
            params![id, day_str],
        )?;
        conn.execute(
            r#"
            UPDATE routines
            SET last_completed = ?2
            WHERE id = ?1 AND (last_completed IS NULL OR last_completed < ?2)
            "#,
            params![id, day_str],
        )?;
        Ok(())
    }

    // ============================================
    // Row mapping
    // ============================================

    fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
        let due_date: Option<String> = row.get("due_date")?;
        let priority: String = row.get("priority")?;
        let status: String = row.get("status")?;
        let created_at: String = row.get("created_at")?;

        Ok(Task {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            due_date: due_date.and_then(|d| NaiveDate::parse_from_str(&d, DAY_FORMAT).ok()),
            priority: priority.parse().unwrap_or_default(),
            status: status.parse().unwrap_or_default(),
            created_at: DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }

    fn row_to_routine(row: &Row) -> rusqlite::Result<Routine> {
        let last_completed: Option<String> = row.get("last_completed")?;
        let created_at: String = row.get("created_at")?;

        Ok(Routine {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            created_at: DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
            last_completed: last_completed
                .and_then(|d| NaiveDate::parse_from_str(&d, DAY_FORMAT).ok()),
            history: Vec::new(),
        })
    }

    fn history_for(conn: &Connection, id: &str) -> Result<Vec<NaiveDate>> {
        let mut stmt = conn
            .prepare("SELECT day FROM routine_completions WHERE routine_id = ? ORDER BY day")?;
        let days = stmt
            .query_map([id], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(days
            .into_iter()
            .filter_map(|d| NaiveDate::parse_from_str(&d, DAY_FORMAT).ok())
            .collect())
    }
}

impl crate::analytics::RoutineSource for Store {
    fn list_routines(&self) -> Result<Vec<Routine>> {
        Store::list_routines(self)
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Priority;

    fn test_store() -> Store {
        let store = Store::open_in_memory().expect("open in-memory store");
        store.migrate().expect("migrate schema");
        store
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_task_crud() {
        let store = test_store();

        let task = store
            .add_task(TaskDraft {
                title: "Pay rent".to_string(),
                due_date: Some(day(2026, 9, 1)),
                priority: Priority::High,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(task.status, TaskStatus::Pending);

        let mut loaded = store.get_task(&task.id).unwrap().expect("task exists");
        assert_eq!(loaded.title, "Pay rent");
        assert_eq!(loaded.due_date, Some(day(2026, 9, 1)));
        assert_eq!(loaded.priority, Priority::High);

        loaded.title = "Pay rent (transfer)".to_string();
        store.update_task(&loaded).unwrap();
        let reloaded = store.get_task(&task.id).unwrap().unwrap();
        assert_eq!(reloaded.title, "Pay rent (transfer)");

        assert_eq!(
            store.toggle_task_status(&task.id).unwrap(),
            TaskStatus::Completed
        );
        assert_eq!(
            store.toggle_task_status(&task.id).unwrap(),
            TaskStatus::Pending
        );

        store.delete_task(&task.id).unwrap();
        assert!(store.get_task(&task.id).unwrap().is_none());
        assert!(matches!(
            store.delete_task(&task.id),
            Err(Error::TaskNotFound(_))
        ));
    }

    #[test]
    fn test_toggle_routine_round_trips() {
        let store = test_store();
        let today = day(2026, 8, 6);

        let routine = store.add_routine("Morning run", "30 minutes").unwrap();
        assert!(routine.history.is_empty());

        let completed = store.toggle_routine(&routine.id, today).unwrap();
        assert_eq!(completed.last_completed, Some(today));
        assert_eq!(completed.history, vec![today]);

        let uncompleted = store.toggle_routine(&routine.id, today).unwrap();
        assert_eq!(uncompleted.last_completed, None);
        assert!(uncompleted.history.is_empty());
    }

    #[test]
    fn test_completion_days_unique() {
        let store = test_store();
        let routine = store.add_routine("Read", "").unwrap();
        let d = day(2026, 8, 1);

        store.record_completion(&routine.id, d).unwrap();
        store.record_completion(&routine.id, d).unwrap();

        let loaded = store.get_routine(&routine.id).unwrap().unwrap();
        assert_eq!(loaded.history, vec![d]);
    }

    #[test]
    fn test_record_completion_moves_last_completed_forward_only() {
        let store = test_store();
        let routine = store.add_routine("Stretch", "").unwrap();

        store.record_completion(&routine.id, day(2026, 8, 5)).unwrap();
        store.record_completion(&routine.id, day(2026, 8, 3)).unwrap();

        let loaded = store.get_routine(&routine.id).unwrap().unwrap();
        assert_eq!(loaded.last_completed, Some(day(2026, 8, 5)));
        assert_eq!(loaded.history, vec![day(2026, 8, 3), day(2026, 8, 5)]);
    }

    #[test]
    fn test_delete_routine_removes_history() {
        let store = test_store();
        let routine = store.add_routine("Journal", "").unwrap();
        store.record_completion(&routine.id, day(2026, 8, 1)).unwrap();

        store.delete_routine(&routine.id).unwrap();
        assert!(store.get_routine(&routine.id).unwrap().is_none());

        let conn = store.connection();
        let remaining: i32 = conn
            .query_row("SELECT COUNT(*) FROM routine_completions", [], |r| r.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_list_routines_orders_history_ascending() {
        let store = test_store();
        let routine = store.add_routine("Walk", "").unwrap();
        for d in [day(2026, 8, 4), day(2026, 8, 1), day(2026, 8, 3)] {
            store.record_completion(&routine.id, d).unwrap();
        }

        let routines = store.list_routines().unwrap();
        assert_eq!(routines.len(), 1);
        assert_eq!(
            routines[0].history,
            vec![day(2026, 8, 1), day(2026, 8, 3), day(2026, 8, 4)]
        );
    }
}
