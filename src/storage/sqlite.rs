//! SQLite implementation of the habit storage interface
//!
//! This module provides the concrete SQLite implementation for storing
//! and retrieving habits and logs. It handles all SQL queries and the
//! conversion between rows and domain types.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{Category, Frequency, Habit, HabitId, HabitLog, LogDate, LogId};
use crate::storage::{migrations, HabitStorage, StorageError};

const HABIT_COLUMNS: &str = "id, name, description, category, frequency, target_frequency, \
     color, icon, is_active, current_streak, longest_streak, created_at, updated_at";

const LOG_COLUMNS: &str =
    "id, habit_id, date, completed, completed_count, note, created_at, updated_at";

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the HabitStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Open a private in-memory database (used by tests and dry runs)
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn })
    }

    fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
        let id: String = row.get(0)?;
        let category: String = row.get(3)?;
        let frequency: String = row.get(4)?;
        let created_at: String = row.get(11)?;
        let updated_at: String = row.get(12)?;

        Ok(Habit {
            id: HabitId::from_string(&id).map_err(|e| conversion_error(0, e))?,
            name: row.get(1)?,
            description: row.get(2)?,
            category: Category::parse(&category).map_err(|e| conversion_error(3, e))?,
            frequency: Frequency::parse(&frequency).map_err(|e| conversion_error(4, e))?,
            target_frequency: row.get(5)?,
            color: row.get(6)?,
            icon: row.get(7)?,
            is_active: row.get(8)?,
            current_streak: row.get(9)?,
            longest_streak: row.get(10)?,
            created_at: parse_timestamp(11, &created_at)?,
            updated_at: parse_timestamp(12, &updated_at)?,
        })
    }

    fn log_from_row(row: &Row<'_>) -> rusqlite::Result<HabitLog> {
        let id: String = row.get(0)?;
        let habit_id: String = row.get(1)?;
        let date: String = row.get(2)?;
        let created_at: String = row.get(6)?;
        let updated_at: String = row.get(7)?;

        Ok(HabitLog {
            id: LogId::from_string(&id).map_err(|e| conversion_error(0, e))?,
            habit_id: HabitId::from_string(&habit_id).map_err(|e| conversion_error(1, e))?,
            date: LogDate::parse(&date).map_err(|e| conversion_error(2, e))?,
            completed: row.get(3)?,
            completed_count: row.get(4)?,
            note: row.get(5)?,
            created_at: parse_timestamp(6, &created_at)?,
            updated_at: parse_timestamp(7, &updated_at)?,
        })
    }

    fn query_logs(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<HabitLog>, StorageError> {
        let mut stmt = self.conn.prepare(sql)?;
        let logs = stmt
            .query_map(params, Self::log_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    fn require_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM habits WHERE id = ?1)",
            params![habit_id.to_string()],
            |row| row.get(0),
        )?;
        if exists {
            Ok(())
        } else {
            Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            })
        }
    }

    fn get_existing_log(&self, habit_id: &HabitId, date: LogDate) -> Result<HabitLog, StorageError> {
        self.get_log(habit_id, date)?
            .ok_or_else(|| StorageError::LogNotFound {
                habit_id: habit_id.to_string(),
                date: date.to_string(),
            })
    }
}

fn conversion_error<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

fn parse_timestamp(column: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(column, e))
}

impl HabitStorage for SqliteStorage {
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        self.conn.execute(
            &format!(
                "INSERT INTO habits ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                HABIT_COLUMNS
            ),
            params![
                habit.id.to_string(),
                habit.name,
                habit.description,
                habit.category.as_str(),
                habit.frequency.as_str(),
                habit.target_frequency,
                habit.color,
                habit.icon,
                habit.is_active,
                habit.current_streak,
                habit.longest_streak,
                habit.created_at.to_rfc3339(),
                habit.updated_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!("Created habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS),
                params![habit_id.to_string()],
                Self::habit_from_row,
            )
            .optional()?
            .ok_or_else(|| StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            })
    }

    /// Update the editable fields; the streak cache is written separately
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET
                name = ?2,
                description = ?3,
                category = ?4,
                frequency = ?5,
                target_frequency = ?6,
                color = ?7,
                icon = ?8,
                is_active = ?9,
                updated_at = ?10
             WHERE id = ?1",
            params![
                habit.id.to_string(),
                habit.name,
                habit.description,
                habit.category.as_str(),
                habit.frequency.as_str(),
                habit.target_frequency,
                habit.color,
                habit.icon,
                habit.is_active,
                habit.updated_at.to_rfc3339(),
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit.id.to_string(),
            });
        }

        tracing::debug!("Updated habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    /// Soft delete a habit (mark as inactive); its logs are kept
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET is_active = 0, updated_at = ?2 WHERE id = ?1",
            params![habit_id.to_string(), Utc::now().to_rfc3339()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tracing::debug!("Soft deleted habit: {}", habit_id);
        Ok(())
    }

    fn list_habits(
        &self,
        category: Option<Category>,
        active_only: bool,
    ) -> Result<Vec<Habit>, StorageError> {
        let mut sql = format!(
            "SELECT {} FROM habits WHERE (?1 IS NULL OR category = ?1)",
            HABIT_COLUMNS
        );
        if active_only {
            sql.push_str(" AND is_active = 1");
        }
        sql.push_str(" ORDER BY created_at DESC, name ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let habits = stmt
            .query_map(params![category.map(|c| c.as_str())], Self::habit_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(habits)
    }

    fn toggle_completion(&self, habit_id: &HabitId, date: LogDate) -> Result<HabitLog, StorageError> {
        self.require_habit(habit_id)?;

        // SET expressions read the row as it was before the update, so both
        // assignments see the old `completed` value.
        self.conn.execute(
            "INSERT INTO habit_logs (id, habit_id, date, completed, completed_count, note, created_at, updated_at)
             VALUES (?1, ?2, ?3, 1, 1, NULL, ?4, ?4)
             ON CONFLICT(habit_id, date) DO UPDATE SET
                completed = NOT habit_logs.completed,
                completed_count = CASE WHEN habit_logs.completed THEN 0 ELSE 1 END,
                updated_at = excluded.updated_at",
            params![
                LogId::new().to_string(),
                habit_id.to_string(),
                date.to_string(),
                Utc::now().to_rfc3339(),
            ],
        )?;

        let log = self.get_existing_log(habit_id, date)?;
        tracing::debug!(
            "Toggled habit {} on {}: completed = {}",
            habit_id,
            date,
            log.completed
        );
        Ok(log)
    }

    fn set_note(
        &self,
        habit_id: &HabitId,
        date: LogDate,
        note: Option<String>,
    ) -> Result<HabitLog, StorageError> {
        self.require_habit(habit_id)?;

        self.conn.execute(
            "INSERT INTO habit_logs (id, habit_id, date, completed, completed_count, note, created_at, updated_at)
             VALUES (?1, ?2, ?3, 0, 0, ?4, ?5, ?5)
             ON CONFLICT(habit_id, date) DO UPDATE SET
                note = excluded.note,
                updated_at = excluded.updated_at",
            params![
                LogId::new().to_string(),
                habit_id.to_string(),
                date.to_string(),
                note,
                Utc::now().to_rfc3339(),
            ],
        )?;

        tracing::debug!("Saved note for habit {} on {}", habit_id, date);
        self.get_existing_log(habit_id, date)
    }

    fn get_log(&self, habit_id: &HabitId, date: LogDate) -> Result<Option<HabitLog>, StorageError> {
        let log = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM habit_logs WHERE habit_id = ?1 AND date = ?2",
                    LOG_COLUMNS
                ),
                params![habit_id.to_string(), date.to_string()],
                Self::log_from_row,
            )
            .optional()?;
        Ok(log)
    }

    fn get_logs_for_habit(
        &self,
        habit_id: &HabitId,
        limit: Option<u32>,
    ) -> Result<Vec<HabitLog>, StorageError> {
        // A negative LIMIT means no limit in SQLite
        let limit = limit.map_or(-1, i64::from);
        self.query_logs(
            &format!(
                "SELECT {} FROM habit_logs WHERE habit_id = ?1 ORDER BY date DESC LIMIT ?2",
                LOG_COLUMNS
            ),
            params![habit_id.to_string(), limit],
        )
    }

    fn get_logs_by_date_range(
        &self,
        start: LogDate,
        end: LogDate,
    ) -> Result<Vec<HabitLog>, StorageError> {
        self.query_logs(
            &format!(
                "SELECT {} FROM habit_logs WHERE date BETWEEN ?1 AND ?2 ORDER BY date DESC",
                LOG_COLUMNS
            ),
            params![start.to_string(), end.to_string()],
        )
    }

    fn get_all_logs(&self) -> Result<Vec<HabitLog>, StorageError> {
        self.query_logs(
            &format!("SELECT {} FROM habit_logs ORDER BY date DESC", LOG_COLUMNS),
            [],
        )
    }

    fn update_cached_streaks(
        &self,
        habit_id: &HabitId,
        current_streak: u32,
        longest_streak: u32,
    ) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET current_streak = ?2, longest_streak = ?3, updated_at = ?4 WHERE id = ?1",
            params![
                habit_id.to_string(),
                current_streak,
                longest_streak,
                Utc::now().to_rfc3339(),
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tracing::debug!(
            "Cached streaks for habit {}: current {}, longest {}",
            habit_id,
            current_streak,
            longest_streak
        );
        Ok(())
    }
}
