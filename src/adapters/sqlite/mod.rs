//! SQLite adapter: Implementation of Storage.
//!
//! Provides local persistence for the profile, assessment history, chat
//! history, gamification state and the audit log.
//!
//! Structured values (metrics, assessments, achievement lists) are stored as
//! JSON text next to the columns the dashboard filters or sorts on.
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{AuditAction, AuditEntry, ChatTurn, GamificationState, Mood, UserProfile, UserRole};
use crate::ports::{AssessmentSnapshot, Storage};

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database connection lock poisoned")]
    LockPoisoned,
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// SQLite storage adapter.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    /// Returns error if database cannot be opened or initialized.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Create an in-memory SQLite database (for testing).
    ///
    /// # Errors
    /// Returns error if database cannot be created.
    pub fn in_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init_schema()?;
        Ok(storage)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<(), StorageError> {
        let conn = self.conn()?;

        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS profile (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                user_id TEXT NOT NULL,
                display_name TEXT NOT NULL,
                role TEXT NOT NULL,
                metrics_json TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS assessments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                overall_risk INTEGER NOT NULL,
                assessment_json TEXT NOT NULL,
                assessed_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS chat_turns (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_text TEXT NOT NULL,
                assistant_text TEXT NOT NULL,
                mood TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS gamification (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                streak INTEGER NOT NULL,
                points INTEGER NOT NULL,
                level INTEGER NOT NULL,
                achievements_json TEXT NOT NULL,
                last_action_date TEXT
            );

            CREATE TABLE IF NOT EXISTS audit_log (
                sequence INTEGER PRIMARY KEY,
                action TEXT NOT NULL,
                actor TEXT NOT NULL,
                payload TEXT NOT NULL,
                recorded_at TEXT NOT NULL,
                prev_hash TEXT NOT NULL,
                hash TEXT NOT NULL
            );
            ",
        )?;

        Ok(())
    }

    fn role_to_string(role: UserRole) -> &'static str {
        match role {
            UserRole::Patient => "patient",
            UserRole::Provider => "provider",
        }
    }

    fn string_to_role(s: &str) -> UserRole {
        match s {
            "provider" => UserRole::Provider,
            _ => UserRole::Patient,
        }
    }
}

/// Parse an RFC 3339 column, surfacing bad values as conversion errors.
fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_audit_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<AuditEntry> {
    let sequence: i64 = row.get(0)?;
    let action_str: String = row.get(1)?;
    let recorded_at_str: String = row.get(4)?;

    let action = AuditAction::from_label(&action_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            Type::Text,
            format!("unknown audit action {action_str}").into(),
        )
    })?;

    Ok(AuditEntry {
        sequence: sequence as u64,
        action,
        actor: row.get(2)?,
        payload: row.get(3)?,
        recorded_at: parse_timestamp(4, &recorded_at_str)?,
        prev_hash: row.get(5)?,
        hash: row.get(6)?,
    })
}

const AUDIT_COLUMNS: &str = "sequence, action, actor, payload, recorded_at, prev_hash, hash";

impl Storage for SqliteStorage {
    type Error = StorageError;

    fn save_profile(&self, profile: &UserProfile) -> Result<(), Self::Error> {
        let metrics_json = serde_json::to_string(&profile.metrics)?;
        let conn = self.conn()?;

        conn.execute(
            r"
            INSERT OR REPLACE INTO profile (
                id, user_id, display_name, role, metrics_json, created_at
            ) VALUES (1, ?1, ?2, ?3, ?4, ?5)
            ",
            params![
                profile.id,
                profile.display_name,
                Self::role_to_string(profile.role),
                metrics_json,
                profile.created_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!("Saved profile to storage");
        Ok(())
    }

    fn load_profile(&self) -> Result<Option<UserProfile>, Self::Error> {
        let conn = self.conn()?;

        let row = conn
            .query_row(
                "SELECT user_id, display_name, role, metrics_json, created_at FROM profile WHERE id = 1",
                [],
                |row| {
                    let role_str: String = row.get(2)?;
                    let created_at_str: String = row.get(4)?;
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        Self::string_to_role(&role_str),
                        row.get::<_, String>(3)?,
                        parse_timestamp(4, &created_at_str)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, display_name, role, metrics_json, created_at)) = row else {
            return Ok(None);
        };

        Ok(Some(UserProfile {
            id,
            display_name,
            role,
            metrics: serde_json::from_str(&metrics_json)?,
            created_at,
        }))
    }

    fn save_assessment(&self, snapshot: &AssessmentSnapshot) -> Result<(), Self::Error> {
        let json = serde_json::to_string(&snapshot.assessment)?;
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO assessments (overall_risk, assessment_json, assessed_at) VALUES (?1, ?2, ?3)",
            params![
                i64::from(snapshot.assessment.overall_risk),
                json,
                snapshot.assessed_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!(
            "Saved assessment (overall {}) to storage",
            snapshot.assessment.overall_risk
        );
        Ok(())
    }

    fn load_recent_assessments(&self, limit: usize) -> Result<Vec<AssessmentSnapshot>, Self::Error> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r"
            SELECT assessment_json, assessed_at
            FROM assessments
            ORDER BY id DESC
            LIMIT ?1
            ",
        )?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                let json: String = row.get(0)?;
                let assessed_at_str: String = row.get(1)?;
                Ok((json, parse_timestamp(1, &assessed_at_str)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(json, assessed_at)| -> Result<AssessmentSnapshot, StorageError> {
                Ok(AssessmentSnapshot {
                    assessed_at,
                    assessment: serde_json::from_str(&json)?,
                })
            })
            .collect()
    }

    fn append_chat_turn(&self, turn: &ChatTurn) -> Result<(), Self::Error> {
        let conn = self.conn()?;

        conn.execute(
            r"
            INSERT INTO chat_turns (user_text, assistant_text, mood, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ",
            params![
                turn.user_text,
                turn.assistant_text,
                turn.mood.as_str(),
                turn.timestamp.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn load_recent_chat_turns(&self, limit: usize) -> Result<Vec<ChatTurn>, Self::Error> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r"
            SELECT user_text, assistant_text, mood, created_at
            FROM chat_turns
            ORDER BY id DESC
            LIMIT ?1
            ",
        )?;

        let mut turns = stmt
            .query_map(params![limit as i64], |row| {
                let mood_str: String = row.get(2)?;
                let created_at_str: String = row.get(3)?;
                Ok(ChatTurn {
                    user_text: row.get(0)?,
                    assistant_text: row.get(1)?,
                    mood: Mood::from_label(&mood_str),
                    timestamp: parse_timestamp(3, &created_at_str)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        turns.reverse();
        Ok(turns)
    }

    fn save_gamification(&self, state: &GamificationState) -> Result<(), Self::Error> {
        let achievements_json = serde_json::to_string(&state.achievements)?;
        let conn = self.conn()?;

        conn.execute(
            r"
            INSERT OR REPLACE INTO gamification (
                id, streak, points, level, achievements_json, last_action_date
            ) VALUES (1, ?1, ?2, ?3, ?4, ?5)
            ",
            params![
                i64::from(state.streak),
                i64::from(state.points),
                i64::from(state.level),
                achievements_json,
                state.last_action_date.map(|d| d.to_string()),
            ],
        )?;

        Ok(())
    }

    fn load_gamification(&self) -> Result<Option<GamificationState>, Self::Error> {
        let conn = self.conn()?;

        let row = conn
            .query_row(
                "SELECT streak, points, level, achievements_json, last_action_date FROM gamification WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, Option<String>>(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((streak, points, level, achievements_json, last_date)) = row else {
            return Ok(None);
        };

        let last_action_date = last_date
            .map(|d| d.parse::<NaiveDate>())
            .transpose()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        Ok(Some(GamificationState {
            streak: streak as u32,
            achievements: serde_json::from_str(&achievements_json)?,
            points: points as u32,
            level: level as u32,
            last_action_date,
        }))
    }

    fn append_audit_entry(&self, entry: &AuditEntry) -> Result<(), Self::Error> {
        let conn = self.conn()?;

        // Plain INSERT: a duplicate sequence is a primary-key violation.
        conn.execute(
            r"
            INSERT INTO audit_log (sequence, action, actor, payload, recorded_at, prev_hash, hash)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
            params![
                entry.sequence as i64,
                entry.action.as_str(),
                entry.actor,
                entry.payload,
                entry.recorded_at.to_rfc3339(),
                entry.prev_hash,
                entry.hash,
            ],
        )?;

        tracing::debug!("Appended audit entry #{} ({})", entry.sequence, entry.action);
        Ok(())
    }

    fn load_audit_entries(&self) -> Result<Vec<AuditEntry>, Self::Error> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {AUDIT_COLUMNS} FROM audit_log ORDER BY sequence ASC"
        ))?;

        let entries = stmt
            .query_map([], row_to_audit_entry)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    fn last_audit_entry(&self) -> Result<Option<AuditEntry>, Self::Error> {
        let conn = self.conn()?;

        let entry = conn
            .query_row(
                &format!("SELECT {AUDIT_COLUMNS} FROM audit_log ORDER BY sequence DESC LIMIT 1"),
                [],
                row_to_audit_entry,
            )
            .optional()?;

        Ok(entry)
    }

    fn clear_all(&self) -> Result<(), Self::Error> {
        let conn = self.conn()?;
        conn.execute_batch(
            r"
            DELETE FROM profile;
            DELETE FROM assessments;
            DELETE FROM chat_turns;
            DELETE FROM gamification;
            DELETE FROM audit_log;
            ",
        )?;
        tracing::warn!("Cleared all data from storage");
        Ok(())
    }
}
