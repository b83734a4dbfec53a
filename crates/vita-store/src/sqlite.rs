//! SQLite-backed user store.
//!
//! One connection behind a mutex; per-user writes are already serialized by
//! the session, so this only guards connection-level safety. Structured
//! fields (pain points, challenge progress) live in JSON columns, and every
//! timestamp is stored as RFC 3339 text.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use vita_core::store::UserStore;
use vita_core::{
    ActivityLog, Assessment, Challenge, ChallengeProgress, ChallengeStatus, ChatTurn, Error,
    MetricSnapshot, Role, StressLog, UserId, UserProfile, WeightLog,
};

pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = db_path.into();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::storage(format!("failed to create directory: {e}")))?;
        }

        let conn = Connection::open(&path)
            .map_err(|e| Error::storage(format!("failed to open database: {e}")))?;
        init_schema(&conn)?;
        debug!(path = %path.display(), "opened database");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::storage(format!("failed to create in-memory database: {e}")))?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn init_schema(conn: &Connection) -> Result<(), Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS assessments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id),
            date TEXT NOT NULL,
            stress_score INTEGER NOT NULL CHECK (stress_score BETWEEN 0 AND 10),
            bmi REAL NOT NULL,
            activity_level TEXT NOT NULL,
            physical_score INTEGER NOT NULL,
            pain_points TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS weight_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id),
            date TEXT NOT NULL,
            weight REAL NOT NULL CHECK (weight > 0)
        );
        CREATE TABLE IF NOT EXISTS stress_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id),
            date TEXT NOT NULL,
            stress_score INTEGER NOT NULL CHECK (stress_score BETWEEN 0 AND 10)
        );
        CREATE TABLE IF NOT EXISTS activities (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id),
            date TEXT NOT NULL,
            activity_type TEXT NOT NULL,
            duration INTEGER NOT NULL CHECK (duration > 0)
        );
        CREATE TABLE IF NOT EXISTS challenges (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id),
            challenge_name TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'active',
            progress TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS chat_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id),
            role TEXT NOT NULL,
            content TEXT NOT NULL,
            timestamp TEXT NOT NULL
        );",
    )
    .map_err(|e| Error::storage(format!("failed to create tables: {e}")))
}

fn storage(e: rusqlite::Error) -> Error {
    Error::storage(e.to_string())
}

fn parse_timestamp(raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Decode a stored enum column through its FromStr impl.
fn parse_field<T>(raw: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse().map_err(|e: T::Err| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_json<T: serde::de::DeserializeOwned>(raw: &str) -> rusqlite::Result<T> {
    serde_json::from_str(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

impl UserStore for SqliteStore {
    fn create_user(&self, name: &str, email: &str) -> Result<UserId, Error> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO users (name, email, created_at) VALUES (?, ?, ?)",
            params![name, email, Utc::now().to_rfc3339()],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Error::storage(format!("email already registered: {email}"))
            }
            other => storage(other),
        })?;
        Ok(conn.last_insert_rowid())
    }

    fn user_by_email(&self, email: &str) -> Result<Option<UserProfile>, Error> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT id, name, email, created_at FROM users WHERE email = ?",
            params![email],
            |row| {
                Ok(UserProfile {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    created_at: parse_timestamp(&row.get::<_, String>(3)?)?,
                })
            },
        )
        .optional()
        .map_err(storage)
    }

    fn profile(&self, user: UserId) -> Result<Option<UserProfile>, Error> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT id, name, email, created_at FROM users WHERE id = ?",
            params![user],
            |row| {
                Ok(UserProfile {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    created_at: parse_timestamp(&row.get::<_, String>(3)?)?,
                })
            },
        )
        .optional()
        .map_err(storage)
    }

    fn save_assessment(&self, user: UserId, assessment: &Assessment) -> Result<(), Error> {
        let pain_points = serde_json::to_string(&assessment.pain_points)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO assessments
             (user_id, date, stress_score, bmi, activity_level, physical_score, pain_points)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                user,
                assessment.timestamp.to_rfc3339(),
                assessment.stress_score,
                assessment.bmi,
                assessment.activity_level.to_string(),
                assessment.physical_score,
                pain_points,
            ],
        )
        .map_err(storage)?;
        Ok(())
    }

    fn log_weight(&self, user: UserId, entry: &WeightLog) -> Result<(), Error> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO weight_logs (user_id, date, weight) VALUES (?, ?, ?)",
            params![user, entry.timestamp.to_rfc3339(), entry.weight_kg],
        )
        .map_err(storage)?;
        Ok(())
    }

    fn log_stress(&self, user: UserId, entry: &StressLog) -> Result<(), Error> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO stress_logs (user_id, date, stress_score) VALUES (?, ?, ?)",
            params![user, entry.timestamp.to_rfc3339(), entry.score],
        )
        .map_err(storage)?;
        Ok(())
    }

    fn log_activity(&self, user: UserId, entry: &ActivityLog) -> Result<(), Error> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO activities (user_id, date, activity_type, duration) VALUES (?, ?, ?, ?)",
            params![
                user,
                entry.timestamp.to_rfc3339(),
                entry.kind.to_string(),
                entry.minutes,
            ],
        )
        .map_err(storage)?;
        Ok(())
    }

    fn metrics(&self, user: UserId) -> Result<MetricSnapshot, Error> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare(
                "SELECT date, stress_score, bmi, activity_level, physical_score, pain_points
                 FROM assessments WHERE user_id = ? ORDER BY date DESC, id DESC",
            )
            .map_err(storage)?;
        let assessments = stmt
            .query_map(params![user], |row| {
                Ok(Assessment {
                    timestamp: parse_timestamp(&row.get::<_, String>(0)?)?,
                    stress_score: row.get(1)?,
                    bmi: row.get(2)?,
                    activity_level: parse_field(&row.get::<_, String>(3)?)?,
                    physical_score: row.get(4)?,
                    pain_points: parse_json(&row.get::<_, String>(5)?)?,
                })
            })
            .map_err(storage)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage)?;

        let mut stmt = conn
            .prepare(
                "SELECT date, weight FROM weight_logs
                 WHERE user_id = ? ORDER BY date DESC, id DESC",
            )
            .map_err(storage)?;
        let weight_logs = stmt
            .query_map(params![user], |row| {
                Ok(WeightLog {
                    timestamp: parse_timestamp(&row.get::<_, String>(0)?)?,
                    weight_kg: row.get(1)?,
                })
            })
            .map_err(storage)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage)?;

        let mut stmt = conn
            .prepare(
                "SELECT date, stress_score FROM stress_logs
                 WHERE user_id = ? ORDER BY date DESC, id DESC",
            )
            .map_err(storage)?;
        let stress_logs = stmt
            .query_map(params![user], |row| {
                Ok(StressLog {
                    timestamp: parse_timestamp(&row.get::<_, String>(0)?)?,
                    score: row.get(1)?,
                })
            })
            .map_err(storage)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage)?;

        let mut stmt = conn
            .prepare(
                "SELECT date, activity_type, duration FROM activities
                 WHERE user_id = ? ORDER BY date DESC, id DESC",
            )
            .map_err(storage)?;
        let activity_logs = stmt
            .query_map(params![user], |row| {
                Ok(ActivityLog {
                    timestamp: parse_timestamp(&row.get::<_, String>(0)?)?,
                    kind: parse_field(&row.get::<_, String>(1)?)?,
                    minutes: row.get(2)?,
                })
            })
            .map_err(storage)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage)?;

        Ok(MetricSnapshot {
            assessments,
            weight_logs,
            stress_logs,
            activity_logs,
        })
    }

    fn start_challenge(
        &self,
        user: UserId,
        name: &str,
        start: DateTime<Utc>,
        duration_days: u32,
    ) -> Result<i64, Error> {
        let end = start + Duration::days(duration_days as i64);
        let progress = serde_json::to_string(&ChallengeProgress::default())?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO challenges (user_id, challenge_name, start_date, end_date, status, progress)
             VALUES (?, ?, ?, ?, 'active', ?)",
            params![user, name, start.to_rfc3339(), end.to_rfc3339(), progress],
        )
        .map_err(storage)?;
        Ok(conn.last_insert_rowid())
    }

    fn active_challenges(&self, user: UserId) -> Result<Vec<Challenge>, Error> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT id, challenge_name, start_date, end_date, status, progress
                 FROM challenges WHERE user_id = ? AND status = 'active'
                 ORDER BY start_date DESC, id DESC",
            )
            .map_err(storage)?;
        let challenges = stmt
            .query_map(params![user], |row| {
                Ok(Challenge {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    start_date: parse_timestamp(&row.get::<_, String>(2)?)?,
                    end_date: parse_timestamp(&row.get::<_, String>(3)?)?,
                    status: parse_field::<ChallengeStatus>(&row.get::<_, String>(4)?)?,
                    progress: parse_json(&row.get::<_, String>(5)?)?,
                })
            })
            .map_err(storage)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage)?;
        Ok(challenges)
    }

    fn update_challenge_progress(
        &self,
        challenge_id: i64,
        progress: &ChallengeProgress,
    ) -> Result<(), Error> {
        let encoded = serde_json::to_string(progress)?;
        let conn = self.conn.lock().unwrap();
        let rows = conn
            .execute(
                "UPDATE challenges SET progress = ? WHERE id = ?",
                params![encoded, challenge_id],
            )
            .map_err(storage)?;
        if rows == 0 {
            return Err(Error::storage(format!(
                "no challenge with id {challenge_id}"
            )));
        }
        Ok(())
    }

    fn append_chat_turn(&self, user: UserId, turn: &ChatTurn) -> Result<(), Error> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO chat_history (user_id, role, content, timestamp) VALUES (?, ?, ?, ?)",
            params![
                user,
                turn.role.to_string(),
                turn.content,
                turn.timestamp.to_rfc3339(),
            ],
        )
        .map_err(storage)?;
        Ok(())
    }

    fn recent_chat_turns(&self, user: UserId, limit: usize) -> Result<Vec<ChatTurn>, Error> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT role, content, timestamp FROM chat_history
                 WHERE user_id = ? ORDER BY timestamp DESC, id DESC LIMIT ?",
            )
            .map_err(storage)?;
        let turns = stmt
            .query_map(params![user, limit as i64], |row| {
                Ok(ChatTurn {
                    role: parse_field::<Role>(&row.get::<_, String>(0)?)?,
                    content: row.get(1)?,
                    timestamp: parse_timestamp(&row.get::<_, String>(2)?)?,
                })
            })
            .map_err(storage)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage)?;
        Ok(turns)
    }
}
