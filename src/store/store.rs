use super::models::{Message, NewMessage, Role, Session};
use crate::error::ApiError;
use anyhow::Context;
use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// SQLite-backed store for sessions and their messages.
///
/// All multi-row logical operations (append + session bump, user/assistant
/// pair) run inside a single transaction so a crash cannot leave a session's
/// `updated_at` inconsistent with its messages.
pub struct ChatStore {
    conn: Arc<Mutex<Connection>>,
}

impl ChatStore {
    pub fn open(db_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path).context("failed to open SQLite database")?;

        // WAL mode: concurrent reads during writes, crash-safe
        // foreign_keys: required for ON DELETE CASCADE to fire
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             PRAGMA foreign_keys = ON;",
        )?;

        Self::init_schema(&conn)?;
        info!("Chat store opened at {}", db_path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn init_schema(conn: &Connection) -> anyhow::Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                created_at  INTEGER NOT NULL,
                updated_at  INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS messages (
                id          TEXT PRIMARY KEY,
                session_id  TEXT NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
                content     TEXT NOT NULL,
                role        TEXT NOT NULL,
                timestamp   INTEGER NOT NULL,
                image_path  TEXT,
                audio_path  TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_messages_session
                ON messages(session_id, timestamp);",
        )?;
        Ok(())
    }

    fn now_ms() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ── Sessions ────────────────────────────────────────────────

    pub fn create_session(&self, name: &str) -> Result<Session, ApiError> {
        let now = Self::now_ms();
        let session = Session {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO sessions (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![session.id, session.name, session.created_at, session.updated_at],
        )?;

        info!("Created session {} ({})", session.id, session.name);
        Ok(session)
    }

    /// All sessions, most recently active first.
    pub fn list_sessions(&self) -> Result<Vec<Session>, ApiError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, created_at, updated_at FROM sessions ORDER BY updated_at DESC",
        )?;
        let sessions = stmt
            .query_map([], Self::session_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sessions)
    }

    pub fn get_session(&self, session_id: &str) -> Result<Option<Session>, ApiError> {
        let conn = self.conn.lock();
        let session = conn
            .query_row(
                "SELECT id, name, created_at, updated_at FROM sessions WHERE id = ?1",
                params![session_id],
                Self::session_from_row,
            )
            .optional()?;
        Ok(session)
    }

    pub fn rename_session(&self, session_id: &str, name: &str) -> Result<(), ApiError> {
        let conn = self.conn.lock();
        let changed = conn.execute(
            "UPDATE sessions SET name = ?1, updated_at = ?2 WHERE id = ?3",
            params![name, Self::now_ms(), session_id],
        )?;
        if changed == 0 {
            return Err(ApiError::not_found(format!("Session {} not found", session_id)));
        }
        Ok(())
    }

    /// Delete a session; its messages go with it (ON DELETE CASCADE).
    pub fn delete_session(&self, session_id: &str) -> Result<(), ApiError> {
        let conn = self.conn.lock();
        let changed = conn.execute("DELETE FROM sessions WHERE id = ?1", params![session_id])?;
        if changed == 0 {
            return Err(ApiError::not_found(format!("Session {} not found", session_id)));
        }
        info!("Deleted session {}", session_id);
        Ok(())
    }

    // ── Messages ────────────────────────────────────────────────

    /// Append one message and bump the owning session's `updated_at`,
    /// atomically.
    pub fn append_message(
        &self,
        session_id: &str,
        role: Role,
        new: NewMessage,
    ) -> Result<Message, ApiError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        Self::require_session(&tx, session_id)?;

        let message = Self::insert_message(&tx, session_id, role, new, Self::now_ms())?;
        Self::bump_session(&tx, session_id, message.timestamp)?;

        tx.commit()?;
        Ok(message)
    }

    /// Persist a user message and its assistant reply as one transaction.
    ///
    /// The assistant row gets the user timestamp + 1 so the pair never ties
    /// in timestamp order; the session bump uses the later of the two.
    pub fn append_turn(
        &self,
        session_id: &str,
        user: NewMessage,
        assistant_content: &str,
    ) -> Result<(Message, Message), ApiError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        Self::require_session(&tx, session_id)?;

        let now = Self::now_ms();
        let user_message = Self::insert_message(&tx, session_id, Role::User, user, now)?;
        let assistant_message = Self::insert_message(
            &tx,
            session_id,
            Role::Assistant,
            NewMessage::text(assistant_content),
            now + 1,
        )?;
        Self::bump_session(&tx, session_id, now + 1)?;

        tx.commit()?;
        Ok((user_message, assistant_message))
    }

    /// Messages of a session in ascending timestamp order.
    pub fn list_messages(&self, session_id: &str) -> Result<Vec<Message>, ApiError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, session_id, content, role, timestamp, image_path, audio_path
             FROM messages WHERE session_id = ?1 ORDER BY timestamp ASC",
        )?;
        let messages = stmt
            .query_map(params![session_id], Self::message_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(messages)
    }

    pub fn delete_message(&self, session_id: &str, message_id: &str) -> Result<(), ApiError> {
        let conn = self.conn.lock();
        let changed = conn.execute(
            "DELETE FROM messages WHERE id = ?1 AND session_id = ?2",
            params![message_id, session_id],
        )?;
        if changed == 0 {
            return Err(ApiError::not_found(format!("Message {} not found", message_id)));
        }
        Ok(())
    }

    /// Delete every message of a session while keeping the session itself.
    pub fn clear_messages(&self, session_id: &str) -> Result<(), ApiError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        Self::require_session(&tx, session_id)?;
        tx.execute("DELETE FROM messages WHERE session_id = ?1", params![session_id])?;

        tx.commit()?;
        info!("Cleared messages in session {}", session_id);
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────

    fn require_session(tx: &Transaction<'_>, session_id: &str) -> Result<(), ApiError> {
        let exists = tx
            .query_row(
                "SELECT 1 FROM sessions WHERE id = ?1",
                params![session_id],
                |_| Ok(()),
            )
            .optional()?;
        if exists.is_none() {
            return Err(ApiError::not_found(format!("Session {} not found", session_id)));
        }
        Ok(())
    }

    fn insert_message(
        tx: &Transaction<'_>,
        session_id: &str,
        role: Role,
        new: NewMessage,
        timestamp: i64,
    ) -> Result<Message, ApiError> {
        let message = Message {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            content: new.content,
            role,
            timestamp,
            image_path: new.image_path,
            audio_path: new.audio_path,
        };
        tx.execute(
            "INSERT INTO messages (id, session_id, content, role, timestamp, image_path, audio_path)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                message.id,
                message.session_id,
                message.content,
                message.role.as_str(),
                message.timestamp,
                message.image_path,
                message.audio_path,
            ],
        )?;
        Ok(message)
    }

    /// `updated_at` only ever moves forward: max(current, newest timestamp).
    fn bump_session(
        tx: &Transaction<'_>,
        session_id: &str,
        timestamp: i64,
    ) -> Result<(), ApiError> {
        tx.execute(
            "UPDATE sessions SET updated_at = MAX(updated_at, ?1) WHERE id = ?2",
            params![timestamp, session_id],
        )?;
        Ok(())
    }

    fn session_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Session> {
        Ok(Session {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
        })
    }

    fn message_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
        let role_str: String = row.get(3)?;
        let role = Role::parse(&role_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                rusqlite::types::Type::Text,
                format!("unknown role: {}", role_str).into(),
            )
        })?;
        Ok(Message {
            id: row.get(0)?,
            session_id: row.get(1)?,
            content: row.get(2)?,
            role,
            timestamp: row.get(4)?,
            image_path: row.get(5)?,
            audio_path: row.get(6)?,
        })
    }
}
