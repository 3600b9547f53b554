use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::StoreError;
use crate::paths::{data_root, database_path};
use crate::schema::{ConversationSummary, Message, Role, SCHEMA_DDL};

/// SQLite-backed append-only message log partitioned by conversation id,
/// plus the single mutable current-conversation pointer.
///
/// One connection per process invocation. Concurrent invocations racing on
/// the same database file are not coordinated beyond SQLite's own locking.
pub struct ConversationStore {
    conn: Connection,
    path: PathBuf,
}

impl ConversationStore {
    /// Open the store at its default location, creating directory, database
    /// file, and schema as needed.
    pub fn open_default() -> Result<Self, StoreError> {
        let root = data_root();
        Self::open_at(&root)
    }

    pub fn open_at(root: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(root).map_err(|source| StoreError::create_dir(root, source))?;

        let path = database_path(root);
        let conn = Connection::open(&path).map_err(|source| StoreError::open(&path, source))?;
        conn.execute_batch(SCHEMA_DDL)?;

        Ok(Self { conn, path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Allocate a fresh conversation with a collision-resistant random id.
    pub fn create_conversation(&mut self) -> Result<String, StoreError> {
        let now = now_unix_nanos();
        insert_conversation(&self.conn, now)
    }

    /// Append one message.
    ///
    /// Creates a conversation first when `create_new` is set or no id is
    /// given, bumps the conversation's `updated_at`, and makes it current.
    /// Returns the (possibly newly created) conversation id.
    pub fn append_message(
        &mut self,
        conversation_id: Option<&str>,
        role: Role,
        content: &str,
        create_new: bool,
    ) -> Result<String, StoreError> {
        let now = now_unix_nanos();
        let tx = self.conn.transaction()?;

        let conversation_id = match conversation_id {
            Some(id) if !create_new => {
                let changed = tx.execute(
                    "UPDATE conversations SET updated_at = ?1 WHERE id = ?2",
                    params![now, id],
                )?;
                if changed == 0 {
                    return Err(StoreError::UnknownConversation(id.to_owned()));
                }
                id.to_owned()
            }
            _ => insert_conversation(&tx, now)?,
        };

        // Pointer replacement is delete-then-insert so at most one row
        // exists at any time.
        tx.execute("DELETE FROM current_conversation", [])?;
        tx.execute(
            "INSERT INTO current_conversation (conversation_id) VALUES (?1)",
            params![conversation_id],
        )?;

        tx.execute(
            "INSERT INTO messages (id, conversation_id, role, content, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                Uuid::new_v4().to_string(),
                conversation_id,
                role.as_str(),
                content,
                now
            ],
        )?;

        tx.commit()?;
        Ok(conversation_id)
    }

    /// The most recently set pointer, or `None` if none has ever been set.
    pub fn current_conversation_id(&self) -> Result<Option<String>, StoreError> {
        let id = self
            .conn
            .query_row(
                "SELECT conversation_id FROM current_conversation LIMIT 1",
                [],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(id)
    }

    /// All messages of a conversation in append order.
    pub fn conversation_messages(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<Message>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, conversation_id, role, content, created_at \
             FROM messages WHERE conversation_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![conversation_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?;

        let mut messages = Vec::new();
        for row in rows {
            let (id, conversation_id, role, content, created_at) = row?;
            let role = Role::parse(&role).ok_or_else(|| StoreError::UnknownRole {
                id: id.clone(),
                role: role.clone(),
            })?;
            messages.push(Message {
                id,
                conversation_id,
                role,
                content,
                created_at: format_rfc3339(created_at)?,
            });
        }

        Ok(messages)
    }

    /// All conversations, most recently updated first.
    pub fn list_conversations(&self) -> Result<Vec<ConversationSummary>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, updated_at FROM conversations ORDER BY updated_at DESC, rowid DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (id, updated_at) = row?;
            summaries.push(ConversationSummary {
                id,
                updated_at: format_rfc3339(updated_at)?,
            });
        }

        Ok(summaries)
    }
}

fn insert_conversation(conn: &Connection, now: i64) -> Result<String, StoreError> {
    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO conversations (id, created_at, updated_at) VALUES (?1, ?2, ?2)",
        params![id, now],
    )?;
    Ok(id)
}

// Nanosecond precision keeps `updated_at` ordering unambiguous across
// appends landing within the same second.
fn now_unix_nanos() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    i64::try_from(nanos).unwrap_or(i64::MAX)
}

fn format_rfc3339(unix_nanos: i64) -> Result<String, StoreError> {
    let timestamp = OffsetDateTime::from_unix_timestamp_nanos(i128::from(unix_nanos))
        .map_err(|_| StoreError::TimestampRange(unix_nanos))?;
    timestamp.format(&Rfc3339).map_err(StoreError::ClockFormat)
}
