//! SQLite-backed implementation of the ChatMessageRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use memora_core::ChatMessageRepository;
use memora_domain::{ChatMessage, ChatRole, MemoraError, Result};
use rusqlite::{Row, ToSql};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::manager::DbManager;
use crate::errors::InfraError;

/// SQLite implementation of ChatMessageRepository
pub struct SqliteChatMessageRepository {
    db: Arc<DbManager>,
}

impl SqliteChatMessageRepository {
    /// Create a new chat message repository
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ChatMessageRepository for SqliteChatMessageRepository {
    #[instrument(skip(self, content), fields(owner_id))]
    async fn save_message(
        &self,
        owner_id: &str,
        role: ChatRole,
        content: &str,
    ) -> Result<ChatMessage> {
        let conn = self.db.get_connection()?;

        let message = ChatMessage {
            id: Uuid::now_v7().to_string(),
            owner_id: owner_id.to_string(),
            role,
            content: content.to_string(),
            created_at: Utc::now().timestamp(),
        };

        conn.execute(
            "INSERT INTO chat_messages (id, owner_id, role, content, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            [
                &message.id as &dyn ToSql,
                &message.owner_id,
                &message.role.as_str(),
                &message.content,
                &message.created_at,
            ]
            .as_ref(),
        )
        .map_err(InfraError::from)?;

        debug!(owner_id, message_id = %message.id, role = message.role.as_str(), "saved chat message");

        Ok(message)
    }

    #[instrument(skip(self), fields(owner_id, limit))]
    async fn recent_messages(&self, owner_id: &str, limit: usize) -> Result<Vec<ChatMessage>> {
        let conn = self.db.get_connection()?;

        let mut stmt = conn
            .prepare(
                "SELECT id, owner_id, role, content, created_at
                 FROM chat_messages
                 WHERE owner_id = ?1
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?2",
            )
            .map_err(InfraError::from)?;

        let mut rows = stmt
            .query_map([&owner_id as &dyn ToSql, &(limit as i64)].as_ref(), map_message_row)
            .map_err(InfraError::from)?
            .collect::<std::result::Result<Vec<ChatMessage>, _>>()
            .map_err(InfraError::from)?;

        // Stored newest-first for the LIMIT; callers want chronological order.
        rows.reverse();

        debug!(owner_id, count = rows.len(), "loaded recent chat messages");

        Ok(rows)
    }
}

fn map_message_row(row: &Row<'_>) -> rusqlite::Result<ChatMessage> {
    let role_text: String = row.get(2)?;
    let role = ChatRole::parse(&role_text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            Box::new(MemoraError::Persistence(format!("unknown chat role '{role_text}'"))),
        )
    })?;

    Ok(ChatMessage {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        role,
        content: row.get(3)?,
        created_at: row.get(4)?,
    })
}
