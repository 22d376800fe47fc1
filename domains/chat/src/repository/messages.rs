//! Chat message repository

use crate::domain::entities::ChatMessage;
use chronochem_common::{RepositoryError, Result};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The `limit` newest turns of a chemist, newest first
    pub async fn recent(&self, chemist_id: Uuid, limit: i64) -> Result<Vec<ChatMessage>> {
        let messages = sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT id, chemist_id, role, content, timestamp, user_id
            FROM chat_messages
            WHERE chemist_id = $1
            ORDER BY timestamp DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(chemist_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Full transcript of a chemist, oldest first
    pub async fn list_by_chemist(&self, chemist_id: Uuid) -> Result<Vec<ChatMessage>> {
        let messages = sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT id, chemist_id, role, content, timestamp, user_id
            FROM chat_messages
            WHERE chemist_id = $1
            ORDER BY timestamp ASC, id ASC
            "#,
        )
        .bind(chemist_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    pub async fn create(&self, msg: &ChatMessage) -> Result<ChatMessage> {
        let created = sqlx::query_as::<_, ChatMessage>(
            r#"
            INSERT INTO chat_messages (id, chemist_id, role, content, timestamp, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, chemist_id, role, content, timestamp, user_id
            "#,
        )
        .bind(msg.id)
        .bind(msg.chemist_id)
        .bind(msg.role)
        .bind(&msg.content)
        .bind(msg.timestamp)
        .bind(msg.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(created)
    }

    /// Delete every turn of one chemist
    pub async fn delete_by_chemist(&self, chemist_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM chat_messages WHERE chemist_id = $1")
            .bind(chemist_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
