//! User feedback repository

use crate::domain::entities::UserFeedback;
use chronochem_common::{Pagination, RepositoryError, Result};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct FeedbackRepository {
    pool: PgPool,
}

impl FeedbackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<UserFeedback>> {
        let feedback = sqlx::query_as::<_, UserFeedback>(
            r#"
            SELECT id, chemist_id, user_id, rating, comment, created_at
            FROM user_feedback
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(feedback)
    }

    /// Newest feedback first, optionally for one chemist
    pub async fn list(&self, chemist_id: Option<Uuid>, page: Pagination) -> Result<Vec<UserFeedback>> {
        let feedback = sqlx::query_as::<_, UserFeedback>(
            r#"
            SELECT id, chemist_id, user_id, rating, comment, created_at
            FROM user_feedback
            WHERE ($1::uuid IS NULL OR chemist_id = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(chemist_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(feedback)
    }

    pub async fn create(&self, feedback: &UserFeedback) -> Result<UserFeedback> {
        let created = sqlx::query_as::<_, UserFeedback>(
            r#"
            INSERT INTO user_feedback (id, chemist_id, user_id, rating, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, chemist_id, user_id, rating, comment, created_at
            "#,
        )
        .bind(feedback.id)
        .bind(feedback.chemist_id)
        .bind(feedback.user_id)
        .bind(feedback.rating)
        .bind(&feedback.comment)
        .bind(feedback.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(created)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM user_feedback WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
