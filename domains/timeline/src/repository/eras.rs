//! Era repository

use crate::domain::entities::Era;
use chronochem_common::{Pagination, RepositoryError, Result};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct EraRepository {
    pool: PgPool,
}

impl EraRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find era by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<Era>> {
        let era = sqlx::query_as::<_, Era>(
            r#"
            SELECT id, name, year, description, model_url, soundtrack_url,
                   created_at, updated_at
            FROM eras
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(era)
    }

    /// List eras in timeline order
    pub async fn list(&self, page: Pagination) -> Result<Vec<Era>> {
        let eras = sqlx::query_as::<_, Era>(
            r#"
            SELECT id, name, year, description, model_url, soundtrack_url,
                   created_at, updated_at
            FROM eras
            ORDER BY year ASC, name ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(eras)
    }

    pub async fn create(&self, era: &Era) -> Result<Era> {
        let created = sqlx::query_as::<_, Era>(
            r#"
            INSERT INTO eras (
                id, name, year, description, model_url, soundtrack_url,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, year, description, model_url, soundtrack_url,
                      created_at, updated_at
            "#,
        )
        .bind(era.id)
        .bind(&era.name)
        .bind(era.year)
        .bind(&era.description)
        .bind(&era.model_url)
        .bind(&era.soundtrack_url)
        .bind(era.created_at)
        .bind(era.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(created)
    }

    /// Overwrite every editable column; `None` when the era is gone
    pub async fn update(&self, era: &Era) -> Result<Option<Era>> {
        let updated = sqlx::query_as::<_, Era>(
            r#"
            UPDATE eras SET
                name = $2,
                year = $3,
                description = $4,
                model_url = $5,
                soundtrack_url = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, year, description, model_url, soundtrack_url,
                      created_at, updated_at
            "#,
        )
        .bind(era.id)
        .bind(&era.name)
        .bind(era.year)
        .bind(&era.description)
        .bind(&era.model_url)
        .bind(&era.soundtrack_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(updated)
    }

    /// Delete an era; its chemists and events go with it
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM eras WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
