//! Chemist repository

use crate::domain::entities::Chemist;
use chronochem_common::{Pagination, RepositoryError, Result};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Optional list filters for chemists
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChemistFilter {
    /// Only chemists of this era
    pub era: Option<Uuid>,
    /// Case-insensitive match on name or description
    pub search: Option<String>,
}

impl ChemistFilter {
    /// ILIKE pattern matching the search text literally anywhere in a value
    fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|term| format!("%{}%", escape_like(term)))
    }
}

/// Escape LIKE metacharacters; backslash is the default escape character
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Clone)]
pub struct ChemistRepository {
    pool: PgPool,
}

impl ChemistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find chemist by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<Chemist>> {
        let chemist = sqlx::query_as::<_, Chemist>(
            r#"
            SELECT id, era_id, name, birth_year, death_year, description, bio,
                   position_x, position_y, position_z, portrait_path, model_path,
                   created_at, updated_at
            FROM chemists
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(chemist)
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM chemists WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// List chemists ordered by birth year
    pub async fn list(&self, filter: &ChemistFilter, page: Pagination) -> Result<Vec<Chemist>> {
        let chemists = sqlx::query_as::<_, Chemist>(
            r#"
            SELECT id, era_id, name, birth_year, death_year, description, bio,
                   position_x, position_y, position_z, portrait_path, model_path,
                   created_at, updated_at
            FROM chemists
            WHERE ($1::uuid IS NULL OR era_id = $1)
              AND ($2::text IS NULL
                   OR name ILIKE $2
                   OR description ILIKE $2)
            ORDER BY birth_year ASC, name ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filter.era)
        .bind(filter.search_pattern())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(chemists)
    }

    /// All chemists of an era, for the era detail view
    pub async fn list_by_era(&self, era_id: Uuid) -> Result<Vec<Chemist>> {
        let chemists = sqlx::query_as::<_, Chemist>(
            r#"
            SELECT id, era_id, name, birth_year, death_year, description, bio,
                   position_x, position_y, position_z, portrait_path, model_path,
                   created_at, updated_at
            FROM chemists
            WHERE era_id = $1
            ORDER BY birth_year ASC, name ASC
            "#,
        )
        .bind(era_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(chemists)
    }

    pub async fn create(&self, chemist: &Chemist) -> Result<Chemist> {
        let created = sqlx::query_as::<_, Chemist>(
            r#"
            INSERT INTO chemists (
                id, era_id, name, birth_year, death_year, description, bio,
                position_x, position_y, position_z, portrait_path, model_path,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id, era_id, name, birth_year, death_year, description, bio,
                      position_x, position_y, position_z, portrait_path, model_path,
                      created_at, updated_at
            "#,
        )
        .bind(chemist.id)
        .bind(chemist.era_id)
        .bind(&chemist.name)
        .bind(chemist.birth_year)
        .bind(chemist.death_year)
        .bind(&chemist.description)
        .bind(&chemist.bio)
        .bind(chemist.position_x)
        .bind(chemist.position_y)
        .bind(chemist.position_z)
        .bind(&chemist.portrait_path)
        .bind(&chemist.model_path)
        .bind(chemist.created_at)
        .bind(chemist.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(created)
    }

    /// Overwrite every editable column; `None` when the chemist is gone
    pub async fn update(&self, chemist: &Chemist) -> Result<Option<Chemist>> {
        let updated = sqlx::query_as::<_, Chemist>(
            r#"
            UPDATE chemists SET
                era_id = $2,
                name = $3,
                birth_year = $4,
                death_year = $5,
                description = $6,
                bio = $7,
                position_x = $8,
                position_y = $9,
                position_z = $10,
                portrait_path = $11,
                model_path = $12,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, era_id, name, birth_year, death_year, description, bio,
                      position_x, position_y, position_z, portrait_path, model_path,
                      created_at, updated_at
            "#,
        )
        .bind(chemist.id)
        .bind(chemist.era_id)
        .bind(&chemist.name)
        .bind(chemist.birth_year)
        .bind(chemist.death_year)
        .bind(&chemist.description)
        .bind(&chemist.bio)
        .bind(chemist.position_x)
        .bind(chemist.position_y)
        .bind(chemist.position_z)
        .bind(&chemist.portrait_path)
        .bind(&chemist.model_path)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(updated)
    }

    /// Delete a chemist together with their events, chat turns and feedback
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM chemists WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
