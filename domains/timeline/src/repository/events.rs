//! Historical event repository

use crate::domain::entities::{EventCategory, HistoricalEvent};
use chronochem_common::{Pagination, RepositoryError, Result};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Optional list filters for events
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilter {
    pub era: Option<Uuid>,
    pub chemist: Option<Uuid>,
    pub year: Option<i32>,
    pub category: Option<EventCategory>,
}

#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find event by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<HistoricalEvent>> {
        let event = sqlx::query_as::<_, HistoricalEvent>(
            r#"
            SELECT id, title, description, year, category, chemist_id, era_id,
                   image_path, created_at, updated_at
            FROM historical_events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// List events in chronological order
    pub async fn list(
        &self,
        filter: &EventFilter,
        page: Pagination,
    ) -> Result<Vec<HistoricalEvent>> {
        let events = sqlx::query_as::<_, HistoricalEvent>(
            r#"
            SELECT id, title, description, year, category, chemist_id, era_id,
                   image_path, created_at, updated_at
            FROM historical_events
            WHERE ($1::uuid IS NULL OR era_id = $1)
              AND ($2::uuid IS NULL OR chemist_id = $2)
              AND ($3::int IS NULL OR year = $3)
              AND ($4::event_category IS NULL OR category = $4)
            ORDER BY year ASC, created_at ASC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(filter.era)
        .bind(filter.chemist)
        .bind(filter.year)
        .bind(filter.category)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// All events attached to an era
    pub async fn list_by_era(&self, era_id: Uuid) -> Result<Vec<HistoricalEvent>> {
        let events = sqlx::query_as::<_, HistoricalEvent>(
            r#"
            SELECT id, title, description, year, category, chemist_id, era_id,
                   image_path, created_at, updated_at
            FROM historical_events
            WHERE era_id = $1
            ORDER BY year ASC, created_at ASC
            "#,
        )
        .bind(era_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// A chemist's discoveries, ordered by year then insertion
    pub async fn discoveries_for(&self, chemist_id: Uuid) -> Result<Vec<HistoricalEvent>> {
        let events = sqlx::query_as::<_, HistoricalEvent>(
            r#"
            SELECT id, title, description, year, category, chemist_id, era_id,
                   image_path, created_at, updated_at
            FROM historical_events
            WHERE chemist_id = $1 AND category = 'discovery'
            ORDER BY year ASC, created_at ASC
            "#,
        )
        .bind(chemist_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    pub async fn create(&self, event: &HistoricalEvent) -> Result<HistoricalEvent> {
        let created = sqlx::query_as::<_, HistoricalEvent>(
            r#"
            INSERT INTO historical_events (
                id, title, description, year, category, chemist_id, era_id,
                image_path, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, title, description, year, category, chemist_id, era_id,
                      image_path, created_at, updated_at
            "#,
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.year)
        .bind(event.category)
        .bind(event.chemist_id)
        .bind(event.era_id)
        .bind(&event.image_path)
        .bind(event.created_at)
        .bind(event.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(created)
    }

    pub async fn update(&self, event: &HistoricalEvent) -> Result<Option<HistoricalEvent>> {
        let updated = sqlx::query_as::<_, HistoricalEvent>(
            r#"
            UPDATE historical_events SET
                title = $2,
                description = $3,
                year = $4,
                category = $5,
                chemist_id = $6,
                era_id = $7,
                image_path = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, year, category, chemist_id, era_id,
                      image_path, created_at, updated_at
            "#,
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.year)
        .bind(event.category)
        .bind(event.chemist_id)
        .bind(event.era_id)
        .bind(&event.image_path)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM historical_events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
