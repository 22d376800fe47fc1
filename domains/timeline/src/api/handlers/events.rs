//! Historical event API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chronochem_common::{double_option, Error, Pagination, Result, ValidatedJson};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::TimelineState;
use crate::domain::entities::{EventCategory, HistoricalEvent, NewEvent};
use crate::repository::EventFilter;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    pub year: i32,

    #[serde(default)]
    pub category: EventCategory,

    pub chemist_id: Option<Uuid>,
    pub era_id: Option<Uuid>,

    #[validate(length(max = 200))]
    pub image_path: Option<String>,
}

/// Partial update; `null` clears an optional field
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub year: Option<i32>,
    pub category: Option<EventCategory>,
    #[serde(default, deserialize_with = "double_option")]
    pub chemist_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub era_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_path: Option<Option<String>>,
}

impl UpdateEventRequest {
    fn apply(self, event: &mut HistoricalEvent) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(year) = self.year {
            event.year = year;
        }
        if let Some(category) = self.category {
            event.category = category;
        }
        if let Some(chemist_id) = self.chemist_id {
            event.chemist_id = chemist_id;
        }
        if let Some(era_id) = self.era_id {
            event.era_id = era_id;
        }
        if let Some(image_path) = self.image_path {
            event.image_path = image_path;
        }
    }
}

/// List events, filterable by era, chemist, year and category
pub async fn list_events(
    State(state): State<TimelineState>,
    Query(filter): Query<EventFilter>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<HistoricalEvent>>> {
    let events = state.repos.events.list(&filter, page).await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<TimelineState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoricalEvent>> {
    let event = state
        .repos
        .events
        .find(id)
        .await?
        .ok_or_else(|| Error::not_found("Event"))?;

    Ok(Json(event))
}

pub async fn create_event(
    State(state): State<TimelineState>,
    ValidatedJson(req): ValidatedJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<HistoricalEvent>)> {
    let event = HistoricalEvent::new(NewEvent {
        title: req.title,
        description: req.description,
        year: req.year,
        category: req.category,
        chemist_id: req.chemist_id,
        era_id: req.era_id,
        image_path: req.image_path,
    })?;

    let created = state.repos.events.create(&event).await?;
    tracing::info!(
        event_id = %created.id,
        category = %created.category,
        year = created.year,
        "Event created"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_event(
    State(state): State<TimelineState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateEventRequest>,
) -> Result<Json<HistoricalEvent>> {
    let mut event = state
        .repos
        .events
        .find(id)
        .await?
        .ok_or_else(|| Error::not_found("Event"))?;

    req.apply(&mut event);
    event.validate()?;

    let updated = state
        .repos
        .events
        .update(&event)
        .await?
        .ok_or_else(|| Error::not_found("Event"))?;

    Ok(Json(updated))
}

pub async fn delete_event(
    State(state): State<TimelineState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if !state.repos.events.delete(id).await? {
        return Err(Error::not_found("Event"));
    }
    Ok(StatusCode::NO_CONTENT)
}
