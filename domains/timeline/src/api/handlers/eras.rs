//! Era API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chronochem_common::{double_option, Error, Pagination, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::chemists::ChemistResponse;
use crate::api::middleware::TimelineState;
use crate::domain::entities::{Era, HistoricalEvent};

/// Request for creating an era
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEraRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    pub year: i32,

    #[serde(default)]
    pub description: String,

    #[validate(length(max = 200))]
    pub model_url: Option<String>,

    #[validate(length(max = 200))]
    pub soundtrack_url: Option<String>,
}

/// Partial update; `null` clears an optional field
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEraRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub model_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub soundtrack_url: Option<Option<String>>,
}

impl UpdateEraRequest {
    fn apply(self, era: &mut Era) {
        if let Some(name) = self.name {
            era.name = name;
        }
        if let Some(year) = self.year {
            era.year = year;
        }
        if let Some(description) = self.description {
            era.description = description;
        }
        if let Some(model_url) = self.model_url {
            era.model_url = model_url;
        }
        if let Some(soundtrack_url) = self.soundtrack_url {
            era.soundtrack_url = soundtrack_url;
        }
    }
}

/// An era with everything that happened in it
#[derive(Debug, Serialize)]
pub struct EraFullDetailResponse {
    #[serde(flatten)]
    pub era: Era,
    pub events: Vec<HistoricalEvent>,
    pub chemists: Vec<ChemistResponse>,
}

/// List eras in timeline order
pub async fn list_eras(
    State(state): State<TimelineState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Era>>> {
    let eras = state.repos.eras.list(page).await?;
    Ok(Json(eras))
}

pub async fn get_era(
    State(state): State<TimelineState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Era>> {
    let era = state
        .repos
        .eras
        .find(id)
        .await?
        .ok_or_else(|| Error::not_found("Era"))?;

    Ok(Json(era))
}

/// Era together with its events and chemists
pub async fn get_era_full_detail(
    State(state): State<TimelineState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EraFullDetailResponse>> {
    let era = state
        .repos
        .eras
        .find(id)
        .await?
        .ok_or_else(|| Error::not_found("Era"))?;

    let events = state.repos.events.list_by_era(id).await?;
    let chemists = state.repos.chemists.list_by_era(id).await?;

    Ok(Json(EraFullDetailResponse {
        era,
        events,
        chemists: chemists.into_iter().map(Into::into).collect(),
    }))
}

pub async fn create_era(
    State(state): State<TimelineState>,
    ValidatedJson(req): ValidatedJson<CreateEraRequest>,
) -> Result<(StatusCode, Json<Era>)> {
    let era = Era::new(
        req.name,
        req.year,
        req.description,
        req.model_url,
        req.soundtrack_url,
    )?;

    let created = state.repos.eras.create(&era).await?;
    tracing::info!(era_id = %created.id, year = created.year, "Era created");

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_era(
    State(state): State<TimelineState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateEraRequest>,
) -> Result<Json<Era>> {
    let mut era = state
        .repos
        .eras
        .find(id)
        .await?
        .ok_or_else(|| Error::not_found("Era"))?;

    req.apply(&mut era);
    era.validate()?;

    let updated = state
        .repos
        .eras
        .update(&era)
        .await?
        .ok_or_else(|| Error::not_found("Era"))?;

    Ok(Json(updated))
}

/// Delete an era and, by cascade, its chemists and events
pub async fn delete_era(
    State(state): State<TimelineState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if !state.repos.eras.delete(id).await? {
        return Err(Error::not_found("Era"));
    }

    tracing::info!(era_id = %id, "Era deleted");
    Ok(StatusCode::NO_CONTENT)
}
