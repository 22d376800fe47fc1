//! Chemist API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use chronochem_common::{double_option, Error, Pagination, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::TimelineState;
use crate::domain::entities::{Chemist, NewChemist, Position};
use crate::repository::ChemistFilter;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateChemistRequest {
    pub era_id: Uuid,

    #[validate(length(min = 1, max = 100))]
    pub name: String,

    pub birth_year: i32,
    pub death_year: Option<i32>,

    #[serde(default)]
    pub description: String,

    pub bio: Option<String>,
    pub position: Option<Position>,

    #[validate(length(max = 200))]
    pub portrait_path: Option<String>,

    #[validate(length(max = 200))]
    pub model_path: Option<String>,
}

/// Partial update; `null` clears an optional field
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateChemistRequest {
    pub era_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub birth_year: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub death_year: Option<Option<i32>>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub position: Option<Option<Position>>,
    #[serde(default, deserialize_with = "double_option")]
    pub portrait_path: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub model_path: Option<Option<String>>,
}

impl UpdateChemistRequest {
    fn apply(self, chemist: &mut Chemist) {
        if let Some(era_id) = self.era_id {
            chemist.era_id = era_id;
        }
        if let Some(name) = self.name {
            chemist.name = name;
        }
        if let Some(birth_year) = self.birth_year {
            chemist.birth_year = birth_year;
        }
        if let Some(death_year) = self.death_year {
            chemist.death_year = death_year;
        }
        if let Some(description) = self.description {
            chemist.description = description;
        }
        if let Some(bio) = self.bio {
            chemist.bio = bio;
        }
        if let Some(position) = self.position {
            chemist.set_position(position);
        }
        if let Some(portrait_path) = self.portrait_path {
            chemist.portrait_path = portrait_path;
        }
        if let Some(model_path) = self.model_path {
            chemist.model_path = model_path;
        }
    }
}

/// Chemist response DTO
#[derive(Debug, Serialize)]
pub struct ChemistResponse {
    pub id: Uuid,
    pub era_id: Uuid,
    pub name: String,
    pub birth_year: i32,
    pub death_year: Option<i32>,
    pub description: String,
    pub bio: Option<String>,
    pub position: Option<Position>,
    pub portrait_path: Option<String>,
    pub model_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Chemist> for ChemistResponse {
    fn from(c: Chemist) -> Self {
        Self {
            position: c.position(),
            id: c.id,
            era_id: c.era_id,
            name: c.name,
            birth_year: c.birth_year,
            death_year: c.death_year,
            description: c.description,
            bio: c.bio,
            portrait_path: c.portrait_path,
            model_path: c.model_path,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// List chemists, optionally by era and/or a name search
pub async fn list_chemists(
    State(state): State<TimelineState>,
    Query(filter): Query<ChemistFilter>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<ChemistResponse>>> {
    let chemists = state.repos.chemists.list(&filter, page).await?;
    Ok(Json(chemists.into_iter().map(Into::into).collect()))
}

pub async fn get_chemist(
    State(state): State<TimelineState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChemistResponse>> {
    let chemist = state
        .repos
        .chemists
        .find(id)
        .await?
        .ok_or_else(|| Error::not_found("Chemist"))?;

    Ok(Json(chemist.into()))
}

pub async fn create_chemist(
    State(state): State<TimelineState>,
    ValidatedJson(req): ValidatedJson<CreateChemistRequest>,
) -> Result<(StatusCode, Json<ChemistResponse>)> {
    let chemist = Chemist::new(NewChemist {
        era_id: req.era_id,
        name: req.name,
        birth_year: req.birth_year,
        death_year: req.death_year,
        description: req.description,
        bio: req.bio,
        position: req.position,
        portrait_path: req.portrait_path,
        model_path: req.model_path,
    })?;

    let created = state.repos.chemists.create(&chemist).await?;
    tracing::info!(chemist_id = %created.id, era_id = %created.era_id, "Chemist created");

    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn update_chemist(
    State(state): State<TimelineState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateChemistRequest>,
) -> Result<Json<ChemistResponse>> {
    let mut chemist = state
        .repos
        .chemists
        .find(id)
        .await?
        .ok_or_else(|| Error::not_found("Chemist"))?;

    req.apply(&mut chemist);
    chemist.validate()?;

    let updated = state
        .repos
        .chemists
        .update(&chemist)
        .await?
        .ok_or_else(|| Error::not_found("Chemist"))?;

    Ok(Json(updated.into()))
}

/// Delete a chemist; events, chat turns and feedback cascade
pub async fn delete_chemist(
    State(state): State<TimelineState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if !state.repos.chemists.delete(id).await? {
        return Err(Error::not_found("Chemist"));
    }

    tracing::info!(chemist_id = %id, "Chemist deleted");
    Ok(StatusCode::NO_CONTENT)
}
