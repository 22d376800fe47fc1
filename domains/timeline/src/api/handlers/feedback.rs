//! User feedback API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chronochem_auth::MaybeUser;
use chronochem_common::{Error, Pagination, Result, ValidatedJson};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::TimelineState;
use crate::domain::entities::UserFeedback;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFeedbackRequest {
    pub chemist_id: Uuid,

    #[validate(range(min = 1, max = 5))]
    pub rating: i32,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub comment: String,
}

#[derive(Debug, Deserialize)]
pub struct ListFeedbackQuery {
    pub chemist: Option<Uuid>,
}

pub async fn list_feedback(
    State(state): State<TimelineState>,
    Query(query): Query<ListFeedbackQuery>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<UserFeedback>>> {
    let feedback = state.repos.feedback.list(query.chemist, page).await?;
    Ok(Json(feedback))
}

pub async fn get_feedback(
    State(state): State<TimelineState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserFeedback>> {
    let feedback = state
        .repos
        .feedback
        .find(id)
        .await?
        .ok_or_else(|| Error::not_found("Feedback"))?;

    Ok(Json(feedback))
}

/// Record feedback; attributed to the caller when a valid token is sent
pub async fn create_feedback(
    user: MaybeUser,
    State(state): State<TimelineState>,
    ValidatedJson(req): ValidatedJson<CreateFeedbackRequest>,
) -> Result<(StatusCode, Json<UserFeedback>)> {
    let feedback = UserFeedback::new(req.chemist_id, user.user_id(), req.rating, req.comment)?;

    let created = state.repos.feedback.create(&feedback).await?;
    tracing::info!(
        feedback_id = %created.id,
        chemist_id = %created.chemist_id,
        rating = created.rating,
        "Feedback recorded"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_feedback(
    State(state): State<TimelineState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if !state.repos.feedback.delete(id).await? {
        return Err(Error::not_found("Feedback"));
    }
    Ok(StatusCode::NO_CONTENT)
}
