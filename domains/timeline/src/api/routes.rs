//! Route definitions for Timeline domain API

use axum::{routing::get, Router};

use super::handlers::{chemists, eras, events, feedback};
use super::middleware::TimelineState;

fn era_routes() -> Router<TimelineState> {
    Router::new()
        .route("/v1/eras", get(eras::list_eras).post(eras::create_era))
        .route(
            "/v1/eras/{id}",
            get(eras::get_era)
                .patch(eras::update_era)
                .delete(eras::delete_era),
        )
        .route("/v1/eras/{id}/full-detail", get(eras::get_era_full_detail))
}

fn chemist_routes() -> Router<TimelineState> {
    Router::new()
        .route(
            "/v1/chemists",
            get(chemists::list_chemists).post(chemists::create_chemist),
        )
        .route(
            "/v1/chemists/{id}",
            get(chemists::get_chemist)
                .patch(chemists::update_chemist)
                .delete(chemists::delete_chemist),
        )
}

fn event_routes() -> Router<TimelineState> {
    Router::new()
        .route(
            "/v1/events",
            get(events::list_events).post(events::create_event),
        )
        .route(
            "/v1/events/{id}",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
}

fn feedback_routes() -> Router<TimelineState> {
    Router::new()
        .route(
            "/v1/feedback",
            get(feedback::list_feedback).post(feedback::create_feedback),
        )
        .route(
            "/v1/feedback/{id}",
            get(feedback::get_feedback).delete(feedback::delete_feedback),
        )
}

/// Create all Timeline domain API routes
pub fn routes() -> Router<TimelineState> {
    Router::new()
        .merge(era_routes())
        .merge(chemist_routes())
        .merge(event_routes())
        .merge(feedback_routes())
}
