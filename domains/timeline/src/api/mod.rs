//! HTTP API for the Timeline domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::TimelineState;
pub use routes::routes;
