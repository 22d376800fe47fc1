//! Timeline domain: eras, chemists, historical events, user feedback

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{
    Chemist, Era, EventCategory, HistoricalEvent, NewChemist, NewEvent, Position, UserFeedback,
};

// Re-export repository types
pub use repository::{
    ChemistFilter, ChemistRepository, EraRepository, EventFilter, EventRepository,
    FeedbackRepository, TimelineRepositories,
};

// Re-export API types
pub use api::routes;
pub use api::TimelineState;
