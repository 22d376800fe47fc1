//! Repository implementations for the Timeline domain

pub mod chemists;
pub mod eras;
pub mod events;
pub mod feedback;

use sqlx::PgPool;

pub use chemists::{ChemistFilter, ChemistRepository};
pub use eras::EraRepository;
pub use events::{EventFilter, EventRepository};
pub use feedback::FeedbackRepository;

/// Combined repository access for the Timeline domain
#[derive(Clone)]
pub struct TimelineRepositories {
    pool: PgPool,
    pub eras: EraRepository,
    pub chemists: ChemistRepository,
    pub events: EventRepository,
    pub feedback: FeedbackRepository,
}

impl TimelineRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            eras: EraRepository::new(pool.clone()),
            chemists: ChemistRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            feedback: FeedbackRepository::new(pool.clone()),
            pool,
        }
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
