//! Storage seam for the turn service

use async_trait::async_trait;
use chronochem_common::Result;
use chronochem_timeline::{
    ChemistRepository, EraRepository, EventRepository, HistoricalEvent, TimelineRepositories,
};
use sqlx::PgPool;
use uuid::Uuid;

use super::messages::MessageRepository;
use crate::domain::entities::ChatMessage;
use crate::domain::prompt::{ChemistPersona, Discovery, EraContext};

/// Everything the turn service reads and writes
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Persona data for the prompt; `None` for an unknown chemist
    async fn find_persona(&self, chemist_id: Uuid) -> Result<Option<ChemistPersona>>;

    async fn chemist_exists(&self, chemist_id: Uuid) -> Result<bool>;

    /// At most `limit` turns, newest first
    async fn recent_turns(&self, chemist_id: Uuid, limit: i64) -> Result<Vec<ChatMessage>>;

    async fn insert_turn(&self, turn: &ChatMessage) -> Result<ChatMessage>;

    /// All turns, oldest first
    async fn list_turns(&self, chemist_id: Uuid) -> Result<Vec<ChatMessage>>;

    /// Remove all turns of one chemist, returning how many were deleted
    async fn clear_turns(&self, chemist_id: Uuid) -> Result<u64>;
}

/// Postgres-backed chat store
#[derive(Clone)]
pub struct PgChatStore {
    eras: EraRepository,
    chemists: ChemistRepository,
    events: EventRepository,
    messages: MessageRepository,
}

impl PgChatStore {
    pub fn new(pool: PgPool) -> Self {
        let timeline = TimelineRepositories::new(pool.clone());
        Self {
            eras: timeline.eras,
            chemists: timeline.chemists,
            events: timeline.events,
            messages: MessageRepository::new(pool),
        }
    }
}

impl From<HistoricalEvent> for Discovery {
    fn from(event: HistoricalEvent) -> Self {
        Self {
            title: event.title,
            year: event.year,
            description: event.description,
        }
    }
}

#[async_trait]
impl ChatStore for PgChatStore {
    async fn find_persona(&self, chemist_id: Uuid) -> Result<Option<ChemistPersona>> {
        let Some(chemist) = self.chemists.find(chemist_id).await? else {
            return Ok(None);
        };

        let era = self.eras.find(chemist.era_id).await?.map(|era| EraContext {
            name: era.name,
            year: era.year,
            description: era.description,
        });

        let discoveries = self
            .events
            .discoveries_for(chemist_id)
            .await?
            .into_iter()
            .map(Discovery::from)
            .collect();

        Ok(Some(ChemistPersona {
            name: chemist.name,
            birth_year: chemist.birth_year,
            death_year: chemist.death_year,
            achievements: chemist.description,
            biography: chemist.bio,
            era,
            discoveries,
        }))
    }

    async fn chemist_exists(&self, chemist_id: Uuid) -> Result<bool> {
        self.chemists.exists(chemist_id).await
    }

    async fn recent_turns(&self, chemist_id: Uuid, limit: i64) -> Result<Vec<ChatMessage>> {
        self.messages.recent(chemist_id, limit).await
    }

    async fn insert_turn(&self, turn: &ChatMessage) -> Result<ChatMessage> {
        self.messages.create(turn).await
    }

    async fn list_turns(&self, chemist_id: Uuid) -> Result<Vec<ChatMessage>> {
        self.messages.list_by_chemist(chemist_id).await
    }

    async fn clear_turns(&self, chemist_id: Uuid) -> Result<u64> {
        self.messages.delete_by_chemist(chemist_id).await
    }
}
