//! In-memory chat store for tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chronochem_common::{Error, Result};
use uuid::Uuid;

use super::store::ChatStore;
use crate::domain::entities::ChatMessage;
use crate::domain::prompt::ChemistPersona;

/// Chat store kept in process memory, same ordering rules as Postgres
#[derive(Debug, Default)]
pub struct InMemoryChatStore {
    personas: Mutex<HashMap<Uuid, ChemistPersona>>,
    turns: Mutex<Vec<ChatMessage>>,
}

impl InMemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_persona(&self, chemist_id: Uuid, persona: ChemistPersona) {
        if let Ok(mut personas) = self.personas.lock() {
            personas.insert(chemist_id, persona);
        }
    }

    /// Snapshot of a chemist's turns, oldest first
    pub fn turns_for(&self, chemist_id: Uuid) -> Vec<ChatMessage> {
        let mut turns: Vec<ChatMessage> = self
            .turns
            .lock()
            .map(|turns| {
                turns
                    .iter()
                    .filter(|t| t.chemist_id == chemist_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        turns.sort_by(|a, b| (a.timestamp, a.id).cmp(&(b.timestamp, b.id)));
        turns
    }
}

fn poisoned() -> Error {
    Error::Internal("in-memory chat store lock poisoned".to_string())
}

#[async_trait]
impl ChatStore for InMemoryChatStore {
    async fn find_persona(&self, chemist_id: Uuid) -> Result<Option<ChemistPersona>> {
        let personas = self.personas.lock().map_err(|_| poisoned())?;
        Ok(personas.get(&chemist_id).cloned())
    }

    async fn chemist_exists(&self, chemist_id: Uuid) -> Result<bool> {
        let personas = self.personas.lock().map_err(|_| poisoned())?;
        Ok(personas.contains_key(&chemist_id))
    }

    async fn recent_turns(&self, chemist_id: Uuid, limit: i64) -> Result<Vec<ChatMessage>> {
        let mut turns = self.turns_for(chemist_id);
        turns.reverse();
        turns.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(turns)
    }

    async fn insert_turn(&self, turn: &ChatMessage) -> Result<ChatMessage> {
        if !self.chemist_exists(turn.chemist_id).await? {
            return Err(Error::Validation(
                "Referenced record does not exist (chat_messages_chemist_id_fkey)".to_string(),
            ));
        }
        let mut turns = self.turns.lock().map_err(|_| poisoned())?;
        turns.push(turn.clone());
        Ok(turn.clone())
    }

    async fn list_turns(&self, chemist_id: Uuid) -> Result<Vec<ChatMessage>> {
        Ok(self.turns_for(chemist_id))
    }

    async fn clear_turns(&self, chemist_id: Uuid) -> Result<u64> {
        let mut turns = self.turns.lock().map_err(|_| poisoned())?;
        let before = turns.len();
        turns.retain(|t| t.chemist_id != chemist_id);
        Ok((before - turns.len()) as u64)
    }
}
