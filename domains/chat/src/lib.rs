//! Chat domain: chemist persona prompts, conversation turns, transcripts

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{ChatMessage, ChatRole};
pub use domain::prompt::{
    chronological, compose_messages, format_discoveries, render_persona_prompt, ChemistPersona,
    Discovery, EraContext, NO_RECORD,
};
pub use domain::service::{
    ChatExchange, ChatSettings, ChatTurnService, FALLBACK_REPLY, MAX_MESSAGE_LENGTH,
};

// Re-export repository types
#[cfg(any(test, feature = "test-support"))]
pub use repository::InMemoryChatStore;
pub use repository::{ChatStore, MessageRepository, PgChatStore};

// Re-export API types
pub use api::routes;
pub use api::ChatState;
