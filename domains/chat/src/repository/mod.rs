//! Persistence for the Chat domain

#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod messages;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub use memory::InMemoryChatStore;
pub use messages::MessageRepository;
pub use store::{ChatStore, PgChatStore};
