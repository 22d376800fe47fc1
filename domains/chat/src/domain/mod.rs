//! Chat domain model and turn handling

pub mod entities;
pub mod prompt;
pub mod service;
