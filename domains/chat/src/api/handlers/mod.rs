//! Request handlers for the Chat domain

pub mod messages;
