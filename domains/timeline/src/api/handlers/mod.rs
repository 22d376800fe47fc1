//! Request handlers for the Timeline domain

pub mod chemists;
pub mod eras;
pub mod events;
pub mod feedback;
