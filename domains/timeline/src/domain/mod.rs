//! Timeline domain model

pub mod entities;
