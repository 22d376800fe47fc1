//! API endpoint integration tests
//!
//! Chat router tests run against the in-memory chat store and the mock
//! completion service. Tests touching Postgres are `#[ignore]`d and need
//! `TEST_DATABASE_URL` (or `DATABASE_URL`).

#![allow(dead_code)]

mod chat;
mod common;
mod timeline;
