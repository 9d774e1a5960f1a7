//! `weekcast-store` — SQLite persistence for weekly posts.
//!
//! # Overview
//!
//! One entity: [`WeeklyPost`], a message sent every week at a fixed
//! weekday/hour/minute. Rows live in the `weekly_posts` table and are only
//! ever written through [`PostStore`], which enforces the half-hour rule
//! (`minute` must be 0 or 30) before anything reaches the database.
//!
//! Reads return materialized `Vec`s, so the dispatch loop's per-tick
//! candidate set cannot shift underneath it.

pub mod db;
pub mod error;
pub mod post;

pub use error::{Result, StoreError};
pub use post::{PostStore, WeeklyPost};
