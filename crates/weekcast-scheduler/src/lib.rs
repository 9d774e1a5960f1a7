//! `weekcast-scheduler` — half-hour-aligned dispatch of weekly posts.
//!
//! # Overview
//!
//! The [`engine::DispatchEngine`] drives one recurring task: every 30
//! minutes it loads today's posts from the store and delivers the ones whose
//! hour/minute exactly match the current instant. Before the first tick the
//! [`align`] module sleeps the task until the wall clock reads :00 or :30,
//! so the cadence stays phase-locked to half-hour boundaries no matter when
//! the process started.
//!
//! Failure policy: a failed store read empties that tick's candidate set, a
//! failed delivery skips only that post. Nothing a tick does can stop the
//! loop; missed windows are not replayed.

pub mod align;
pub mod engine;

pub use engine::{DispatchEngine, PostSource};
