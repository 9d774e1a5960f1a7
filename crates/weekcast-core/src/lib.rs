//! `weekcast-core` — configuration and the outbound channel boundary.
//!
//! Everything the other crates share lives here: the process config
//! (`weekcast.toml` + `WEEKCAST_*` env overrides) and the [`Publisher`]
//! trait that the dispatch loop writes to.

pub mod config;
pub mod publish;

pub use config::WeekcastConfig;
pub use publish::{PublishError, Publisher};
