use async_trait::async_trait;
use thiserror::Error;

/// Failure delivering one message to the output channel.
///
/// The dispatch loop treats every variant the same way: log it and move on
/// to the next matching post. Nothing here is fatal.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Could not reach the channel endpoint at all.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("Channel rejected message: HTTP {status}")]
    Rejected { status: u16 },
}

/// Outbound side of the system — whatever actually delivers post content.
///
/// Implementations must be `Send + Sync` so the dispatch engine can hold one
/// behind an `Arc` and call it from its background task.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Deliver `text` verbatim to the configured channel.
    async fn publish(&self, text: &str) -> Result<(), PublishError>;
}
