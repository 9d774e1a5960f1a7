use thiserror::Error;

/// Errors that can occur within the post store.
///
/// Validation variants never reach the database; `Database` is the single
/// kind every connectivity/query/commit failure collapses into, so callers
/// can apply their documented fallback without matching on SQLite details.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite / rusqlite error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Weekly posts fire on half-hour boundaries only.
    #[error("minute must be 0 or 30 (got {minute})")]
    InvalidMinute { minute: u8 },

    /// `day_of_week` is 0=Monday … 6=Sunday.
    #[error("day_of_week must be 0-6 (got {day})")]
    InvalidDayOfWeek { day: u8 },

    /// Hours are 0-23 UTC.
    #[error("hour must be 0-23 (got {hour})")]
    InvalidHour { hour: u8 },

    /// Post content is sent verbatim and must not be empty.
    #[error("content must not be empty")]
    EmptyContent,

    /// No post with the given ID exists in the store.
    #[error("Post not found: {id}")]
    PostNotFound { id: i64 },
}

impl StoreError {
    /// True for write-time validation rejections (as opposed to storage
    /// failures). The command surface uses this to pick its reply.
    pub fn is_validation(&self) -> bool {
        !matches!(self, StoreError::Database(_) | StoreError::PostNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
