//! Error types for the application layer.

use thiserror::Error;

/// Persistence errors. Not locally recovered: a failed write during
/// grading propagates up through the session flow.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Quiz session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Grading(#[from] quiz_core::QuizError),

    #[error("no question is being presented")]
    NotPresenting,

    #[error("no feedback is pending")]
    NotInFeedback,
}
