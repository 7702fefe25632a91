//! Application layer for the quiz engine: persistence, session
//! driving, and the terminal runner.

pub mod error;
pub mod session;
pub mod store;

pub use error::{SessionError, StoreError};
pub use session::{AnswerFeedback, QuizSession, SessionState, FEEDBACK_DELAY};
pub use store::{KeyValueStore, MemoryStore, ReviewStore, SqliteStore};
