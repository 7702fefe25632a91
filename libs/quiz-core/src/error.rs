//! Error types for quiz-core.

use crate::types::QuestionKind;
use thiserror::Error;

/// Errors surfaced by the quiz engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("answer form does not match a {} question", .kind.as_str())]
    AnswerMismatch { kind: QuestionKind },
}
