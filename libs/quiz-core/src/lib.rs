//! Core quiz engine shared by the application layer.
//!
//! Provides:
//! - Text analysis for note content (sentences, formula/definition
//!   detection, cloze construction)
//! - Weighted, randomized question generation per quiz mode
//! - Bounded ease/interval review scheduling
//! - Kind-specific answer grading
//! - Injected generation configuration (tag weights, mode policies)
//! - Shared types (Note, Question, Grade, ReviewItem, etc.)

pub mod analyzer;
pub mod config;
pub mod error;
pub mod generate;
pub mod grading;
pub mod scheduler;
pub mod types;

pub use analyzer::{make_cloze, split_sentences, Cloze, CLOZE_BLANK};
pub use config::{ModePolicy, NoteScope, QuizConfig};
pub use error::QuizError;
pub use generate::generate;
pub use grading::{grade, Answer, Graded};
pub use scheduler::Scheduler;
pub use types::{
    Grade, Note, Question, QuestionKind, QuizMode, QuizStats, ReviewItem, TagId,
    ANSWER_FALSE, ANSWER_TRUE,
};
