//! Kind-specific answer grading.
//!
//! Pure comparisons between a submitted answer and the question's
//! stored solution, mapped to a review [`Grade`]. A wrong mcq pick is
//! punished harder than a wrong cloze attempt: typing anything close
//! still took recall effort.

use crate::error::QuizError;
use crate::types::{Grade, Question, QuestionKind, ANSWER_TRUE};

/// A submitted answer, one form per question kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Index into `choices` (mcq).
    Choice(usize),
    /// True/false pick.
    Bool(bool),
    /// Typed text (cloze).
    Text(String),
}

/// Outcome of grading one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Graded {
    pub grade: Grade,
    pub correct: bool,
}

/// Grade an answer against its question.
///
/// Returns [`QuizError::AnswerMismatch`] when the answer form does
/// not fit the question kind.
pub fn grade(question: &Question, answer: &Answer) -> Result<Graded, QuizError> {
    match (question.kind, answer) {
        (QuestionKind::Mcq, Answer::Choice(index)) => {
            let correct = question.correct_index == Some(*index);
            Ok(Graded {
                grade: if correct { Grade::Easy } else { Grade::Again },
                correct,
            })
        }
        (QuestionKind::Truefalse, Answer::Bool(choice)) => {
            let statement_true = question.answer_text.as_deref() == Some(ANSWER_TRUE);
            let correct = *choice == statement_true;
            Ok(Graded {
                grade: if correct { Grade::Good } else { Grade::Again },
                correct,
            })
        }
        (QuestionKind::Cloze, Answer::Text(typed)) => {
            let expected = question.answer_text.as_deref().unwrap_or("");
            let correct =
                typed.trim().to_lowercase() == expected.trim().to_lowercase();
            Ok(Graded {
                grade: if correct { Grade::Good } else { Grade::Hard },
                correct,
            })
        }
        _ => Err(QuizError::AnswerMismatch {
            kind: question.kind,
        }),
    }
}
