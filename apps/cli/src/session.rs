//! Quiz session state machine.
//!
//! One run of a quiz: `Presenting(i)` -> `Feedback` -> next
//! `Presenting` or `Completed`. Transitions happen on discrete events
//! (submit, advance), independent of any rendering loop. The timed
//! auto-advance is an ordinary future; dropping it before it fires
//! cancels the pending transition while the committed grading stays
//! persisted.

use crate::error::SessionError;
use crate::store::{KeyValueStore, ReviewStore};
use chrono::Utc;
use quiz_core::grading::{self, Answer};
use quiz_core::types::{Grade, Question};
use quiz_core::Scheduler;
use serde::Serialize;
use std::time::Duration;

/// Delay before feedback auto-advances to the next question.
pub const FEEDBACK_DELAY: Duration = Duration::from_millis(1500);

/// Session state. No backward navigation, no pause/resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Question `index` is on screen awaiting an answer.
    Presenting(usize),
    /// Feedback for question `index` is showing.
    Feedback { index: usize, correct: bool },
    /// Terminal: all questions answered.
    Completed { score: u32 },
}

/// Per-grading output for feedback rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub answer_text: Option<String>,
    pub grade: Grade,
}

/// Drives one quiz run over a review store.
pub struct QuizSession<S> {
    questions: Vec<Question>,
    store: ReviewStore<S>,
    scheduler: Scheduler,
    feedback_delay: Duration,
    state: SessionState,
    score: u32,
}

impl<S: KeyValueStore> QuizSession<S> {
    /// An empty question sequence starts (and stays) completed with
    /// score 0; the caller renders an explicit empty state.
    pub fn new(
        questions: Vec<Question>,
        store: ReviewStore<S>,
        scheduler: Scheduler,
        feedback_delay: Duration,
    ) -> Self {
        let state = if questions.is_empty() {
            SessionState::Completed { score: 0 }
        } else {
            SessionState::Presenting(0)
        };
        Self {
            questions,
            store,
            scheduler,
            feedback_delay,
            state,
            score: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// The question currently presented or under feedback.
    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            SessionState::Presenting(i) | SessionState::Feedback { index: i, .. } => {
                self.questions.get(i)
            }
            SessionState::Completed { .. } => None,
        }
    }

    /// Grade the answer to the current question, persist the updated
    /// review state, and enter feedback.
    pub async fn submit(&mut self, answer: &Answer) -> Result<AnswerFeedback, SessionError> {
        let index = match self.state {
            SessionState::Presenting(i) => i,
            _ => return Err(SessionError::NotPresenting),
        };
        let question = &self.questions[index];

        let graded = grading::grade(question, answer)?;
        let now = Utc::now();
        let prev = match self.store.get_review(&question.id).await? {
            Some(item) => item,
            None => self.scheduler.init(&question.id, &question.note_id, now),
        };
        let next = self.scheduler.schedule(&prev, graded.grade, now);
        self.store.save_review(&next).await?;

        tracing::debug!(
            question = %question.id,
            grade = graded.grade.to_value(),
            correct = graded.correct,
            interval_days = next.interval_days,
            "answer graded"
        );

        if graded.correct {
            self.score += 1;
        }
        self.state = SessionState::Feedback {
            index,
            correct: graded.correct,
        };

        Ok(AnswerFeedback {
            correct: graded.correct,
            answer_text: question.answer_text.clone(),
            grade: graded.grade,
        })
    }

    /// Leave feedback: move to the next question, or complete the
    /// session and update the streak after the last one.
    pub async fn advance(&mut self) -> Result<SessionState, SessionError> {
        let index = match self.state {
            SessionState::Feedback { index, .. } => index,
            _ => return Err(SessionError::NotInFeedback),
        };

        if index + 1 >= self.questions.len() {
            let streak = self.store.update_last_session(Utc::now()).await?;
            tracing::info!(score = self.score, streak, "quiz completed");
            self.state = SessionState::Completed { score: self.score };
        } else {
            self.state = SessionState::Presenting(index + 1);
        }
        Ok(self.state)
    }

    /// Wait out the feedback delay, then advance. Dropping the
    /// returned future before it resolves suppresses the pending
    /// transition; the grading submitted earlier remains persisted.
    pub async fn auto_advance(&mut self) -> Result<SessionState, SessionError> {
        tokio::time::sleep(self.feedback_delay).await;
        self.advance().await
    }

    /// Statistics snapshot from the underlying store.
    pub async fn stats(&self) -> Result<quiz_core::QuizStats, SessionError> {
        Ok(self.store.stats(Utc::now()).await?)
    }

    pub fn store(&self) -> &ReviewStore<S> {
        &self.store
    }
}
