//! Bounded ease/interval review scheduling.
//!
//! A deliberate simplification of FSRS: difficulty and stability are
//! conflated into one bounded ease scalar, and Again always resets to
//! a 1-day cadence irrespective of history. Pure functions, no I/O.

use crate::types::{Grade, ReviewItem};
use chrono::{DateTime, Duration, Utc};

/// Scheduler with configurable ease bounds.
#[derive(Debug, Clone)]
pub struct Scheduler {
    pub initial_ease: i32,
    pub min_ease: i32,
    pub max_ease: i32,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            initial_ease: 250,
            min_ease: 130,
            max_ease: 300,
        }
    }
}

fn ease_delta(grade: Grade) -> i32 {
    match grade {
        Grade::Again => -20,
        Grade::Hard => -10,
        Grade::Good => 0,
        Grade::Easy => 10,
    }
}

impl Scheduler {
    /// Fresh review state for a question graded for the first time.
    pub fn init(&self, question_id: &str, note_id: &str, now: DateTime<Utc>) -> ReviewItem {
        ReviewItem {
            question_id: question_id.to_string(),
            note_id: note_id.to_string(),
            ease: self.initial_ease,
            interval_days: 0,
            due: now,
            last_reviewed: None,
        }
    }

    /// Next review state after one grading.
    ///
    /// Ease moves by the grade's delta and is clamped to the bounds.
    /// The first post-creation schedule is always 1 day out; after
    /// that the interval grows by `ease / initial_ease`, with Again
    /// forcing a reset to 1 day.
    pub fn schedule(&self, prev: &ReviewItem, grade: Grade, now: DateTime<Utc>) -> ReviewItem {
        let ease = (prev.ease + ease_delta(grade)).clamp(self.min_ease, self.max_ease);

        let interval_days = if prev.interval_days == 0 {
            1
        } else {
            let factor = f64::from(ease) / f64::from(self.initial_ease);
            let grown = (prev.interval_days as f64 * factor).round() as u32;
            if grade == Grade::Again {
                1
            } else {
                grown.max(1)
            }
        };

        ReviewItem {
            question_id: prev.question_id.clone(),
            note_id: prev.note_id.clone(),
            ease,
            interval_days,
            due: now + Duration::days(i64::from(interval_days)),
            last_reviewed: Some(now),
        }
    }

    /// Fraction of items with ease at or above the initial value.
    /// Diagnostic only; never feeds back into scheduling.
    pub fn retention(&self, items: &[ReviewItem]) -> f64 {
        if items.is_empty() {
            return 0.0;
        }
        let successful = items.iter().filter(|r| r.ease >= self.initial_ease).count();
        successful as f64 / items.len() as f64
    }
}
