//! Durable review state and derived statistics.
//!
//! The engine's only persistence dependency is [`KeyValueStore`]: an
//! asynchronous key-value collaborator with point get/put and
//! prefix-based key enumeration. Review items live under
//! `rev:<questionId>`; two scalar keys track the session streak.

pub mod memory;
pub mod sqlite;

use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::types::{QuizStats, ReviewItem};
use std::collections::HashSet;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

const REVIEW_PREFIX: &str = "rev:";
const LAST_SESSION_KEY: &str = "lastSession";
const STREAK_KEY: &str = "streakDays";

/// Asynchronous key-value persistence collaborator.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

/// Review persistence and statistics over a key-value store.
///
/// Every write is an idempotent overwrite keyed by question id, so
/// replaying a grading after a reload re-upserts the same value.
pub struct ReviewStore<S> {
    kv: S,
}

impl<S: KeyValueStore> ReviewStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    fn review_key(question_id: &str) -> String {
        format!("{REVIEW_PREFIX}{question_id}")
    }

    /// Upsert a review item by question id.
    pub async fn save_review(&self, item: &ReviewItem) -> Result<(), StoreError> {
        let value = serde_json::to_vec(item)?;
        self.kv.put(&Self::review_key(&item.question_id), value).await
    }

    /// Stored review state for a question, if any.
    pub async fn get_review(&self, question_id: &str) -> Result<Option<ReviewItem>, StoreError> {
        match self.kv.get(&Self::review_key(question_id)).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Which of `ids` are due at `now`. A question with no stored
    /// review item has never been graded and is always due.
    pub async fn due_questions(
        &self,
        ids: &[String],
        now: DateTime<Utc>,
    ) -> Result<HashSet<String>, StoreError> {
        let mut due = HashSet::new();
        for id in ids {
            match self.get_review(id).await? {
                Some(item) if item.due > now => {}
                _ => {
                    due.insert(id.clone());
                }
            }
        }
        Ok(due)
    }

    /// Every persisted review item, by prefix scan.
    pub async fn all_reviews(&self) -> Result<Vec<ReviewItem>, StoreError> {
        let keys = self.kv.keys_with_prefix(REVIEW_PREFIX).await?;
        let mut items = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(bytes) = self.kv.get(&key).await? {
                items.push(serde_json::from_slice(&bytes)?);
            }
        }
        Ok(items)
    }

    /// Aggregate statistics, recomputed by full scan on each call.
    ///
    /// `correct_answers` counts items with ease at or above 250 — a
    /// scheduling proxy for correctness, not a recorded flag.
    pub async fn stats(&self, now: DateTime<Utc>) -> Result<QuizStats, StoreError> {
        let items = self.all_reviews().await?;

        let total_questions = items.len();
        let correct_answers = items.iter().filter(|r| r.ease >= 250).count();
        let due_today = items.iter().filter(|r| r.due <= now).count();
        let average_ease = if total_questions > 0 {
            items.iter().map(|r| f64::from(r.ease)).sum::<f64>() / total_questions as f64
        } else {
            250.0
        };

        Ok(QuizStats {
            total_questions,
            correct_answers,
            average_ease,
            due_today,
            streak_days: self.streak_days().await?,
            last_session: self.last_session().await?,
        })
    }

    async fn streak_days(&self) -> Result<u32, StoreError> {
        match self.kv.get(STREAK_KEY).await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(0),
        }
    }

    async fn last_session(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        match self.kv.get(LAST_SESSION_KEY).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Recompute and persist the session streak. Called once, at
    /// session completion.
    ///
    /// A previous session exactly 1 day earlier extends the streak; a
    /// same-day session leaves it unchanged; anything else (first
    /// session, gap over 1 day, clock skew) resets it to 0. The
    /// `lastSession` timestamp is always overwritten with `now`.
    pub async fn update_last_session(&self, now: DateTime<Utc>) -> Result<u32, StoreError> {
        let previous = self.last_session().await?;
        let streak = self.streak_days().await?;

        let updated = match previous {
            Some(last) => match (now - last).num_days() {
                0 => streak,
                1 => streak + 1,
                _ => 0,
            },
            None => 0,
        };

        self.kv.put(STREAK_KEY, serde_json::to_vec(&updated)?).await?;
        self.kv.put(LAST_SESSION_KEY, serde_json::to_vec(&now)?).await?;
        tracing::debug!(streak = updated, "session streak updated");
        Ok(updated)
    }
}
