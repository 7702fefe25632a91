//! Injected generation policy.
//!
//! Tag weights and the per-mode note scope / target count / pool cap
//! live here instead of being hard-coded in the generator, so callers
//! can override them (the CLI accepts a JSON config file).

use crate::types::QuizMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which notes a mode draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteScope {
    /// Only notes updated since local midnight.
    UpdatedToday,
    /// Every note.
    All,
}

/// Per-mode generation policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModePolicy {
    pub scope: NoteScope,
    /// Upper bound on generated questions.
    pub target_count: usize,
    /// Uniform pre-sample cap on the weighted pool; `None` keeps the
    /// full pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_cap: Option<usize>,
}

/// Full generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Tag id -> sampling weight. Unknown tags weigh 1.
    pub tag_weights: HashMap<String, u32>,
    pub day: ModePolicy,
    pub week: ModePolicy,
    pub month: ModePolicy,
}

impl Default for QuizConfig {
    fn default() -> Self {
        let tag_weights = HashMap::from([
            ("critical-exam".to_string(), 4),
            ("important-exam".to_string(), 3),
            ("useful-exam".to_string(), 2),
            ("bonus-exam".to_string(), 1),
        ]);

        Self {
            tag_weights,
            day: ModePolicy {
                scope: NoteScope::UpdatedToday,
                target_count: 20,
                pool_cap: Some(200),
            },
            week: ModePolicy {
                scope: NoteScope::All,
                target_count: 40,
                pool_cap: Some(200),
            },
            month: ModePolicy {
                scope: NoteScope::All,
                target_count: 60,
                pool_cap: None,
            },
        }
    }
}

impl QuizConfig {
    /// Policy for a mode.
    pub fn policy(&self, mode: QuizMode) -> &ModePolicy {
        match mode {
            QuizMode::Day => &self.day,
            QuizMode::Week => &self.week,
            QuizMode::Month => &self.month,
        }
    }

    /// Sampling weight for a tag, defaulting to 1.
    pub fn tag_weight(&self, tag: &str) -> u32 {
        self.tag_weights.get(tag).copied().unwrap_or(1)
    }
}
