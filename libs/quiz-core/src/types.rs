//! Core types for the quiz engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag identifier. The importance vocabulary (`critical-exam`,
/// `important-exam`, `useful-exam`, `bonus-exam`) maps to sampling
/// weights through [`crate::config::QuizConfig`]; any other string
/// weighs 1.
pub type TagId = String;

/// Answer label for a true statement.
pub const ANSWER_TRUE: &str = "Vrai";
/// Answer label for a negated statement.
pub const ANSWER_FALSE: &str = "Faux";

/// A note from the external note store. Read-only to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub tags: Vec<TagId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Kind of generated question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Mcq,
    Cloze,
    Truefalse,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mcq => "mcq",
            Self::Cloze => "cloze",
            Self::Truefalse => "truefalse",
        }
    }
}

/// A generated question. Transient: built per quiz run, never
/// persisted. `note_id` is a non-owning reference to the source note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub kind: QuestionKind,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_text: Option<String>,
    pub note_id: String,
    pub tag_ids: Vec<TagId>,
}

/// Quiz mode, selecting note scope and target question count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizMode {
    Day,
    Week,
    Month,
}

impl QuizMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            _ => None,
        }
    }
}

/// User-assessed recall quality for one review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Again,
    Hard,
    Good,
    Easy,
}

impl Grade {
    /// Convert to 4-point numeric value (1-4).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Again => 1,
            Self::Hard => 2,
            Self::Good => 3,
            Self::Easy => 4,
        }
    }

    /// Create from 4-point numeric value.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Again),
            2 => Some(Self::Hard),
            3 => Some(Self::Good),
            4 => Some(Self::Easy),
            _ => None,
        }
    }
}

/// Per-question review state. One per question id, created lazily on
/// first grading and upserted on every grading after that.
///
/// Invariants: `ease` stays in the scheduler's [130, 300] bounds;
/// `interval_days` is 0 only before the first grading, >= 1 after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub question_id: String,
    pub note_id: String,
    pub ease: i32,
    pub interval_days: u32,
    pub due: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
}

/// Aggregated review statistics. Derived on demand from the persisted
/// review items, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizStats {
    pub total_questions: usize,
    pub correct_answers: usize,
    pub average_ease: f64,
    pub due_today: usize,
    pub streak_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_session: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn grade_round_trips_through_values() {
        for v in 1..=4u8 {
            let grade = Grade::from_value(v).unwrap();
            assert_eq!(grade.to_value(), v);
        }
        assert_eq!(Grade::from_value(0), None);
        assert_eq!(Grade::from_value(5), None);
    }

    #[test]
    fn quiz_mode_parses() {
        assert_eq!(QuizMode::from_str("day"), Some(QuizMode::Day));
        assert_eq!(QuizMode::from_str("week"), Some(QuizMode::Week));
        assert_eq!(QuizMode::from_str("month"), Some(QuizMode::Month));
        assert_eq!(QuizMode::from_str("year"), None);
    }

    #[test]
    fn note_deserializes_with_missing_optionals() {
        let note: Note =
            serde_json::from_str(r#"{"id":"n1","text":"Un fait."}"#).unwrap();
        assert_eq!(note.id, "n1");
        assert!(note.tags.is_empty());
        assert!(note.updated_at.is_none());
    }
}
