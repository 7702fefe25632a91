//! Question generation from a note collection.
//!
//! Builds a bounded, weighted, randomized question sequence: notes
//! are replicated by tag weight, the pool is sampled down per mode
//! policy, and each selected note yields at most one question whose
//! kind follows the sentence classification. All randomness flows
//! through the caller's [`Rng`] so generation is reproducible under a
//! seeded source.

use crate::analyzer;
use crate::config::{NoteScope, QuizConfig};
use crate::types::{Note, Question, QuestionKind, QuizMode, ANSWER_FALSE, ANSWER_TRUE};
use chrono::{DateTime, Local, LocalResult, NaiveTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

const MCQ_PROMPT: &str = "Choisis l'énoncé correct:";
const MCQ_WORD_CAP: usize = 50;
const MCQ_DISTRACTORS: usize = 3;
const ID_SUFFIX_LEN: usize = 5;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn negation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(est|sont|a|ont)\b").expect("negation pattern compiles")
    })
}

fn word_split() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\W+").expect("word split pattern compiles"))
}

/// Generate a quiz for `mode`.
///
/// Returns at most the mode's target count; notes with no usable
/// sentence, or whose cloze construction fails, are skipped without
/// substitution, so the result may be shorter or empty.
pub fn generate<R: Rng + ?Sized>(
    notes: &[Note],
    mode: QuizMode,
    config: &QuizConfig,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<Question> {
    let policy = config.policy(mode);

    let cutoff = match policy.scope {
        NoteScope::UpdatedToday => Some(local_day_start(now)),
        NoteScope::All => None,
    };
    let eligible: Vec<&Note> = notes
        .iter()
        .filter(|n| match cutoff {
            Some(c) => n.updated_at.map_or(false, |u| u >= c),
            None => true,
        })
        .collect();

    let mut pool = weighted_pool(&eligible, config);
    if let Some(cap) = policy.pool_cap {
        if pool.len() > cap {
            pool = pool.choose_multiple(rng, cap).copied().collect();
        }
    }

    let take = policy.target_count.min(pool.len());
    let chosen: Vec<&Note> = pool.choose_multiple(rng, take).copied().collect();

    let mut questions = Vec::with_capacity(take);
    for note in chosen {
        if let Some(q) = build_question(note, rng) {
            questions.push(q);
        }
    }
    questions
}

/// Replicate each note by its strongest tag weight (at least once).
/// Duplicate entries are how weighting biases the later uniform
/// sampling.
fn weighted_pool<'a>(notes: &[&'a Note], config: &QuizConfig) -> Vec<&'a Note> {
    let mut pool = Vec::new();
    for note in notes {
        let weight = note
            .tags
            .iter()
            .map(|t| config.tag_weight(t))
            .max()
            .unwrap_or(1)
            .max(1);
        for _ in 0..weight {
            pool.push(*note);
        }
    }
    pool
}

fn build_question<R: Rng + ?Sized>(note: &Note, rng: &mut R) -> Option<Question> {
    let sentences = analyzer::split_sentences(&note.text);
    let base = sentences.choose(rng)?;

    let kind = if analyzer::is_formula(base) {
        // formulas work better as cloze deletions
        QuestionKind::Cloze
    } else if analyzer::is_definition(base) {
        if rng.gen_bool(0.5) {
            QuestionKind::Cloze
        } else {
            QuestionKind::Truefalse
        }
    } else {
        const KINDS: [QuestionKind; 3] =
            [QuestionKind::Mcq, QuestionKind::Cloze, QuestionKind::Truefalse];
        KINDS[rng.gen_range(0..KINDS.len())]
    };

    match kind {
        QuestionKind::Cloze => {
            let cloze = analyzer::make_cloze(base, rng)?;
            Some(Question {
                id: question_id(&note.id, rng),
                kind,
                prompt: cloze.prompt,
                choices: None,
                correct_index: None,
                answer_text: Some(cloze.answer),
                note_id: note.id.clone(),
                tag_ids: note.tags.clone(),
            })
        }
        QuestionKind::Truefalse => {
            let keep_true = rng.gen_bool(0.5);
            let (prompt, answer) = if keep_true {
                (base.clone(), ANSWER_TRUE)
            } else {
                // negate the first copula/possession verb; a sentence
                // without one stays verbatim but is still marked Faux,
                // matching the reference behavior
                let negated = negation_pattern()
                    .replace(base, "n'${1} pas")
                    .into_owned();
                (negated, ANSWER_FALSE)
            };
            Some(Question {
                id: question_id(&note.id, rng),
                kind,
                prompt,
                choices: None,
                correct_index: None,
                answer_text: Some(answer.to_string()),
                note_id: note.id.clone(),
                tag_ids: note.tags.clone(),
            })
        }
        QuestionKind::Mcq => {
            let candidates = distractor_words(&note.text);
            let distractors: Vec<String> = candidates
                .choose_multiple(rng, MCQ_DISTRACTORS)
                .map(|w| format!("Concept lié à \"{w}\""))
                .collect();

            let mut choices = Vec::with_capacity(1 + MCQ_DISTRACTORS);
            choices.push(base.clone());
            choices.extend(distractors);
            choices.shuffle(rng);
            let correct_index = choices.iter().position(|c| c == base)?;

            Some(Question {
                id: question_id(&note.id, rng),
                kind,
                prompt: MCQ_PROMPT.to_string(),
                choices: Some(choices),
                correct_index: Some(correct_index),
                answer_text: None,
                note_id: note.id.clone(),
                tag_ids: note.tags.clone(),
            })
        }
    }
}

/// Unique words longer than 4 characters from the full note text, in
/// first-seen order, capped for large notes.
fn distractor_words(text: &str) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut words = Vec::new();
    for word in word_split().split(text) {
        if word.chars().count() > 4 && seen.insert(word) {
            words.push(word);
            if words.len() == MCQ_WORD_CAP {
                break;
            }
        }
    }
    words
}

/// `q_<noteId>_<random base-36 suffix>`. Uniqueness is probabilistic
/// and scoped to one generation call.
fn question_id<R: Rng + ?Sized>(note_id: &str, rng: &mut R) -> String {
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("q_{note_id}_{suffix}")
}

fn local_day_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let midnight = now.with_timezone(&Local).date_naive().and_time(NaiveTime::MIN);
    match midnight.and_local_timezone(Local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn note(id: &str, text: &str, tags: &[&str]) -> Note {
        Note {
            id: id.to_string(),
            text: text.to_string(),
            title: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            updated_at: Some(Utc::now()),
        }
    }

    fn study_notes(count: usize) -> Vec<Note> {
        (0..count)
            .map(|i| {
                note(
                    &format!("n{i}"),
                    "La photosynthèse transforme la lumière en énergie chimique. \
                     Les chloroplastes contiennent la chlorophylle nécessaire.",
                    &[],
                )
            })
            .collect()
    }

    #[test]
    fn day_mode_returns_at_most_target_from_input_notes() {
        let notes = study_notes(60);
        let cfg = QuizConfig::default();
        let mut rng = StdRng::seed_from_u64(42);

        let questions = generate(&notes, QuizMode::Day, &cfg, Utc::now(), &mut rng);
        assert!(questions.len() <= 20);
        assert!(!questions.is_empty());

        let ids: HashSet<&str> = notes.iter().map(|n| n.id.as_str()).collect();
        for q in &questions {
            assert!(ids.contains(q.note_id.as_str()));
        }
    }

    #[test]
    fn day_mode_skips_notes_not_updated_today() {
        let mut stale = note("old", "Une phrase assez longue pour une question valide.", &[]);
        stale.updated_at = Some(Utc::now() - chrono::Duration::days(2));
        let mut untouched = stale.clone();
        untouched.id = "never".to_string();
        untouched.updated_at = None;

        let cfg = QuizConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let questions = generate(
            &[stale, untouched],
            QuizMode::Day,
            &cfg,
            Utc::now(),
            &mut rng,
        );
        assert!(questions.is_empty());
    }

    #[test]
    fn week_mode_includes_stale_notes() {
        let mut stale = note("old", "La tectonique déplace lentement les plaques continentales.", &[]);
        stale.updated_at = None;

        let cfg = QuizConfig::default();
        let mut found = false;
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            if !generate(&[stale.clone()], QuizMode::Week, &cfg, Utc::now(), &mut rng)
                .is_empty()
            {
                found = true;
                break;
            }
        }
        assert!(found, "stale note never produced a question in week mode");
    }

    #[test]
    fn critical_tag_replicates_note_four_times_in_pool() {
        let tagged = note("a", "texte", &["critical-exam"]);
        let plain = note("b", "texte", &[]);
        let cfg = QuizConfig::default();

        let refs = vec![&tagged, &plain];
        let pool = weighted_pool(&refs, &cfg);

        let tagged_slots = pool.iter().filter(|n| n.id == "a").count();
        let plain_slots = pool.iter().filter(|n| n.id == "b").count();
        assert_eq!(tagged_slots, 4);
        assert_eq!(plain_slots, 1);
    }

    #[test]
    fn unknown_tags_weigh_one() {
        let tagged = note("a", "texte", &["my-own-tag"]);
        let cfg = QuizConfig::default();
        let refs = vec![&tagged];
        assert_eq!(weighted_pool(&refs, &cfg).len(), 1);
    }

    #[test]
    fn notes_without_sentences_are_skipped() {
        let empty = note("e", "   ", &[]);
        let punctuation = note("p", "...!?", &[]);
        let cfg = QuizConfig::default();
        let mut rng = StdRng::seed_from_u64(3);

        let questions = generate(
            &[empty, punctuation],
            QuizMode::Month,
            &cfg,
            Utc::now(),
            &mut rng,
        );
        assert!(questions.is_empty());
    }

    #[test]
    fn generated_questions_are_well_formed() {
        let notes = vec![
            note(
                "phys",
                "La loi de Bernoulli est une relation entre pression et vitesse. \
                 E = mc^2 relie masse et énergie.",
                &["important-exam"],
            ),
            note(
                "bio",
                "Les mitochondries produisent l'adénosine triphosphate cellulaire. \
                 La membrane plasmique contrôle les échanges moléculaires.",
                &[],
            ),
        ];
        let cfg = QuizConfig::default();

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            for q in generate(&notes, QuizMode::Month, &cfg, Utc::now(), &mut rng) {
                assert!(q.id.starts_with(&format!("q_{}_", q.note_id)));
                match q.kind {
                    QuestionKind::Mcq => {
                        let choices = q.choices.expect("mcq has choices");
                        let index = q.correct_index.expect("mcq has a correct index");
                        assert!(index < choices.len());
                        assert!(choices.len() <= 4);
                        assert_eq!(q.prompt, MCQ_PROMPT);
                    }
                    QuestionKind::Cloze => {
                        assert!(q.prompt.contains(analyzer::CLOZE_BLANK));
                        assert!(q.answer_text.is_some());
                    }
                    QuestionKind::Truefalse => {
                        let answer = q.answer_text.expect("truefalse has an answer");
                        assert!(answer == ANSWER_TRUE || answer == ANSWER_FALSE);
                    }
                }
            }
        }
    }

    #[test]
    fn formula_sentences_become_cloze() {
        let notes = vec![note("f", "E = mc^2 relie masse et énergie", &[])];
        let cfg = QuizConfig::default();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            for q in generate(&notes, QuizMode::Month, &cfg, Utc::now(), &mut rng) {
                assert_eq!(q.kind, QuestionKind::Cloze);
            }
        }
    }

    #[test]
    fn negated_truefalse_rewrites_the_copula() {
        let negated = negation_pattern()
            .replace("La Terre est une planète", "n'${1} pas")
            .into_owned();
        assert_eq!(negated, "La Terre n'est pas une planète");
    }

    #[test]
    fn distractor_words_are_unique_ordered_and_capped() {
        let words = distractor_words("lumière lumière énergie mots chlorophylle");
        assert_eq!(words, vec!["lumière", "énergie", "chlorophylle"]);

        let many: String = (0..200).map(|i| format!("motnum{i:03} ")).collect();
        assert_eq!(distractor_words(&many).len(), MCQ_WORD_CAP);
    }

    #[test]
    fn same_seed_generates_identical_quizzes() {
        let notes = study_notes(10);
        let cfg = QuizConfig::default();
        let now = Utc::now();

        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        let qa = generate(&notes, QuizMode::Week, &cfg, now, &mut a);
        let qb = generate(&notes, QuizMode::Week, &cfg, now, &mut b);

        let ids_a: Vec<&str> = qa.iter().map(|q| q.id.as_str()).collect();
        let ids_b: Vec<&str> = qb.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids_a, ids_b);
    }
}
