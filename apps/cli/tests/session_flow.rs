//! End-to-end flow: generate a quiz from notes, answer every
//! question, and check persistence and statistics afterwards.

use chrono::Utc;
use quiz_core::grading::Answer;
use quiz_core::types::{Note, QuestionKind, QuizMode, ANSWER_TRUE};
use quiz_core::{generate, QuizConfig, Scheduler};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sidequiz_cli::session::{QuizSession, SessionState};
use sidequiz_cli::store::{MemoryStore, ReviewStore};
use std::time::Duration;

fn notes() -> Vec<Note> {
    let texts = [
        "La loi de Bernoulli est une relation entre pression et vitesse.",
        "Les mitochondries produisent l'énergie cellulaire nécessaire.",
        "La tectonique des plaques déplace lentement les continents.",
        "E = mc^2 relie la masse et l'énergie d'un système.",
        "La photosynthèse transforme la lumière en énergie chimique.",
    ];
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| Note {
            id: format!("n{i}"),
            text: text.to_string(),
            title: None,
            tags: if i == 0 {
                vec!["critical-exam".to_string()]
            } else {
                vec![]
            },
            updated_at: Some(Utc::now()),
        })
        .collect()
}

/// The right answer for a generated question, read from its solution
/// fields the way the UI layer would.
fn correct_answer(kind: QuestionKind, correct_index: Option<usize>, answer_text: Option<&str>) -> Answer {
    match kind {
        QuestionKind::Mcq => Answer::Choice(correct_index.expect("mcq has a correct index")),
        QuestionKind::Truefalse => Answer::Bool(answer_text == Some(ANSWER_TRUE)),
        QuestionKind::Cloze => Answer::Text(answer_text.expect("cloze has an answer").to_string()),
    }
}

#[tokio::test(start_paused = true)]
async fn generated_quiz_runs_to_completion() {
    let questions = generate(
        &notes(),
        QuizMode::Week,
        &QuizConfig::default(),
        Utc::now(),
        &mut StdRng::seed_from_u64(11),
    );
    assert!(!questions.is_empty());
    let total = questions.len() as u32;
    let ids: Vec<String> = questions.iter().map(|q| q.id.clone()).collect();

    let mut session = QuizSession::new(
        questions,
        ReviewStore::new(MemoryStore::new()),
        Scheduler::default(),
        Duration::from_millis(1500),
    );

    while let Some(question) = session.current_question().cloned() {
        let answer = correct_answer(
            question.kind,
            question.correct_index,
            question.answer_text.as_deref(),
        );
        let feedback = session.submit(&answer).await.unwrap();
        assert!(feedback.correct, "solution field answer graded incorrect");
        session.auto_advance().await.unwrap();
    }

    assert_eq!(session.state(), SessionState::Completed { score: total });

    // every graded question is persisted and scheduled out a day
    let now = Utc::now();
    for id in &ids {
        let item = session.store().get_review(id).await.unwrap().unwrap();
        assert_eq!(item.interval_days, 1);
        assert!(item.due > now);
    }

    // nothing is due anymore; an unseen id still is
    let mut probe = ids.clone();
    probe.push("q_unseen_zzzzz".to_string());
    let due = session.store().due_questions(&probe, now).await.unwrap();
    assert_eq!(due.len(), 1);
    assert!(due.contains("q_unseen_zzzzz"));

    let stats = session.stats().await.unwrap();
    assert_eq!(stats.total_questions, ids.len());
    assert_eq!(stats.due_today, 0);
    assert!(stats.last_session.is_some());
    // all answers were correct, so no ease dropped below the initial
    assert_eq!(stats.correct_answers, ids.len());
}

#[tokio::test]
async fn empty_generation_yields_an_immediately_completed_session() {
    let questions = generate(
        &[],
        QuizMode::Day,
        &QuizConfig::default(),
        Utc::now(),
        &mut StdRng::seed_from_u64(0),
    );
    assert!(questions.is_empty());

    let session = QuizSession::new(
        questions,
        ReviewStore::new(MemoryStore::new()),
        Scheduler::default(),
        Duration::from_millis(1500),
    );
    assert_eq!(session.state(), SessionState::Completed { score: 0 });
}
