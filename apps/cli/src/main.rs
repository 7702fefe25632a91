//! Terminal quiz runner.
//!
//! Loads a JSON note dump, generates a quiz for the chosen mode, and
//! drives the session over stdin: choice letters for mcq, v/f for
//! true/false, typed text for cloze.

use anyhow::{bail, Context};
use quiz_core::grading::Answer;
use quiz_core::types::{Note, QuestionKind, QuizMode};
use quiz_core::{generate, QuizConfig, Scheduler};
use sidequiz_cli::session::{QuizSession, SessionState, FEEDBACK_DELAY};
use sidequiz_cli::store::{ReviewStore, SqliteStore};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: sidequiz <notes.json> [day|week|month] [--memory] [--config <path>]";

struct Args {
    notes_path: PathBuf,
    mode: QuizMode,
    memory: bool,
    config_path: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut notes_path = None;
    let mut mode = QuizMode::Day;
    let mut memory = false;
    let mut config_path = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--memory" => memory = true,
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                config_path = Some(PathBuf::from(path));
            }
            other => {
                if let Some(m) = QuizMode::from_str(other) {
                    mode = m;
                } else if notes_path.is_none() {
                    notes_path = Some(PathBuf::from(other));
                } else {
                    bail!("unexpected argument {other:?}\n{USAGE}");
                }
            }
        }
    }

    Ok(Args {
        notes_path: notes_path.with_context(|| format!("missing notes file\n{USAGE}"))?,
        mode,
        memory,
        config_path,
    })
}

fn load_notes(path: &PathBuf) -> anyhow::Result<Vec<Note>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading notes from {}", path.display()))?;
    serde_json::from_str(&raw).context("notes file is not a JSON array of notes")
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<QuizConfig> {
    match path {
        Some(p) => {
            let raw = std::fs::read_to_string(p)
                .with_context(|| format!("reading config from {}", p.display()))?;
            serde_json::from_str(&raw).context("invalid quiz config")
        }
        None => Ok(QuizConfig::default()),
    }
}

fn open_store(memory: bool) -> anyhow::Result<SqliteStore> {
    if memory {
        return Ok(SqliteStore::open_in_memory()?);
    }
    let dir = dirs::data_dir()
        .context("no platform data directory")?
        .join("sidequiz");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating {}", dir.display()))?;
    Ok(SqliteStore::open(dir.join("reviews.db"))?)
}

fn prompt_line(prompt: &str) -> anyhow::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn parse_answer(kind: QuestionKind, choice_count: usize, input: &str) -> Option<Answer> {
    match kind {
        QuestionKind::Mcq => {
            let index = if let Ok(n) = input.parse::<usize>() {
                n.checked_sub(1)?
            } else {
                let c = input.chars().next()?.to_ascii_uppercase();
                (c as usize).checked_sub('A' as usize)?
            };
            (index < choice_count).then_some(Answer::Choice(index))
        }
        QuestionKind::Truefalse => match input.to_lowercase().as_str() {
            "v" | "vrai" => Some(Answer::Bool(true)),
            "f" | "faux" => Some(Answer::Bool(false)),
            _ => None,
        },
        QuestionKind::Cloze => {
            (!input.is_empty()).then(|| Answer::Text(input.to_string()))
        }
    }
}

async fn run_session(session: &mut QuizSession<SqliteStore>) -> anyhow::Result<()> {
    let total = session.total_questions();

    while let Some(question) = session.current_question().cloned() {
        let number = match session.state() {
            SessionState::Presenting(i) => i + 1,
            _ => break,
        };
        println!("\n[{number}/{total}] {}", question.prompt);

        let answer = loop {
            let input = match question.kind {
                QuestionKind::Mcq => {
                    let choices = question.choices.as_deref().unwrap_or_default();
                    for (i, choice) in choices.iter().enumerate() {
                        println!("  {}. {choice}", (b'A' + i as u8) as char);
                    }
                    prompt_line("> ")?
                }
                QuestionKind::Truefalse => prompt_line("(v)rai / (f)aux > ")?,
                QuestionKind::Cloze => prompt_line("Réponse > ")?,
            };
            let count = question.choices.as_ref().map_or(0, Vec::len);
            match parse_answer(question.kind, count, &input) {
                Some(answer) => break answer,
                None => println!("Entrée invalide."),
            }
        };

        let feedback = session.submit(&answer).await?;
        if feedback.correct {
            println!("✅ Correct!");
        } else {
            println!("❌ Incorrect");
        }
        if let Some(text) = &feedback.answer_text {
            println!("Réponse: {text}");
        }

        session.auto_advance().await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = parse_args()?;
    let notes = load_notes(&args.notes_path)?;
    let config = load_config(args.config_path.as_ref())?;
    tracing::info!(notes = notes.len(), mode = args.mode.as_str(), "starting quiz");

    let store = ReviewStore::new(open_store(args.memory)?);
    let scheduler = Scheduler::default();

    let questions = generate(
        &notes,
        args.mode,
        &config,
        chrono::Utc::now(),
        &mut rand::thread_rng(),
    );
    if questions.is_empty() {
        println!("Aucune question disponible.");
        return Ok(());
    }

    let mut session = QuizSession::new(questions, store, scheduler.clone(), FEEDBACK_DELAY);
    run_session(&mut session).await?;

    if let SessionState::Completed { score } = session.state() {
        let total = session.total_questions();
        let percent = (score as f64 / total as f64 * 100.0).round();
        println!("\n{score} / {total} — {percent}% de réussite");
    }

    let stats = session.stats().await?;
    let reviews = session.store().all_reviews().await?;
    let accuracy = if stats.total_questions > 0 {
        (stats.correct_answers as f64 / stats.total_questions as f64 * 100.0).round()
    } else {
        0.0
    };
    println!("\nStatistiques de révision");
    println!("  Questions révisées : {}", stats.total_questions);
    println!("  Précision          : {accuracy}%");
    println!("  À réviser          : {}", stats.due_today);
    println!("  Série              : {} jours", stats.streak_days);
    println!("  Aisance moyenne    : {:.0}", stats.average_ease);
    println!("  Rétention          : {:.0}%", scheduler.retention(&reviews) * 100.0);

    Ok(())
}
