//! Sentence segmentation and content-pattern classification.
//!
//! Classifies note text so the generator can pick a question kind
//! that suits the material: formulas become cloze deletions,
//! definitions lean towards cloze/true-false.

use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;

/// Blank marker inserted by cloze construction.
pub const CLOZE_BLANK: &str = "____";

/// A fill-in-the-blank question built from one sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cloze {
    pub prompt: String,
    pub answer: String,
}

fn formula_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // bare assignment: letter = something that is not '='
            r"[a-zA-Z]\s*=\s*[^=]",
            // arithmetic expression
            r"\d+\s*[+\-*/]\s*\d+",
            // mathematical symbols
            r"[∫∑∏√∂∇]",
            // exponent / subscript markup
            r"\^[0-9{}]+",
            r"_[0-9{}]+",
            // backslash-escaped macro token
            r"\\[a-zA-Z]+",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("formula pattern compiles"))
        .collect()
    })
}

fn definition_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // copula followed by an article
            r"(?i)\b(est|sont)\s+(un|une|le|la|les|des)\s+",
            // colon introducing a capitalized term
            r":\s*[A-Z]",
            // explicit definition marker
            r"(?i)définition\s*:",
            r"(?i)déf\s*:",
            r#"=\s*""#,
        ]
        .iter()
        .map(|p| Regex::new(p).expect("definition pattern compiles"))
        .collect()
    })
}

/// Split note text into sentences: newlines collapse to spaces, then
/// split on `.` `?` `!` runs, trimming and dropping empty results.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.replace('\n', " ")
        .split(['.', '?', '!'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether the text looks like a formula.
pub fn is_formula(text: &str) -> bool {
    formula_patterns().iter().any(|rx| rx.is_match(text))
}

/// Whether the text looks like a definition.
pub fn is_definition(text: &str) -> bool {
    definition_patterns().iter().any(|rx| rx.is_match(text))
}

/// Build a cloze deletion from a sentence.
///
/// Collects words longer than 3 characters; with fewer than 2 of them
/// the sentence is too thin to blank out and `None` is returned (the
/// caller skips the sentence). Otherwise one word is picked uniformly
/// and every case-insensitive whole-word occurrence is replaced with
/// [`CLOZE_BLANK`].
pub fn make_cloze<R: Rng + ?Sized>(sentence: &str, rng: &mut R) -> Option<Cloze> {
    let words: Vec<&str> = sentence
        .split_whitespace()
        .filter(|w| w.chars().count() > 3)
        .collect();
    if words.len() < 2 {
        return None;
    }

    let target = words[rng.gen_range(0..words.len())];
    let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(target)))
        .expect("escaped word pattern compiles");
    let prompt = pattern.replace_all(sentence, CLOZE_BLANK).into_owned();

    Some(Cloze {
        prompt,
        answer: target.to_string(),
    })
}
