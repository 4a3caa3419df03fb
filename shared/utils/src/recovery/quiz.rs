//! Quiz recovery.
//!
//! Choices are cleaned slot by slot. A stub in one slot is replaced by an
//! `Option X` label for that slot; a question whose supplied choices are all
//! stubs is rejected outright.

use buddy_models::{QuizQuestion, QuizSet, QUIZ_CHOICES};
use serde_json::Value;
use tracing::info;

use super::annotate::{annotate, FailureKind};
use super::{candidate_items, parse_completion, scalar_text, truncate_raw, value_text, Schema};

pub const MIN_QUESTION_CHARS: usize = 10;
pub const MIN_CHOICE_CHARS: usize = 3;

const STUB_CHOICES: &[&str] = &["A", "B", "C", "D", "a", "b", "c", "d", "...", ""];

fn is_stub(choice: &str) -> bool {
    STUB_CHOICES.contains(&choice) || choice.chars().count() < MIN_CHOICE_CHARS
}

/// `Option A` .. `Option D` for slot `index`.
pub fn option_label(index: usize) -> String {
    format!("Option {}", char::from(b'A' + index as u8))
}

/// Drops an `A.` / `b)` / `C:` style prefix.
pub fn strip_letter_prefix(choice: &str) -> &str {
    let mut chars = choice.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(letter), Some(mark), Some(_)) if "ABCDabcd".contains(letter) && ".):".contains(mark) => {
            choice[2..].trim()
        }
        _ => choice,
    }
}

/// Four cleaned choices, or `None` when every supplied choice is a stub.
pub fn clean_choices(supplied: &[Value]) -> Option<[String; QUIZ_CHOICES]> {
    let cleaned: Vec<String> = supplied
        .iter()
        .map(|c| strip_letter_prefix(scalar_text(c).trim()).to_string())
        .collect();
    if cleaned.iter().all(|text| is_stub(text)) {
        return None;
    }

    let mut slots: Vec<String> = cleaned
        .into_iter()
        .take(QUIZ_CHOICES)
        .enumerate()
        .map(|(index, text)| if is_stub(&text) { option_label(index) } else { text })
        .collect();

    while slots.len() < QUIZ_CHOICES {
        slots.push(option_label(slots.len()));
    }
    slots.try_into().ok()
}

/// Integer in `0..4`; strings and floats are coerced, anything else is 0.
pub fn coerce_answer_index(value: Option<&Value>) -> usize {
    let index = match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match index {
        Some(i) if (0..QUIZ_CHOICES as i64).contains(&i) => i as usize,
        _ => 0,
    }
}

pub fn clean_question(candidate: &Value) -> Option<QuizQuestion> {
    let q = candidate.as_object()?;
    let choices = clean_choices(q.get("choices")?.as_array()?)?;

    let question = q.get("question").and_then(value_text)?.trim().to_string();
    if question.chars().count() < MIN_QUESTION_CHARS {
        return None;
    }

    Some(QuizQuestion {
        question,
        choices,
        answer_index: coerce_answer_index(q.get("answer_index")),
        explanation: q.get("explanation").map(scalar_text).unwrap_or_default().trim().to_string(),
    })
}

pub fn clean_questions(candidates: &[Value]) -> Vec<QuizQuestion> {
    candidates.iter().filter_map(clean_question).collect()
}

pub fn recover_quiz(raw: &str) -> QuizSet {
    let schema = Schema::Quiz;
    let mut set = QuizSet {
        raw: truncate_raw(raw, schema.raw_limit()),
        ..Default::default()
    };

    let candidates = parse_completion(raw, schema)
        .ok()
        .and_then(|parsed| candidate_items(&parsed.value, schema.root_key()).map(<[Value]>::to_vec));

    let Some(candidates) = candidates else {
        return annotate(set, FailureKind::Unparseable);
    };

    set.quiz = clean_questions(&candidates);
    info!(candidates = candidates.len(), kept = set.quiz.len(), "Quiz recovered");
    annotate(set, FailureKind::AllInvalid)
}
