//! Flashcard recovery.

use buddy_models::{Flashcard, FlashcardDeck};
use serde_json::Value;
use tracing::info;

use super::annotate::{annotate, FailureKind};
use super::{candidate_items, parse_completion, truncate_raw, value_text, Schema};

/// Template echoes that are never real content.
pub const PLACEHOLDER_TOKENS: &[&str] = &[
    "...",
    "[term]",
    "What is [term]?",
    "[Definition - 2-3 sentences]",
    "[definition]",
];

pub const MIN_SIDE_CHARS: usize = 5;

const FRONT_KEYS: &[&str] = &["front", "question", "q"];
const BACK_KEYS: &[&str] = &["back", "answer", "a"];

const INTERROGATIVES: &[&str] = &[
    "what", "who", "when", "where", "why", "how", "which", "explain", "describe", "define",
];

fn first_text(card: &serde_json::Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| card.get(*key).and_then(value_text))
        .next()
        .unwrap_or_default()
}

fn is_usable_side(text: &str) -> bool {
    !text.is_empty() && !PLACEHOLDER_TOKENS.contains(&text) && text.chars().count() >= MIN_SIDE_CHARS
}

/// Adds `?` to an interrogative front that has no terminal `?` or `:`.
pub fn punctuate_front(front: String) -> String {
    if front.ends_with('?') || front.ends_with(':') {
        return front;
    }
    let lower = front.to_lowercase();
    if INTERROGATIVES.iter().any(|word| lower.starts_with(word)) {
        format!("{}?", front)
    } else {
        front
    }
}

/// One candidate to a card, `None` when it breaks an invariant.
pub fn clean_flashcard(candidate: &Value) -> Option<Flashcard> {
    let card = candidate.as_object()?;
    let front = first_text(card, FRONT_KEYS).trim().to_string();
    let back = first_text(card, BACK_KEYS).trim().to_string();

    if !is_usable_side(&front) || !is_usable_side(&back) {
        return None;
    }
    Some(Flashcard::new(punctuate_front(front), back))
}

pub fn clean_flashcards(candidates: &[Value]) -> Vec<Flashcard> {
    candidates.iter().filter_map(clean_flashcard).collect()
}

pub fn recover_flashcards(raw: &str) -> FlashcardDeck {
    let schema = Schema::Flashcards;
    let mut deck = FlashcardDeck {
        raw: truncate_raw(raw, schema.raw_limit()),
        ..Default::default()
    };

    let candidates = parse_completion(raw, schema)
        .ok()
        .and_then(|parsed| candidate_items(&parsed.value, schema.root_key()).map(<[Value]>::to_vec));

    let Some(candidates) = candidates else {
        return annotate(deck, FailureKind::Unparseable);
    };

    deck.flashcards = clean_flashcards(&candidates);
    info!(
        candidates = candidates.len(),
        kept = deck.flashcards.len(),
        "Flashcards recovered"
    );
    annotate(deck, FailureKind::AllInvalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_placeholder_front_is_dropped() {
        assert!(clean_flashcard(&json!({ "front": "...", "back": "definition" })).is_none());
        assert!(clean_flashcard(&json!({ "front": "What is [term]?", "back": "A real answer" })).is_none());
        assert!(clean_flashcard(&json!({ "front": "Real question", "back": "[definition]" })).is_none());
    }

    #[test]
    fn test_short_sides_are_dropped() {
        assert!(clean_flashcard(&json!({ "front": "DNA", "back": "Genetic material" })).is_none());
        assert!(clean_flashcard(&json!({ "front": "Define DNA", "back": "Gene" })).is_none());
        assert!(clean_flashcard(&json!({ "front": "   ", "back": "Genetic material" })).is_none());
    }

    #[test]
    fn test_question_mark_added() {
        let card = clean_flashcard(&json!({ "front": "What is DNA", "back": "Genetic material" })).unwrap();
        assert_eq!(card.front, "What is DNA?");

        let card = clean_flashcard(&json!({ "front": "Photosynthesis", "back": "Making sugar from light" })).unwrap();
        assert_eq!(card.front, "Photosynthesis");

        let card = clean_flashcard(&json!({ "front": "Explain the following:", "back": "Making sugar from light" })).unwrap();
        assert_eq!(card.front, "Explain the following:");
    }

    #[test]
    fn test_fallback_keys() {
        let card = clean_flashcard(&json!({ "question": "  Who wrote Hamlet ", "a": "William Shakespeare" })).unwrap();
        assert_eq!(card, Flashcard::new("Who wrote Hamlet?", "William Shakespeare"));

        let card = clean_flashcard(&json!({ "front": "", "q": "Which gas do plants absorb", "answer": "Carbon dioxide" })).unwrap();
        assert_eq!(card.front, "Which gas do plants absorb?");
    }

    #[test]
    fn test_non_object_candidates_are_dropped() {
        assert!(clean_flashcards(&[json!("text"), json!(42), json!(null)]).is_empty());
    }

    #[test]
    fn test_end_to_end_fenced_single_quotes() {
        let raw = "Here you go:\n```json\n{'flashcards': [{'front': 'What is a cell', 'back': 'The basic unit of life'}],}\n```";
        let deck = recover_flashcards(raw);
        assert_eq!(deck.flashcards, vec![Flashcard::new("What is a cell?", "The basic unit of life")]);
        assert_eq!(deck.raw, raw);
        assert!(deck.error.is_none());
    }

    #[test]
    fn test_all_placeholders_reports_invalid() {
        let deck = recover_flashcards(r#"{"flashcards": [{"front": "...", "back": "..."}]}"#);
        assert!(deck.flashcards.is_empty());
        assert_eq!(deck.error.as_deref(), Some(FailureKind::AllInvalid.message(Schema::Flashcards)));
    }

    #[test]
    fn test_garbage_reports_unparseable() {
        let deck = recover_flashcards("The model refused.");
        assert_eq!(deck.error.as_deref(), Some(FailureKind::Unparseable.message(Schema::Flashcards)));
        assert_eq!(deck.raw, "The model refused.");
    }

    #[test]
    fn test_raw_is_truncated() {
        let raw = format!("{}{}", "x".repeat(2000), r#"{"flashcards": []}"#);
        let deck = recover_flashcards(&raw);
        assert_eq!(deck.raw.chars().count(), Schema::Flashcards.raw_limit());
    }
}
