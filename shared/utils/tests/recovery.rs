//! End-to-end recovery of realistic model replies through the public API.

use buddy_utils::{recover_flashcards, recover_mindmap, recover_quiz, FailureKind, Schema};
use serde_json::json;

#[test]
fn fenced_single_quoted_flashcards_serialize_to_the_result_shape() {
    let raw = "Here you go:\n```json\n{'flashcards': [{'front': 'What is a cell', 'back': 'The basic unit of life'}],}\n```";
    let deck = recover_flashcards(raw);

    assert_eq!(
        serde_json::to_value(&deck).unwrap(),
        json!({
            "flashcards": [{ "front": "What is a cell?", "back": "The basic unit of life" }],
            "_raw": raw,
        })
    );
}

#[test]
fn chatty_reply_with_trailing_prose_is_recovered() {
    let raw = r#"Of course! Below is your quiz.

```
{"quiz": [
  {"question": "Which organelle produces energy?", "choices": ["A) Mitochondria", "B) Nucleus", "C) Ribosome", "D) Golgi"], "answer_index": 0, "explanation": "Mitochondria make ATP."},
  {"question": "What is this?", "choices": ["A", "B", "C", "D"], "answer_index": 1},
]}
```
Let me know if you want more!"#;

    let set = recover_quiz(raw);
    assert_eq!(set.quiz.len(), 1);
    assert_eq!(set.quiz[0].choices, ["Mitochondria", "Nucleus", "Ribosome", "Golgi"].map(String::from));
    assert_eq!(set.quiz[0].correct_choice(), "Mitochondria");
}

#[test]
fn truncated_mindmap_keeps_complete_branches() {
    let raw = r#"{"title": "Ecology", "branches": [{"name": "Producers", "items": ["Plants", "Algae"]}, {"name": "Consumers", "items": ["Herbiv"#;
    let map = recover_mindmap(raw);

    assert_eq!(map.title, "Ecology");
    assert_eq!(map.branches[0].name, "Producers");
    assert_eq!(map.branches.len(), 2);
    assert_eq!(map.branches[1].items, vec!["Herbiv".to_string()]);
}

#[test]
fn each_schema_reports_its_own_failure() {
    let reply = "I'm sorry, I can't do that.";

    assert_eq!(
        recover_flashcards(reply).error.as_deref(),
        Some(FailureKind::Unparseable.message(Schema::Flashcards))
    );
    assert_eq!(recover_quiz(reply).error.as_deref(), Some(FailureKind::Unparseable.message(Schema::Quiz)));
    assert_eq!(
        recover_mindmap(reply).error.as_deref(),
        Some(FailureKind::Unparseable.message(Schema::MindMap))
    );
}
