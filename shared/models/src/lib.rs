//! # Learning Buddy Domain Models
//!
//! Shared types for the study assistant.
//!
//! ## Key Models
//!
//! - **Flashcard / FlashcardDeck**: front/back study cards and the recovered deck
//! - **QuizQuestion / QuizSet**: four-choice questions and the recovered quiz
//! - **MindMap / MindMapBranch**: a bounded title/branches tree
//! - **Note / ChatTurn / NoteState**: persisted notes and chat history
//! - **Passage / IngestReport**: retrieval chunks and upload outcomes
//!
//! Request bodies carry `validator` rules and are checked at the HTTP edge.

pub mod document;
pub mod note;
pub mod requests;
pub mod study;

#[cfg(test)]
pub mod property_tests;

pub use document::*;
pub use note::*;
pub use requests::*;
pub use study::*;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_flashcard_deck_serializes_raw_field() {
        let deck = FlashcardDeck {
            flashcards: vec![Flashcard::new("What is DNA?", "Genetic material")],
            raw: "raw text".to_string(),
            error: None,
        };
        let json = serde_json::to_value(&deck).unwrap();
        assert_eq!(json["_raw"], "raw text");
        assert!(json.get("error").is_none());
        assert_eq!(json["flashcards"][0]["front"], "What is DNA?");
    }

    #[test]
    fn test_quiz_question_has_four_choices() {
        let q = QuizQuestion {
            question: "Which planet is largest?".to_string(),
            choices: [
                "Jupiter".to_string(),
                "Mars".to_string(),
                "Venus".to_string(),
                "Mercury".to_string(),
            ],
            answer_index: 0,
            explanation: String::new(),
        };
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["choices"].as_array().unwrap().len(), QUIZ_CHOICES);
        assert_eq!(q.correct_choice(), "Jupiter");
    }

    #[test]
    fn test_mindmap_default_title() {
        let map = MindMap::default();
        assert_eq!(map.title, DEFAULT_MINDMAP_TITLE);
        assert!(map.is_empty());
    }

    #[test]
    fn test_note_state_defaults_missing_maps() {
        let state: NoteState = serde_json::from_str(r#"{"notes": {}}"#).unwrap();
        assert!(state.chats.is_empty());

        let state: NoteState = serde_json::from_str("{}").unwrap();
        assert!(state.notes.is_empty());
    }

    #[test]
    fn test_new_note_id_prefix() {
        let id = new_note_id();
        assert!(id.starts_with("note_"));
        assert_ne!(id, new_note_id());
    }

    #[test]
    fn test_generate_request_validation() {
        let ok = GenerateRequest {
            topic: Some("cells".to_string()),
            n: Some(12),
            note_id: None,
        };
        assert!(ok.validate().is_ok());

        let too_many = GenerateRequest {
            n: Some(500),
            ..Default::default()
        };
        assert!(too_many.validate().is_err());
    }

    #[test]
    fn test_generate_request_blank_topic() {
        let req = GenerateRequest {
            topic: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(req.topic(), None);
        assert_eq!(req.count_or(10), 10);
    }

    #[test]
    fn test_note_title_request_rejects_empty() {
        let req = NoteTitleRequest { title: String::new() };
        assert!(req.validate().is_err());
    }
}
