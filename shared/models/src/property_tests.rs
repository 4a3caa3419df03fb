//! Property-based tests for the shared models.

use proptest::prelude::*;

use crate::{ChatTurn, GenerateRequest, Note, NoteState, MAX_GENERATED_ITEMS};

prop_compose! {
    fn arb_note_state()(
        titles in prop::collection::vec("[A-Za-z ]{1,20}", 0..10),
        turns in 0..5usize,
    ) -> NoteState {
        let mut state = NoteState::default();
        for (i, title) in titles.into_iter().enumerate() {
            let id = format!("note_{:02}", i);
            state.chats.insert(
                id.clone(),
                (0..turns).map(|t| ChatTurn { question: format!("q{}", t), answer: "a".to_string(), ts: t as i64 }).collect(),
            );
            state.notes.insert(id, Note { title, created_at: None });
        }
        state
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_requested_count_is_bounded(n in proptest::option::of(0u32..10_000), default in 1u32..100) {
        let req = GenerateRequest { topic: None, n, note_id: None };
        let count = req.count_or(default);
        prop_assert!(count >= 1);
        prop_assert!(count <= MAX_GENERATED_ITEMS);
    }

    #[test]
    fn prop_summaries_cover_every_note(state in arb_note_state()) {
        let summaries = state.summaries();
        prop_assert_eq!(summaries.len(), state.notes.len());
        for summary in &summaries {
            prop_assert!(state.contains(&summary.id));
        }
    }

    #[test]
    fn prop_state_survives_persistence_format(state in arb_note_state()) {
        let text = serde_json::to_string_pretty(&state).unwrap();
        let back: NoteState = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(back, state);
    }
}
