use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Prefix for generated note identifiers.
pub const NOTE_ID_PREFIX: &str = "note";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Note {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            created_at: Some(Utc::now()),
        }
    }
}

/// Listing entry for a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSummary {
    pub id: String,
    pub title: String,
}

/// One question/answer exchange, `ts` in unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
    pub ts: i64,
}

impl ChatTurn {
    pub fn now(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            ts: Utc::now().timestamp(),
        }
    }
}

/// Whole persisted state: note metadata and per-note chat history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteState {
    #[serde(default)]
    pub notes: BTreeMap<String, Note>,
    #[serde(default)]
    pub chats: BTreeMap<String, Vec<ChatTurn>>,
}

impl NoteState {
    /// Notes ordered by creation time, then id.
    pub fn summaries(&self) -> Vec<NoteSummary> {
        let mut entries: Vec<(&String, &Note)> = self.notes.iter().collect();
        entries.sort_by(|a, b| a.1.created_at.cmp(&b.1.created_at).then_with(|| a.0.cmp(b.0)));
        entries
            .into_iter()
            .map(|(id, note)| NoteSummary {
                id: id.clone(),
                title: note.title.clone(),
            })
            .collect()
    }

    pub fn contains(&self, note_id: &str) -> bool {
        self.notes.contains_key(note_id)
    }
}

pub fn new_note_id() -> String {
    format!("{}_{}", NOTE_ID_PREFIX, Uuid::new_v4().simple())
}
