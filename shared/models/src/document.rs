use serde::{Deserialize, Serialize};

/// A chunk of indexed text returned by retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub source: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_id: Option<String>,
}

impl Passage {
    pub fn new(source: impl Into<String>, content: impl Into<String>, note_id: Option<String>) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
            note_id,
        }
    }
}

/// Text pulled out of one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub source: String,
    pub text: String,
    pub note_id: Option<String>,
}

/// Outcome of an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub ok: bool,
    #[serde(default)]
    pub docs: usize,
    #[serde(default)]
    pub chunks: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IngestReport {
    pub fn indexed(docs: usize, chunks: usize) -> Self {
        Self {
            ok: true,
            docs,
            chunks,
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            docs: 0,
            chunks: 0,
            message: Some(message.into()),
        }
    }
}
