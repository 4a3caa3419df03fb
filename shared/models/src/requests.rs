use serde::{Deserialize, Serialize};
use validator::Validate;

/// Upper bound on items requested from one generation call.
pub const MAX_GENERATED_ITEMS: u32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AskRequest {
    #[validate(length(min = 1, max = 2000))]
    pub question: String,
    #[serde(default)]
    pub note_id: Option<String>,
}

/// Summary, flashcard, quiz and mind-map requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct GenerateRequest {
    #[serde(default)]
    #[validate(length(max = 200))]
    pub topic: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1, max = 50))]
    pub n: Option<u32>,
    #[serde(default)]
    pub note_id: Option<String>,
}

impl GenerateRequest {
    /// Topic with surrounding whitespace removed, `None` when blank.
    pub fn topic(&self) -> Option<&str> {
        self.topic
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn count_or(&self, default: u32) -> u32 {
        self.n.unwrap_or(default).clamp(1, MAX_GENERATED_ITEMS)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NoteTitleRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
}
