//! Study material shapes returned to callers.
//!
//! These are the schema-exact results of the recovery layer. Every result
//! carries the truncated raw completion under `_raw` and, when nothing usable
//! survived, an `error` string.

use serde::{Deserialize, Serialize};

/// Number of answer slots in every quiz question.
pub const QUIZ_CHOICES: usize = 4;

/// Default mind-map title when the model gave none.
pub const DEFAULT_MINDMAP_TITLE: &str = "Your Notes";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

impl Flashcard {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardDeck {
    pub flashcards: Vec<Flashcard>,
    #[serde(rename = "_raw", default)]
    pub raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FlashcardDeck {
    pub fn is_empty(&self) -> bool {
        self.flashcards.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub choices: [String; QUIZ_CHOICES],
    pub answer_index: usize,
    #[serde(default)]
    pub explanation: String,
}

impl QuizQuestion {
    /// Text of the choice marked as correct.
    pub fn correct_choice(&self) -> &str {
        &self.choices[self.answer_index.min(QUIZ_CHOICES - 1)]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSet {
    pub quiz: Vec<QuizQuestion>,
    #[serde(rename = "_raw", default)]
    pub raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QuizSet {
    pub fn is_empty(&self) -> bool {
        self.quiz.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindMapBranch {
    pub name: String,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindMap {
    pub title: String,
    pub branches: Vec<MindMapBranch>,
    #[serde(rename = "_raw", default)]
    pub raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Default for MindMap {
    fn default() -> Self {
        Self {
            title: DEFAULT_MINDMAP_TITLE.to_string(),
            branches: Vec::new(),
            raw: String::new(),
            error: None,
        }
    }
}

impl MindMap {
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}
