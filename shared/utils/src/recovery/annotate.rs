//! Final step: attach an error exactly when nothing usable survived.

use buddy_models::{FlashcardDeck, MindMap, QuizSet};

use super::Schema;

/// Why a result ended up empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Retrieval found nothing, so the model was never asked.
    NoContext,
    /// No strategy produced a structure with candidate items.
    Unparseable,
    /// Candidates parsed, every one failed validation.
    AllInvalid,
}

impl FailureKind {
    pub fn message(self, schema: Schema) -> &'static str {
        match (self, schema) {
            (Self::NoContext, _) => "No documents uploaded. Please upload study materials first.",
            (Self::Unparseable, Schema::Flashcards) => "Could not parse flashcards from model response",
            (Self::Unparseable, Schema::Quiz) => "Could not parse quiz from model response",
            (Self::Unparseable, Schema::MindMap) => "Couldn't generate mindmap. The model response could not be parsed.",
            (Self::AllInvalid, Schema::Flashcards) => "No valid flashcards could be extracted from the model response.",
            (Self::AllInvalid, Schema::Quiz) => {
                "Could not generate valid quiz questions. The model may have returned placeholder content. Try again."
            }
            (Self::AllInvalid, Schema::MindMap) => "Couldn't generate mindmap. The content may not have enough structure.",
        }
    }
}

/// Schema-shaped result that can carry an error.
pub trait RecoveryOutput: Default {
    const SCHEMA: Schema;

    fn has_items(&self) -> bool;
    fn set_error(&mut self, message: String);

    /// Empty result for a request that had no retrieval context.
    fn no_context() -> Self {
        annotate(Self::default(), FailureKind::NoContext)
    }
}

impl RecoveryOutput for FlashcardDeck {
    const SCHEMA: Schema = Schema::Flashcards;

    fn has_items(&self) -> bool {
        !self.is_empty()
    }

    fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }
}

impl RecoveryOutput for QuizSet {
    const SCHEMA: Schema = Schema::Quiz;

    fn has_items(&self) -> bool {
        !self.is_empty()
    }

    fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }
}

impl RecoveryOutput for MindMap {
    const SCHEMA: Schema = Schema::MindMap;

    fn has_items(&self) -> bool {
        !self.is_empty()
    }

    fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }
}

/// Sets the error for `failure` when `output` holds no items.
pub fn annotate<T: RecoveryOutput>(mut output: T, failure: FailureKind) -> T {
    if !output.has_items() {
        output.set_error(failure.message(T::SCHEMA).to_string());
    }
    output
}
