//! Structured-output recovery
//!
//! Turns unreliable model completions that were asked to be JSON into
//! schema-shaped study material. Every schema runs the same pipeline:
//!
//! 1. [`normalize`]: fences, quote repair, trailing commas
//! 2. [`parse`]: ordered strategies built on [`brackets`]
//! 3. per-schema validate & clean ([`flashcards`], [`quiz`], [`mindmap`])
//! 4. [`annotate`]: error text when nothing usable survived
//!
//! All functions here are pure; they hold no state and never fail.

pub mod annotate;
pub mod brackets;
pub mod flashcards;
pub mod mindmap;
pub mod normalize;
pub mod parse;
pub mod quiz;


use serde_json::Value;

pub use annotate::{annotate, FailureKind, RecoveryOutput};
pub use brackets::{match_block, BlockEnd};
pub use flashcards::recover_flashcards;
pub use mindmap::recover_mindmap;
pub use normalize::{normalize, QuoteRepair};
pub use parse::{parse_structure, ParseFailure, ParsedStructure, Strategy};
pub use quiz::recover_quiz;

/// Output schema a completion is recovered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Flashcards,
    Quiz,
    MindMap,
}

impl Schema {
    /// Key whose value holds the candidate items.
    pub fn root_key(self) -> &'static str {
        match self {
            Self::Flashcards => "flashcards",
            Self::Quiz => "quiz",
            Self::MindMap => "branches",
        }
    }

    /// Characters of raw completion kept for diagnostics.
    pub fn raw_limit(self) -> usize {
        match self {
            Self::Flashcards => 1500,
            Self::Quiz | Self::MindMap => 1000,
        }
    }

    pub fn quote_repair(self) -> QuoteRepair {
        match self {
            Self::Quiz => QuoteRepair::GlobalSwapOrKeyValue,
            Self::Flashcards | Self::MindMap => QuoteRepair::GlobalSwap,
        }
    }

    pub fn allows_field_pairs(self) -> bool {
        matches!(self, Self::Flashcards)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Flashcards => "flashcards",
            Self::Quiz => "quiz",
            Self::MindMap => "mindmap",
        }
    }
}

/// First `limit` characters of the raw completion.
pub fn truncate_raw(raw: &str, limit: usize) -> String {
    raw.chars().take(limit).collect()
}

/// Items under the root key, or the value itself when it is a bare array.
pub fn candidate_items<'a>(value: &'a Value, root_key: &str) -> Option<&'a [Value]> {
    match value {
        Value::Array(items) => Some(items.as_slice()),
        Value::Object(map) => map.get(root_key).and_then(Value::as_array).map(Vec::as_slice),
        _ => None,
    }
}

/// Non-empty string or number content of a field.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Scalar content of a field, empty for anything else.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Runs normalize and parse for `schema`, logging the winning strategy.
pub(crate) fn parse_completion(raw: &str, schema: Schema) -> Result<ParsedStructure, ParseFailure> {
    let normalized = normalize(raw, schema.quote_repair());
    let parsed = parse_structure(&normalized, raw, schema);
    match &parsed {
        Ok(structure) => tracing::info!(schema = schema.label(), strategy = structure.strategy.name(), "Completion parsed"),
        Err(failure) => tracing::warn!(schema = schema.label(), raw_len = failure.raw.len(), "{}", failure),
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate_raw_counts_characters() {
        assert_eq!(truncate_raw("héllo", 2), "hé");
        assert_eq!(truncate_raw("abc", 10), "abc");
    }

    #[test]
    fn test_candidate_items() {
        let wrapped = json!({ "quiz": [1, 2] });
        assert_eq!(candidate_items(&wrapped, "quiz").map(<[Value]>::len), Some(2));
        assert!(candidate_items(&wrapped, "flashcards").is_none());

        let bare = json!([1]);
        assert_eq!(candidate_items(&bare, "quiz").map(<[Value]>::len), Some(1));

        let wrong_type = json!({ "quiz": "none" });
        assert!(candidate_items(&wrong_type, "quiz").is_none());
    }

    #[test]
    fn test_schema_parameters() {
        assert_eq!(Schema::Flashcards.raw_limit(), 1500);
        assert_eq!(Schema::Quiz.raw_limit(), 1000);
        assert_eq!(Schema::Quiz.quote_repair(), QuoteRepair::GlobalSwapOrKeyValue);
        assert!(Schema::Flashcards.allows_field_pairs());
        assert!(!Schema::MindMap.allows_field_pairs());
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!("a")), Some("a".to_string()));
        assert_eq!(value_text(&json!("")), None);
        assert_eq!(value_text(&json!(3)), Some("3".to_string()));
        assert_eq!(value_text(&json!(null)), None);
    }
}
