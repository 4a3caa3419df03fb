//! Ordered parse strategies.
//!
//! Strategies run in a fixed order and the first one that yields a JSON value
//! wins. Later strategies are lossier, so they are only consulted once every
//! earlier one has been skipped. No strategy failure escapes this module:
//! each becomes a [`Skip`], and only the exhaustion of all of them is
//! reported, as a [`ParseFailure`].

use regex::Regex;
use serde_json::{json, Value};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

use super::brackets::{block_at, close_truncated};
use super::normalize::remove_trailing_commas;
use super::Schema;

/// Marker carried by a total parse failure.
pub const INVALID_OUTPUT_MARKER: &str = "Invalid JSON from model";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Direct,
    Anchored,
    BareArray,
    FieldPairs,
    Loose,
}

impl Strategy {
    pub const ORDER: [Strategy; 5] = [
        Strategy::Direct,
        Strategy::Anchored,
        Strategy::BareArray,
        Strategy::FieldPairs,
        Strategy::Loose,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Anchored => "anchored",
            Self::BareArray => "bare_array",
            Self::FieldPairs => "field_pairs",
            Self::Loose => "loose",
        }
    }
}

/// Why a strategy produced nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Skip {
    #[error("precondition not met: {0}")]
    NotApplicable(&'static str),
    #[error("invalid JSON: {0}")]
    Invalid(String),
    #[error("parsed but empty")]
    Empty,
}

impl From<serde_json::Error> for Skip {
    fn from(error: serde_json::Error) -> Self {
        Self::Invalid(error.to_string())
    }
}

/// A JSON tree plus the strategy that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStructure {
    pub value: Value,
    pub strategy: Strategy,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{marker}")]
pub struct ParseFailure {
    pub raw: String,
    pub marker: &'static str,
}

/// Runs every applicable strategy in order.
///
/// `normalized` feeds the structured strategies; `raw` is used only by the
/// loose fallback and the failure wrapper.
pub fn parse_structure(normalized: &str, raw: &str, schema: Schema) -> Result<ParsedStructure, ParseFailure> {
    for strategy in Strategy::ORDER {
        let attempt = match strategy {
            Strategy::Direct => direct(normalized),
            Strategy::Anchored => anchored(normalized, schema.root_key()),
            Strategy::BareArray => bare_array(normalized, schema.root_key()),
            Strategy::FieldPairs if schema.allows_field_pairs() => field_pairs(normalized, schema.root_key()),
            Strategy::FieldPairs => Err(Skip::NotApplicable("schema has no front/back pairs")),
            Strategy::Loose => loose(raw),
        };

        match attempt {
            Ok(value) => {
                debug!(schema = schema.label(), strategy = strategy.name(), "Parse strategy succeeded");
                return Ok(ParsedStructure { value, strategy });
            }
            Err(skip) => {
                debug!(schema = schema.label(), strategy = strategy.name(), reason = %skip, "Parse strategy skipped");
            }
        }
    }

    Err(ParseFailure {
        raw: raw.to_string(),
        marker: INVALID_OUTPUT_MARKER,
    })
}

fn strict(text: &str) -> Result<Value, Skip> {
    Ok(serde_json::from_str(text)?)
}

/// Parses the block opened at `start`, completing it if the text was cut off.
fn parse_block(text: &str, start: usize) -> Result<Value, Skip> {
    let (block, end) = block_at(text, start).ok_or(Skip::NotApplicable("no bracket at offset"))?;
    match strict(block) {
        Ok(value) => Ok(value),
        Err(skip) if end.is_truncated() => {
            debug!(length = block.len(), "Block truncated, closing open brackets");
            strict(&remove_trailing_commas(&close_truncated(block))).map_err(|_| skip)
        }
        Err(skip) => Err(skip),
    }
}

pub fn direct(text: &str) -> Result<Value, Skip> {
    if text.is_empty() {
        return Err(Skip::Empty);
    }
    strict(text)
}

/// First occurrence of the root key, quoted or bare.
pub fn find_root_key(text: &str, key: &str) -> Option<usize> {
    text.find(&format!("\"{}\"", key))
        .or_else(|| text.find(&format!("'{}'", key)))
        .or_else(|| text.find(key))
}

pub fn anchored(text: &str, root_key: &str) -> Result<Value, Skip> {
    let anchor = find_root_key(text, root_key).ok_or(Skip::NotApplicable("root key absent"))?;
    let start = text[..anchor]
        .rfind('{')
        .ok_or(Skip::NotApplicable("no opening brace before root key"))?;
    parse_block(text, start)
}

pub fn bare_array(text: &str, root_key: &str) -> Result<Value, Skip> {
    let start = text.find('[').ok_or(Skip::NotApplicable("no opening bracket"))?;
    match parse_block(text, start)? {
        Value::Array(items) if !items.is_empty() => Ok(json!({ root_key: items })),
        Value::Array(_) => Err(Skip::Empty),
        _ => Err(Skip::Invalid("block is not an array".to_string())),
    }
}

fn field_pair_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#""front"\s*:\s*"([^"]+)"\s*,\s*"back"\s*:\s*"([^"]+)""#).expect("field pair pattern")
    })
}

/// Scans for adjacent `"front": "...", "back": "..."` pairs, ignoring nesting.
pub fn field_pairs(text: &str, root_key: &str) -> Result<Value, Skip> {
    let cards: Vec<Value> = field_pair_regex()
        .captures_iter(text)
        .map(|cap| json!({ "front": &cap[1], "back": &cap[2] }))
        .collect();

    if cards.is_empty() {
        return Err(Skip::NotApplicable("no front/back pairs"));
    }
    Ok(json!({ root_key: cards }))
}

/// Whole text, then the outermost `{...}`, then the outermost `[...]`.
pub fn loose(raw: &str) -> Result<Value, Skip> {
    let trimmed = raw.trim();
    if let Ok(value) = strict(trimmed) {
        return Ok(value);
    }

    let mut last = Skip::NotApplicable("no bracket pair");
    for (open, close) in [('{', '}'), ('[', ']')] {
        if let (Some(i), Some(j)) = (trimmed.find(open), trimmed.rfind(close)) {
            if j > i {
                match strict(&trimmed[i..=j]) {
                    Ok(value) => return Ok(value),
                    Err(skip) => last = skip,
                }
            }
        }
    }
    Err(last)
}
