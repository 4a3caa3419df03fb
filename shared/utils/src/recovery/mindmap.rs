//! Mind-map recovery.

use buddy_models::{MindMap, MindMapBranch, DEFAULT_MINDMAP_TITLE};
use serde_json::Value;
use tracing::info;

use super::annotate::{annotate, FailureKind};
use super::{candidate_items, parse_completion, scalar_text, truncate_raw, Schema};

pub const MAX_BRANCHES: usize = 6;
pub const MAX_BRANCH_ITEMS: usize = 5;

/// Leading characters of a name that may not hold a `:`.
const FRAGMENT_PREFIX_CHARS: usize = 5;

/// Trims whitespace and surrounding quote characters.
pub fn strip_quotes(text: &str) -> &str {
    text.trim().trim_matches(|c: char| c == '"' || c == '\'').trim()
}

/// A raw branch name that is a leaked piece of JSON rather than a label.
///
/// A leading quote only marks a fragment when more quoting remains after
/// the surrounding quotes are stripped, as in `"key": "value`.
pub fn is_fragment(raw_name: &str) -> bool {
    let name = strip_quotes(raw_name);
    let leaked_pair = raw_name.trim_start().starts_with(['"', '\'']) && name.contains('"');
    leaked_pair || name.chars().take(FRAGMENT_PREFIX_CHARS).any(|c| c == ':')
}

/// The object holding `branches`; a model sometimes wraps it in an array.
fn mindmap_root(value: &Value) -> &Value {
    match value {
        Value::Array(items) => match items.first() {
            Some(first) if first.get("branches").is_some() => first,
            _ => value,
        },
        _ => value,
    }
}

fn clean_title(root: &Value) -> String {
    let title = root.get("title").map(scalar_text).unwrap_or_default();
    match strip_quotes(&title) {
        "" => DEFAULT_MINDMAP_TITLE.to_string(),
        stripped => stripped.to_string(),
    }
}

pub fn clean_branch(candidate: &Value) -> Option<MindMapBranch> {
    let branch = candidate.as_object()?;
    let raw_name = branch.get("name").map(scalar_text).unwrap_or_default();
    let name = strip_quotes(&raw_name).to_string();
    if name.is_empty() || is_fragment(&raw_name) {
        return None;
    }

    let items = branch
        .get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| strip_quotes(&scalar_text(item)).to_string())
                .filter(|item| !item.is_empty())
                .take(MAX_BRANCH_ITEMS)
                .collect()
        })
        .unwrap_or_default();

    Some(MindMapBranch { name, items })
}

pub fn clean_branches(candidates: &[Value]) -> Vec<MindMapBranch> {
    candidates
        .iter()
        .filter_map(clean_branch)
        .take(MAX_BRANCHES)
        .collect()
}

pub fn recover_mindmap(raw: &str) -> MindMap {
    let schema = Schema::MindMap;
    let mut map = MindMap {
        raw: truncate_raw(raw, schema.raw_limit()),
        ..Default::default()
    };

    let Ok(parsed) = parse_completion(raw, schema) else {
        return annotate(map, FailureKind::Unparseable);
    };
    let root = mindmap_root(&parsed.value);
    let Some(candidates) = candidate_items(root, schema.root_key()) else {
        return annotate(map, FailureKind::Unparseable);
    };

    map.title = clean_title(root);
    map.branches = clean_branches(candidates);
    info!(
        candidates = candidates.len(),
        kept = map.branches.len(),
        "Mind map recovered"
    );
    annotate(map, FailureKind::AllInvalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn branch(name: &str, items: usize) -> Value {
        let items: Vec<String> = (0..items).map(|i| format!("fact {}", i)).collect();
        json!({ "name": name, "items": items })
    }

    #[test]
    fn test_branches_and_items_are_capped() {
        let branches: Vec<Value> = (0..8).map(|i| branch(&format!("Theme {}", i), 7)).collect();
        let raw = json!({ "title": "Biology", "branches": branches }).to_string();
        let map = recover_mindmap(&raw);

        assert_eq!(map.title, "Biology");
        assert_eq!(map.branches.len(), MAX_BRANCHES);
        assert!(map.branches.iter().all(|b| b.items.len() == MAX_BRANCH_ITEMS));
        assert_eq!(map.branches[5].name, "Theme 5");
        assert!(map.error.is_none());
    }

    #[test]
    fn test_fragment_names_are_rejected() {
        assert!(clean_branch(&json!({ "name": "\"content\": \"foo", "items": [] })).is_none());
        assert!(clean_branch(&json!({ "name": "a: b", "items": [] })).is_none());
        assert!(clean_branch(&json!({ "name": "  ", "items": [] })).is_none());
        assert!(clean_branch(&json!({ "items": ["x"] })).is_none());

        let kept = clean_branch(&json!({ "name": "Cell biology: basics", "items": [] })).unwrap();
        assert_eq!(kept.name, "Cell biology: basics");
    }

    #[test]
    fn test_inner_quotes_are_not_fragments() {
        let kept = clean_branch(&json!({ "name": "The \"Big Bang\" theory", "items": [] })).unwrap();
        assert_eq!(kept.name, "The \"Big Bang\" theory");

        let kept = clean_branch(&json!({ "name": "\"Photosynthesis\"", "items": [] })).unwrap();
        assert_eq!(kept.name, "Photosynthesis");

        assert!(is_fragment("\"title\": \"Cells"));
        assert!(!is_fragment("Big \"Bang\""));
    }

    #[test]
    fn test_quotes_are_stripped_from_names_and_items() {
        let kept = clean_branch(&json!({ "name": "'Genetics'", "items": ["\"DNA\"", "''", 42] })).unwrap();
        assert_eq!(kept.name, "Genetics");
        assert_eq!(kept.items, vec!["DNA".to_string(), "42".to_string()]);
    }

    #[test]
    fn test_rejected_branches_do_not_count_toward_cap() {
        let mut branches = vec![branch("\"x\": 1", 1), json!("stray")];
        branches.extend((0..6).map(|i| branch(&format!("Theme {}", i), 1)));
        let kept = clean_branches(&branches);
        assert_eq!(kept.len(), MAX_BRANCHES);
        assert_eq!(kept[0].name, "Theme 0");
    }

    #[test]
    fn test_missing_title_uses_default() {
        let map = recover_mindmap(r#"{"branches": [{"name": "Cells", "items": ["Membrane"]}]}"#);
        assert_eq!(map.title, DEFAULT_MINDMAP_TITLE);
        assert_eq!(map.branches.len(), 1);
    }

    #[test]
    fn test_wrapped_in_array() {
        let map = recover_mindmap(r#"[{"title": "Chemistry", "branches": [{"name": "Bonds", "items": ["Ionic"]}]}]"#);
        assert_eq!(map.title, "Chemistry");
        assert_eq!(map.branches[0].items, vec!["Ionic".to_string()]);
    }

    #[test]
    fn test_error_categories() {
        let map = recover_mindmap("no structure at all");
        assert_eq!(map.error.as_deref(), Some(FailureKind::Unparseable.message(Schema::MindMap)));
        assert_eq!(map.title, DEFAULT_MINDMAP_TITLE);

        let map = recover_mindmap(r#"{"title": "T", "branches": [{"name": "\"a\": 1"}]}"#);
        assert!(map.branches.is_empty());
        assert_eq!(map.error.as_deref(), Some(FailureKind::AllInvalid.message(Schema::MindMap)));
    }
}
