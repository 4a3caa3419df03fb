//! Text cleanup applied before any parse attempt.
//!
//! Normalization never fails. Input that cannot be improved is returned as-is
//! (apart from surrounding whitespace).

use regex::Regex;
use std::sync::OnceLock;

/// How single quotes are repaired for a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteRepair {
    /// Swap every `'` for `"` when the text has no `"` at all.
    GlobalSwap,
    /// Global swap when possible, otherwise rewrite only `'key':` and
    /// `: 'value'` shapes.
    GlobalSwapOrKeyValue,
}

fn fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```[ \t]*[A-Za-z0-9_+.\-]*[ \t]*\r?\n?").expect("fence pattern"))
}

fn trailing_comma_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",\s*([}\]])").expect("trailing comma pattern"))
}

fn quoted_key_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"'([^'"\n]*)'(\s*:)"#).expect("quoted key pattern"))
}

fn quoted_value_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r":\s*'([^'\n]*)'").expect("quoted value pattern"))
}

pub fn normalize(raw: &str, repair: QuoteRepair) -> String {
    let text = strip_fences(raw.trim());
    let text = text.trim();

    let text = if needs_global_swap(text) {
        text.replace('\'', "\"")
    } else {
        match repair {
            QuoteRepair::GlobalSwap => text.to_string(),
            QuoteRepair::GlobalSwapOrKeyValue => repair_key_value_quotes(text),
        }
    };

    remove_trailing_commas(&text)
}

/// Drops fence delimiters, keeping whatever sat between them.
pub fn strip_fences(text: &str) -> String {
    fence_regex().replace_all(text, "").into_owned()
}

/// Single quotes present and no double quote anywhere.
pub fn needs_global_swap(text: &str) -> bool {
    text.contains('\'') && !text.contains('"')
}

/// Rewrites `'key':` and `: 'value'` outside double-quoted strings.
pub fn repair_key_value_quotes(text: &str) -> String {
    outside_strings(text, |segment| {
        let keyed = quoted_key_regex().replace_all(segment, "\"$1\"$2");
        quoted_value_regex().replace_all(&keyed, ": \"$1\"").into_owned()
    })
}

/// Applies `repair` to every stretch of `text` that is not inside a
/// double-quoted string; string contents are copied through untouched.
fn outside_strings(text: &str, repair: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut start = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
                out.push_str(&text[start..=i]);
                start = i + 1;
            }
        } else if c == '"' {
            out.push_str(&repair(&text[start..i]));
            in_string = true;
            start = i;
        }
    }

    if in_string {
        out.push_str(&text[start..]);
    } else {
        out.push_str(&repair(&text[start..]));
    }
    out
}

pub fn remove_trailing_commas(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = trailing_comma_regex().replace_all(&current, "$1").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}
