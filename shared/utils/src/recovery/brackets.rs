//! Bracket matching shared by every extraction strategy.
//!
//! A single linear pass over the bytes of the text. Bracket characters that
//! sit inside double-quoted strings are ignored; a backslash inside a string
//! escapes the next byte so `\"` does not end the string. All tracked
//! characters are ASCII, so every returned index is a valid `str` boundary.

/// Where a bracketed block ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockEnd {
    /// Index one past the matching closing bracket.
    Closed(usize),
    /// The text ran out first; holds the text length.
    Truncated(usize),
}

impl BlockEnd {
    pub fn end(self) -> usize {
        match self {
            Self::Closed(end) | Self::Truncated(end) => end,
        }
    }

    pub fn is_truncated(self) -> bool {
        matches!(self, Self::Truncated(_))
    }
}

/// Closing partner of `{` or `[`.
pub fn closing_for(open: u8) -> Option<u8> {
    match open {
        b'{' => Some(b'}'),
        b'[' => Some(b']'),
        _ => None,
    }
}

/// Finds the end of the block opened at `start`.
///
/// Returns `None` when `start` is out of range or not an opening bracket.
pub fn match_block(text: &str, start: usize) -> Option<BlockEnd> {
    let bytes = text.as_bytes();
    let open = *bytes.get(start)?;
    let close = closing_for(open)?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }

        if byte == b'"' {
            in_string = true;
        } else if byte == open {
            depth += 1;
        } else if byte == close {
            depth -= 1;
            if depth == 0 {
                return Some(BlockEnd::Closed(start + offset + 1));
            }
        }
    }

    Some(BlockEnd::Truncated(bytes.len()))
}

/// The block text opened at `start`, with how it ended.
pub fn block_at(text: &str, start: usize) -> Option<(&str, BlockEnd)> {
    let end = match_block(text, start)?;
    Some((&text[start..end.end()], end))
}

/// Appends the closers a truncated block is missing.
///
/// An unterminated string is closed first, then every open bracket in
/// reverse order. Balanced text comes back unchanged.
pub fn close_truncated(block: &str) -> String {
    let mut stack: Vec<u8> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for &byte in block.as_bytes() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => stack.extend(closing_for(byte)),
            b'}' | b']' => {
                if stack.last() == Some(&byte) {
                    stack.pop();
                }
            }
            _ => {}
        }
    }

    let mut completed = block.to_string();
    if escaped {
        completed.pop();
    }
    if in_string {
        completed.push('"');
    }
    while let Some(closer) = stack.pop() {
        completed.push(closer as char);
    }
    completed
}
