//! `{{key}}` placeholder scanning and replacement.
//!
//! Tokens are found by looking for `{{` and then the nearest following `}}`.
//! There is no nesting: in `{{a{{b}}` only `{{b}}` is a token and the leading
//! `{{a` is literal text. An opening `{{` without a closing `}}` is literal.

use crate::record::DataRecord;
use std::borrow::Cow;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// A placeholder occurrence. `start..end` spans the delimiters too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub start: usize,
    pub end: usize,
    pub key: &'a str,
}

/// Result of rendering one piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered<'a> {
    pub text: Cow<'a, str>,
    pub resolved: usize,
    pub unresolved: usize,
}

/// Find every non-overlapping token, left to right.
pub fn scan(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(offset) = text[pos..].find(OPEN) {
        let mut start = pos + offset;
        let Some(close) = text[start + OPEN.len()..].find(CLOSE) else {
            break;
        };
        let end = start + OPEN.len() + close + CLOSE.len();

        // Keys never contain `{{`; the innermost opening wins
        if let Some(inner) = text[start + OPEN.len()..end - CLOSE.len()].rfind(OPEN) {
            start += OPEN.len() + inner;
        }

        tokens.push(Token {
            start,
            end,
            key: &text[start + OPEN.len()..end - CLOSE.len()],
        });
        pos = end;
    }

    tokens
}

/// Offset of the first `{{` that does not open a token, if any.
///
/// That is either a `{{` never followed by `}}`, or one that `scan` passed
/// over because a later `{{` was closer to the next `}}`.
pub fn find_unclosed(text: &str) -> Option<usize> {
    let mut pos = 0;
    for token in scan(text) {
        if let Some(i) = text[pos..token.start].find(OPEN) {
            return Some(pos + i);
        }
        pos = token.end;
    }
    text[pos..].find(OPEN).map(|i| pos + i)
}

/// Replace every token whose key is in `data` with the value's text form.
pub fn render<'a>(text: &'a str, data: &DataRecord) -> Rendered<'a> {
    render_with(text, |key| data.get(key).map(ToString::to_string))
}

/// Replace tokens using `lookup`; `None` leaves the token verbatim.
///
/// Token positions are collected before anything is replaced, and inserted
/// values are never re-scanned.
pub fn render_with<'a, F>(text: &'a str, mut lookup: F) -> Rendered<'a>
where
    F: FnMut(&str) -> Option<String>,
{
    let tokens = scan(text);
    let mut out = String::new();
    let mut last = 0;
    let mut resolved = 0;
    let mut unresolved = 0;

    for token in &tokens {
        match lookup(token.key) {
            Some(value) => {
                if resolved == 0 {
                    out.reserve(text.len());
                }
                out.push_str(&text[last..token.start]);
                out.push_str(&value);
                last = token.end;
                resolved += 1;
                tracing::trace!(key = token.key, "resolved placeholder");
            }
            None => unresolved += 1,
        }
    }

    let text = if resolved == 0 {
        Cow::Borrowed(text)
    } else {
        out.push_str(&text[last..]);
        Cow::Owned(out)
    };

    Rendered {
        text,
        resolved,
        unresolved,
    }
}
