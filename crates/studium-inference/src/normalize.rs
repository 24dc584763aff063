//! Best-effort normalization of raw model responses into parseable JSON text.
//!
//! Models asked for "a raw JSON array, nothing else" still wrap output in
//! markdown fences, prepend prose, or emit LaTeX with unescaped backslashes
//! (`\alpha`, `\ce{...}`) inside string values. This module cleans all of
//! that up without ever failing: anything it cannot improve passes through
//! unchanged and surfaces later as a parse error in [`crate::extract`].
//!
//! The whole pass is isolated behind [`normalize`] so it can be replaced by
//! provider-side structured output without touching callers.

use regex::Regex;
use std::sync::OnceLock;

/// Sentinel standing in for an already-escaped backslash pair during the
/// repair pass. A private-use codepoint, so it cannot collide with content.
const DOUBLE_BACKSLASH_SENTINEL: char = '\u{E000}';

fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```(?:json)?\s*\n(.*?)```").unwrap())
}

fn array_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\[\s*\{.*\}\s*\]").unwrap())
}

/// Normalize a raw model response into best-effort JSON text.
///
/// 1. If the text contains a fenced code block (optionally tagged `json`)
///    whose content carries a JSON array, that content wins. Otherwise a
///    greedy `[ { ... } ]` match over the whole text is extracted.
///    Otherwise the text passes through unchanged.
/// 2. Backslash escaping is repaired for embedded LaTeX (see
///    [`repair_backslash_escapes`]).
///
/// This function never fails; it only improves the odds that
/// [`crate::extract`] succeeds downstream.
pub fn normalize(raw: &str) -> String {
    let candidate = extract_candidate(raw);
    repair_backslash_escapes(candidate)
}

/// Locate the JSON-bearing substring of a raw response.
///
/// Fence captures are lazy, so with nested fences the array-bearing block
/// is found either as one of the captures or by the bracket match over the
/// whole text; wrapper prose in an outer fence never shadows it.
fn extract_candidate(raw: &str) -> &str {
    let mut first_capture = None;
    if raw.contains("```") {
        for caps in fence_re().captures_iter(raw) {
            if let Some(inner) = caps.get(1) {
                let inner = inner.as_str();
                if array_re().is_match(inner) {
                    return inner.trim();
                }
                first_capture.get_or_insert(inner);
            }
        }
    }

    if let Some(m) = array_re().find(raw) {
        return m.as_str();
    }

    // A fenced block with no array in it still beats raw text with fences.
    if let Some(capture) = first_capture {
        return capture.trim();
    }

    raw
}

/// True for characters that may legally follow a backslash in a JSON string.
fn is_json_escape_char(c: char) -> bool {
    matches!(c, '"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't' | 'u')
}

/// Repair backslash escaping broken by literal LaTeX in string values.
///
/// Every already-escaped pair `\\` is masked with a sentinel, every
/// remaining single backslash not followed by a valid JSON escape character
/// is doubled, and the sentinel is restored to `\\`. On already-valid JSON
/// the pass is a no-op, which keeps it idempotent.
pub fn repair_backslash_escapes(text: &str) -> String {
    let masked = text.replace("\\\\", &DOUBLE_BACKSLASH_SENTINEL.to_string());

    let mut out = String::with_capacity(masked.len() + 8);
    let mut chars = masked.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some(&next) if is_json_escape_char(next) => out.push('\\'),
                // Lone or LaTeX backslash (\ce, \alpha, trailing \): double it.
                _ => out.push_str("\\\\"),
            }
        } else {
            out.push(c);
        }
    }

    out.replace(DOUBLE_BACKSLASH_SENTINEL, "\\\\")
}
