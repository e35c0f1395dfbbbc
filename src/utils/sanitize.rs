// Prompt input sanitizer
// Author: kelexine (https://github.com/kelexine)

use once_cell::sync::Lazy;
use regex::Regex;

static CODE_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static ROLE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(system:|user:|assistant:)").unwrap());
static OVERRIDE_PHRASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)ignore\s+previous\s+instructions").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strip prompt-injection patterns and control noise from free-text input
/// before it reaches the model or a cache key.
///
/// Removes fenced code blocks, `system:`/`user:`/`assistant:` role prefixes,
/// and the phrase "ignore previous instructions" (all case-insensitive), then
/// collapses whitespace runs and trims. Pure and infallible; empty input
/// yields an empty string, and the result is a fixed point of the function.
pub fn sanitize_prompt_input(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    // A removal can splice the surrounding text into a fresh injection token
    // ("sys```x```tem:" becomes "system:"), so repeat until nothing changes.
    // Every changing pass strictly shortens the string, so this terminates.
    let mut current = text.to_string();
    loop {
        let next = sanitize_pass(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn sanitize_pass(text: &str) -> String {
    let text = CODE_BLOCK.replace_all(text, "");
    let text = ROLE_PREFIX.replace_all(&text, "");
    let text = OVERRIDE_PHRASE.replace_all(&text, "");
    let text = WHITESPACE_RUN.replace_all(&text, " ");
    text.trim().to_string()
}
