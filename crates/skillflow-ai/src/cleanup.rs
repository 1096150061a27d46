//! Plain-text cleanup for model replies.
//!
//! A fixed sequence of regex substitutions that strips the markup models
//! tend to emit even when asked not to. Best effort: nested or malformed
//! markup may survive.

use std::sync::LazyLock;

use regex::Regex;

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").unwrap());
static HEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#+\s+").unwrap());
static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static ORDERED_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\d+\.\s+").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(.+?)\]\(.+?\)").unwrap());
static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Bullet glyph that replaces ordered-list markers.
pub const BULLET: &str = "• ";

/// Strip bold/italic markers, headers, fenced code blocks and link syntax,
/// turn `1.` list markers into bullets, collapse blank-line runs, and trim.
///
/// The pass sequence is repeated until the text stops changing, so cleaning
/// already-cleaned text is a no-op. Every pass that changes the text makes it
/// shorter, which bounds the loop.
pub fn clean_markup(text: &str) -> String {
    let mut current = clean_pass(text);
    loop {
        let next = clean_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_pass(text: &str) -> String {
    let cleaned = BOLD.replace_all(text, "$1");
    let cleaned = ITALIC.replace_all(&cleaned, "$1");
    let cleaned = HEADER.replace_all(&cleaned, "");
    let cleaned = CODE_FENCE.replace_all(&cleaned, "");
    let cleaned = ORDERED_ITEM.replace_all(&cleaned, BULLET);
    let cleaned = LINK.replace_all(&cleaned, "$1");
    let cleaned = BLANK_RUN.replace_all(&cleaned, "\n\n");
    cleaned.trim().to_string()
}
