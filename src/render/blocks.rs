//! Conversion of raw model replies into paragraphs and bullet lists.

use regex::Regex;
use std::sync::LazyLock;

static BOLD: LazyLock<Regex> = LazyLock::new(|| compiled(r"\*\*(.*?)\*\*"));
static LEADING_MARKERS: LazyLock<Regex> = LazyLock::new(|| compiled("(?m)^[\\s\u{2022}*-]+"));
static MARKER: LazyLock<Regex> = LazyLock::new(|| compiled("[\u{2022}*-]"));
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| compiled(r"\s{2,}"));
static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| compiled("^[*\\-\u{2022}]\\s*(.+)$"));

#[allow(clippy::expect_used)]
fn compiled(pattern: &str) -> Regex {
    // Patterns are compile-time constants
    Regex::new(pattern).expect("invalid built-in pattern")
}

/// A display block derived from one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBlock {
    Paragraph(String),
    List(Vec<String>),
}

/// Splits a tutor reply into paragraph and list blocks, in input order.
///
/// Bold delimiters are dropped, bullet markers (`•`, `*`, `-`) at line starts
/// open or extend a list, and any other non-blank line is a paragraph. Runs of
/// two or more whitespace characters, line breaks included, become one space
/// before lines are split, so only single line breaks separate blocks.
pub fn format_bot_message(text: &str) -> Vec<MessageBlock> {
    if text.is_empty() {
        return Vec::new();
    }

    let cleaned = BOLD.replace_all(text, "$1");
    let cleaned = LEADING_MARKERS.replace_all(cleaned.trim(), |caps: &regex::Captures<'_>| {
        MARKER.replace_all(&caps[0], "*").into_owned()
    });
    let cleaned = WHITESPACE_RUN.replace_all(&cleaned, " ");

    let mut blocks = Vec::new();
    let mut current_list: Option<Vec<String>> = None;

    for line in cleaned.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = LIST_ITEM.captures(line) {
            current_list
                .get_or_insert_with(Vec::new)
                .push(caps[1].trim().to_string());
        } else {
            if let Some(items) = current_list.take() {
                blocks.push(MessageBlock::List(items));
            }
            blocks.push(MessageBlock::Paragraph(line.to_string()));
        }
    }

    if let Some(items) = current_list {
        blocks.push(MessageBlock::List(items));
    }

    blocks
}

/// User text is shown as typed: one paragraph, no markup processing.
pub fn format_user_message(text: &str) -> Vec<MessageBlock> {
    vec![MessageBlock::Paragraph(text.to_string())]
}
