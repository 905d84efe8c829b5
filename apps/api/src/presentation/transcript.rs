//! Splits a stored interview transcript back into role-tagged lines.
//!
//! Convention: one `role: content` paragraph per turn, paragraphs separated by a
//! blank line. A paragraph without a role prefix continues the previous turn.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::interview::session::Role;

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n").expect("valid paragraph regex"));
static ROLE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^\s*(user|assistant)\s*:\s*(.*)$").expect("valid role regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLine {
    /// `None` only when the text carried no recognizable role prefix at all.
    pub role: Option<Role>,
    pub content: String,
}

pub fn parse_transcript(text: &str) -> Vec<TranscriptLine> {
    let mut lines: Vec<TranscriptLine> = Vec::new();

    for paragraph in PARAGRAPH_BREAK.split(text) {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }

        match ROLE_PREFIX.captures(paragraph) {
            Some(caps) => {
                let role = if caps[1].eq_ignore_ascii_case("user") {
                    Role::User
                } else {
                    Role::Assistant
                };
                lines.push(TranscriptLine {
                    role: Some(role),
                    content: caps[2].trim().to_string(),
                });
            }
            None => match lines.last_mut() {
                Some(previous) => {
                    previous.content.push_str("\n\n");
                    previous.content.push_str(paragraph);
                }
                None => lines.push(TranscriptLine {
                    role: None,
                    content: paragraph.to_string(),
                }),
            },
        }
    }

    if lines.iter().all(|l| l.role.is_none()) && !lines.is_empty() {
        return vec![TranscriptLine {
            role: None,
            content: text.trim().to_string(),
        }];
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_tagged_paragraphs() {
        let text = "assistant: Tell me about yourself.\n\nuser: I build APIs in Rust.\n\nassistant: Why Rust?";
        let lines = parse_transcript(text);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].role, Some(Role::Assistant));
        assert_eq!(lines[1].role, Some(Role::User));
        assert_eq!(lines[1].content, "I build APIs in Rust.");
    }

    #[test]
    fn test_untagged_paragraph_continues_previous_turn() {
        let text = "user: First part.\n\nSecond part of the same answer.\n\nassistant: Thanks.";
        let lines = parse_transcript(text);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0].content,
            "First part.\n\nSecond part of the same answer."
        );
    }

    #[test]
    fn test_prefix_is_case_insensitive_and_multiline() {
        let lines = parse_transcript("User: line one\nline two");
        assert_eq!(lines[0].role, Some(Role::User));
        assert_eq!(lines[0].content, "line one\nline two");
    }

    #[test]
    fn test_untagged_text_degrades_to_single_block() {
        let lines = parse_transcript("Q: hello\n\nA: hi there");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].role, None);
        assert_eq!(lines[0].content, "Q: hello\n\nA: hi there");
    }

    #[test]
    fn test_empty_transcript() {
        assert!(parse_transcript("").is_empty());
    }
}
