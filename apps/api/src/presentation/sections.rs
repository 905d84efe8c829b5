//! Splits markdown-ish documents (roadmaps, reports) into titled sections.
//!
//! A title is either a markdown header line (`### Title`) or a line that is bold
//! from end to end (`**Week 1: Foundations**`). Bold fragments inside bullets do not
//! start a section. Horizontal rules are dropped.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static HEADER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s{0,3}#{1,6}\s+(.+?)\s*#*\s*$").expect("valid header regex"));
static BOLD_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\*\*([^*]+?)\*\*\s*:?\s*$").expect("valid bold regex"));
static RULE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(-{3,}|\*{3,}|_{3,})\s*$").expect("valid rule regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Empty for text that precedes the first title, or for unsegmented input.
    pub title: String,
    pub content: String,
}

pub fn segment_sections(text: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut title = String::new();
    let mut body: Vec<&str> = Vec::new();
    let mut saw_title = false;

    for line in text.lines() {
        if RULE_LINE.is_match(line) {
            continue;
        }
        if let Some(found) = section_title(line) {
            push_section(&mut sections, &title, &body);
            title = found;
            body.clear();
            saw_title = true;
        } else {
            body.push(line);
        }
    }
    push_section(&mut sections, &title, &body);

    if !saw_title {
        let content = text.trim();
        if content.is_empty() {
            return Vec::new();
        }
        return vec![Section {
            title: String::new(),
            content: content.to_string(),
        }];
    }

    sections
}

fn section_title(line: &str) -> Option<String> {
    let captured = HEADER_LINE
        .captures(line)
        .or_else(|| BOLD_LINE.captures(line))?;
    let title = captured[1].replace("**", "");
    let title = title.trim().trim_end_matches(':').trim();
    (!title.is_empty()).then(|| title.to_string())
}

fn push_section(sections: &mut Vec<Section>, title: &str, body: &[&str]) {
    let content = body.join("\n").trim().to_string();
    if title.is_empty() && content.is_empty() {
        return;
    }
    sections.push(Section {
        title: title.to_string(),
        content,
    });
}
