//! Parses "intro sentence, then `1. Title: description` items" suggestion text.
//!
//! Items may sit on their own lines or run inline. An item marker is only accepted
//! when its number is the next one in sequence, so stray numbers inside prose
//! ("Python 3. Also...") do not split an item.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static ITEM_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)(\d{1,2})\.\s+").expect("valid item regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionItem {
    pub number: u32,
    pub title: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionList {
    pub intro: String,
    pub items: Vec<SuggestionItem>,
}

pub fn parse_suggestions(text: &str) -> SuggestionList {
    // (number, marker start, body start)
    let mut markers: Vec<(u32, usize, usize)> = Vec::new();
    let mut expected = 1;
    for caps in ITEM_MARKER.captures_iter(text) {
        let number: u32 = match caps[1].parse() {
            Ok(n) => n,
            Err(_) => continue,
        };
        if number != expected {
            continue;
        }
        let (Some(whole), Some(num)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        markers.push((number, num.start(), whole.end()));
        expected += 1;
    }

    if markers.is_empty() {
        return SuggestionList {
            intro: strip_emphasis(text.trim()),
            items: Vec::new(),
        };
    }

    let intro = strip_emphasis(text[..markers[0].1].trim());
    let items = markers
        .iter()
        .enumerate()
        .map(|(i, &(number, _, body_start))| {
            let body_end = markers.get(i + 1).map(|m| m.1).unwrap_or(text.len());
            parse_item(number, text[body_start..body_end].trim())
        })
        .collect();

    SuggestionList { intro, items }
}

fn parse_item(number: u32, body: &str) -> SuggestionItem {
    match body.split_once(':') {
        Some((title, description)) if is_title_like(title) => SuggestionItem {
            number,
            title: Some(strip_emphasis(title.trim())),
            description: strip_emphasis(description.trim()),
        },
        _ => SuggestionItem {
            number,
            title: None,
            description: strip_emphasis(body),
        },
    }
}

/// Titles are short, single-line labels such as "Quantify Your Achievements".
fn is_title_like(candidate: &str) -> bool {
    let trimmed = candidate.trim();
    !trimmed.is_empty() && !trimmed.contains('\n') && trimmed.chars().count() <= 80
}

fn strip_emphasis(text: &str) -> String {
    text.replace("**", "")
        .replace("__", "")
        .trim_matches(|c| c == '*' || c == '_')
        .trim()
        .to_string()
}
