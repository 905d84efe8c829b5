use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s<>()\[\]"'`]+"#).expect("valid url regex"));

/// A run of plain text or a hyperlink within one rendered line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Inline {
    Text { text: String },
    Link { url: String },
}

/// Separates `http(s)://` URLs from surrounding text. Sentence punctuation
/// directly after a URL stays in the text run.
pub fn split_links(line: &str) -> Vec<Inline> {
    let mut parts = Vec::new();
    let mut cursor = 0;

    for found in URL.find_iter(line) {
        let url = found
            .as_str()
            .trim_end_matches(|c| matches!(c, '.' | ',' | ';' | ':' | '!' | '?'));
        let url_end = found.start() + url.len();

        if found.start() > cursor {
            parts.push(Inline::Text {
                text: line[cursor..found.start()].to_string(),
            });
        }
        parts.push(Inline::Link {
            url: url.to_string(),
        });
        cursor = url_end;
    }

    if cursor < line.len() {
        parts.push(Inline::Text {
            text: line[cursor..].to_string(),
        });
    }
    parts
}

/// Every distinct URL in `text`, in order of first appearance.
pub fn collect_links(text: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for line in text.lines() {
        for part in split_links(line) {
            if let Inline::Link { url } = part {
                if !urls.contains(&url) {
                    urls.push(url);
                }
            }
        }
    }
    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_in_the_middle_keeps_trailing_punctuation_as_text() {
        let parts = split_links("Resource: Rust Book https://doc.rust-lang.org/book/. Read it");
        assert_eq!(
            parts,
            vec![
                Inline::Text {
                    text: "Resource: Rust Book ".to_string()
                },
                Inline::Link {
                    url: "https://doc.rust-lang.org/book/".to_string()
                },
                Inline::Text {
                    text: ". Read it".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_line_without_links_is_one_text_run() {
        assert_eq!(
            split_links("no links here"),
            vec![Inline::Text {
                text: "no links here".to_string()
            }]
        );
    }

    #[test]
    fn test_two_links_back_to_back() {
        let parts = split_links("http://a.dev https://b.dev");
        assert_eq!(parts.len(), 3);
        assert!(matches!(&parts[2], Inline::Link { url } if url == "https://b.dev"));
    }

    #[test]
    fn test_collect_links_dedupes_across_lines() {
        let text = "Docs: https://react.dev/learn\nAgain https://react.dev/learn, and https://github.com/x/y";
        assert_eq!(
            collect_links(text),
            vec!["https://react.dev/learn", "https://github.com/x/y"]
        );
    }
}
