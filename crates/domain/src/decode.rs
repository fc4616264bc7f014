//! Recovery of JSON payloads from free-form model output.
//!
//! Models asked for "only JSON" still wrap it in markdown fences, quotes or prose. The
//! strategies below are tried in order until one of them produces a value the caller accepts.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use serde::de::DeserializeOwned;

static FENCED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```(?:json)?\s*(.*?)\s*```").expect("valid fenced block pattern")
});

static QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)["`'](?:json\s*)?(\{.*\}|\[.*\])["`']"#).expect("valid quoted pattern")
});

static AFTER_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)json\s*(\{.*\}|\[.*\])").expect("valid keyword pattern")
});

type Strategy = fn(&str) -> Option<&str>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("entire text", entire_text),
    ("fenced code block", fenced_code_block),
    ("quoted JSON", quoted_json),
    ("JSON keyword", after_json_keyword),
    ("bracketed span", bracketed_span),
];

fn entire_text(text: &str) -> Option<&str> {
    Some(text.trim())
}

fn fenced_code_block(text: &str) -> Option<&str> {
    Some(FENCED.captures(text)?.get(1)?.as_str())
}

fn quoted_json(text: &str) -> Option<&str> {
    Some(QUOTED.captures(text)?.get(1)?.as_str())
}

fn after_json_keyword(text: &str) -> Option<&str> {
    Some(AFTER_KEYWORD.captures(text)?.get(1)?.as_str())
}

/// The span from the first opening bracket to the last matching closing bracket.
fn bracketed_span(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let close = if text[start..].starts_with('{') {
        '}'
    } else {
        ']'
    };
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Decodes the first candidate span of `text` that parses as `T` and satisfies `accept`.
pub fn decode<T, F>(text: &str, accept: F) -> Option<T>
where
    T: DeserializeOwned,
    F: Fn(&T) -> bool,
{
    STRATEGIES.iter().find_map(|(name, strategy)| {
        let candidate = strategy(text)?;
        match serde_json::from_str::<T>(candidate) {
            Ok(value) if accept(&value) => {
                debug!("decoded model output using {name}");
                Some(value)
            }
            Ok(_) => {
                debug!("rejected value decoded using {name}");
                None
            }
            Err(err) => {
                debug!("failed to decode model output using {name}: {err}");
                None
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Entry {
        name: String,
    }

    fn entries(text: &str) -> Option<Vec<Entry>> {
        decode(text, |entries: &Vec<Entry>| !entries.is_empty())
    }

    fn entry(name: &str) -> Entry {
        Entry {
            name: name.to_string(),
        }
    }

    #[rstest]
    #[case::plain(r#"[{"name": "A"}]"#)]
    #[case::whitespace("\n  [{\"name\": \"A\"}]  \n")]
    #[case::fenced("Here you go:\n```json\n[{\"name\": \"A\"}]\n```\nEnjoy!")]
    #[case::fenced_without_language("```\n[{\"name\": \"A\"}]\n```")]
    #[case::quoted(r#"The result is '[{"name": "A"}]' as requested."#)]
    #[case::quoted_with_keyword(r#"`json [{"name": "A"}]`"#)]
    #[case::keyword(r#"json [{"name": "A"}]"#)]
    #[case::prose(r#"Sure! [{"name": "A"}] Let me know if you need more."#)]
    fn test_decode_array(#[case] text: &str) {
        assert_eq!(entries(text), Some(vec![entry("A")]));
    }

    #[rstest]
    #[case::empty("")]
    #[case::prose("I could not find any exercise.")]
    #[case::empty_array("[]")]
    #[case::fenced_empty_array("```json\n[]\n```")]
    #[case::broken(r#"[{"name": "A"]"#)]
    #[case::unbalanced("] nothing [")]
    fn test_decode_array_failure(#[case] text: &str) {
        assert_eq!(entries(text), None);
    }

    #[test]
    fn test_decode_object() {
        let text = "Analysis:\n```\n{\"name\": \"B\"}\n```";
        assert_eq!(decode(text, |_: &Entry| true), Some(entry("B")));
    }

    #[test]
    fn test_decode_later_strategy_after_rejection() {
        let text = "[] but actually ```json\n[{\"name\": \"C\"}]\n```";
        assert_eq!(entries(text), Some(vec![entry("C")]));
    }

    #[rstest]
    #[case("abc {\"a\": 1} def", Some("{\"a\": 1}"))]
    #[case("x [1, [2]] y", Some("[1, [2]]"))]
    #[case("{ no end", None)]
    #[case("nothing", None)]
    fn test_bracketed_span(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(bracketed_span(text), expected);
    }
}
