//! Recovering a JSON object from free-form model output.
//!
//! Model responses wrap JSON in markdown fences, prepend prose, append
//! commentary and leave trailing commas behind. [`extract_json`] works
//! through an ordered list of strategies, from the strictest to the most
//! forgiving, and returns the first candidate that parses as a JSON
//! object. It never fails: "nothing found" is `None`.

use docent_error::{DocentResult, GenerationError, GenerationErrorKind};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\A```(?:json)?[ \t]*\r?\n").expect("Valid fence regex"));
static TRAILING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n```\s*\z").expect("Valid fence regex"));
static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```json\s*(\{.*?\})\s*```").expect("Valid fenced json regex")
});
static FENCED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```\s*(\{.*?\})\s*```").expect("Valid fenced regex"));
static TRAILING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\{[^\n]*\})\s*\z").expect("Valid trailing line regex"));
static FIRST_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)(\{.*?\})").expect("Valid span regex"));
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("Valid trailing comma regex"));

/// The extraction step that produced an object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, strum::EnumIter,
)]
pub enum ExtractionStrategy {
    /// The whole (fence-stripped) text parsed directly
    #[display("direct")]
    Direct,
    /// Contents of a ```json fence
    #[display("fenced-json")]
    FencedJson,
    /// Contents of an unlabelled fence
    #[display("fenced")]
    Fenced,
    /// An object occupying the end of the last line
    #[display("trailing-line")]
    TrailingLine,
    /// The first `{ ... }` span
    #[display("first-span")]
    FirstSpan,
    /// The first balanced `{ ... }` block, string-aware
    #[display("brace-scan")]
    BraceScan,
    /// Everything from the first `{` to the last `}`
    #[display("outer-span")]
    OuterSpan,
}

/// Extract the first JSON object from a model response.
///
/// # Examples
///
/// ```
/// use docent_narration::extract_json;
///
/// let response = "Here you go:\n```json\n{\"title\": \"方法\", \"bullets\": [\"a\",]}\n```";
/// let object = extract_json(response).unwrap();
/// assert_eq!(object["title"], "方法");
///
/// assert!(extract_json("no json here").is_none());
/// ```
pub fn extract_json(text: &str) -> Option<Map<String, Value>> {
    extract_json_with_strategy(text).map(|(object, _)| object)
}

/// Extract the first JSON object along with the strategy that found it.
pub fn extract_json_with_strategy(text: &str) -> Option<(Map<String, Value>, ExtractionStrategy)> {
    let normalized = normalize(text);
    let cleaned = strip_fences(&normalized);
    if cleaned.is_empty() {
        return None;
    }

    if let Some(object) = parse_object(cleaned) {
        return Some((object, ExtractionStrategy::Direct));
    }

    let patterns: [(&Regex, ExtractionStrategy); 4] = [
        (&*FENCED_JSON, ExtractionStrategy::FencedJson),
        (&*FENCED, ExtractionStrategy::Fenced),
        (&*TRAILING_LINE, ExtractionStrategy::TrailingLine),
        (&*FIRST_SPAN, ExtractionStrategy::FirstSpan),
    ];
    for (pattern, strategy) in patterns {
        let Some(candidate) = pattern.captures(cleaned).and_then(|c| c.get(1)) else {
            continue;
        };
        if let Some(object) = parse_lenient(candidate.as_str()) {
            return Some((object, strategy));
        }
    }

    if let Some(object) = balanced_object(cleaned).and_then(parse_lenient) {
        return Some((object, ExtractionStrategy::BraceScan));
    }

    if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) {
        if end > start {
            if let Some(object) = parse_lenient(&cleaned[start..=end]) {
                return Some((object, ExtractionStrategy::OuterSpan));
            }
        }
    }

    tracing::debug!(
        response_length = text.chars().count(),
        "No JSON object found in response"
    );
    None
}

/// Extract the first JSON object and deserialize it into `T`.
///
/// # Errors
///
/// `ParseFailure` if no object is found, `ShapeInvalid` if it does not
/// match `T`.
pub fn extract_as<T>(text: &str) -> DocentResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let preview = text.chars().take(100).collect::<String>();
    let Some(object) = extract_json(text) else {
        tracing::error!(response_preview = %preview, "No JSON object found in response");
        return Err(GenerationError::new(GenerationErrorKind::ParseFailure).into());
    };

    serde_json::from_value(Value::Object(object)).map_err(|e| {
        tracing::error!(error = %e, response_preview = %preview, "JSON object has unexpected shape");
        GenerationError::new(GenerationErrorKind::ShapeInvalid(e.to_string())).into()
    })
}

/// Drop a byte-order mark and zero-width characters, and turn
/// non-breaking spaces into ordinary spaces.
fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\u{feff}' | '\u{200b}' | '\u{200c}' | '\u{200d}'))
        .map(|c| if c == '\u{a0}' { ' ' } else { c })
        .collect()
}

/// Strip one opening fence line at the very start and one closing fence
/// line at the very end.
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = LEADING_FENCE
        .find(trimmed)
        .map_or(trimmed, |m| &trimmed[m.end()..]);
    let without_close = TRAILING_FENCE
        .find(without_open)
        .map_or(without_open, |m| &without_open[..m.start()]);
    without_close.trim()
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

/// Parse as-is, then again with trailing commas removed.
fn parse_lenient(candidate: &str) -> Option<Map<String, Value>> {
    parse_object(candidate).or_else(|| parse_object(&TRAILING_COMMA.replace_all(candidate, "$1")))
}

/// The first balanced `{ ... }` block, ignoring braces inside strings.
fn balanced_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return start.map(|s| &text[s..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_object() {
        let (object, strategy) = extract_json_with_strategy(r#"{"a": 1}"#).unwrap();
        assert_eq!(object["a"], 1);
        assert_eq!(strategy, ExtractionStrategy::Direct);
    }

    #[test]
    fn test_whole_response_fenced() {
        let response = "```json\n{\"title\": \"引言\"}\n```";
        let (object, strategy) = extract_json_with_strategy(response).unwrap();
        assert_eq!(object["title"], "引言");
        assert_eq!(strategy, ExtractionStrategy::Direct);
    }

    #[test]
    fn test_fence_after_prose_with_trailing_comma() {
        let response = "Here you go:\n```json\n{\"title\":\"方法\",\"bullets\":[\"甲\",\"乙\",],}\n```";
        let object = extract_json(response).unwrap();
        assert_eq!(object["title"], "方法");
        assert_eq!(object["bullets"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_fence_between_prose() {
        let response = "Here you go:\n```json\n{\"title\": \"结果\"}\n```\nHope this helps!";
        let (object, strategy) = extract_json_with_strategy(response).unwrap();
        assert_eq!(object["title"], "结果");
        assert_eq!(strategy, ExtractionStrategy::FencedJson);
    }

    #[test]
    fn test_unlabelled_fence() {
        let response = "结果如下\n```\n{\"a\": {\"b\": 2}}\n```\n谢谢";
        let (object, strategy) = extract_json_with_strategy(response).unwrap();
        assert_eq!(object["a"]["b"], 2);
        assert_eq!(strategy, ExtractionStrategy::Fenced);
    }

    #[test]
    fn test_bom_and_zero_width_characters() {
        let response = "\u{feff}\u{200b}{\"a\":\u{a0}1}";
        assert_eq!(extract_json(response).unwrap()["a"], 1);
    }

    #[test]
    fn test_trailing_line_object() {
        let response = "Some analysis first.\nAnswer: {\"score\": 7}\n";
        let (object, strategy) = extract_json_with_strategy(response).unwrap();
        assert_eq!(object["score"], 7);
        assert_eq!(strategy, ExtractionStrategy::TrailingLine);
    }

    #[test]
    fn test_multiple_objects_returns_first() {
        let response = "first {\"id\": 1} then {\"id\": 2} done";
        assert_eq!(extract_json(response).unwrap()["id"], 1);
    }

    #[test]
    fn test_nested_object_in_prose_uses_brace_scan() {
        let response = "Sure!\n{\"outer\": {\"inner\": \"}\"},\n \"n\": 3}\nanything else?";
        let (object, strategy) = extract_json_with_strategy(response).unwrap();
        assert_eq!(object["n"], 3);
        assert_eq!(object["outer"]["inner"], "}");
        assert_eq!(strategy, ExtractionStrategy::BraceScan);
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let text = r#"x {"a": "{not a brace", "b": "she said \"}\""} y"#;
        assert_eq!(
            balanced_object(text),
            Some(r#"{"a": "{not a brace", "b": "she said \"}\""}"#)
        );
    }

    #[test]
    fn test_unterminated_returns_none() {
        assert!(extract_json("{\"a\": [1, 2").is_none());
        assert!(extract_json("").is_none());
        assert!(extract_json("   \n  ").is_none());
    }

    #[test]
    fn test_array_is_not_an_object() {
        assert!(extract_json("[1, 2, 3]").is_none());
    }

    #[test]
    fn test_extract_as_struct() {
        #[derive(Debug, serde::Deserialize)]
        struct Score {
            score: u32,
        }

        let score: Score = extract_as("result: {\"score\": 9}").unwrap();
        assert_eq!(score.score, 9);

        let missing = extract_as::<Score>("nothing").unwrap_err();
        assert_eq!(missing.generation_kind(), Some(&GenerationErrorKind::ParseFailure));

        let wrong = extract_as::<Score>("{\"score\": \"high\"}").unwrap_err();
        assert!(matches!(
            wrong.generation_kind(),
            Some(GenerationErrorKind::ShapeInvalid(_))
        ));
    }
}
