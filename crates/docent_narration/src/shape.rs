//! Shape validation of an extracted script object.
//!
//! Validation is lenient: unknown keys are ignored and a missing title or
//! short bullet list is defaulted. Only the narration parts cannot be
//! invented here; too few of them is reported as [`ParseOutcome::MissingFields`]
//! so the retry loop can escalate.

use crate::config::GenerationSettings;
use crate::extraction::extract_json;
use docent_core::StructuredContent;
use serde_json::{Map, Value};

/// A field of the structured script object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ShapeField {
    /// `title`
    #[display("title")]
    Title,
    /// `bullets`
    #[display("bullets")]
    Bullets,
    /// `narration_parts`
    #[display("narration_parts")]
    NarrationParts,
}

/// Result of turning a raw response into [`StructuredContent`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Content has the required number of narration parts. `defaulted`
    /// lists the fields that were filled in or padded.
    Success {
        /// The shaped content
        content: StructuredContent,
        /// Fields that had to be defaulted
        defaulted: Vec<ShapeField>,
    },
    /// An object was found but required fields could not be satisfied.
    MissingFields {
        /// Content shaped as far as possible
        partial: StructuredContent,
        /// Fields that are still unsatisfied
        missing: Vec<ShapeField>,
    },
    /// No JSON object could be extracted.
    ParseError,
}

impl ParseOutcome {
    /// Whether the outcome carries complete content.
    pub fn is_success(&self) -> bool {
        matches!(self, ParseOutcome::Success { .. })
    }
}

/// Extract and shape a raw model response in one step.
pub fn parse_structured(
    raw: &str,
    fallback_title: &str,
    settings: &GenerationSettings,
) -> ParseOutcome {
    match extract_json(raw) {
        Some(object) => validate_shape(&object, fallback_title, settings),
        None => ParseOutcome::ParseError,
    }
}

/// Shape an extracted object into [`StructuredContent`].
///
/// - `title` defaults to `fallback_title` when absent or blank.
/// - `bullets` are stringified, truncated to `max_bullets` and padded
///   with `要点N` placeholders up to `min_bullets`.
/// - `narration_parts` are stringified and truncated to the configured
///   count; fewer parts than required is a missing field.
pub fn validate_shape(
    object: &Map<String, Value>,
    fallback_title: &str,
    settings: &GenerationSettings,
) -> ParseOutcome {
    let mut defaulted = Vec::new();

    let title = match object.get("title").map(stringify) {
        Some(title) if !title.trim().is_empty() => title.trim().to_string(),
        _ => {
            defaulted.push(ShapeField::Title);
            fallback_title.to_string()
        }
    };

    let mut bullets: Vec<String> = string_list(object.get("bullets"))
        .into_iter()
        .take(settings.max_bullets)
        .collect();
    if bullets.len() < settings.min_bullets {
        defaulted.push(ShapeField::Bullets);
        while bullets.len() < settings.min_bullets {
            bullets.push(format!("要点{}", bullets.len() + 1));
        }
    }

    let narration_parts: Vec<String> = string_list(object.get("narration_parts"))
        .into_iter()
        .take(settings.narration_parts)
        .collect();
    let complete = narration_parts.len() == settings.narration_parts;
    let content = StructuredContent::new(title, bullets, narration_parts);

    if complete {
        ParseOutcome::Success { content, defaulted }
    } else {
        tracing::debug!(
            parts = content.narration_parts().len(),
            required = settings.narration_parts,
            "Structured content is missing narration parts"
        );
        ParseOutcome::MissingFields {
            partial: content,
            missing: vec![ShapeField::NarrationParts],
        }
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Items of an array field as strings; a lone string counts as one item.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(stringify)
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_title_only_pads_bullets_and_reports_missing_parts() {
        let settings = GenerationSettings::default();
        let outcome = validate_shape(&object(json!({"title": "X"})), "Method", &settings);
        let ParseOutcome::MissingFields { partial, missing } = outcome else {
            panic!("expected missing fields");
        };
        assert_eq!(partial.title(), "X");
        assert_eq!(partial.bullets(), &vec!["要点1", "要点2", "要点3"]);
        assert!(partial.narration_parts().is_empty());
        assert_eq!(missing, vec![ShapeField::NarrationParts]);
    }

    #[test]
    fn test_truncates_bullets_and_parts() {
        let settings = GenerationSettings::default();
        let value = json!({
            "bullets": ["a", "b", "c", "d", "e", "f", "g"],
            "narration_parts": ["一", "二", "三"],
            "extra": true
        });
        let outcome = validate_shape(&object(value), "引言", &settings);
        let ParseOutcome::Success { content, defaulted } = outcome else {
            panic!("expected success");
        };
        assert_eq!(content.title(), "引言");
        assert_eq!(content.bullets().len(), 5);
        assert_eq!(content.narration_parts(), &vec!["一", "二"]);
        assert_eq!(defaulted, vec![ShapeField::Title]);
    }

    #[test]
    fn test_non_string_items_are_stringified() {
        let settings = GenerationSettings::default();
        let value = json!({"title": 7, "bullets": [1, null, "b", true], "narration_parts": ["p", 2]});
        let ParseOutcome::Success { content, .. } = validate_shape(&object(value), "t", &settings)
        else {
            panic!("expected success");
        };
        assert_eq!(content.title(), "7");
        assert_eq!(content.bullets(), &vec!["1", "b", "true"]);
        assert_eq!(content.narration_parts(), &vec!["p", "2"]);
    }

    #[test]
    fn test_parse_error_without_object() {
        let settings = GenerationSettings::default();
        assert_eq!(
            parse_structured("抱歉，我无法完成。", "t", &settings),
            ParseOutcome::ParseError
        );
    }
}
