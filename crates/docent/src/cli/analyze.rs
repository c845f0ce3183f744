//! `docent analyze` handler.

use super::{print_json, read_input};
use docent::{
    DocentResult, QualityVerdict, ascii_letter_ratio, char_len, chinese_ratio, pair_similarity,
    segment_overlap, template_phrases, verdict,
};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct TextMetrics {
    chars: usize,
    chinese_ratio: f64,
    ascii_letter_ratio: f64,
    template_phrases: Vec<String>,
}

#[derive(Serialize)]
struct Comparison {
    pair_similarity: f64,
    sentence_overlap: f64,
    verdict: QualityVerdict,
}

#[derive(Serialize)]
struct Analysis {
    text: TextMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    comparison: Option<Comparison>,
}

/// Print quality metrics for one text, and its similarity to another.
pub fn analyze_text(path: &Path, against: Option<&Path>) -> DocentResult<bool> {
    let text = read_input(path)?;

    let comparison = match against {
        Some(other_path) => {
            let other = read_input(other_path)?;
            Some(Comparison {
                pair_similarity: pair_similarity(&text, &other),
                sentence_overlap: segment_overlap(&text, &other),
                verdict: verdict(&[text.as_str(), other.as_str()]),
            })
        }
        None => None,
    };

    let analysis = Analysis {
        text: TextMetrics {
            chars: char_len(&text),
            chinese_ratio: chinese_ratio(&text),
            ascii_letter_ratio: ascii_letter_ratio(&text),
            template_phrases: template_phrases(&text),
        },
        comparison,
    };

    print_json(&analysis)?;
    Ok(true)
}
