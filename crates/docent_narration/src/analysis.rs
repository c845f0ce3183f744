//! Pure text metrics used by the quality gates.
//!
//! Every length in this module is a character count, never a byte count.
//! Chinese characters are those in the CJK Unified Ideographs block
//! (U+4E00..=U+9FFF); ASCII letters are `[A-Za-z]`. Digits, punctuation
//! and whitespace count toward neither class.

use docent_core::QualityVerdict;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Sentence terminators used by deduplication and repetition checks.
static SENTENCE_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[。.!?！？；;]\s*").expect("Valid sentence regex"));

/// Template openers and closers that make narration read like boilerplate.
pub const TEMPLATE_PHRASES: &[&str] = &[
    "大家好",
    "今天我们来聊聊",
    "想象一下",
    "我们不妨先",
    "总之",
    "综上所述",
    "接下来让我们看看",
];

/// Whether `c` is a CJK Unified Ideograph.
pub fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Character length of `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Truncate `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn letter_counts(text: &str) -> (usize, usize) {
    text.chars().fold((0, 0), |(cjk, ascii), c| {
        if is_cjk(c) {
            (cjk + 1, ascii)
        } else if c.is_ascii_alphabetic() {
            (cjk, ascii + 1)
        } else {
            (cjk, ascii)
        }
    })
}

/// CJK share of (CJK + ASCII letter) characters, 0.0 when there are none.
///
/// # Examples
///
/// ```
/// use docent_narration::chinese_ratio;
///
/// assert_eq!(chinese_ratio("注意力机制"), 1.0);
/// assert_eq!(chinese_ratio("12345，。"), 0.0);
/// assert!((chinese_ratio("模型ab") - 0.5).abs() < 1e-9);
/// ```
pub fn chinese_ratio(text: &str) -> f64 {
    let (cjk, ascii) = letter_counts(text);
    if cjk + ascii == 0 {
        return 0.0;
    }
    cjk as f64 / (cjk + ascii) as f64
}

/// ASCII letter share of (CJK + ASCII letter) characters.
pub fn ascii_letter_ratio(text: &str) -> f64 {
    let (cjk, ascii) = letter_counts(text);
    if cjk + ascii == 0 {
        return 0.0;
    }
    ascii as f64 / (cjk + ascii) as f64
}

/// Chinese ratio of several parts taken together.
pub fn combined_chinese_ratio<S: AsRef<str>>(parts: &[S]) -> f64 {
    let (cjk, ascii) = parts
        .iter()
        .map(|part| letter_counts(part.as_ref()))
        .fold((0, 0), |(c, a), (pc, pa)| (c + pc, a + pa));
    if cjk + ascii == 0 {
        return 0.0;
    }
    cjk as f64 / (cjk + ascii) as f64
}

fn trigrams(text: &str) -> HashSet<[char; 3]> {
    let chars: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    chars.windows(3).map(|w| [w[0], w[1], w[2]]).collect()
}

/// Jaccard similarity of the character 3-gram sets of two texts.
///
/// Symmetric; 0.0 when either text is shorter than three non-whitespace
/// characters.
pub fn pair_similarity(a: &str, b: &str) -> f64 {
    let left = trigrams(a);
    let right = trigrams(b);
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let shared = left.intersection(&right).count();
    let union = left.union(&right).count();
    shared as f64 / union as f64
}

/// Split on sentence terminators, dropping blank segments.
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_SPLIT
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Drop repeated sentences, keeping first occurrences in order.
///
/// Survivors are rejoined with the full-width period `。`, so the
/// original terminators are not preserved. Applying the function twice
/// yields the same text as applying it once.
///
/// # Examples
///
/// ```
/// use docent_narration::dedup_sentences;
///
/// assert_eq!(dedup_sentences("甲。乙。甲。"), "甲。乙");
/// assert_eq!(dedup_sentences(""), "");
/// ```
pub fn dedup_sentences(text: &str) -> String {
    let mut seen = HashSet::new();
    split_sentences(text)
        .into_iter()
        .filter(|s| seen.insert(*s))
        .collect::<Vec<_>>()
        .join("。")
}

/// Replace C0 control characters and DEL with spaces.
pub fn strip_control_chars(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_control() { ' ' } else { c })
        .collect()
}

/// Fraction of `。`-delimited segments two texts share.
///
/// Shared distinct segments divided by the segment count of the shorter
/// text (at least 1).
pub fn segment_overlap(a: &str, b: &str) -> f64 {
    let segments = |text: &str| -> HashSet<String> {
        text.split('。')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    };
    let left = segments(a);
    let right = segments(b);
    let shared = left.intersection(&right).count();
    let denominator = left.len().min(right.len()).max(1);
    shared as f64 / denominator as f64
}

/// Template phrases occurring in `text`, in [`TEMPLATE_PHRASES`] order.
pub fn template_phrases(text: &str) -> Vec<String> {
    TEMPLATE_PHRASES
        .iter()
        .filter(|phrase| text.contains(**phrase))
        .map(|phrase| phrase.to_string())
        .collect()
}

/// Compute every metric for a set of narration parts.
///
/// Ratios are computed over the concatenation of all parts; similarity
/// compares the first two parts.
pub fn verdict<S: AsRef<str>>(parts: &[S]) -> QualityVerdict {
    let combined: String = parts.iter().map(AsRef::as_ref).collect();
    let similarity = match parts {
        [first, second, ..] => pair_similarity(first.as_ref(), second.as_ref()),
        _ => 0.0,
    };
    let lengths = parts.iter().map(|p| char_len(p.as_ref())).collect();
    let mut phrases = Vec::new();
    for part in parts {
        for phrase in template_phrases(part.as_ref()) {
            if !phrases.contains(&phrase) {
                phrases.push(phrase);
            }
        }
    }

    QualityVerdict::new(
        chinese_ratio(&combined),
        ascii_letter_ratio(&combined),
        similarity,
        lengths,
        phrases,
    )
}
