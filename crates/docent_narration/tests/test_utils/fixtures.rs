//! Deterministic Chinese text fixtures.

/// A 20-character sentence of CJK ideographs, distinct for each
/// `(seed, index)` pair used in the tests.
pub fn chinese_sentence(seed: usize, index: usize) -> String {
    (0..20)
        .map(|i| {
            let offset = (seed * 7919 + index * 379 + i * 53) % 20000;
            char::from_u32(0x4e00 + offset as u32).unwrap()
        })
        .collect()
}

/// `sentences` distinct sentences, each terminated by `。`.
///
/// 32 sentences survive deduplication as 671 characters.
pub fn chinese_paragraph(seed: usize, sentences: usize) -> String {
    (0..sentences)
        .map(|index| format!("{}。", chinese_sentence(seed, index)))
        .collect()
}

/// A script object serialized as a single line of JSON.
#[allow(dead_code)]
pub fn script_json(title: &str, bullets: &[&str], parts: &[String]) -> String {
    serde_json::json!({
        "title": title,
        "bullets": bullets,
        "narration_parts": parts,
    })
    .to_string()
}
