//! Bringing narration parts up to the quality gates.
//!
//! [`NarrationRepairEngine`] cleans each part, expands the ones that are
//! too short or not Chinese enough and rewrites a part that repeats an
//! earlier one. With a generator the rewrites go to the model; without
//! one a deterministic heuristic is used, which cannot fail.

use crate::analysis::{
    char_len, chinese_ratio, dedup_sentences, segment_overlap, strip_control_chars, truncate_chars,
};
use crate::config::{GenerationSettings, NarrationConfig, QualityThresholds};
use crate::prompts::{expand_prompt, similarity_prompt};
use docent_error::{DocentResult, GenerationError, GenerationErrorKind};
use docent_interface::TextGenerator;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, instrument, warn};

static NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("Valid newline regex"));
static ASCII_TOKENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9_/.:;+\-]{3,}").expect("Valid ascii token regex"));
static ASCII_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]{2,}").expect("Valid ascii word regex"));

const GENERIC_TOPIC: &str = "该部分";

/// Map an arbitrary section title onto a canonical Chinese topic label.
///
/// # Examples
///
/// ```
/// use docent_narration::normalize_topic;
///
/// assert_eq!(normalize_topic("Introduction"), "引言");
/// assert_eq!(normalize_topic("Experimental Setup"), "实验");
/// assert_eq!(normalize_topic(""), "该部分");
/// assert_eq!(normalize_topic("相关工作"), "相关工作");
/// ```
pub fn normalize_topic(topic: &str) -> String {
    let trimmed = topic.trim();
    if trimmed.is_empty() {
        return GENERIC_TOPIC.to_string();
    }

    let lower = trimmed.to_lowercase();
    let rules: [(&[&str], &str); 6] = [
        (&["introduction", "intro"], "引言"),
        (&["background"], "背景"),
        (&["method", "approach", "architecture"], "方法"),
        (&["experiment", "setup"], "实验"),
        (&["result", "analysis"], "结果"),
        (&["conclusion", "discussion"], "结论"),
    ];
    for (keys, label) in rules {
        if keys.iter().any(|key| lower.contains(key)) {
            return label.to_string();
        }
    }
    trimmed.to_string()
}

/// Topic label safe to embed in heuristic text: canonical, without
/// ASCII words. A trailing `-<half>` qualifier such as `-上半部分`
/// survives normalisation.
pub(crate) fn heuristic_topic(topic: &str) -> String {
    let trimmed = topic.trim();
    if let Some((head, qualifier)) = trimmed.rsplit_once('-') {
        let qualifier = ASCII_WORDS.replace_all(qualifier, "");
        let qualifier = qualifier.trim();
        if qualifier.chars().any(crate::analysis::is_cjk) {
            return format!("{}-{}", heuristic_label(head), qualifier);
        }
    }
    heuristic_label(trimmed)
}

fn heuristic_label(topic: &str) -> String {
    let label = normalize_topic(topic);
    let cleaned = ASCII_WORDS.replace_all(&label, "");
    let cleaned = cleaned.trim();
    if cleaned.chars().any(crate::analysis::is_cjk) {
        cleaned.to_string()
    } else {
        GENERIC_TOPIC.to_string()
    }
}

fn short_extension(topic: &str) -> String {
    format!(
        "关于{}，这里还将解释关键术语的直观含义、提出的必要性、与相关工作的差别以及在真实任务中的使用注意事项。",
        topic
    )
}

fn closing_extension(topic: &str) -> String {
    format!(
        "最后总结{}的主要观点，并指出当前做法的局限与改进方向，帮助读者建立完整的认知框架。",
        topic
    )
}

fn filler_paragraphs(topic: &str) -> [String; 11] {
    [
        format!("围绕{}，进一步从问题场景、研究动机与应用价值展开叙述，结合典型实例说明其在真实任务中的意义与挑战。", topic),
        format!("就{}的方法层面而言，我们总结常见技术路线的优缺点与适用条件，对关键步骤给出直观比喻，帮助建立可操作的思维框架。", topic),
        format!("同时对比相关工作，指出{}与传统做法的差异与联系，强调设计取舍与潜在风险，避免生搬硬套。", topic),
        format!("在{}的实践落地方面，总结评估指标、数据与实现细节、调参策略与诊断建议，形成面向工程的操作指引。", topic),
        format!("从理论角度看，{}背后的数学原理与算法思想值得梳理，由此可以建立更系统的知识结构。", topic),
        format!("{}在不同数据规模和计算预算下的表现并不相同，需要结合具体场景权衡效果与成本。", topic),
        format!("此外，{}与相邻方向的交叉融合同样值得关注，其中蕴含着新的研究机会与工程挑战。", topic),
        format!("为了更好地理解{}，可以先回顾一个简化的例子，再逐步加入真实场景中的约束条件。", topic),
        format!("评估{}时，除了平均指标，还应关注极端情况下的稳定性以及结果的可复现程度。", topic),
        format!("对于初学者，掌握{}的关键在于抓住核心假设，再去理解各个模块之间的配合关系。", topic),
        format!("最后展望{}的改进方向与开放问题，讨论其应用前景，强化长期视角与系统性理解。", topic),
    ]
}

/// Deterministic, offline expansion of `text` to at least `min_len`
/// characters of Chinese prose.
///
/// Lines dominated by ASCII are dropped, ASCII tokens are removed and
/// topic-parameterized filler paragraphs are appended until the length
/// gate is met or `max_filler_rounds` is reached.
pub fn heuristic_expand(text: &str, topic: &str, min_len: usize, quality: &QualityThresholds) -> String {
    let label = heuristic_topic(topic);
    let base = format!(
        "本部分围绕{}进行详细讲解，从研究动机、关键概念、典型方法、实践细节与潜在问题等角度展开，力求清晰、连贯且可操作。",
        label
    );

    let kept: Vec<String> = NEWLINES
        .split(text)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| {
            let ascii = line.chars().filter(char::is_ascii).count();
            (ascii as f64 / char_len(line).max(1) as f64) < quality.ascii_line_ceiling
        })
        .map(|line| ASCII_TOKENS.replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    let mut more = kept.join("。");
    if char_len(&more) < min_len / 2 {
        more = format!("{}。{}", more, short_extension(&label));
    }
    if (char_len(&more) as f64) < min_len as f64 * 0.9 {
        more = format!("{}。{}", more, closing_extension(&label));
    }

    let deduped = dedup_sentences(&format!("{}。{}", base, more));
    let mut out = ASCII_WORDS.replace_all(&deduped, "").into_owned();

    let fillers = filler_paragraphs(&label);
    let mut rounds = 0;
    while char_len(&out) < min_len && rounds < quality.max_filler_rounds {
        out.push('。');
        out.push_str(&fillers[rounds % fillers.len()]);
        rounds += 1;
    }

    debug!(
        topic = %label,
        length = char_len(&out),
        filler_rounds = rounds,
        "Heuristic expansion complete"
    );
    truncate_chars(&out, quality.max_output_chars)
}

/// Result of repairing a set of narration parts.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct RepairOutcome {
    /// Repaired parts, same count and order as the input
    parts: Vec<String>,
    /// Indices of parts that were expanded
    expanded: Vec<usize>,
    /// Indices of parts rewritten to reduce overlap
    rewritten: Vec<usize>,
    /// Largest remaining overlap between any part and an earlier one
    residual_overlap: f64,
}

impl RepairOutcome {
    /// Take the repaired parts.
    pub fn into_parts(self) -> Vec<String> {
        self.parts
    }
}

/// Repairs narration parts against the configured gates.
///
/// # Examples
///
/// ```
/// use docent_narration::{NarrationConfig, NarrationRepairEngine};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = NarrationConfig::default();
/// let engine = NarrationRepairEngine::offline(&config);
/// let repaired = engine.repair(&["太短了".to_string()], "Method", 600).await?;
/// assert!(repaired.parts()[0].chars().count() >= 600);
/// # Ok(())
/// # }
/// ```
pub struct NarrationRepairEngine<'a> {
    generator: Option<&'a dyn TextGenerator>,
    quality: &'a QualityThresholds,
    settings: &'a GenerationSettings,
}

impl<'a> NarrationRepairEngine<'a> {
    /// Engine that sends rewrites to `generator` when one is given.
    pub fn new(generator: Option<&'a dyn TextGenerator>, config: &'a NarrationConfig) -> Self {
        Self {
            generator,
            quality: &config.quality,
            settings: &config.generation,
        }
    }

    /// Engine that only uses the deterministic heuristic.
    pub fn offline(config: &'a NarrationConfig) -> Self {
        Self::new(None, config)
    }

    /// Whether rewrites go to a model.
    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    fn passes(&self, text: &str, min_len: usize) -> bool {
        chinese_ratio(text) >= self.quality.min_chinese_ratio && char_len(text) >= min_len
    }

    /// Repair every part, then reduce overlap between parts.
    ///
    /// Each part is cleaned of control characters and duplicate
    /// sentences. A part still failing the ratio or length gate is
    /// expanded. Then each part overlapping an earlier part beyond
    /// `max_pair_similarity` gets one rewrite request; a rewrite that
    /// fails the gates, or no generator, leaves the overlap in place and
    /// it is reported as `residual_overlap`.
    ///
    /// # Errors
    ///
    /// With a generator, an expansion that fails the gates is
    /// `ExpansionRejected` and a provider failure is propagated. The
    /// offline engine never fails.
    #[instrument(skip(self, parts), fields(parts = parts.len()))]
    pub async fn repair(&self, parts: &[String], topic: &str, min_len: usize) -> DocentResult<RepairOutcome> {
        let mut repaired = Vec::with_capacity(parts.len());
        let mut expanded = Vec::new();

        for (index, part) in parts.iter().enumerate() {
            let cleaned = dedup_sentences(strip_control_chars(part).trim());
            if self.passes(&cleaned, min_len) {
                repaired.push(cleaned);
            } else {
                debug!(
                    index,
                    length = char_len(&cleaned),
                    chinese_ratio = chinese_ratio(&cleaned),
                    "Narration part below gates, expanding"
                );
                repaired.push(self.expand(&cleaned, topic, min_len).await?);
                expanded.push(index);
            }
        }

        let mut rewritten = Vec::new();
        for later in 1..repaired.len() {
            let Some((earlier, overlap)) = (0..later)
                .map(|earlier| (earlier, segment_overlap(&repaired[earlier], &repaired[later])))
                .max_by(|a, b| a.1.total_cmp(&b.1))
            else {
                continue;
            };
            if overlap <= self.quality.max_pair_similarity {
                continue;
            }

            debug!(earlier, later, overlap, "Narration parts overlap, requesting rewrite");
            if let Some(rewrite) = self
                .rewrite_overlapping(&repaired[earlier], &repaired[later], topic, min_len)
                .await
            {
                repaired[later] = rewrite;
                rewritten.push(later);
            }
        }

        let residual_overlap = (1..repaired.len())
            .flat_map(|later| (0..later).map(move |earlier| (earlier, later)))
            .map(|(earlier, later)| segment_overlap(&repaired[earlier], &repaired[later]))
            .fold(0.0, f64::max);
        if residual_overlap > self.quality.max_pair_similarity {
            warn!(residual_overlap, "Narration parts still overlap after repair");
        }

        Ok(RepairOutcome {
            parts: repaired,
            expanded,
            rewritten,
            residual_overlap,
        })
    }

    /// Expand `text` to at least `min_len` characters of Chinese prose.
    ///
    /// # Errors
    ///
    /// With a generator, a response failing the ratio or length gate is
    /// `ExpansionRejected`; a provider failure is propagated. There is no
    /// heuristic fallback once a generator is configured.
    #[instrument(skip(self, text), fields(length = char_len(text)))]
    pub async fn expand(&self, text: &str, topic: &str, min_len: usize) -> DocentResult<String> {
        let Some(generator) = self.generator else {
            return Ok(heuristic_expand(text, topic, min_len, self.quality));
        };

        let label = normalize_topic(topic);
        let prompt = expand_prompt(text, &label, min_len);
        let response = generator
            .complete(
                &prompt,
                self.settings
                    .rewrite_temperature
                    .clamp(0.0, self.settings.max_temperature),
                self.settings.rewrite_max_tokens,
            )
            .await?;

        let candidate = dedup_sentences(response.trim());
        if self.passes(&candidate, min_len) {
            return Ok(truncate_chars(&candidate, self.quality.max_output_chars));
        }

        let length = char_len(&candidate);
        let ratio = chinese_ratio(&candidate);
        warn!(
            provider = generator.provider_name(),
            length,
            chinese_ratio = ratio,
            "Expansion rejected by quality gates"
        );
        Err(GenerationError::new(GenerationErrorKind::ExpansionRejected {
            topic: label,
            length,
            chinese_ratio: ratio,
        })
        .into())
    }

    /// One rewrite of `second` away from `first`; `None` keeps the original.
    async fn rewrite_overlapping(
        &self,
        first: &str,
        second: &str,
        topic: &str,
        min_len: usize,
    ) -> Option<String> {
        let generator = self.generator?;
        let prompt = similarity_prompt(first, second, &normalize_topic(topic), min_len);
        let temperature = self
            .settings
            .rewrite_temperature
            .clamp(0.0, self.settings.max_temperature);

        match generator
            .complete(&prompt, temperature, self.settings.rewrite_max_tokens)
            .await
        {
            Ok(response) => {
                let candidate = dedup_sentences(response.trim());
                if self.passes(&candidate, min_len) {
                    Some(truncate_chars(&candidate, self.quality.max_output_chars))
                } else {
                    debug!(
                        length = char_len(&candidate),
                        "Overlap rewrite failed gates, keeping original"
                    );
                    None
                }
            }
            Err(e) => {
                warn!(error = %e, "Overlap rewrite request failed, keeping original");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_topic_rules() {
        assert_eq!(normalize_topic("  Background and Motivation "), "背景");
        assert_eq!(normalize_topic("Model Architecture"), "方法");
        assert_eq!(normalize_topic("Results and Analysis"), "结果");
        assert_eq!(normalize_topic("Discussion"), "结论");
        assert_eq!(normalize_topic("相关工作"), "相关工作");
    }

    #[test]
    fn test_heuristic_expand_reaches_min_len() {
        let quality = QualityThresholds::default();
        let out = heuristic_expand("", "Introduction", 600, &quality);
        assert!(char_len(&out) >= 600);
        assert!(chinese_ratio(&out) >= 0.9);
        assert!(out.contains("引言"));
    }

    #[test]
    fn test_heuristic_expand_drops_ascii_lines() {
        let quality = QualityThresholds::default();
        let text = "This line is entirely English and must go\n本段介绍注意力机制的基本思想\nloss = f(x) + g(y)";
        let out = heuristic_expand(text, "Method", 600, &quality);
        assert!(out.contains("本段介绍注意力机制的基本思想"));
        assert!(!out.contains("English"));
        assert!(!out.contains("loss"));
        assert!(char_len(&out) >= 600);
    }

    #[test]
    fn test_heuristic_expand_is_deterministic() {
        let quality = QualityThresholds::default();
        let a = heuristic_expand("短文本", "Results", 600, &quality);
        let b = heuristic_expand("短文本", "Results", 600, &quality);
        assert_eq!(a, b);
    }

    #[test]
    fn test_heuristic_topic_without_cjk_falls_back() {
        assert_eq!(heuristic_topic("Transformer"), GENERIC_TOPIC);
        assert_eq!(heuristic_topic("Transformer-上半部分"), "该部分-上半部分");
    }

    #[test]
    fn test_heuristic_topic_keeps_half_qualifier() {
        assert_eq!(heuristic_topic("Introduction-上半部分"), "引言-上半部分");
        assert_eq!(heuristic_topic("Introduction-下半部分"), "引言-下半部分");
        assert_eq!(heuristic_topic("Self-Attention"), GENERIC_TOPIC);
    }

    #[test]
    fn test_heuristic_halves_do_not_share_sentences() {
        let quality = QualityThresholds::default();
        let first = heuristic_expand("", "Introduction-上半部分", 600, &quality);
        let second = heuristic_expand("", "Introduction-下半部分", 600, &quality);
        assert_ne!(first, second);
        assert!(segment_overlap(&first, &second) <= 0.10);
    }

    #[test]
    fn test_heuristic_expand_respects_output_cap() {
        let quality = QualityThresholds {
            max_output_chars: 700,
            ..QualityThresholds::default()
        };
        let long = "模型".repeat(2000);
        let out = heuristic_expand(&long, "Method", 600, &quality);
        assert!(char_len(&out) <= 700);
    }
}
