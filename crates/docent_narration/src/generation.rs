//! Bounded-retry structured generation.
//!
//! Each outer attempt walks a ladder of up to three requests:
//!
//! 1. **Normal**: the ordinary structured request.
//! 2. **JsonOnly**: issued when no JSON object could be extracted.
//! 3. **QualityStrict**: issued when well-shaped content failed the
//!    quality gates; the failure reasons are quoted back to the model.
//!
//! The ladder is data ([`next_rung`]) and the loop only records
//! attempts. When every attempt fails, the configured
//! [`GenerationPolicy`] decides between an error and deterministic
//! heuristic content.

use crate::analysis::{
    char_len, combined_chinese_ratio, dedup_sentences, split_sentences, template_phrases,
};
use crate::config::{GenerationSettings, NarrationConfig};
use crate::prompts::{rung_max_tokens, rung_prompt, rung_temperature};
use crate::repair::{NarrationRepairEngine, RepairOutcome, heuristic_topic};
use crate::shape::{ParseOutcome, parse_structured};
use docent_core::{
    GenerationMeta, GenerationOutcome, GenerationPolicy, SectionRequest, Strictness,
    StructuredContent,
};
use docent_error::{DocentResult, GenerationError, GenerationErrorKind};
use docent_interface::TextGenerator;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const DEFAULT_BULLETS: [&str; 3] = ["问题与场景", "方法与实现", "实验与结论"];
const MIN_SUMMARY_BULLET_CHARS: usize = 8;

/// Why a single rung did not produce acceptable content.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum RungFailure {
    /// The provider call raised
    #[display("provider error: {}", _0)]
    Provider(String),
    /// The provider returned only whitespace
    #[display("empty response")]
    Empty,
    /// No JSON object could be extracted
    #[display("no JSON object in response")]
    NoJson,
    /// The object lacked required fields
    #[display("missing fields: {}", _0)]
    MissingFields(String),
    /// The content failed the quality gates
    #[display("quality gates failed: {}", _0.join(", "))]
    Quality(Vec<String>),
}

impl RungFailure {
    /// Whether this failure came from the extraction stage.
    ///
    /// Provider errors and empty responses count as extraction failures.
    pub fn is_extraction(&self) -> bool {
        matches!(self, Self::Provider(_) | Self::Empty | Self::NoJson)
    }

    /// The error kind this failure corresponds to.
    pub fn error_kind(&self) -> GenerationErrorKind {
        match self {
            Self::Provider(message) => GenerationErrorKind::ProviderUnavailable(message.clone()),
            Self::Empty | Self::NoJson => GenerationErrorKind::ParseFailure,
            Self::MissingFields(fields) => GenerationErrorKind::ShapeInvalid(fields.clone()),
            Self::Quality(reasons) => GenerationErrorKind::QualityGateFailure(reasons.clone()),
        }
    }

    /// Reasons quoted to the model by the quality-strict rung.
    pub fn reasons(&self) -> Vec<String> {
        match self {
            Self::Quality(reasons) => reasons.clone(),
            Self::MissingFields(field) => vec![format!("missing:{}", field)],
            other => vec![other.to_string()],
        }
    }
}

/// The rung that follows a failure at `current`, if any.
///
/// # Examples
///
/// ```
/// use docent_core::Strictness;
/// use docent_narration::{RungFailure, next_rung};
///
/// assert_eq!(next_rung(Strictness::Normal, &RungFailure::NoJson), Some(Strictness::JsonOnly));
/// assert_eq!(next_rung(Strictness::JsonOnly, &RungFailure::NoJson), None);
/// assert_eq!(
///     next_rung(Strictness::JsonOnly, &RungFailure::Quality(vec![])),
///     Some(Strictness::QualityStrict)
/// );
/// assert_eq!(next_rung(Strictness::QualityStrict, &RungFailure::Empty), None);
/// ```
pub fn next_rung(current: Strictness, failure: &RungFailure) -> Option<Strictness> {
    match (current, failure.is_extraction()) {
        (Strictness::Normal, true) => Some(Strictness::JsonOnly),
        (Strictness::Normal | Strictness::JsonOnly, false) => Some(Strictness::QualityStrict),
        (Strictness::JsonOnly, true) | (Strictness::QualityStrict, _) => None,
    }
}

/// The request currently issued by the retry loop.
///
/// Only the current attempt is held; failed attempts are folded into
/// [`GenerationMeta`] failure lines as the loop runs.
#[derive(Debug, Clone, Copy, PartialEq, derive_getters::Getters)]
pub struct Attempt {
    /// Zero-based outer attempt index
    index: usize,
    /// Rung within the attempt
    strictness: Strictness,
    /// Temperature sent to the provider
    temperature: f32,
}

impl Attempt {
    /// The request for `strictness` within outer attempt `index`.
    pub fn new(index: usize, strictness: Strictness, settings: &GenerationSettings) -> Self {
        Self {
            index,
            strictness,
            temperature: rung_temperature(strictness, index, settings),
        }
    }

    /// One-line record of a failure at this attempt.
    pub fn failure_line(&self, failure: &RungFailure) -> String {
        format!("attempt {} {}: {}", self.index + 1, self.strictness, failure)
    }
}

/// Generates structured narration for one section under the quality gates.
///
/// # Examples
///
/// ```
/// use docent_core::SectionRequestBuilder;
/// use docent_narration::{NarrationConfig, ScriptGenerator};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let generator = ScriptGenerator::offline(NarrationConfig::default());
/// let request = SectionRequestBuilder::default()
///     .section_title("Introduction")
///     .build()?;
///
/// let outcome = generator.generate(&request).await?;
/// assert!(*outcome.meta().fallback());
/// assert_eq!(outcome.content().narration_parts().len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ScriptGenerator {
    generator: Option<Arc<dyn TextGenerator>>,
    config: NarrationConfig,
    policy: GenerationPolicy,
}

impl std::fmt::Debug for ScriptGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptGenerator")
            .field(
                "provider",
                &self.generator.as_ref().map(|g| g.provider_name().to_string()),
            )
            .field("policy", &self.policy)
            .finish()
    }
}

impl ScriptGenerator {
    /// Generator backed by a model; exhaustion is an error.
    pub fn new(generator: Arc<dyn TextGenerator>, config: NarrationConfig) -> Self {
        Self {
            generator: Some(generator),
            config,
            policy: GenerationPolicy::for_capability(true),
        }
    }

    /// Generator without a model; content is always heuristic.
    pub fn offline(config: NarrationConfig) -> Self {
        Self {
            generator: None,
            config,
            policy: GenerationPolicy::for_capability(false),
        }
    }

    /// Override the exhaustion policy.
    pub fn with_policy(mut self, policy: GenerationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The exhaustion policy in effect.
    pub fn policy(&self) -> GenerationPolicy {
        self.policy
    }

    /// The thresholds in effect.
    pub fn config(&self) -> &NarrationConfig {
        &self.config
    }

    /// Generate with the configured number of attempts.
    pub async fn generate(&self, request: &SectionRequest) -> DocentResult<GenerationOutcome> {
        self.generate_with_attempts(request, self.config.generation.max_attempts)
            .await
    }

    /// Generate with at most `max_attempts` outer attempts.
    ///
    /// # Errors
    ///
    /// `GenerationExhausted` when every attempt fails under
    /// [`GenerationPolicy::StrictFailOnExhaustion`].
    #[instrument(skip(self, request), fields(section = %request.section_title(), policy = %self.policy))]
    pub async fn generate_with_attempts(
        &self,
        request: &SectionRequest,
        max_attempts: usize,
    ) -> DocentResult<GenerationOutcome> {
        let mut attempts = 0;
        let mut strategies_tried: Vec<Strictness> = Vec::new();
        let mut failures: Vec<String> = Vec::new();
        let mut last_failure: Option<RungFailure> = None;

        if let Some(generator) = self.generator.as_deref() {
            for index in 0..max_attempts {
                attempts = index + 1;
                let mut rung = Some(Strictness::Normal);
                let mut reasons: Vec<String> = Vec::new();

                while let Some(strictness) = rung {
                    strategies_tried.push(strictness);
                    let attempt = Attempt::new(index, strictness, &self.config.generation);
                    match self.run_rung(generator, request, &attempt, &reasons).await {
                        Ok((content, repair)) => {
                            info!(
                                attempt = attempts,
                                rung = %strictness,
                                narration_chars = content.narration_chars(),
                                "Generated section script"
                            );
                            let ratio = combined_chinese_ratio(content.narration_parts());
                            let meta = GenerationMeta::new(
                                attempts,
                                strictness == Strictness::QualityStrict,
                                false,
                                ratio,
                                strategies_tried,
                                failures,
                            )
                            .with_repair(*repair.residual_overlap(), repair.rewritten().clone());
                            return Ok(GenerationOutcome::new(content, meta));
                        }
                        Err(failure) => {
                            warn!(
                                attempt = attempts,
                                rung = %strictness,
                                kind = %failure.error_kind(),
                                failure = %failure,
                                "Generation rung failed"
                            );
                            failures.push(attempt.failure_line(&failure));
                            reasons = failure.reasons();
                            rung = next_rung(strictness, &failure);
                            last_failure = Some(failure);
                        }
                    }
                }
            }
        }

        match self.policy {
            GenerationPolicy::StrictFailOnExhaustion => {
                let last_failure = last_failure
                    .map(|failure| failure.to_string())
                    .unwrap_or_else(|| "no generation capability configured".to_string());
                warn!(attempts, last_failure = %last_failure, "Generation exhausted");
                Err(GenerationError::new(GenerationErrorKind::GenerationExhausted {
                    attempts,
                    last_failure,
                })
                .into())
            }
            GenerationPolicy::AllowHeuristicFallback => {
                warn!(attempts, "Using heuristic section content");
                let (content, repair) = self.heuristic_repaired(request).await?;
                let ratio = combined_chinese_ratio(content.narration_parts());
                let meta = GenerationMeta::new(0, false, true, ratio, strategies_tried, failures)
                    .with_repair(*repair.residual_overlap(), repair.rewritten().clone());
                Ok(GenerationOutcome::new(content, meta))
            }
        }
    }

    /// Issue one request and carry its response through extraction,
    /// shaping, repair and the quality gates.
    async fn run_rung(
        &self,
        generator: &dyn TextGenerator,
        request: &SectionRequest,
        attempt: &Attempt,
        reasons: &[String],
    ) -> Result<(StructuredContent, RepairOutcome), RungFailure> {
        let settings = &self.config.generation;
        let prompt = rung_prompt(attempt.strictness, request, reasons);
        let raw = generator
            .complete(
                &prompt,
                attempt.temperature,
                rung_max_tokens(attempt.strictness, settings),
            )
            .await
            .map_err(|e| RungFailure::Provider(e.to_string()))?;

        if raw.trim().is_empty() {
            return Err(RungFailure::Empty);
        }

        let content = match parse_structured(&raw, request.section_title(), settings) {
            ParseOutcome::Success { content, defaulted } => {
                if !defaulted.is_empty() {
                    debug!(?defaulted, "Defaulted fields in structured content");
                }
                content
            }
            ParseOutcome::MissingFields { partial, missing } => {
                let fields = missing
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                debug!(
                    parts = partial.narration_parts().len(),
                    missing = %fields,
                    "Structured content incomplete"
                );
                return Err(RungFailure::MissingFields(fields));
            }
            ParseOutcome::ParseError => return Err(RungFailure::NoJson),
        };

        let min_len = self.config.quality.min_part_chars;
        let engine = NarrationRepairEngine::new(Some(generator), &self.config);
        let repaired = match engine
            .repair(content.narration_parts(), request.section_title(), min_len)
            .await
        {
            Ok(repaired) => repaired,
            Err(e) => {
                let reasons = with_template_reasons(vec![e.to_string()], &content.narration());
                return Err(RungFailure::Quality(reasons));
            }
        };
        let content = content.with_narration_parts(repaired.parts().clone());

        self.check_quality(&content).map_err(|reasons| {
            RungFailure::Quality(with_template_reasons(reasons, &content.narration()))
        })?;
        Ok((content, repaired))
    }

    /// Length and purity gates on final content, with one reason per
    /// violated gate.
    pub fn check_quality(&self, content: &StructuredContent) -> Result<(), Vec<String>> {
        let quality = &self.config.quality;
        let parts = content.narration_parts();
        let mut reasons = Vec::new();

        if parts.len() < self.config.generation.narration_parts {
            reasons.push(format!(
                "parts<{}",
                self.config.generation.narration_parts
            ));
        }
        if parts.iter().any(|p| char_len(p) < quality.min_part_chars) {
            reasons.push(format!("lengths<{}", quality.min_part_chars));
        }
        if combined_chinese_ratio(parts) < quality.min_chinese_ratio {
            reasons.push(format!("zh_ratio<{}", quality.min_chinese_ratio));
        }

        if reasons.is_empty() {
            Ok(())
        } else {
            Err(reasons)
        }
    }

    /// Deterministic content built from the section summary alone.
    ///
    /// Never calls a model, whatever generator is configured. Summary
    /// sentences are shared out between the narration parts so that no
    /// two parts open the same way.
    pub async fn heuristic_content(&self, request: &SectionRequest) -> DocentResult<StructuredContent> {
        Ok(self.heuristic_repaired(request).await?.0)
    }

    async fn heuristic_repaired(
        &self,
        request: &SectionRequest,
    ) -> DocentResult<(StructuredContent, RepairOutcome)> {
        let settings = &self.config.generation;
        let title = request.section_title();
        let summary = dedup_sentences(request.section_summary());
        let sentences = split_sentences(&summary);

        let mut bullets: Vec<String> = Vec::new();
        for sentence in sentences.iter().copied() {
            if char_len(sentence) >= MIN_SUMMARY_BULLET_CHARS
                && !bullets.iter().any(|b| b == sentence)
            {
                bullets.push(sentence.to_string());
            }
            if bullets.len() >= settings.max_bullets {
                break;
            }
        }
        if bullets.len() < settings.min_bullets {
            bullets.extend(DEFAULT_BULLETS.iter().map(|b| b.to_string()));
        }
        bullets.truncate(settings.max_bullets);

        let min_len = self.config.quality.min_part_chars;
        let engine = NarrationRepairEngine::offline(&self.config);
        let label = heuristic_topic(title);
        let count = settings.narration_parts;
        let mut parts = Vec::with_capacity(count);
        for index in 0..count {
            let start = index * sentences.len() / count;
            let end = (index + 1) * sentences.len() / count;
            let share = &sentences[start..end];
            let opening = if index == 0 {
                format!("本部分围绕{}展开。", label)
            } else {
                format!("继续讨论{}的细节。", label)
            };
            let seed = format!("{}{}", opening, share.join("。"));
            let topic = format!("{}-{}", title, part_qualifier(index));
            parts.push(engine.expand(&seed, &topic, min_len).await?);
        }
        let repaired = engine.repair(&parts, title, min_len).await?;
        let content = StructuredContent::new(title, bullets, repaired.parts().clone());
        Ok((content, repaired))
    }
}

fn part_qualifier(index: usize) -> String {
    match index {
        0 => "上半部分".to_string(),
        1 => "下半部分".to_string(),
        n => format!("第{}部分", n + 1),
    }
}

/// Quote detected template openers alongside the gate reasons.
fn with_template_reasons(mut reasons: Vec<String>, narration: &str) -> Vec<String> {
    reasons.extend(
        template_phrases(narration)
            .into_iter()
            .map(|phrase| format!("template:{}", phrase)),
    );
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_ladder_never_repeats_a_rung() {
        let failures = [
            RungFailure::NoJson,
            RungFailure::Quality(vec!["lengths<600".to_string()]),
        ];
        for start in Strictness::iter() {
            for failure in &failures {
                if let Some(next) = next_rung(start, failure) {
                    assert!(next > start);
                }
            }
        }
    }

    #[test]
    fn test_missing_fields_escalate_to_quality_rung() {
        let failure = RungFailure::MissingFields("narration_parts".to_string());
        assert_eq!(
            next_rung(Strictness::Normal, &failure),
            Some(Strictness::QualityStrict)
        );
        assert_eq!(failure.reasons(), vec!["missing:narration_parts".to_string()]);
    }

    #[test]
    fn test_provider_failure_counts_as_extraction() {
        assert!(RungFailure::Provider("timeout".to_string()).is_extraction());
        assert!(RungFailure::Empty.is_extraction());
        assert!(!RungFailure::Quality(vec![]).is_extraction());
    }

    #[test]
    fn test_failures_map_to_error_kinds() {
        assert_eq!(
            RungFailure::Provider("timeout".to_string()).error_kind(),
            GenerationErrorKind::ProviderUnavailable("timeout".to_string())
        );
        assert_eq!(RungFailure::Empty.error_kind(), GenerationErrorKind::ParseFailure);
        assert_eq!(
            RungFailure::MissingFields("narration_parts".to_string()).error_kind(),
            GenerationErrorKind::ShapeInvalid("narration_parts".to_string())
        );
        assert!(matches!(
            RungFailure::Quality(vec!["lengths<600".to_string()]).error_kind(),
            GenerationErrorKind::QualityGateFailure(_)
        ));
    }

    #[test]
    fn test_attempt_failure_line() {
        let attempt = Attempt::new(1, Strictness::Normal, &GenerationSettings::default());
        assert!((*attempt.temperature() - 0.25).abs() < 1e-6);
        assert_eq!(
            attempt.failure_line(&RungFailure::Quality(vec!["lengths<600".to_string(), "template:总之".to_string()])),
            "attempt 2 normal: quality gates failed: lengths<600, template:总之"
        );
    }

    #[test]
    fn test_check_quality_reasons() {
        let generator = ScriptGenerator::offline(NarrationConfig::default());
        let content = StructuredContent::new(
            "t",
            vec![],
            vec!["short english text".to_string()],
        );
        let reasons = generator.check_quality(&content).unwrap_err();
        assert_eq!(reasons, vec!["parts<2", "lengths<600", "zh_ratio<0.9"]);
    }
}
