//! Batch-level QA over every script and slide generated for a paper.
//!
//! The report flags content for review; it never rewrites anything.

use crate::analysis::{char_len, chinese_ratio, split_sentences};
use crate::config::ReportThresholds;
use docent_core::{BatchStats, SectionBatchReport, SlideDescriptor, StructuredContent};
use std::collections::HashMap;
use tracing::{info, instrument};

/// Fraction of sentences across all scripts that repeat an earlier one.
///
/// Sentences of `min_segment_chars` characters or fewer are ignored.
/// Returns 0.0 with fewer than two scripts or fewer than two sentences.
pub fn cross_section_repetition(scripts: &[StructuredContent], min_segment_chars: usize) -> f64 {
    if scripts.len() < 2 {
        return 0.0;
    }

    let sentences: Vec<&str> = scripts
        .iter()
        .flat_map(|script| script.narration_parts().iter())
        .flat_map(|part| split_sentences(part))
        .filter(|sentence| char_len(sentence) > min_segment_chars)
        .collect();
    if sentences.len() < 2 {
        return 0.0;
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for sentence in sentences.iter().copied() {
        *counts.entry(sentence).or_default() += 1;
    }
    let duplicates: usize = counts.values().map(|count| count - 1).sum();
    duplicates as f64 / sentences.len() as f64
}

fn check_script(index: usize, script: &StructuredContent, thresholds: &ReportThresholds) -> Vec<String> {
    let mut issues = Vec::new();
    let number = index + 1;
    let parts = script.narration_parts();

    if parts.len() < thresholds.min_narration_parts {
        issues.push(format!(
            "Script {}: Less than {} narration parts ({})",
            number,
            thresholds.min_narration_parts,
            parts.len()
        ));
    }

    for (part_index, part) in parts.iter().enumerate() {
        let length = char_len(part);
        if length < thresholds.min_part_chars {
            issues.push(format!(
                "Script {}, part {}: Too short ({} chars, minimum {})",
                number,
                part_index + 1,
                length,
                thresholds.min_part_chars
            ));
        }
        let ratio = chinese_ratio(part);
        if ratio < thresholds.min_chinese_ratio {
            issues.push(format!(
                "Script {}, part {}: Low Chinese ratio ({:.2}, minimum {})",
                number,
                part_index + 1,
                ratio,
                thresholds.min_chinese_ratio
            ));
        }
    }

    let bullets = script.bullets().len();
    if bullets < thresholds.min_bullets {
        issues.push(format!(
            "Script {}: Less than {} bullets ({})",
            number, thresholds.min_bullets, bullets
        ));
    } else if bullets > thresholds.max_bullets {
        issues.push(format!(
            "Script {}: More than {} bullets ({})",
            number, thresholds.max_bullets, bullets
        ));
    }

    issues
}

fn check_slide(index: usize, slide: &SlideDescriptor, thresholds: &ReportThresholds) -> Vec<String> {
    let mut issues = Vec::new();
    let number = index + 1;

    let bullets = slide.bullets().len();
    if bullets < thresholds.min_bullets {
        issues.push(format!(
            "Slide {}: Less than {} bullets",
            number, thresholds.min_bullets
        ));
    } else if bullets > thresholds.max_bullets {
        issues.push(format!(
            "Slide {}: More than {} bullets ({})",
            number, thresholds.max_bullets, bullets
        ));
    }
    if !slide.has_image() {
        issues.push(format!("Slide {}: No image generated", number));
    }

    issues
}

/// Inspect a whole batch of scripts and slides.
///
/// Script issues come in script order with the repetition issue last;
/// slide issues come in slide order. The report passes only when both
/// lists are empty.
///
/// # Examples
///
/// ```
/// use docent_narration::{ReportThresholds, build_report};
///
/// let report = build_report(&[], &[], &ReportThresholds::default());
/// assert!(*report.overall_passed());
/// assert_eq!(*report.repetition_rate(), 0.0);
/// ```
#[instrument(skip_all, fields(scripts = scripts.len(), slides = slides.len()))]
pub fn build_report(
    scripts: &[StructuredContent],
    slides: &[SlideDescriptor],
    thresholds: &ReportThresholds,
) -> SectionBatchReport {
    let mut script_issues: Vec<String> = scripts
        .iter()
        .enumerate()
        .flat_map(|(index, script)| check_script(index, script, thresholds))
        .collect();

    let repetition_rate = cross_section_repetition(scripts, thresholds.min_segment_chars);
    if repetition_rate > thresholds.max_repetition_rate {
        script_issues.push(format!(
            "Cross-section repetition rate too high: {:.2}% (maximum {:.0}%)",
            repetition_rate * 100.0,
            thresholds.max_repetition_rate * 100.0
        ));
    }

    let slide_issues: Vec<String> = slides
        .iter()
        .enumerate()
        .flat_map(|(index, slide)| check_slide(index, slide, thresholds))
        .collect();

    let stats = BatchStats::new(
        scripts.len(),
        slides.len(),
        scripts.iter().map(StructuredContent::narration_chars).sum(),
        scripts.iter().map(|script| script.bullets().len()).sum(),
        slides.iter().filter(|slide| slide.has_image()).count(),
        repetition_rate,
    );

    let report = SectionBatchReport::new(script_issues, slide_issues, repetition_rate, stats);
    info!(
        passed = *report.overall_passed(),
        script_issues = report.script_issues().len(),
        slide_issues = report.slide_issues().len(),
        repetition_rate,
        "Batch QA complete"
    );
    report
}
