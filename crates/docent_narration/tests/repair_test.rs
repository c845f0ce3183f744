//! Narration repair against the quality gates.

mod test_utils;

use docent_error::{GenerationErrorKind, ModelsErrorKind};
use docent_interface::TextGenerator;
use docent_narration::{
    NarrationConfig, NarrationRepairEngine, chinese_ratio, dedup_sentences, pair_similarity,
    verdict,
};
use test_utils::{MockGenerator, MockResponse, chinese_paragraph, chinese_sentence};

/// 540 ideographs and 60 ASCII letters, no sentence terminators.
fn boundary_part(seed: usize) -> String {
    (0..60)
        .map(|i| format!("{}a", &chinese_sentence(seed, i).chars().take(9).collect::<String>()))
        .collect()
}

#[tokio::test]
async fn test_boundary_part_is_accepted_untouched() -> anyhow::Result<()> {
    let first = boundary_part(11);
    let second = boundary_part(12);
    assert_eq!(first.chars().count(), 600);
    assert_eq!(chinese_ratio(&first), 0.9);

    let mock = MockGenerator::new_text("不应被调用");
    let config = NarrationConfig::default();
    let engine = NarrationRepairEngine::new(Some(&mock as &dyn TextGenerator), &config);

    let outcome = engine
        .repair(&[first.clone(), second.clone()], "Method", 600)
        .await?;

    assert_eq!(mock.call_count(), 0);
    assert_eq!(outcome.parts(), &vec![first, second]);
    assert!(outcome.expanded().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_identical_parts_trigger_one_rewrite() -> anyhow::Result<()> {
    let part = dedup_sentences(&chinese_paragraph(13, 32));
    assert_eq!(*verdict(&[part.clone(), part.clone()]).pair_similarity(), 1.0);

    let replacement = chinese_paragraph(14, 32);
    let mock = MockGenerator::new_text(replacement.clone());
    let config = NarrationConfig::default();
    let engine = NarrationRepairEngine::new(Some(&mock as &dyn TextGenerator), &config);

    let outcome = engine
        .repair(&[part.clone(), part.clone()], "Results", 600)
        .await?;

    assert_eq!(mock.call_count(), 1);
    assert_eq!(outcome.rewritten(), &vec![1]);
    assert_eq!(outcome.parts()[0], part);
    assert_eq!(outcome.parts()[1], dedup_sentences(&replacement));
    assert_eq!(*outcome.residual_overlap(), 0.0);

    let prompt = &mock.calls()[0].prompt;
    assert!(prompt.user().starts_with("主题：结果"));
    Ok(())
}

#[tokio::test]
async fn test_rewrite_failure_keeps_residual_overlap() -> anyhow::Result<()> {
    let part = dedup_sentences(&chinese_paragraph(15, 32));
    let mock = MockGenerator::new_error(ModelsErrorKind::HttpStatus {
        status_code: 503,
        message: "overloaded".to_string(),
    });
    let config = NarrationConfig::default();
    let engine = NarrationRepairEngine::new(Some(&mock as &dyn TextGenerator), &config);

    let outcome = engine
        .repair(&[part.clone(), part.clone()], "Method", 600)
        .await?;

    assert_eq!(mock.call_count(), 1);
    assert!(outcome.rewritten().is_empty());
    assert_eq!(*outcome.residual_overlap(), 1.0);
    Ok(())
}

#[tokio::test]
async fn test_rejected_expansion_is_an_error() -> anyhow::Result<()> {
    let mock = MockGenerator::new_text("Still mostly English text, sorry.");
    let config = NarrationConfig::default();
    let engine = NarrationRepairEngine::new(Some(&mock as &dyn TextGenerator), &config);

    let err = engine
        .repair(&["Too short".to_string()], "Introduction", 600)
        .await
        .unwrap_err();

    match err.generation_kind() {
        Some(GenerationErrorKind::ExpansionRejected { topic, length, .. }) => {
            assert_eq!(topic, "引言");
            assert!(*length < 600);
        }
        other => panic!("expected rejected expansion, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_provider_failure_during_expansion_propagates() -> anyhow::Result<()> {
    let mock = MockGenerator::new_error(ModelsErrorKind::Request("timeout".to_string()));
    let config = NarrationConfig::default();
    let engine = NarrationRepairEngine::new(Some(&mock as &dyn TextGenerator), &config);

    let result = engine.expand("短", "Method", 600).await;

    assert!(result.is_err());
    assert!(result.unwrap_err().generation_kind().is_none());
    Ok(())
}

#[tokio::test]
async fn test_expansion_is_capped() -> anyhow::Result<()> {
    let long = chinese_paragraph(16, 500);
    let mock = MockGenerator::new_sequence(vec![MockResponse::Text(long)]);
    let config = NarrationConfig::default();
    let engine = NarrationRepairEngine::new(Some(&mock as &dyn TextGenerator), &config);

    let expanded = engine.expand("短", "Method", 600).await?;

    assert_eq!(expanded.chars().count(), 8000);
    Ok(())
}

#[tokio::test]
async fn test_offline_repair_strips_control_characters() -> anyhow::Result<()> {
    let config = NarrationConfig::default();
    let engine = NarrationRepairEngine::offline(&config);
    let mut part = chinese_paragraph(17, 32);
    part.insert(0, '\u{7}');

    let outcome = engine.repair(&[part], "Method", 600).await?;

    assert!(!outcome.parts()[0].chars().any(|c| c.is_ascii_control()));
    assert!(outcome.expanded().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_offline_repair_never_fails() -> anyhow::Result<()> {
    let config = NarrationConfig::default();
    let engine = NarrationRepairEngine::offline(&config);
    assert!(!engine.has_generator());

    let parts = vec![
        "Transformer uses self-attention.".to_string(),
        String::new(),
        "\u{0}\u{1}".to_string(),
    ];
    let outcome = engine.repair(&parts, "Experiments", 600).await?;

    assert_eq!(outcome.parts().len(), 3);
    assert_eq!(outcome.expanded(), &vec![0, 1, 2]);
    for part in outcome.parts() {
        assert!(part.chars().count() >= 600);
        assert!(chinese_ratio(part) >= 0.9);
    }
    // Identical heuristic scaffolding overlaps; the offline engine cannot rewrite it.
    assert!(pair_similarity(&outcome.parts()[0], &outcome.parts()[1]) > 0.0);
    Ok(())
}
