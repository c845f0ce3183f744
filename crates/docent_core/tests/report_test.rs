//! Batch report value types.

use docent_core::{BatchStats, SectionBatchReport, SlideDescriptorBuilder};

#[test]
fn test_report_passes_only_without_issues() {
    let clean = SectionBatchReport::new(vec![], vec![], 0.0, BatchStats::default());
    assert!(*clean.overall_passed());

    let slide_only = SectionBatchReport::new(
        vec![],
        vec!["Slide 1: No image generated".into()],
        0.0,
        BatchStats::default(),
    );
    assert!(!*slide_only.overall_passed());
    assert!(slide_only.scripts_passed());
    assert!(!slide_only.slides_passed());
}

#[test]
fn test_issues_list_scripts_first() {
    let report = SectionBatchReport::new(
        vec!["Script 1: Less than 3 bullets (2)".into()],
        vec!["Slide 1: No image generated".into()],
        0.0,
        BatchStats::default(),
    );

    let issues: Vec<&str> = report.issues().collect();
    assert_eq!(
        issues,
        vec!["Script 1: Less than 3 bullets (2)", "Slide 1: No image generated"]
    );
}

#[test]
fn test_stats_average_is_integer_division() {
    let stats = BatchStats::new(3, 3, 1000, 12, 2, 0.05);
    assert_eq!(*stats.avg_narration_chars(), 333);

    let empty = BatchStats::new(0, 0, 0, 0, 0, 0.0);
    assert_eq!(*empty.avg_narration_chars(), 0);
}

#[test]
fn test_blank_image_path_is_no_image() {
    let blank = SlideDescriptorBuilder::default()
        .title("方法")
        .image_path("  ")
        .build()
        .unwrap();
    let rendered = SlideDescriptorBuilder::default()
        .image_path("out/slide_1.png")
        .build()
        .unwrap();
    let missing = SlideDescriptorBuilder::default().build().unwrap();

    assert!(!blank.has_image());
    assert!(rendered.has_image());
    assert!(!missing.has_image());
}
