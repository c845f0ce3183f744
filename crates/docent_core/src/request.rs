//! Per-section generation request context.

use serde::{Deserialize, Serialize};

/// Everything a script prompt is built from.
///
/// # Examples
///
/// ```
/// use docent_core::SectionRequestBuilder;
///
/// let request = SectionRequestBuilder::default()
///     .section_title("Method")
///     .section_summary("本文提出一种新的注意力机制。")
///     .keywords(vec!["注意力".to_string()])
///     .build()
///     .unwrap();
///
/// assert_eq!(request.section_title(), "Method");
/// assert!(request.retrieved_context().is_none());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Default,
    derive_getters::Getters,
    Serialize,
    Deserialize,
    derive_builder::Builder,
)]
pub struct SectionRequest {
    /// Title of the paper the section belongs to.
    #[builder(default, setter(into))]
    #[serde(default)]
    paper_title: String,

    /// Paper abstract.
    #[builder(default, setter(into))]
    #[serde(default)]
    paper_abstract: String,

    /// Section title; also the topic label for repair and fallback.
    #[builder(setter(into))]
    section_title: String,

    /// Short summary of the section.
    #[builder(default, setter(into))]
    #[serde(default)]
    section_summary: String,

    /// Section keywords.
    #[builder(default)]
    #[serde(default)]
    keywords: Vec<String>,

    /// Passages retrieved for the section, if any.
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    retrieved_context: Option<String>,
}
