//! Structured script content produced by one generation request.

use serde::{Deserialize, Serialize};

/// Separator placed between narration parts in the joined narration.
pub const NARRATION_SEPARATOR: &str = "\n\n";

/// Parsed and shape-repaired result of one structured-generation request.
///
/// The joined `narration` is derived from `narration_parts` on demand and
/// cannot be set independently. A retry never mutates a previous candidate;
/// it builds a new value.
///
/// # Examples
///
/// ```
/// use docent_core::StructuredContent;
///
/// let content = StructuredContent::new(
///     "方法",
///     vec!["要点一".into(), "要点二".into(), "要点三".into()],
///     vec!["第一段。".into(), "第二段。".into()],
/// );
///
/// assert_eq!(content.narration(), "第一段。\n\n第二段。");
/// assert_eq!(content.bullets().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters, Serialize, Deserialize)]
#[serde(into = "ContentWire", from = "ContentWire")]
pub struct StructuredContent {
    /// Display title of the section
    title: String,
    /// Short bullet phrases, in display order
    bullets: Vec<String>,
    /// Independently gated narration paragraphs
    narration_parts: Vec<String>,
}

impl StructuredContent {
    /// Create content from its parts.
    pub fn new(
        title: impl Into<String>,
        bullets: Vec<String>,
        narration_parts: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            bullets,
            narration_parts,
        }
    }

    /// Narration ready for display and speech synthesis.
    pub fn narration(&self) -> String {
        self.narration_parts.join(NARRATION_SEPARATOR)
    }

    /// Replace the narration parts, producing a new value.
    pub fn with_narration_parts(&self, narration_parts: Vec<String>) -> Self {
        Self {
            title: self.title.clone(),
            bullets: self.bullets.clone(),
            narration_parts,
        }
    }

    /// Total character count across all narration parts.
    pub fn narration_chars(&self) -> usize {
        self.narration_parts.iter().map(|p| p.chars().count()).sum()
    }
}

#[derive(Serialize, Deserialize)]
struct ContentWire {
    #[serde(default)]
    title: String,
    #[serde(default)]
    bullets: Vec<String>,
    #[serde(default)]
    narration_parts: Vec<String>,
    #[serde(default, skip_deserializing)]
    narration: String,
}

impl From<StructuredContent> for ContentWire {
    fn from(content: StructuredContent) -> Self {
        let narration = content.narration();
        Self {
            title: content.title,
            bullets: content.bullets,
            narration_parts: content.narration_parts,
            narration,
        }
    }
}

impl From<ContentWire> for StructuredContent {
    fn from(wire: ContentWire) -> Self {
        Self::new(wire.title, wire.bullets, wire.narration_parts)
    }
}
