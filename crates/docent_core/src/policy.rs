//! Generation policy and the strictness ladder.

use serde::{Deserialize, Serialize};

/// What the retry loop does once every attempt has failed.
///
/// Chosen explicitly at construction; never inferred from the environment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum GenerationPolicy {
    /// Surface `GenerationExhausted` to the caller
    #[display("strict")]
    StrictFailOnExhaustion,
    /// Return deterministic heuristic content (offline operation only)
    #[display("heuristic-fallback")]
    AllowHeuristicFallback,
}

impl GenerationPolicy {
    /// The policy matching whether a generation capability is configured.
    ///
    /// # Examples
    ///
    /// ```
    /// use docent_core::GenerationPolicy;
    ///
    /// assert_eq!(GenerationPolicy::for_capability(true), GenerationPolicy::StrictFailOnExhaustion);
    /// assert_eq!(GenerationPolicy::for_capability(false), GenerationPolicy::AllowHeuristicFallback);
    /// ```
    pub fn for_capability(has_generator: bool) -> Self {
        if has_generator {
            Self::StrictFailOnExhaustion
        } else {
            Self::AllowHeuristicFallback
        }
    }
}

/// Rungs of the re-prompt ladder used within one outer attempt.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum Strictness {
    /// The ordinary structured request
    #[display("normal")]
    Normal,
    /// JSON-only re-prompt after an extraction failure
    #[display("json-only")]
    JsonOnly,
    /// Re-generation with the quality requirements spelled out
    #[display("quality-strict")]
    QualityStrict,
}
