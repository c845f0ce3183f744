//! Threshold configuration for the narration quality gates.
//!
//! Configuration is layered with the `config` crate:
//! - Bundled defaults (include_str! from docent.toml)
//! - User config in home directory (~/.config/docent/docent.toml)
//! - User config in current directory (./docent.toml)
//!
//! Every section is optional in override files; missing keys keep their
//! bundled values.

use config::{Config, File, FileFormat};
use docent_error::{ConfigError, DocentError, DocentResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// Gates applied to each narration part by the repair engine and the
/// retry loop.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct QualityThresholds {
    /// Minimum characters per narration part
    pub min_part_chars: usize,
    /// Minimum CJK share of (CJK + ASCII letter) characters
    pub min_chinese_ratio: f64,
    /// Maximum shared-sentence fraction between two parts
    pub max_pair_similarity: f64,
    /// Hard cap on a single rewritten part
    pub max_output_chars: usize,
    /// Upper bound on filler paragraphs appended by heuristic expansion
    pub max_filler_rounds: usize,
    /// Lines with a larger ASCII share are dropped by heuristic expansion
    pub ascii_line_ceiling: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_part_chars: 600,
            min_chinese_ratio: 0.9,
            max_pair_similarity: 0.10,
            max_output_chars: 8000,
            max_filler_rounds: 20,
            ascii_line_ceiling: 0.2,
        }
    }
}

/// Retry-loop parameters.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Outer attempts before the exhaustion policy applies
    pub max_attempts: usize,
    /// Temperature of the first normal request
    pub base_temperature: f32,
    /// Temperature added per outer attempt
    pub temperature_step: f32,
    /// Upper clamp for every temperature sent to a provider
    pub max_temperature: f32,
    /// Temperature of the JSON-only re-prompt
    pub json_only_temperature: f32,
    /// Temperature of quality and rewrite requests
    pub rewrite_temperature: f32,
    /// Token budget of the normal and quality-strict requests
    pub max_tokens: u32,
    /// Token budget of JSON-only and rewrite requests
    pub rewrite_max_tokens: u32,
    /// Number of narration parts a script must carry
    pub narration_parts: usize,
    /// Bullets are padded up to this count
    pub min_bullets: usize,
    /// Bullets are truncated to this count
    pub max_bullets: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_temperature: 0.2,
            temperature_step: 0.05,
            max_temperature: 1.0,
            json_only_temperature: 0.1,
            rewrite_temperature: 0.2,
            max_tokens: 8192,
            rewrite_max_tokens: 4096,
            narration_parts: 2,
            min_bullets: 3,
            max_bullets: 5,
        }
    }
}

/// Batch report thresholds.
///
/// Deliberately looser than [`QualityThresholds`]: the report flags
/// content for review instead of forcing a rewrite.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportThresholds {
    /// Minimum characters per narration part
    pub min_part_chars: usize,
    /// Minimum Chinese ratio per narration part
    pub min_chinese_ratio: f64,
    /// Maximum cross-section sentence repetition rate
    pub max_repetition_rate: f64,
    /// Sentences of this many characters or fewer are ignored
    pub min_segment_chars: usize,
    /// Minimum narration parts per script
    pub min_narration_parts: usize,
    /// Minimum bullets per script or slide
    pub min_bullets: usize,
    /// Maximum bullets per script
    pub max_bullets: usize,
}

impl Default for ReportThresholds {
    fn default() -> Self {
        Self {
            min_part_chars: 600,
            min_chinese_ratio: 0.7,
            max_repetition_rate: 0.10,
            min_segment_chars: 10,
            min_narration_parts: 2,
            min_bullets: 3,
            max_bullets: 5,
        }
    }
}

/// Top-level narration configuration.
///
/// # Example
///
/// ```no_run
/// use docent_narration::NarrationConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = NarrationConfig::load()?;
/// println!("minimum part length: {}", config.quality.min_part_chars);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct NarrationConfig {
    /// Per-part gates
    #[serde(default)]
    pub quality: QualityThresholds,
    /// Retry loop parameters
    #[serde(default)]
    pub generation: GenerationSettings,
    /// Batch report thresholds
    #[serde(default)]
    pub report: ReportThresholds,
}

impl NarrationConfig {
    /// Load configuration from a specific file path, on top of the
    /// built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a
    /// threshold is out of range.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> DocentResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                DocentError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                DocentError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with precedence: user override > bundled default.
    ///
    /// Configuration sources in order of precedence (later sources override earlier):
    /// 1. Bundled defaults (docent.toml shipped with library)
    /// 2. User config in home directory (~/.config/docent/docent.toml)
    /// 3. User config in current directory (./docent.toml)
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> DocentResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../docent.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/docent/docent.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("docent").required(false));

        let config: Self = builder
            .build()
            .map_err(|e| {
                DocentError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                DocentError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml_string(&self) -> DocentResult<String> {
        toml::to_string_pretty(self).map_err(|e| {
            DocentError::from(ConfigError::new(format!(
                "Failed to render configuration: {}",
                e
            )))
        })
    }

    /// Reject thresholds that would make the gates unsatisfiable.
    pub fn validate(&self) -> DocentResult<()> {
        let ratios = [
            ("quality.min_chinese_ratio", self.quality.min_chinese_ratio),
            ("quality.max_pair_similarity", self.quality.max_pair_similarity),
            ("quality.ascii_line_ceiling", self.quality.ascii_line_ceiling),
            ("report.min_chinese_ratio", self.report.min_chinese_ratio),
            ("report.max_repetition_rate", self.report.max_repetition_rate),
        ];
        for (name, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(
                    ConfigError::for_key(name, format!("must be within [0, 1], got {}", value)).into(),
                );
            }
        }

        if self.quality.max_output_chars < self.quality.min_part_chars {
            return Err(ConfigError::for_key(
                "quality.max_output_chars",
                format!(
                    "({}) must not be below quality.min_part_chars ({})",
                    self.quality.max_output_chars, self.quality.min_part_chars
                ),
            )
            .into());
        }

        let generation = &self.generation;
        if generation.max_attempts == 0 {
            return Err(ConfigError::for_key("generation.max_attempts", "must be at least 1").into());
        }
        if generation.narration_parts == 0 {
            return Err(
                ConfigError::for_key("generation.narration_parts", "must be at least 1").into(),
            );
        }
        if generation.min_bullets > generation.max_bullets {
            return Err(ConfigError::for_key(
                "generation.min_bullets",
                format!(
                    "({}) exceeds generation.max_bullets ({})",
                    generation.min_bullets, generation.max_bullets
                ),
            )
            .into());
        }
        let temperatures = [
            ("generation.base_temperature", generation.base_temperature),
            ("generation.temperature_step", generation.temperature_step),
            ("generation.max_temperature", generation.max_temperature),
            ("generation.json_only_temperature", generation.json_only_temperature),
            ("generation.rewrite_temperature", generation.rewrite_temperature),
        ];
        for (name, value) in temperatures {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::for_key(
                    name,
                    format!("must be a finite, non-negative number, got {}", value),
                )
                .into());
            }
        }

        Ok(())
    }
}
