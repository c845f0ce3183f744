//! Configuration loading from TOML files.

use docent_narration::NarrationConfig;
use std::io::Write;

#[test]
fn test_partial_file_keeps_defaults() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(file, "[quality]\nmin_part_chars = 400\n\n[generation]\nmax_attempts = 5")?;

    let config = NarrationConfig::from_file(file.path())?;

    assert_eq!(config.quality.min_part_chars, 400);
    assert_eq!(config.quality.min_chinese_ratio, 0.9);
    assert_eq!(config.generation.max_attempts, 5);
    assert_eq!(config.generation.max_tokens, 8192);
    assert_eq!(config.report.min_chinese_ratio, 0.7);
    Ok(())
}

#[test]
fn test_invalid_threshold_is_rejected() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(file, "[report]\nmax_repetition_rate = 2.0")?;

    assert!(NarrationConfig::from_file(file.path()).is_err());
    Ok(())
}

#[test]
fn test_missing_file_is_an_error() {
    assert!(NarrationConfig::from_file("/nonexistent/docent.toml").is_err());
}
