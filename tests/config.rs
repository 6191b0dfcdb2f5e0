use std::fs;
use std::time::Duration;

use anyhow::Result;
use tempfile::tempdir;
use tonegrader::config::{AppConfig, ConfigOverrides};
use tonegrader::grading::{LetterGrade, PhraseBank};

const BANK: &str = r#"[
    {"chinese": "谢谢", "pinyin": "xièxie", "wordScores": [0.95]},
    {"text": "再见", "pinyin": "zài jiàn", "scores": [0.4, 0.5]}
]"#;

#[test]
fn phrase_bank_path_is_relative_to_config_file() -> Result<()> {
    let temp = tempdir()?;
    fs::create_dir(temp.path().join("banks"))?;
    fs::write(temp.path().join("banks/custom.json"), BANK)?;
    let config_path = temp.path().join("tonegrader.json");
    fs::write(
        &config_path,
        r#"{"listenDelayMs": 250, "seed": 9, "phrases": "banks/custom.json"}"#,
    )?;

    let config = AppConfig::resolve(Some(&config_path), &ConfigOverrides::default())?;
    let bank = config.phrase_bank()?;
    assert_eq!(bank.len(), 2);
    assert_eq!(bank.get(0).map(|sample| sample.text.as_str()), Some("谢谢"));
    assert_eq!(bank.get(1).and_then(|sample| sample.grade()), Some(LetterGrade::F));

    let session = config.session_config()?;
    assert_eq!(session.listen_delay, Duration::from_millis(250));
    assert_eq!(session.seed, Some(9));
    Ok(())
}

#[test]
fn cli_overrides_beat_file_values() -> Result<()> {
    let temp = tempdir()?;
    let config_path = temp.path().join("tonegrader.json");
    fs::write(&config_path, r#"{"listen_delay_ms": 900, "seed": 1}"#)?;
    let overrides = ConfigOverrides {
        listen_delay_ms: Some(0),
        ..ConfigOverrides::default()
    };
    let config = AppConfig::resolve(Some(&config_path), &overrides)?;
    assert_eq!(config.listen_delay_ms, 0);
    assert_eq!(config.seed, Some(1));
    Ok(())
}

#[test]
fn out_of_range_values_fail_validation() {
    let overrides = ConfigOverrides {
        listen_delay_ms: Some(120_000),
        ..ConfigOverrides::default()
    };
    assert!(AppConfig::resolve(None, &overrides).is_err());
    let zero_tone = AppConfig::from_json(r#"{"toneMs": 0}"#).unwrap();
    assert!(zero_tone.validate().is_err());
}

#[test]
fn invalid_phrase_banks_are_rejected() -> Result<()> {
    assert!(PhraseBank::from_json("[]").is_err());
    assert!(PhraseBank::from_json(r#"[{"text": "好", "pinyin": "hǎo", "scores": []}]"#).is_err());
    assert!(
        PhraseBank::from_json(r#"[{"text": "好", "pinyin": "hǎo", "scores": [1.5]}]"#).is_err()
    );

    let temp = tempdir()?;
    let missing = temp.path().join("absent.json");
    let config = AppConfig {
        phrases: Some(missing),
        ..AppConfig::default()
    };
    assert!(config.phrase_bank().is_err());
    Ok(())
}
