use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::audio::playback::Tone;
use crate::grading::{CaptureSettings, PhraseBank, SessionConfig};

const MAX_LISTEN_DELAY_MS: u64 = 60_000;
const MAX_CAPTURE_SECONDS: u32 = 300;

/// Application settings: defaults, then an optional JSON file, then CLI flags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    #[serde(alias = "listenDelayMs")]
    pub listen_delay_ms: u64,
    pub seed: Option<u64>,
    pub phrases: Option<PathBuf>,
    #[serde(alias = "toneHz")]
    pub tone_hz: f32,
    #[serde(alias = "toneMs")]
    pub tone_ms: u64,
    pub capture: CaptureSection,
    #[serde(alias = "saveRecording")]
    pub save_recording: Option<PathBuf>,
    pub font: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptureSection {
    pub enabled: bool,
    pub device: Option<String>,
    #[serde(alias = "maxSeconds")]
    pub max_seconds: u32,
}

/// Values supplied on the command line; `None` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub listen_delay_ms: Option<u64>,
    pub seed: Option<u64>,
    pub phrases: Option<PathBuf>,
    pub capture: Option<bool>,
    pub device: Option<String>,
    pub save_recording: Option<PathBuf>,
    pub font: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_delay_ms: 1_500,
            seed: None,
            phrases: None,
            tone_hz: 440.0,
            tone_ms: 500,
            capture: CaptureSection::default(),
            save_recording: None,
            font: None,
        }
    }
}

impl Default for CaptureSection {
    fn default() -> Self {
        Self {
            enabled: false,
            device: None,
            max_seconds: 30,
        }
    }
}

impl AppConfig {
    /// Loads, overrides and validates in one step.
    pub fn resolve(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let config = Self::load(path)?.with_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {:?}", path))?;
        let config = Self::from_json(&raw)
            .with_context(|| format!("failed to parse config file {:?}", path))?;
        Ok(config.relative_to(path.parent().unwrap_or_else(|| Path::new(""))))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("invalid configuration JSON")
    }

    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(delay) = overrides.listen_delay_ms {
            self.listen_delay_ms = delay;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        if overrides.phrases.is_some() {
            self.phrases = overrides.phrases.clone();
        }
        if let Some(enabled) = overrides.capture {
            self.capture.enabled = enabled;
        }
        if overrides.device.is_some() {
            self.capture.device = overrides.device.clone();
        }
        if overrides.save_recording.is_some() {
            self.save_recording = overrides.save_recording.clone();
        }
        if overrides.font.is_some() {
            self.font = overrides.font.clone();
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.listen_delay_ms <= MAX_LISTEN_DELAY_MS,
            "listen delay must be at most {} ms, got {}",
            MAX_LISTEN_DELAY_MS,
            self.listen_delay_ms
        );
        ensure!(
            self.tone_hz.is_finite() && self.tone_hz > 0.0,
            "tone frequency must be positive, got {}",
            self.tone_hz
        );
        ensure!(self.tone_ms > 0, "tone duration must be positive");
        ensure!(
            (1..=MAX_CAPTURE_SECONDS).contains(&self.capture.max_seconds),
            "capture length must be between 1 and {} seconds, got {}",
            MAX_CAPTURE_SECONDS,
            self.capture.max_seconds
        );
        Ok(())
    }

    pub fn phrase_bank(&self) -> Result<PhraseBank> {
        match &self.phrases {
            Some(path) => PhraseBank::load(path)
                .with_context(|| format!("failed to load phrase bank {:?}", path)),
            None => Ok(PhraseBank::builtin()),
        }
    }

    pub fn tone(&self) -> Tone {
        Tone::new(self.tone_hz, Duration::from_millis(self.tone_ms))
    }

    pub fn session_config(&self) -> Result<SessionConfig> {
        let capture = CaptureSettings::new(
            self.capture.enabled,
            self.capture.device.clone(),
            self.capture.max_seconds,
        );
        Ok(SessionConfig::new(self.phrase_bank()?)
            .with_delay(Duration::from_millis(self.listen_delay_ms))
            .with_seed(self.seed)
            .with_tone(self.tone())
            .with_capture(capture)
            .with_recording_path(self.save_recording.clone())
            .with_font(self.font.clone()))
    }

    /// Paths inside a config file are relative to the file itself.
    fn relative_to(mut self, base: &Path) -> Self {
        self.phrases = self.phrases.map(|path| anchor(base, path));
        self.save_recording = self.save_recording.map(|path| anchor(base, path));
        self.font = self.font.map(|path| anchor(base, path));
        self
    }
}

fn anchor(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigOverrides};
    use std::path::PathBuf;

    #[test]
    fn defaults_match_widget_behaviour() {
        let config = AppConfig::default();
        assert_eq!(config.listen_delay_ms, 1_500);
        assert!(!config.capture.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn accepts_camel_case_keys() {
        let config = AppConfig::from_json(
            r#"{"listenDelayMs": 200, "toneHz": 523.25, "capture": {"maxSeconds": 10}}"#,
        )
        .unwrap();
        assert_eq!(config.listen_delay_ms, 200);
        assert_eq!(config.capture.max_seconds, 10);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(AppConfig::from_json(r#"{"delay": 5}"#).is_err());
    }

    #[test]
    fn overrides_replace_only_given_values() {
        let overrides = ConfigOverrides {
            listen_delay_ms: Some(10),
            capture: Some(true),
            ..ConfigOverrides::default()
        };
        let config = AppConfig::default().with_overrides(&overrides);
        assert_eq!(config.listen_delay_ms, 10);
        assert!(config.capture.enabled);
        assert_eq!(config.tone_hz, 440.0);
    }

    #[test]
    fn file_paths_are_anchored_to_config_dir() {
        let config = AppConfig {
            phrases: Some(PathBuf::from("bank.json")),
            ..AppConfig::default()
        }
        .relative_to(&PathBuf::from("/etc/tonegrader"));
        assert_eq!(
            config.phrases,
            Some(PathBuf::from("/etc/tonegrader/bank.json"))
        );
    }
}
